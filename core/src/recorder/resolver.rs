//! Turns a pattern's committed notes plus the freshly recorded ones into a
//! sorted set of notes that never overlap, merging chords on the way.

use std::cmp::min;

use log::{trace, warn};

use crate::recorder::keys::RecordedNote;
use crate::song::envelope;
use crate::song::note::Note;
use crate::song::pattern::PatternId;
use crate::song::Document;

/// Notes of one pattern waiting to be resolved
#[derive(Debug, Clone)]
pub struct Bag {
  pub pattern: PatternId,
  pub existing: Vec<Note>,
  pub pending: Vec<Note>,
}

/// Outcome of resolving a bag, `existing` is what has to be deleted
#[derive(Debug, Clone)]
pub struct Resolved {
  pub pattern: PatternId,
  pub existing: Vec<Note>,
  pub notes: Vec<Note>,
}

/// Groups the recorded notes by pattern, in the order patterns first appear.
///
/// Notes without a pattern, or whose pattern is gone, are dropped.
/// Recorded notes are clamped to the pattern length.
pub fn partition<D>(recorded: &[RecordedNote], document: &D) -> Vec<Bag>
where
  D: Document + ?Sized,
{
  let mut bags: Vec<Bag> = Vec::new();

  for recorded_note in recorded {
    let (note, pattern_id) = match (&recorded_note.note, &recorded_note.pattern) {
      (Some(note), Some(pattern_id)) => (note, pattern_id),
      _ => continue,
    };

    let pattern = match document.pattern(pattern_id) {
      Some(pattern) => pattern,
      None => {
        warn!(
          "Dropping note {:?} recorded into missing pattern {}",
          note.pitches, pattern_id
        );
        continue;
      }
    };

    let mut note = note.clone();
    let length = pattern.length();
    note.set_interval(min(note.start, length), min(note.end, length));

    match bags.iter_mut().find(|bag| bag.pattern == *pattern_id) {
      Some(bag) => bag.pending.push(note),
      None => bags.push(Bag {
        pattern: *pattern_id,
        existing: pattern.notes().to_vec(),
        pending: vec![note],
      }),
    }
  }

  bags
}

/// Percentage of `note` covered by `other`, measured from the closest boundaries
pub fn overlap_percentage(note: &Note, other: &Note) -> f64 {
  let length = note.duration();
  if length.is_zero() {
    return 0.0;
  }
  let overlap = min(
    note.start.distance(other.end),
    note.end.distance(other.start),
  );
  let overlap = min(overlap, length);
  f64::from(overlap) * 100.0 / f64::from(length)
}

const MAX_MINIMAL_OWN_NOTE: f64 = 99.0;

pub struct Resolver {
  chord_threshold: f64,
}

impl Resolver {
  /// `minimal_own_note` is clamped to `[0, 99]` percent
  pub fn new(minimal_own_note: f64) -> Resolver {
    let minimal_own_note = minimal_own_note.max(0.0).min(MAX_MINIMAL_OWN_NOTE);
    Resolver {
      chord_threshold: 100.0 - minimal_own_note,
    }
  }

  pub fn is_chord_candidate(&self, note: &Note, other: &Note) -> bool {
    note.collides(other) && overlap_percentage(note, other) >= self.chord_threshold
  }

  fn chord_candidates(&self, current: usize, notes: &[Note], consumed: &[bool]) -> Vec<usize> {
    let note = &notes[current];
    notes
      .iter()
      .enumerate()
      .filter(|(index, other)| !consumed[*index] && self.is_chord_candidate(note, other))
      .map(|(index, _)| index)
      .collect()
  }

  pub fn resolve_bag(&self, bag: Bag) -> Resolved {
    let Bag {
      pattern,
      existing,
      mut pending,
    } = bag;
    pending.extend(existing.iter().cloned());
    Resolved {
      pattern,
      existing,
      notes: self.resolve(pending),
    }
  }

  /// Resolves the notes of a single pattern.
  ///
  /// Ties on the start keep the input order. The result is sorted by start,
  /// free of overlaps and of zero length notes.
  pub fn resolve(&self, mut notes: Vec<Note>) -> Vec<Note> {
    notes.sort_by_key(|note| note.start);

    let mut consumed = vec![false; notes.len()];
    let mut open: Vec<usize> = Vec::new();
    let mut finished: Vec<usize> = Vec::new();

    for current in 0..notes.len() {
      if consumed[current] {
        continue;
      }

      let pole = notes[current].start;
      for &index in open.iter() {
        if notes[index].end > pole {
          notes[index].end = pole;
        }
      }
      open.clear();

      if self.chord_candidates(current, &notes, &consumed).len() >= 2 {
        self.merge_chord(current, &mut notes, &mut consumed, &mut open);
      } else {
        open.push(current);
      }
      finished.push(current);
    }

    finished
      .into_iter()
      .map(|index| notes[index].clone())
      .filter(|note| !note.is_empty())
      .map(|mut note| {
        envelope::fit(&mut note);
        note
      })
      .collect()
  }

  fn merge_chord(
    &self,
    current: usize,
    notes: &mut [Note],
    consumed: &mut [bool],
    open: &mut Vec<usize>,
  ) {
    let mut iterations = 0;
    loop {
      iterations += 1;
      debug_assert!(
        iterations <= notes.len(),
        "Chord at {:?} did not converge",
        notes[current].start
      );

      let candidates = self.chord_candidates(current, notes, consumed);

      if candidates
        .iter()
        .all(|&index| notes[index].same_interval(&notes[current]))
      {
        let mut pitches = notes[current].pitches.clone();
        for &index in candidates.iter().filter(|&&index| index != current) {
          for &pitch in notes[index].pitches.iter() {
            if !pitches.contains(&pitch) {
              pitches.push(pitch);
            }
          }
          consumed[index] = true;
        }
        trace!(
          "Merged chord {:?} at [{:?}, {:?})",
          pitches,
          notes[current].start,
          notes[current].end
        );
        notes[current].pitches = pitches;
        if envelope::is_flat(&notes[current].pins) {
          let bent = candidates
            .iter()
            .map(|&index| &notes[index].pins)
            .find(|pins| !envelope::is_flat(pins))
            .cloned();
          if let Some(pins) = bent {
            notes[current].pins = pins;
          }
        }
        open.extend(candidates);
        return;
      }

      let start = notes[current].start;
      let end = candidates
        .iter()
        .map(|&index| notes[index].end)
        .max()
        .unwrap_or(notes[current].end);
      for &index in candidates.iter() {
        notes[index].set_interval(start, end);
      }
    }
  }
}

#[cfg(test)]
mod test {

  use super::{overlap_percentage, partition, Resolver};
  use crate::recorder::keys::RecordedNote;
  use crate::song::note::{Note, Pin};
  use crate::song::pattern::{Pattern, PatternId};
  use crate::song::Song;
  use crate::time::TicksTime;

  fn note(pitch: u8, start: u64, end: u64) -> Note {
    Note::new(pitch, TicksTime::new(start), TicksTime::new(end), 6)
  }

  fn intervals(notes: &[Note]) -> Vec<(u64, u64)> {
    notes
      .iter()
      .map(|note| (u64::from(note.start), u64::from(note.end)))
      .collect()
  }

  fn assert_no_overlaps(notes: &[Note]) {
    for pair in notes.windows(2) {
      assert!(pair[0].end <= pair[1].start, "{:?} overlaps {:?}", pair[0], pair[1]);
    }
    assert!(notes.iter().all(|note| !note.is_empty()));
  }

  #[test]
  pub fn overlap_percentage_cases() {
    let base = note(60, 0, 100);
    assert_eq!(overlap_percentage(&base, &note(61, 0, 100)), 100.0);
    assert_eq!(overlap_percentage(&base, &note(61, 5, 100)), 95.0);
    assert_eq!(overlap_percentage(&base, &note(61, 0, 10)), 10.0);
    assert_eq!(overlap_percentage(&base, &note(61, 100, 150)), 0.0);
    assert_eq!(overlap_percentage(&base, &note(61, 0, 300)), 100.0);
    assert_eq!(overlap_percentage(&note(60, 10, 10), &base), 0.0);
  }

  #[test]
  /// Notes pressed and released together become one note holding both pitches
  pub fn resolve_identical_chord() {
    let resolver = Resolver::new(10.0);
    let result = resolver.resolve(vec![note(60, 0, 96), note(64, 0, 96)]);
    assert_eq!(intervals(&result), vec![(0, 96)]);
    assert_eq!(result[0].pitches, vec![60, 64]);
  }

  #[test]
  /// Chord notes with slightly different timing are unified onto the longest one
  pub fn resolve_loose_chord() {
    let resolver = Resolver::new(10.0);
    let result = resolver.resolve(vec![
      note(60, 0, 96),
      note(64, 4, 98),
      note(67, 2, 100),
    ]);
    assert_eq!(intervals(&result), vec![(0, 100)]);
    assert_eq!(result[0].pitches, vec![60, 67, 64]);
  }

  #[test]
  pub fn resolve_chord_pitch_count() {
    let resolver = Resolver::new(10.0);
    let mut a = note(60, 0, 48);
    a.pitches.push(72);
    let b = note(64, 0, 48);
    let mut c = note(67, 0, 48);
    c.pitches.push(79);
    let result = resolver.resolve(vec![a, b, c]);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].pitches.len(), 5);
  }

  #[test]
  /// A chord keeps the bend of the first bent note in it
  pub fn resolve_chord_keeps_bent_envelope() {
    let resolver = Resolver::new(10.0);
    let bent_pins = vec![
      Pin::new(TicksTime::new(0), 0),
      Pin::new(TicksTime::new(24), 2),
      Pin::new(TicksTime::new(48), 0),
    ];
    let mut bent = note(64, 0, 48);
    bent.pins = bent_pins.clone();
    let result = resolver.resolve(vec![note(60, 0, 48), bent]);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].pitches, vec![60, 64]);
    assert_eq!(result[0].pins, bent_pins);
  }

  #[test]
  pub fn resolve_chord_skips_duplicate_pitches() {
    let resolver = Resolver::new(10.0);
    let result = resolver.resolve(vec![note(60, 0, 48), note(60, 0, 48)]);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].pitches, vec![60]);
  }

  #[test]
  /// An earlier note is clipped to end where the next one starts
  pub fn resolve_sequential_overlap() {
    let resolver = Resolver::new(10.0);
    let result = resolver.resolve(vec![note(60, 0, 50), note(62, 40, 90)]);
    assert_eq!(intervals(&result), vec![(0, 40), (40, 90)]);
    assert_eq!(result[0].pitches, vec![60]);
    assert_eq!(result[1].pitches, vec![62]);
    assert_eq!(
      result[0].pins.last(),
      Some(&Pin::new(TicksTime::new(40), 0))
    );
  }

  #[test]
  /// Clipped to nothing, a note disappears from the output
  pub fn resolve_drops_zero_length() {
    let resolver = Resolver::new(10.0);
    let result = resolver.resolve(vec![note(60, 0, 100), note(62, 0, 10), note(64, 30, 30)]);
    assert_eq!(intervals(&result), vec![(0, 10)]);
    assert_eq!(result[0].pitches, vec![62]);
  }

  #[test]
  pub fn resolve_chord_followed_by_note() {
    let resolver = Resolver::new(10.0);
    let result = resolver.resolve(vec![
      note(60, 0, 96),
      note(64, 0, 96),
      note(67, 48, 144),
    ]);
    assert_eq!(intervals(&result), vec![(0, 48), (48, 144)]);
    assert_eq!(result[0].pitches, vec![60, 64]);
    assert_no_overlaps(&result);
  }

  #[test]
  pub fn resolve_rescales_bent_envelope() {
    let resolver = Resolver::new(10.0);
    let mut bent = note(60, 0, 96);
    bent.pins = vec![
      Pin::new(TicksTime::new(0), 0),
      Pin::new(TicksTime::new(48), 3),
      Pin::new(TicksTime::new(96), 0),
    ];
    let result = resolver.resolve(vec![bent, note(62, 48, 96)]);
    assert_eq!(intervals(&result), vec![(0, 48), (48, 96)]);
    assert_eq!(
      result[0].pins,
      vec![
        Pin::new(TicksTime::new(0), 0),
        Pin::new(TicksTime::new(24), 3),
        Pin::new(TicksTime::new(48), 0),
      ]
    );
  }

  #[test]
  /// Whatever the input, resolved notes never overlap
  pub fn resolve_never_overlaps() {
    let resolver = Resolver::new(10.0);
    let mut seed = 17u64;
    for _ in 0..200 {
      let mut notes = Vec::new();
      for pitch in 0..8u8 {
        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
        let start = (seed >> 33) % 180;
        let length = (seed >> 17) % 60;
        notes.push(note(48 + pitch, start, start + length));
      }
      let result = resolver.resolve(notes);
      assert_no_overlaps(&result);
      for note in result.iter() {
        assert_eq!(note.pins.last().map(|pin| pin.time), Some(note.duration()));
      }
    }
  }

  #[test]
  pub fn partition_by_pattern() {
    let mut song = Song::new("untitled");
    let first = song.add_pattern(Pattern::with_notes(TicksTime::new(192), vec![note(50, 0, 24)]));
    let second = song.add_pattern(Pattern::new(TicksTime::new(96)));
    let missing = PatternId::new();

    let recorded = vec![
      RecordedNote::recording(60, 1.0, note(60, 0, 48), Some(first)),
      RecordedNote::recording(61, 1.0, note(61, 80, 120), Some(second)),
      RecordedNote::recording(62, 1.0, note(62, 48, 96), Some(first)),
      RecordedNote::recording(63, 1.0, note(63, 0, 48), Some(missing)),
      RecordedNote::recording(64, 1.0, note(64, 0, 48), None),
      RecordedNote::new(65, 1.0),
    ];

    let bags = partition(&recorded, &song);
    assert_eq!(bags.len(), 2);
    assert_eq!(bags[0].pattern, first);
    assert_eq!(bags[0].existing, vec![note(50, 0, 24)]);
    assert_eq!(intervals(&bags[0].pending), vec![(0, 48), (48, 96)]);
    assert_eq!(bags[1].pattern, second);
    assert!(bags[1].existing.is_empty());
    assert_eq!(intervals(&bags[1].pending), vec![(80, 96)]);
  }
}
