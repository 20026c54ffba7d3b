use crate::song::envelope;
use crate::time::TicksTime;

pub type Pitch = u8;

pub type Volume = u8;

/// Envelope breakpoint, `time` is relative to the note start
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Pin {
  pub time: TicksTime,
  pub interval: i32,
}

impl Pin {
  pub fn new(time: TicksTime, interval: i32) -> Pin {
    Pin { time, interval }
  }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Note {
  pub pitches: Vec<Pitch>,
  pub start: TicksTime,
  pub end: TicksTime,
  pub volume: Volume,
  pub pins: Vec<Pin>,
}

impl Note {
  pub fn new(pitch: Pitch, start: TicksTime, end: TicksTime, volume: Volume) -> Note {
    Note {
      pitches: vec![pitch],
      start,
      end,
      volume,
      pins: envelope::default_pins(end - start),
    }
  }

  pub fn primary_pitch(&self) -> Option<Pitch> {
    self.pitches.first().cloned()
  }

  pub fn duration(&self) -> TicksTime {
    self.end - self.start
  }

  pub fn is_empty(&self) -> bool {
    self.end <= self.start
  }

  pub fn set_interval(&mut self, start: TicksTime, end: TicksTime) {
    self.start = start;
    self.end = end;
  }

  pub fn same_interval(&self, other: &Note) -> bool {
    self.start == other.start && self.end == other.end
  }

  /// Closed interval test, touching notes collide
  pub fn collides(&self, other: &Note) -> bool {
    self.start <= other.end && self.end >= other.start
  }
}

#[cfg(test)]
mod test {

  use super::{Note, Pin, TicksTime};

  #[test]
  pub fn note_new() {
    let note = Note::new(60, TicksTime::new(24), TicksTime::new(72), 6);
    assert_eq!(note.pitches, vec![60]);
    assert_eq!(note.primary_pitch(), Some(60));
    assert_eq!(note.duration(), TicksTime::new(48));
    assert_eq!(
      note.pins,
      vec![
        Pin::new(TicksTime::zero(), 0),
        Pin::new(TicksTime::new(48), 0)
      ]
    );
  }

  #[test]
  pub fn note_is_empty() {
    assert!(Note::new(60, TicksTime::new(24), TicksTime::new(24), 6).is_empty());
    assert!(!Note::new(60, TicksTime::new(24), TicksTime::new(25), 6).is_empty());
  }

  #[test]
  /// Collision is symmetric and includes touching boundaries
  pub fn note_collides() {
    let notes = vec![
      Note::new(60, TicksTime::new(0), TicksTime::new(50), 6),
      Note::new(61, TicksTime::new(40), TicksTime::new(90), 6),
      Note::new(62, TicksTime::new(90), TicksTime::new(100), 6),
      Note::new(63, TicksTime::new(120), TicksTime::new(130), 6),
      Note::new(64, TicksTime::new(10), TicksTime::new(10), 6),
    ];
    for a in notes.iter() {
      for b in notes.iter() {
        assert_eq!(a.collides(b), b.collides(a));
      }
    }
    assert!(notes[0].collides(&notes[1]));
    assert!(notes[1].collides(&notes[2]));
    assert!(!notes[0].collides(&notes[2]));
    assert!(!notes[2].collides(&notes[3]));
    assert!(notes[0].collides(&notes[4]));
  }
}
