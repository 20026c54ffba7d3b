use std::fmt;

use uuid::Uuid;

use crate::song::note::Note;
use crate::song::DocumentError;
use crate::time::TicksTime;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct PatternId(Uuid);

impl PatternId {
  pub fn new() -> PatternId {
    PatternId(Uuid::new_v4())
  }
}

impl Default for PatternId {
  fn default() -> Self {
    PatternId::new()
  }
}

impl fmt::Display for PatternId {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// A loopable span of notes ordered by start.
///
/// Notes can only be changed through the edits of a recorded transaction,
/// every applied edit bumps the version.
#[derive(Debug, Clone)]
pub struct Pattern {
  id: PatternId,
  length: TicksTime,
  notes: Vec<Note>,
  version: u64,
}

impl Pattern {
  pub fn new(length: TicksTime) -> Pattern {
    Pattern::with_notes(length, Vec::new())
  }

  pub fn with_notes(length: TicksTime, mut notes: Vec<Note>) -> Pattern {
    notes.sort_by_key(|note| note.start);
    Pattern {
      id: PatternId::new(),
      length,
      notes,
      version: 0,
    }
  }

  pub fn id(&self) -> &PatternId {
    &self.id
  }

  pub fn length(&self) -> TicksTime {
    self.length
  }

  pub fn notes(&self) -> &[Note] {
    self.notes.as_slice()
  }

  pub fn version(&self) -> u64 {
    self.version
  }

  pub(crate) fn insert_note(&mut self, index: usize, note: Note) -> Result<(), DocumentError> {
    if index > self.notes.len() {
      return Err(self.out_of_bounds(index));
    }
    self.notes.insert(index, note);
    self.version += 1;
    Ok(())
  }

  pub(crate) fn remove_note(&mut self, index: usize, note: &Note) -> Result<Note, DocumentError> {
    match self.notes.get(index) {
      None => Err(self.out_of_bounds(index)),
      Some(existing) if existing != note => Err(DocumentError::NoteMismatch {
        pattern: self.id,
        index,
      }),
      Some(_) => {
        self.version += 1;
        Ok(self.notes.remove(index))
      }
    }
  }

  fn out_of_bounds(&self, index: usize) -> DocumentError {
    DocumentError::IndexOutOfBounds {
      pattern: self.id,
      index,
      len: self.notes.len(),
    }
  }
}

#[cfg(test)]
mod test {

  use super::{Pattern, TicksTime};
  use crate::song::note::Note;
  use crate::song::DocumentError;

  fn note(pitch: u8, start: u64, end: u64) -> Note {
    Note::new(pitch, TicksTime::new(start), TicksTime::new(end), 6)
  }

  #[test]
  pub fn pattern_with_notes_sorted() {
    let pattern = Pattern::with_notes(
      TicksTime::new(192),
      vec![note(62, 96, 120), note(60, 0, 24), note(61, 48, 72)],
    );
    let pitches: Vec<u8> = pattern.notes().iter().map(|n| n.pitches[0]).collect();
    assert_eq!(pitches, vec![60, 61, 62]);
    assert_eq!(pattern.version(), 0);
  }

  #[test]
  pub fn pattern_insert_remove() {
    let mut pattern = Pattern::new(TicksTime::new(192));
    assert!(pattern.insert_note(0, note(60, 0, 24)).is_ok());
    assert!(pattern.insert_note(1, note(61, 24, 48)).is_ok());
    assert_eq!(pattern.version(), 2);

    let removed = pattern.remove_note(0, &note(60, 0, 24));
    assert_eq!(removed, Ok(note(60, 0, 24)));
    assert_eq!(pattern.notes(), &[note(61, 24, 48)]);
    assert_eq!(pattern.version(), 3);
  }

  #[test]
  pub fn pattern_invalid_edits() {
    let mut pattern = Pattern::new(TicksTime::new(192));
    let id = *pattern.id();
    assert_eq!(
      pattern.insert_note(1, note(60, 0, 24)),
      Err(DocumentError::IndexOutOfBounds {
        pattern: id,
        index: 1,
        len: 0
      })
    );
    assert!(pattern.insert_note(0, note(60, 0, 24)).is_ok());
    assert_eq!(
      pattern.remove_note(0, &note(61, 0, 24)),
      Err(DocumentError::NoteMismatch {
        pattern: id,
        index: 0
      })
    );
    assert_eq!(pattern.version(), 1);
  }
}
