pub mod edit;
pub mod envelope;
pub mod note;
pub mod pattern;

use failure::Fail;
use log::{debug, error};

use self::{
  edit::{Edit, Transaction},
  pattern::{Pattern, PatternId},
};

#[derive(Debug, Fail, PartialEq)]
pub enum DocumentError {
  #[fail(display = "Pattern not found: {}", pattern)]
  PatternNotFound { pattern: PatternId },

  #[fail(
    display = "Note index {} out of bounds for pattern {} with {} notes",
    index, pattern, len
  )]
  IndexOutOfBounds {
    pattern: PatternId,
    index: usize,
    len: usize,
  },

  #[fail(
    display = "Note at index {} of pattern {} differs from the deleted one",
    index, pattern
  )]
  NoteMismatch { pattern: PatternId, index: usize },
}

/// Owner of the patterns that recorded notes are committed into
pub trait Document {
  fn pattern(&self, id: &PatternId) -> Option<&Pattern>;

  /// Applies every edit of the transaction or none of them
  fn record(&mut self, transaction: Transaction) -> Result<(), DocumentError>;
}

pub struct Song {
  name: String,

  patterns: Vec<Pattern>,

  history: Vec<Transaction>,
  pointer: usize,
}

impl Song {
  pub fn new<T>(name: T) -> Song
  where
    T: Into<String>,
  {
    Song {
      name: name.into(),
      patterns: Vec::new(),
      history: Vec::new(),
      pointer: 0,
    }
  }

  pub fn set_name<T>(&mut self, name: T)
  where
    T: Into<String>,
  {
    self.name = name.into();
  }

  pub fn get_name(&self) -> &str {
    self.name.as_str()
  }

  pub fn add_pattern(&mut self, pattern: Pattern) -> PatternId {
    let id = *pattern.id();
    self.patterns.push(pattern);
    id
  }

  pub fn patterns(&self) -> impl Iterator<Item = &Pattern> {
    self.patterns.iter()
  }

  pub fn has_undo(&self) -> bool {
    self.pointer != 0
  }

  pub fn has_redo(&self) -> bool {
    self.pointer < self.history.len()
  }

  /// Reverts the last recorded transaction and returns its name
  pub fn undo(&mut self) -> Result<Option<String>, DocumentError> {
    if self.pointer == 0 {
      return Ok(None);
    }

    let transaction = self.history[self.pointer - 1].inverse();
    self.apply(&transaction)?;
    self.pointer -= 1;
    debug!("Undone '{}'", transaction.name());
    Ok(Some(transaction.name().to_string()))
  }

  pub fn redo(&mut self) -> Result<Option<String>, DocumentError> {
    if !self.has_redo() {
      return Ok(None);
    }

    let transaction = self.history[self.pointer].clone();
    self.apply(&transaction)?;
    self.pointer += 1;
    debug!("Redone '{}'", transaction.name());
    Ok(Some(transaction.name().to_string()))
  }

  fn pattern_mut(&mut self, id: &PatternId) -> Option<&mut Pattern> {
    self.patterns.iter_mut().find(|pattern| pattern.id() == id)
  }

  fn apply_edit(&mut self, edit: &Edit) -> Result<(), DocumentError> {
    let pattern = self
      .pattern_mut(edit.pattern())
      .ok_or(DocumentError::PatternNotFound {
        pattern: *edit.pattern(),
      })?;

    match edit {
      Edit::DeleteNoteAt { index, note, .. } => pattern.remove_note(*index, note).map(|_| ()),
      Edit::InsertNoteAt { index, note, .. } => pattern.insert_note(*index, note.clone()),
    }
  }

  fn apply(&mut self, transaction: &Transaction) -> Result<(), DocumentError> {
    for (applied, edit) in transaction.edits().iter().enumerate() {
      if let Err(err) = self.apply_edit(edit) {
        for done in transaction.edits()[..applied].iter().rev() {
          if let Err(rollback_err) = self.apply_edit(&done.inverse()) {
            error!(
              "Failed to roll back '{}': {}",
              transaction.name(),
              rollback_err
            );
          }
        }
        return Err(err);
      }
    }
    Ok(())
  }
}

impl Document for Song {
  fn pattern(&self, id: &PatternId) -> Option<&Pattern> {
    self.patterns.iter().find(|pattern| pattern.id() == id)
  }

  fn record(&mut self, transaction: Transaction) -> Result<(), DocumentError> {
    self.apply(&transaction)?;
    debug!(
      "Recorded '{}' with {} edits",
      transaction.name(),
      transaction.edits().len()
    );
    self.history.truncate(self.pointer);
    self.history.push(transaction);
    self.pointer = self.history.len();
    Ok(())
  }
}
