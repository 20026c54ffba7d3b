use crate::song::note::Note;
use crate::song::pattern::PatternId;

#[derive(Debug, PartialEq, Clone)]
pub enum Edit {
  DeleteNoteAt {
    pattern: PatternId,
    index: usize,
    note: Note,
  },

  InsertNoteAt {
    pattern: PatternId,
    index: usize,
    note: Note,
  },
}

impl Edit {
  pub fn pattern(&self) -> &PatternId {
    match self {
      Edit::DeleteNoteAt { pattern, .. } => pattern,
      Edit::InsertNoteAt { pattern, .. } => pattern,
    }
  }

  pub fn inverse(&self) -> Edit {
    match self.clone() {
      Edit::DeleteNoteAt {
        pattern,
        index,
        note,
      } => Edit::InsertNoteAt {
        pattern,
        index,
        note,
      },
      Edit::InsertNoteAt {
        pattern,
        index,
        note,
      } => Edit::DeleteNoteAt {
        pattern,
        index,
        note,
      },
    }
  }
}

/// Named batch of edits applied and reverted as a unit
#[derive(Debug, PartialEq, Clone)]
pub struct Transaction {
  name: String,
  edits: Vec<Edit>,
}

impl Transaction {
  pub fn new<T>(name: T) -> Transaction
  where
    T: Into<String>,
  {
    Transaction {
      name: name.into(),
      edits: Vec::new(),
    }
  }

  pub fn name(&self) -> &str {
    self.name.as_str()
  }

  pub fn edits(&self) -> &[Edit] {
    self.edits.as_slice()
  }

  pub fn is_empty(&self) -> bool {
    self.edits.is_empty()
  }

  pub fn push(&mut self, edit: Edit) -> &mut Self {
    self.edits.push(edit);
    self
  }

  /// Edits that undo this transaction, in the order they have to be applied
  pub fn inverse(&self) -> Transaction {
    Transaction {
      name: self.name.clone(),
      edits: self.edits.iter().rev().map(Edit::inverse).collect(),
    }
  }
}

#[cfg(test)]
mod test {

  use super::{Edit, Transaction};
  use crate::song::note::Note;
  use crate::song::pattern::PatternId;
  use crate::time::TicksTime;

  #[test]
  pub fn transaction_inverse() {
    let pattern = PatternId::new();
    let old = Note::new(60, TicksTime::new(0), TicksTime::new(24), 6);
    let new = Note::new(61, TicksTime::new(0), TicksTime::new(48), 6);

    let mut transaction = Transaction::new("Record notes");
    transaction
      .push(Edit::DeleteNoteAt {
        pattern,
        index: 0,
        note: old.clone(),
      })
      .push(Edit::InsertNoteAt {
        pattern,
        index: 0,
        note: new.clone(),
      });

    let inverse = transaction.inverse();
    assert_eq!(inverse.name(), "Record notes");
    assert_eq!(
      inverse.edits(),
      &[
        Edit::DeleteNoteAt {
          pattern,
          index: 0,
          note: new
        },
        Edit::InsertNoteAt {
          pattern,
          index: 0,
          note: old
        },
      ]
    );
    assert_eq!(inverse.inverse(), transaction);
  }
}
