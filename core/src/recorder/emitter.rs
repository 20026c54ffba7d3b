use crate::recorder::resolver::Resolved;
use crate::song::edit::{Edit, Transaction};
use crate::time::TicksTime;

/// Builds the transaction that swaps every resolved pattern's notes for the new ones.
///
/// All deletes come first, from the last note down so each index stays valid.
/// Inserts follow, each placed before the first note already in the pattern
/// that starts at or after the new note's end.
pub fn emit<T>(name: T, resolved: &[Resolved]) -> Transaction
where
  T: Into<String>,
{
  let mut transaction = Transaction::new(name);

  for bag in resolved {
    for (index, note) in bag.existing.iter().enumerate().rev() {
      transaction.push(Edit::DeleteNoteAt {
        pattern: bag.pattern,
        index,
        note: note.clone(),
      });
    }
  }

  for bag in resolved {
    let mut starts: Vec<TicksTime> = Vec::with_capacity(bag.notes.len());
    for note in bag.notes.iter().filter(|note| !note.is_empty()) {
      let index = starts
        .iter()
        .position(|start| *start >= note.end)
        .unwrap_or_else(|| starts.len());
      starts.insert(index, note.start);
      transaction.push(Edit::InsertNoteAt {
        pattern: bag.pattern,
        index,
        note: note.clone(),
      });
    }
  }

  transaction
}
