use std::mem;

use crate::song::note::Note;
use crate::song::pattern::PatternId;

pub type Key = u8;

pub const NUM_KEYS: usize = 128;

/// A note being captured from the moment its key goes down
#[derive(Debug, PartialEq, Clone)]
pub struct RecordedNote {
  pub key: Key,
  pub velocity: f64,
  pub note: Option<Note>,
  pub pattern: Option<PatternId>,
}

impl RecordedNote {
  pub fn new(key: Key, velocity: f64) -> RecordedNote {
    RecordedNote {
      key,
      velocity,
      note: None,
      pattern: None,
    }
  }

  pub fn recording(key: Key, velocity: f64, note: Note, pattern: Option<PatternId>) -> RecordedNote {
    RecordedNote {
      key,
      velocity,
      note: Some(note),
      pattern,
    }
  }
}

#[derive(Debug, PartialEq, Clone)]
pub enum KeySlot {
  Released,

  /// Pressed while the transport was stopped, nothing is recorded
  Held { velocity: f64 },

  Recording(RecordedNote),
}

impl KeySlot {
  pub fn is_pressed(&self) -> bool {
    match self {
      KeySlot::Released => false,
      KeySlot::Held { .. } | KeySlot::Recording(_) => true,
    }
  }
}

pub struct KeyTable {
  slots: Vec<KeySlot>,
}

impl Default for KeyTable {
  fn default() -> Self {
    KeyTable {
      slots: vec![KeySlot::Released; NUM_KEYS],
    }
  }
}

impl KeyTable {
  pub fn new() -> KeyTable {
    KeyTable::default()
  }

  pub fn get(&self, key: Key) -> Option<&KeySlot> {
    self.slots.get(key as usize)
  }

  /// Replaces whatever the key held before, returns false for keys out of range
  pub fn press(&mut self, key: Key, slot: KeySlot) -> bool {
    match self.slots.get_mut(key as usize) {
      Some(current) => {
        *current = slot;
        true
      }
      None => false,
    }
  }

  pub fn release(&mut self, key: Key) -> KeySlot {
    self
      .slots
      .get_mut(key as usize)
      .map(|slot| mem::replace(slot, KeySlot::Released))
      .unwrap_or(KeySlot::Released)
  }

  pub fn is_pressed(&self, key: Key) -> bool {
    self.get(key).map_or(false, KeySlot::is_pressed)
  }

  pub fn is_empty(&self) -> bool {
    !self.slots.iter().any(KeySlot::is_pressed)
  }

  pub fn held_keys(&self) -> Vec<Key> {
    self
      .slots
      .iter()
      .enumerate()
      .filter(|(_, slot)| slot.is_pressed())
      .map(|(key, _)| key as Key)
      .collect()
  }
}
