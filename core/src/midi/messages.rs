use crate::midi::types::{U14, U4, U7};

/// Channel voice messages the recorder understands, anything else stays as raw bytes
#[derive(Debug, PartialEq, Clone)]
pub enum Message {
  NoteOff { channel: U4, key: U7, velocity: U7 },

  NoteOn { channel: U4, key: U7, velocity: U7 },

  PolyphonicKeyPressure { channel: U4, key: U7, value: U7 },

  ControlChange { channel: U4, controller: U7, value: U7 },

  ProgramChange { channel: U4, value: U7 },

  ChannelPressure { channel: U4, value: U7 },

  PitchBend { channel: U4, value: U14 },

  Unknown(Vec<u8>),
}

impl Message {
  pub fn channel(&self) -> Option<U4> {
    match *self {
      Message::NoteOff { channel, .. }
      | Message::NoteOn { channel, .. }
      | Message::PolyphonicKeyPressure { channel, .. }
      | Message::ControlChange { channel, .. }
      | Message::ProgramChange { channel, .. }
      | Message::ChannelPressure { channel, .. }
      | Message::PitchBend { channel, .. } => Some(channel),
      Message::Unknown(_) => None,
    }
  }
}
