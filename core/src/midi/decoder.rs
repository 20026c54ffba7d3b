use std::collections::VecDeque;

use crate::midi::messages::Message;
use crate::midi::types::{U14, U4, U7};

/// Splits a raw byte stream into channel messages.
///
/// Data bytes arriving without a status byte reuse the last channel status.
/// System messages are not interpreted and come out as `Message::Unknown`.
/// Real-time bytes interleaved with a message are yielded right after it.
pub struct Decoder<'a> {
  pos: usize,
  start: usize,
  running_status: Option<u8>,
  realtime: VecDeque<u8>,
  data: &'a [u8],
}

fn is_realtime(byte: u8) -> bool {
  byte >= 0xf8
}

impl<'a> Decoder<'a> {
  pub fn new(data: &'a [u8]) -> Decoder<'a> {
    Decoder {
      pos: 0,
      start: 0,
      running_status: None,
      realtime: VecDeque::new(),
      data,
    }
  }

  fn unknown(&self, end: usize) -> Message {
    let bytes = self.data[self.start..end]
      .iter()
      .enumerate()
      .filter(|(index, byte)| *index == 0 || !is_realtime(**byte))
      .map(|(_, byte)| *byte)
      .collect();
    Message::Unknown(bytes)
  }

  fn next_data(&mut self) -> Result<U7, usize> {
    loop {
      match self.data.get(self.pos) {
        Some(&d) if d & 0b1000_0000 == 0 => {
          self.pos += 1;
          return Ok(d);
        }
        Some(&d) if is_realtime(d) => {
          self.pos += 1;
          self.realtime.push_back(d);
        }
        _ => return Err(self.pos),
      }
    }
  }

  fn next_data2(&mut self) -> Result<(U7, U7), usize> {
    let d1 = self.next_data()?;
    let d2 = self.next_data()?;
    Ok((d1, d2))
  }

  fn decode_note(&mut self, channel: U4, is_on: bool) -> Message {
    match self.next_data2() {
      Ok((key, velocity)) if is_on => Message::NoteOn {
        channel,
        key,
        velocity,
      },
      Ok((key, velocity)) => Message::NoteOff {
        channel,
        key,
        velocity,
      },
      Err(end) => self.unknown(end),
    }
  }

  fn decode_polyphonic_key_pressure(&mut self, channel: U4) -> Message {
    match self.next_data2() {
      Ok((key, value)) => Message::PolyphonicKeyPressure {
        channel,
        key,
        value,
      },
      Err(end) => self.unknown(end),
    }
  }

  fn decode_control_change(&mut self, channel: U4) -> Message {
    match self.next_data2() {
      Ok((controller, value)) => Message::ControlChange {
        channel,
        controller,
        value,
      },
      Err(end) => self.unknown(end),
    }
  }

  fn decode_program_change(&mut self, channel: U4) -> Message {
    match self.next_data() {
      Ok(value) => Message::ProgramChange { channel, value },
      Err(end) => self.unknown(end),
    }
  }

  fn decode_channel_pressure(&mut self, channel: U4) -> Message {
    match self.next_data() {
      Ok(value) => Message::ChannelPressure { channel, value },
      Err(end) => self.unknown(end),
    }
  }

  fn decode_pitch_bend(&mut self, channel: U4) -> Message {
    match self.next_data2() {
      Ok((lsb, msb)) => Message::PitchBend {
        channel,
        value: ((msb as U14) << 7) | (lsb as U14),
      },
      Err(end) => self.unknown(end),
    }
  }

  fn decode_system(&mut self) -> Message {
    while self.next_data().is_ok() {}
    self.unknown(self.pos)
  }

  fn decode(&mut self, status: u8) -> Message {
    let channel = status & 0x0f;
    match (status >> 4) & 0x0f {
      0b1000 => self.decode_note(channel, false),
      0b1001 => self.decode_note(channel, true),
      0b1010 => self.decode_polyphonic_key_pressure(channel),
      0b1011 => self.decode_control_change(channel),
      0b1100 => self.decode_program_change(channel),
      0b1101 => self.decode_channel_pressure(channel),
      0b1110 => self.decode_pitch_bend(channel),
      _ if status >= 0xf6 => self.unknown(self.pos),
      _ => self.decode_system(),
    }
  }
}

impl<'a> Iterator for Decoder<'a> {
  type Item = Message;

  fn next(&mut self) -> Option<Message> {
    if let Some(byte) = self.realtime.pop_front() {
      return Some(Message::Unknown(vec![byte]));
    }

    let byte = *self.data.get(self.pos)?;
    self.start = self.pos;

    if byte & 0b1000_0000 != 0 {
      self.pos += 1;
      if byte < 0xf0 {
        self.running_status = Some(byte);
      } else if byte < 0xf8 {
        self.running_status = None;
      }
      Some(self.decode(byte))
    } else {
      match self.running_status {
        Some(status) => Some(self.decode(status)),
        None => {
          self.pos += 1;
          Some(self.unknown(self.pos))
        }
      }
    }
  }
}
