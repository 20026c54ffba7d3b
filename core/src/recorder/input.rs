use log::debug;

use crate::midi::types::U7;
use crate::midi::Message;
use crate::recorder::keys::Key;

pub const DRUM_CHANNEL: u8 = 9;

pub const CC_MOD_WHEEL: U7 = 1;

const MAX_DATA: f64 = 127.0;
const PITCH_BEND_CENTER: f64 = 8192.0;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum InputEvent {
  KeyDown { key: Key, velocity: f64 },

  KeyUp { key: Key },

  Controller { controller: U7, value: f64 },

  ModWheel(f64),

  PitchWheel(f64),

  PolyPressure { key: Key, value: f64 },
}

impl InputEvent {
  pub fn from_message(message: &Message) -> Option<InputEvent> {
    if message.channel() == Some(DRUM_CHANNEL) {
      return None;
    }

    match *message {
      Message::NoteOff { key, .. } | Message::NoteOn { key, velocity: 0, .. } => {
        Some(InputEvent::KeyUp { key })
      }
      Message::NoteOn { key, velocity, .. } => Some(InputEvent::KeyDown {
        key,
        velocity: f64::from(velocity) / MAX_DATA,
      }),
      Message::ControlChange {
        controller: CC_MOD_WHEEL,
        value,
        ..
      } => Some(InputEvent::ModWheel(f64::from(value) / MAX_DATA)),
      Message::ControlChange {
        controller, value, ..
      } => Some(InputEvent::Controller {
        controller,
        value: f64::from(value) / MAX_DATA,
      }),
      Message::PitchBend { value, .. } => Some(InputEvent::PitchWheel(
        (f64::from(value) - PITCH_BEND_CENTER) / PITCH_BEND_CENTER,
      )),
      Message::PolyphonicKeyPressure { key, value, .. } => Some(InputEvent::PolyPressure {
        key,
        value: f64::from(value) / MAX_DATA,
      }),
      _ => {
        debug!("Ignoring MIDI message {:?}", message);
        None
      }
    }
  }
}
