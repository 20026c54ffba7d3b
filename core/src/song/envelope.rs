//! Keeps a note's pins consistent with its duration after merges and clipping.

use crate::song::note::{Note, Pin};
use crate::time::TicksTime;

pub fn default_pins(duration: TicksTime) -> Vec<Pin> {
  vec![Pin::new(TicksTime::zero(), 0), Pin::new(duration, 0)]
}

/// At most two pins and no modulation at all
pub fn is_flat(pins: &[Pin]) -> bool {
  pins.len() <= 2 && pins.iter().all(|pin| pin.interval == 0)
}

/// Scales every pin time so that the last pin lands exactly on `duration`
pub fn rescale(pins: &mut [Pin], duration: TicksTime) {
  let previous = match pins.last() {
    Some(pin) => pin.time,
    None => return,
  };

  if previous == duration {
    return;
  }

  if previous.is_zero() {
    if let Some(last) = pins.last_mut() {
      last.time = duration;
    }
    return;
  }

  for pin in pins.iter_mut() {
    pin.time = pin.time.scale(duration, previous);
  }

  if let Some(last) = pins.last_mut() {
    last.time = duration;
  }
}

pub fn fit(note: &mut Note) {
  let duration = note.duration();
  if is_flat(&note.pins) {
    note.pins = default_pins(duration);
  } else {
    rescale(&mut note.pins, duration);
  }
}
