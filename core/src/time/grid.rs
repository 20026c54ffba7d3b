use std::cmp::max;

use crate::time::TicksTime;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Rounding {
  Nearest,
  Down,
}

/// Rhythmic grid that recorded timestamps are snapped onto
#[derive(Debug, Clone, Copy)]
pub struct Grid {
  step: TicksTime,
  rounding: Rounding,
}

impl Grid {
  /// A zero step is raised to one tick
  pub fn new(step: TicksTime, rounding: Rounding) -> Grid {
    let step = max(step, TicksTime::new(1));
    Grid { step, rounding }
  }

  /// Grid with one step per rhythm subdivision of a beat
  pub fn from_rhythm(parts_per_beat: u32, steps_per_beat: u32, rounding: Rounding) -> Grid {
    let steps_per_beat = steps_per_beat.max(1);
    let step = (parts_per_beat / steps_per_beat).max(1);
    Grid::new(TicksTime::new(u64::from(step)), rounding)
  }

  pub fn get_step(&self) -> TicksTime {
    self.step
  }

  pub fn get_rounding(&self) -> Rounding {
    self.rounding
  }

  fn offset(&self) -> TicksTime {
    match self.rounding {
      Rounding::Nearest => TicksTime::new(u64::from(self.step) / 2),
      Rounding::Down => TicksTime::zero(),
    }
  }

  pub fn quantize(&self, ticks: TicksTime) -> TicksTime {
    let shifted = ticks + self.offset();
    shifted - shifted % self.step
  }
}

#[cfg(test)]
mod test {

  use super::{Grid, Rounding, TicksTime};

  #[test]
  pub fn from_rhythm() {
    let grid = Grid::from_rhythm(24, 4, Rounding::Nearest);
    assert_eq!(grid.get_step(), TicksTime::new(6));
    let grid = Grid::from_rhythm(24, 0, Rounding::Down);
    assert_eq!(grid.get_step(), TicksTime::new(24));
    let grid = Grid::from_rhythm(2, 4, Rounding::Down);
    assert_eq!(grid.get_step(), TicksTime::new(1));
  }

  #[test]
  pub fn zero_step() {
    let grid = Grid::new(TicksTime::zero(), Rounding::Nearest);
    assert_eq!(grid.get_step(), TicksTime::new(1));
    assert_eq!(grid.quantize(TicksTime::new(7)), TicksTime::new(7));
  }

  #[test]
  pub fn quantize_nearest() {
    let grid = Grid::new(TicksTime::new(24), Rounding::Nearest);
    assert_eq!(grid.quantize(TicksTime::new(0)), TicksTime::new(0));
    assert_eq!(grid.quantize(TicksTime::new(11)), TicksTime::new(0));
    assert_eq!(grid.quantize(TicksTime::new(12)), TicksTime::new(24));
    assert_eq!(grid.quantize(TicksTime::new(50)), TicksTime::new(48));
    assert_eq!(grid.quantize(TicksTime::new(90)), TicksTime::new(96));
  }

  #[test]
  pub fn quantize_down() {
    let grid = Grid::new(TicksTime::new(24), Rounding::Down);
    assert_eq!(grid.quantize(TicksTime::new(23)), TicksTime::new(0));
    assert_eq!(grid.quantize(TicksTime::new(24)), TicksTime::new(24));
    assert_eq!(grid.quantize(TicksTime::new(95)), TicksTime::new(72));
  }

  #[test]
  /// Quantizing an already quantized tick leaves it unchanged
  pub fn quantize_idempotent() {
    for step in 1..=25u64 {
      for &rounding in &[Rounding::Nearest, Rounding::Down] {
        let grid = Grid::new(TicksTime::new(step), rounding);
        for ticks in 0..200u64 {
          let once = grid.quantize(TicksTime::new(ticks));
          assert_eq!(grid.quantize(once), once);
          assert_eq!(u64::from(once) % step, 0);
        }
      }
    }
  }
}
