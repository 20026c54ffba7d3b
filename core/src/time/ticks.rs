use std::{
  cmp::{min, Ordering},
  ops::{Add, AddAssign, Rem, Sub, SubAssign},
};

#[derive(Debug, Eq, Copy, Clone, Hash)]
pub struct TicksTime(u64);

impl TicksTime {
  pub fn new(ticks: u64) -> TicksTime {
    TicksTime(ticks)
  }

  pub fn zero() -> TicksTime {
    TicksTime(0)
  }

  pub fn is_zero(&self) -> bool {
    self.0 == 0
  }

  pub fn units(&self) -> u64 {
    self.0
  }

  /// Distance between two ticks regardless of their order
  pub fn distance(self, other: TicksTime) -> TicksTime {
    if self.0 > other.0 {
      TicksTime(self.0 - other.0)
    } else {
      TicksTime(other.0 - self.0)
    }
  }

  /// Scales the ticks by `num / den`, rounding to the nearest tick
  pub fn scale(self, num: TicksTime, den: TicksTime) -> TicksTime {
    if den.0 == 0 {
      return self;
    }
    let scaled = (u128::from(self.0) * u128::from(num.0) * 2 + u128::from(den.0)) / (u128::from(den.0) * 2);
    TicksTime(scaled as u64)
  }
}

impl Ord for TicksTime {
  fn cmp(&self, other: &TicksTime) -> Ordering {
    self.0.cmp(&other.0)
  }
}

impl PartialOrd for TicksTime {
  fn partial_cmp(&self, other: &TicksTime) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl PartialEq for TicksTime {
  fn eq(&self, other: &TicksTime) -> bool {
    self.0 == other.0
  }
}

impl Add for TicksTime {
  type Output = TicksTime;
  fn add(self, rhs: TicksTime) -> Self {
    TicksTime::new(self.0 + rhs.0)
  }
}

impl AddAssign for TicksTime {
  fn add_assign(&mut self, rhs: TicksTime) {
    *self = *self + rhs;
  }
}

impl Sub for TicksTime {
  type Output = TicksTime;
  fn sub(self, rhs: TicksTime) -> Self {
    TicksTime::new(self.0 - min(self.0, rhs.0))
  }
}

impl SubAssign for TicksTime {
  fn sub_assign(&mut self, rhs: TicksTime) {
    *self = *self - rhs;
  }
}

impl Rem for TicksTime {
  type Output = TicksTime;
  fn rem(self, rhs: TicksTime) -> Self {
    TicksTime::new(self.0 % rhs.0)
  }
}

impl From<u64> for TicksTime {
  fn from(item: u64) -> Self {
    TicksTime(item)
  }
}

impl From<TicksTime> for f64 {
  fn from(item: TicksTime) -> Self {
    item.0 as f64
  }
}

impl From<TicksTime> for u64 {
  fn from(item: TicksTime) -> Self {
    item.0
  }
}
