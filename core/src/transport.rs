use crate::song::pattern::PatternId;
use crate::time::TicksTime;

/// What the recorder needs to know about the playhead
pub trait Transport {
  fn is_playing(&self) -> bool;

  /// Position of the playhead inside the current pattern
  fn playhead(&self) -> TicksTime;

  /// Length of the pattern being looped
  fn pattern_end(&self) -> TicksTime;

  fn current_pattern(&self) -> Option<PatternId>;
}

pub struct LoopTransport {
  playing: bool,

  start_position: TicksTime,
  current_position: TicksTime,

  loop_end: TicksTime,

  pattern: Option<PatternId>,
}

impl LoopTransport {
  pub fn new(loop_end: TicksTime) -> Self {
    LoopTransport {
      playing: false,
      start_position: TicksTime::zero(),
      current_position: TicksTime::zero(),
      loop_end,
      pattern: None,
    }
  }

  pub fn play(&mut self, restart: bool) -> bool {
    self.playing = !self.playing;
    if restart {
      self.reset_position();
    }
    self.playing
  }

  pub fn stop(&mut self) {
    if !self.playing {
      self.reset_position();
    }
    self.playing = false;
  }

  fn reset_position(&mut self) {
    self.current_position = self.start_position;
  }

  pub fn set_position(&mut self, position: TicksTime) {
    self.current_position = self.wrap(position);
  }

  pub fn get_position(&self) -> TicksTime {
    self.current_position
  }

  pub fn set_loop_end(&mut self, loop_end: TicksTime) {
    self.loop_end = loop_end;
    self.current_position = self.wrap(self.current_position);
  }

  pub fn get_loop_end(&self) -> TicksTime {
    self.loop_end
  }

  pub fn set_current_pattern(&mut self, pattern: Option<PatternId>) {
    self.pattern = pattern;
  }

  /// Moves the playhead forward while playing, returns whether it crossed the loop end
  pub fn advance(&mut self, duration: TicksTime) -> bool {
    if !self.playing {
      return false;
    }
    let next_position = self.current_position + duration;
    let crossing = self.crossing_loop_end(next_position);
    self.current_position = self.wrap(next_position);
    crossing
  }

  fn crossing_loop_end(&self, next_position: TicksTime) -> bool {
    !self.loop_end.is_zero() && self.loop_end <= next_position
  }

  fn wrap(&self, position: TicksTime) -> TicksTime {
    if self.loop_end.is_zero() {
      position
    } else {
      position % self.loop_end
    }
  }
}

impl Transport for LoopTransport {
  fn is_playing(&self) -> bool {
    self.playing
  }

  fn playhead(&self) -> TicksTime {
    self.current_position
  }

  fn pattern_end(&self) -> TicksTime {
    self.loop_end
  }

  fn current_pattern(&self) -> Option<PatternId> {
    self.pattern
  }
}
