use log::{debug, warn};

use keysync_core::config::Config;
use keysync_core::midi::decoder::Decoder;
use keysync_core::recorder::input::InputEvent;
use keysync_core::recorder::{Recorder, RecorderError};
use keysync_core::song::pattern::{Pattern, PatternId};
use keysync_core::song::{Document, Song};
use keysync_core::time::TicksTime;
use keysync_core::transport::LoopTransport;

use crate::take::{Take, TakeEvent};

/// Drives the recorder with a take, one pattern looping while it plays
pub struct Replay {
  song: Song,
  pattern: PatternId,
  transport: LoopTransport,
  recorder: Recorder,
  elapsed: u64,
}

impl Replay {
  pub fn new(config: &Config, take: &Take) -> Replay {
    let length = TicksTime::new(take.pattern_length);

    let mut song = Song::new("take");
    let pattern = song.add_pattern(Pattern::new(length));

    let mut transport = LoopTransport::new(length);
    transport.set_current_pattern(Some(pattern));
    transport.play(true);

    Replay {
      song,
      pattern,
      transport,
      recorder: Recorder::new(config),
      elapsed: 0,
    }
  }

  pub fn song(&self) -> &Song {
    &self.song
  }

  pub fn pattern(&self) -> Option<&Pattern> {
    self.song.pattern(&self.pattern)
  }

  pub fn recorder(&self) -> &Recorder {
    &self.recorder
  }

  /// Returns how many times notes were committed
  pub fn run(&mut self, events: &[TakeEvent]) -> Result<usize, RecorderError> {
    let mut commits = 0;
    for event in events {
      if self.process(event)? {
        commits += 1;
      }
    }

    if !self.recorder.held_keys().is_empty() {
      warn!(
        "Take ended with keys still held: {:?}",
        self.recorder.held_keys()
      );
    }

    Ok(commits)
  }

  fn advance_to(&mut self, tick: u64) {
    if tick < self.elapsed {
      warn!(
        "Event at tick {} comes before tick {}, delivering it now",
        tick, self.elapsed
      );
      return;
    }
    if self.transport.advance(TicksTime::new(tick - self.elapsed)) {
      debug!("Looped at tick {}", tick);
    }
    self.elapsed = tick;
  }

  fn process(&mut self, event: &TakeEvent) -> Result<bool, RecorderError> {
    self.advance_to(event.tick);

    let mut committed = false;
    for message in Decoder::new(event.data.as_slice()) {
      if let Some(input) = InputEvent::from_message(&message) {
        committed |= self
          .recorder
          .handle_event(input, &self.transport, &mut self.song)?;
      }
    }
    Ok(committed)
  }
}
