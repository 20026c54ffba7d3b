pub mod emitter;
pub mod input;
pub mod keys;
pub mod resolver;

use failure::Fail;
use log::{debug, trace};

use crate::config::{Config, Recorder as RecorderConfig};
use crate::midi::types::U7;
use crate::song::note::{Note, Volume};
use crate::song::{Document, DocumentError};
use crate::time::{Grid, Rounding, TicksTime};
use crate::transport::Transport;

use self::{
  input::InputEvent,
  keys::{Key, KeySlot, KeyTable, RecordedNote},
  resolver::Resolver,
};

/// Volume of the provisional note shown while a key is held
const PROVISIONAL_VOLUME: Volume = 5;

#[derive(Debug, Fail)]
pub enum RecorderError {
  #[fail(display = "Failed to commit the recorded notes: {}", cause)]
  Commit { cause: DocumentError },
}

/// What the host previews while keys are held
#[derive(Debug, PartialEq, Clone)]
pub struct LiveInput {
  pub started: bool,
  /// `None` sustains until every key is released
  pub duration: Option<TicksTime>,
  pub pitches: Vec<Key>,
}

impl Default for LiveInput {
  fn default() -> Self {
    LiveInput {
      started: false,
      duration: Some(TicksTime::zero()),
      pitches: Vec::new(),
    }
  }
}

pub struct Recorder {
  config: RecorderConfig,
  grid: Option<Grid>,
  resolver: Resolver,

  keys: KeyTable,
  pending: Vec<RecordedNote>,

  live_input: LiveInput,
  held_keys: Vec<Key>,
}

impl Recorder {
  pub fn new(config: &Config) -> Recorder {
    let recorder_config = config.recorder.clone();

    let grid = if recorder_config.snap_enabled {
      let rounding = if recorder_config.snap_round {
        Rounding::Nearest
      } else {
        Rounding::Down
      };
      Some(Grid::from_rhythm(
        config.grid.parts_per_beat,
        config.grid.steps_per_beat,
        rounding,
      ))
    } else {
      None
    };

    Recorder {
      resolver: Resolver::new(recorder_config.minimal_own_note),
      config: recorder_config,
      grid,
      keys: KeyTable::new(),
      pending: Vec::new(),
      live_input: LiveInput::default(),
      held_keys: Vec::new(),
    }
  }

  pub fn grid(&self) -> Option<&Grid> {
    self.grid.as_ref()
  }

  pub fn live_input(&self) -> &LiveInput {
    &self.live_input
  }

  /// Keys currently held, for highlighting
  pub fn held_keys(&self) -> &[Key] {
    self.held_keys.as_slice()
  }

  pub fn is_key_pressed(&self, key: Key) -> bool {
    self.keys.is_pressed(key)
  }

  pub fn pending(&self) -> &[RecordedNote] {
    self.pending.as_slice()
  }

  /// Dispatches a decoded input event, returns whether notes were committed
  pub fn handle_event<T, D>(
    &mut self,
    event: InputEvent,
    transport: &T,
    document: &mut D,
  ) -> Result<bool, RecorderError>
  where
    T: Transport + ?Sized,
    D: Document + ?Sized,
  {
    match event {
      InputEvent::KeyDown { key, velocity } => {
        self.key_down(transport, key, velocity);
        Ok(false)
      }
      InputEvent::KeyUp { key } => self.key_up(transport, document, key),
      InputEvent::Controller { controller, value } => {
        self.controller(controller, value);
        Ok(false)
      }
      InputEvent::ModWheel(value) => {
        self.mod_wheel(value);
        Ok(false)
      }
      InputEvent::PitchWheel(value) => {
        self.pitch_wheel(value);
        Ok(false)
      }
      InputEvent::PolyPressure { key, value } => {
        self.poly_pressure(key, value);
        Ok(false)
      }
    }
  }

  pub fn key_down<T>(&mut self, transport: &T, key: Key, velocity: f64)
  where
    T: Transport + ?Sized,
  {
    let velocity = velocity.max(0.0).min(1.0);

    let slot = if transport.is_playing() {
      let begin = transport.playhead();
      let end = begin + TicksTime::new(self.config.provisional_length);
      let note = Note::new(key, begin, end, PROVISIONAL_VOLUME);
      KeySlot::Recording(RecordedNote::recording(
        key,
        velocity,
        note,
        transport.current_pattern(),
      ))
    } else {
      KeySlot::Held { velocity }
    };

    if !self.keys.press(key, slot) {
      debug!("Ignoring key down for out of range key {}", key);
      return;
    }

    trace!("Key {} down at {:?}", key, transport.playhead());

    self.update_held_keys();
    self.live_input.started = true;
    self.live_input.duration = None;
    self.live_input.pitches = self.held_keys.clone();
  }

  /// Releases the key, flushing the pending notes once no key is held anymore
  pub fn key_up<T, D>(
    &mut self,
    transport: &T,
    document: &mut D,
    key: Key,
  ) -> Result<bool, RecorderError>
  where
    T: Transport + ?Sized,
    D: Document + ?Sized,
  {
    if let KeySlot::Recording(recorded) = self.keys.release(key) {
      self.finish(transport, recorded);
    }

    self.update_held_keys();

    if self.keys.is_empty() {
      self.live_input.duration = Some(TicksTime::zero());
      self.live_input.started = false;
      self.live_input.pitches.clear();
      self.flush(document)
    } else {
      self.live_input.pitches = self.held_keys.clone();
      Ok(false)
    }
  }

  pub fn controller(&mut self, controller: U7, value: f64) {
    trace!("Controller {} = {}", controller, value);
  }

  pub fn mod_wheel(&mut self, value: f64) {
    trace!("Mod wheel = {}", value);
  }

  pub fn pitch_wheel(&mut self, value: f64) {
    trace!("Pitch wheel = {}", value);
  }

  pub fn poly_pressure(&mut self, key: Key, value: f64) {
    trace!("Polyphonic pressure {} = {}", key, value);
  }

  fn update_held_keys(&mut self) {
    self.held_keys = self.keys.held_keys();
  }

  fn volume(&self, velocity: f64) -> Volume {
    let max_volume = self.config.max_volume;
    if self.config.velocity_sensitive {
      let volume = (velocity * f64::from(max_volume)).round() as Volume;
      volume.max(1).min(max_volume)
    } else {
      max_volume
    }
  }

  fn finish<T>(&mut self, transport: &T, recorded: RecordedNote)
  where
    T: Transport + ?Sized,
  {
    let start = match &recorded.note {
      Some(note) => note.start,
      None => return,
    };
    if recorded.pattern.is_none() {
      return;
    }

    let end = transport.playhead();
    let volume = self.volume(recorded.velocity);
    let key = recorded.key;

    if end > start {
      self.pending.push(RecordedNote {
        note: Some(Note::new(key, start, end, volume)),
        ..recorded
      });
    } else if end < start {
      debug!(
        "Key {} held across the loop end, splitting at {:?}",
        key,
        transport.pattern_end()
      );
      let pattern_end = transport.pattern_end();
      self.pending.push(RecordedNote {
        note: Some(Note::new(key, start, pattern_end, volume)),
        ..recorded.clone()
      });
      self.pending.push(RecordedNote::recording(
        key,
        recorded.velocity,
        Note::new(key, TicksTime::zero(), end, volume),
        transport.current_pattern(),
      ));
    } else {
      trace!("Discarding zero length note for key {}", key);
    }
  }

  fn quantize(&self, recorded: &[RecordedNote]) -> Vec<RecordedNote> {
    let mut recorded = recorded.to_vec();
    if let Some(grid) = self.grid.as_ref() {
      for note in recorded.iter_mut().filter_map(|r| r.note.as_mut()) {
        let start = grid.quantize(note.start);
        let end = grid.quantize(note.end);
        note.set_interval(start, end);
      }
    }
    recorded
  }

  fn flush<D>(&mut self, document: &mut D) -> Result<bool, RecorderError>
  where
    D: Document + ?Sized,
  {
    if self.pending.is_empty() {
      return Ok(false);
    }

    let quantized = self.quantize(&self.pending);

    let resolved: Vec<_> = resolver::partition(&quantized, &*document)
      .into_iter()
      .map(|bag| self.resolver.resolve_bag(bag))
      .collect();

    let transaction = emitter::emit(self.config.transaction_name.as_str(), &resolved);

    debug!(
      "Flushing {} recorded notes into {} patterns with {} edits",
      self.pending.len(),
      resolved.len(),
      transaction.edits().len()
    );

    let committed = !transaction.is_empty();
    if committed {
      document
        .record(transaction)
        .map_err(|cause| RecorderError::Commit { cause })?;
    }

    self.pending.clear();
    Ok(committed)
  }
}
