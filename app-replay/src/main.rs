use std::path::Path;

use log::{debug, info, LevelFilter};

use failure::{Error, Fail};

use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;

use keysync_core::config::Config;

mod replay;
use crate::replay::Replay;

mod take;
use crate::take::Take;

const KEYSYNC_CONFIG: &str = "KEYSYNC_CONFIG";
const DEFAULT_KEYSYNC_CONFIG: &str = "keysync.toml";

const KEYSYNC_LOG_CONFIG: &str = "KEYSYNC_LOG_CONFIG";
const DEFAULT_KEYSYNC_LOG_CONFIG: &str = "log4rs.yaml";

const DEFAULT_TAKE: &str = "take.toml";

const CONSOLE_PATTERN: &str = "{d(%H:%M:%S%.3f)} {h({l:<5})} {t} - {m}{n}";

#[derive(Debug, Fail)]
enum MainError {
  #[fail(display = "Failed to init logging: {}", cause)]
  LoggingInit { cause: String },

  #[fail(display = "Failed to load the take {}: {}", path, cause)]
  TakeLoad { path: String, cause: String },
}

fn main() -> Result<(), Error> {
  init_logging()?;

  let config = init_config()?;

  let take_path = std::env::args()
    .nth(1)
    .unwrap_or_else(|| DEFAULT_TAKE.to_string());
  let take = init_take(take_path.as_str())?;

  let mut replay = Replay::new(&config, &take);
  let commits = replay.run(&take.events)?;
  info!(
    "Replayed {} events with {} commits",
    take.events.len(),
    commits
  );

  report(&replay);

  Ok(())
}

fn init_logging() -> Result<(), Error> {
  let log_config_path = std::env::var(KEYSYNC_LOG_CONFIG)
    .unwrap_or_else(|_| DEFAULT_KEYSYNC_LOG_CONFIG.to_string());

  if Path::new(log_config_path.as_str()).exists() {
    log4rs::init_file(log_config_path.as_str(), Default::default()).map_err(|err| {
      MainError::LoggingInit {
        cause: err.to_string(),
      }
    })?;
  } else {
    init_console_logging().map_err(|cause| MainError::LoggingInit { cause })?;
    debug!(
      "Logging configuration {} not found, logging to the console",
      log_config_path
    );
  }

  Ok(())
}

fn init_console_logging() -> Result<(), String> {
  let stdout = ConsoleAppender::builder()
    .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
    .build();

  let log_config = LogConfig::builder()
    .appender(Appender::builder().build("stdout", Box::new(stdout)))
    .build(Root::builder().appender("stdout").build(LevelFilter::Info))
    .map_err(|err| err.to_string())?;

  log4rs::init_config(log_config).map_err(|err| err.to_string())?;

  Ok(())
}

fn init_config() -> Result<Config, Error> {
  let config_path =
    std::env::var(KEYSYNC_CONFIG).unwrap_or_else(|_| DEFAULT_KEYSYNC_CONFIG.to_string());

  let config = if Path::new(config_path.as_str()).exists() {
    info!("Loading configuration from {} ...", config_path);
    Config::from_file(config_path.as_str())?
  } else {
    info!("Configuration {} not found, using defaults", config_path);
    Config::default()
  };
  debug!("{:#?}", config);

  Ok(config)
}

fn init_take(path: &str) -> Result<Take, Error> {
  info!("Loading take from {} ...", path);
  let take = Take::from_file(path).map_err(|err| MainError::TakeLoad {
    path: path.to_string(),
    cause: err.to_string(),
  })?;
  debug!(
    "Take with {} events over a pattern of {} ticks",
    take.events.len(),
    take.pattern_length
  );
  Ok(take)
}

fn report(replay: &Replay) {
  if let Some(pattern) = replay.pattern() {
    info!(
      "Pattern {} of song '{}' has {} notes (version {})",
      pattern.id(),
      replay.song().get_name(),
      pattern.notes().len(),
      pattern.version()
    );
    for note in pattern.notes() {
      info!(
        "  {:?} [{:?}, {:?}) volume {}",
        note.pitches, note.start, note.end, note.volume
      );
    }
  }

  if !replay.recorder().pending().is_empty() {
    info!(
      "{} recorded notes were not committed",
      replay.recorder().pending().len()
    );
  }
}
