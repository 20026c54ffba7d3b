use failure::Error;

use serde_derive::Deserialize;

use std::fs::File;
use std::io::Read;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Recorder {
  pub snap_enabled: bool,
  pub snap_round: bool,
  /// A note overlapped by more than this percentage is part of a chord
  pub minimal_own_note: f64,
  pub provisional_length: u64,
  pub max_volume: u8,
  pub velocity_sensitive: bool,
  pub transaction_name: String,
}

impl Default for Recorder {
  fn default() -> Recorder {
    Recorder {
      snap_enabled: true,
      snap_round: true,
      minimal_own_note: 10.0,
      provisional_length: 10,
      max_volume: 6,
      velocity_sensitive: false,
      transaction_name: "Record notes".to_string(),
    }
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Grid {
  pub parts_per_beat: u32,
  pub steps_per_beat: u32,
}

impl Default for Grid {
  fn default() -> Grid {
    Grid {
      parts_per_beat: 24,
      steps_per_beat: 4,
    }
  }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
  pub recorder: Recorder,
  pub grid: Grid,
}

impl Config {
  pub fn from_file<'a, T>(path: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let mut content = String::new();
    let path_str = path.into();
    let mut file = File::open(path_str)?;
    file.read_to_string(&mut content)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
  }

  #[allow(clippy::should_implement_trait)]
  pub fn from_str<'a, T>(content: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let config: Config = toml::from_str(content.into())?;
    Ok(config)
  }
}
