use failure::Error;

use serde_derive::Deserialize;

use std::fs::File;
use std::io::Read;

/// Raw MIDI bytes arriving at an absolute tick of the take
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct TakeEvent {
  pub tick: u64,
  pub data: Vec<u8>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Take {
  pub pattern_length: u64,
  #[serde(default)]
  pub events: Vec<TakeEvent>,
}

impl Take {
  pub fn from_file<'a, T>(path: T) -> Result<Take, Error>
  where
    T: Into<&'a str>,
  {
    let mut content = String::new();
    let mut file = File::open(path.into())?;
    file.read_to_string(&mut content)?;
    let take: Take = toml::from_str(&content)?;
    Ok(take)
  }

  #[allow(clippy::should_implement_trait)]
  pub fn from_str<'a, T>(content: T) -> Result<Take, Error>
  where
    T: Into<&'a str>,
  {
    let take: Take = toml::from_str(content.into())?;
    Ok(take)
  }
}
