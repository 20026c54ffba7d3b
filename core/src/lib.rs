pub mod config;
pub mod midi;
pub mod recorder;
pub mod song;
pub mod time;
pub mod transport;
