pub mod decoder;
pub mod messages;
pub use messages::Message;
pub mod types;
