//! Configuration loading
//!
//! Settings come from a YAML key-value file and are read once per command.

pub mod messages;
pub mod settings;

pub use messages::Messages;
pub use settings::Settings;
