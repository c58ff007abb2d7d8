pub mod serialiser;
pub mod types;

pub use serialiser::CommandSerialiser;
pub use types::{Mode, ModeCommand};
