//! Command serialiser
//!
//! Serialises ModeCommand values into the fixed wire layout.

use crate::commands::types::ModeCommand;
use crate::config::protocol::{COMMAND_HEADER, COMMAND_LEN, COMMAND_TRAILER};

/// Serialiser for outbound command frames
pub struct CommandSerialiser;

impl CommandSerialiser {
    /// Create a new command serialiser
    pub fn new() -> Self {
        Self
    }

    /// Serialise a command to its 7-byte wire form
    pub fn serialise(&self, command: &ModeCommand) -> [u8; COMMAND_LEN] {
        let [h0, h1] = COMMAND_HEADER;
        [
            h0,
            h1,
            command.mode.mode_byte(),
            0x00,
            0x00,
            0x00,
            COMMAND_TRAILER,
        ]
    }
}

impl Default for CommandSerialiser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::types::Mode;

    #[test]
    fn test_serialise_settings_mode() {
        let serialiser = CommandSerialiser::new();
        let encoded = serialiser.serialise(&ModeCommand::new(Mode::Settings));

        assert_eq!(encoded, [0x48, 0x50, 0xC0, 0x00, 0x00, 0x00, 0x0F]);
    }

    #[test]
    fn test_serialise_default_mode() {
        let serialiser = CommandSerialiser::new();
        let encoded = serialiser.serialise(&ModeCommand::new(Mode::Default));

        assert_eq!(encoded, [72, 80, 0, 0, 0, 0, 15]);
    }
}
