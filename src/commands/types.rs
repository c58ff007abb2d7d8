//! Outbound command types
//!
//! # Command Format
//!
//! The controller accepts a single 7-byte command that selects which
//! sentence type it streams:
//! ```text
//! [0x48][0x50][mode: u8][0x00][0x00][0x00][0x0F]
//! ```
//!
//! No acknowledgement is sent back; the next inbound sentence type shows
//! whether the switch took effect.

use crate::config::protocol::{MODE_BYTE_DEFAULT, MODE_BYTE_SETTINGS};

/// Reporting mode of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Stream telemetry sentences (id 0x4C)
    Default,
    /// Stream settings sentences (id 0x50)
    Settings,
}

impl Mode {
    /// Mode byte sent in the command
    pub fn mode_byte(self) -> u8 {
        match self {
            Mode::Default => MODE_BYTE_DEFAULT,
            Mode::Settings => MODE_BYTE_SETTINGS,
        }
    }
}

/// Mode switch command for one device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeCommand {
    pub mode: Mode,
}

impl ModeCommand {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }
}
