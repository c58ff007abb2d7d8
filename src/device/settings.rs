//! Last reported device configuration

use crate::protocol::sentence::Settings;

/// Holds the most recent valid settings sentence for a device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsSnapshot {
    settings: Settings,
    received: bool,
}

impl SettingsSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, settings: Settings) {
        self.settings = settings;
        self.received = true;
    }

    /// All zeros until the first settings sentence arrives
    pub fn get(&self) -> Settings {
        self.settings
    }

    pub fn is_received(&self) -> bool {
        self.received
    }
}
