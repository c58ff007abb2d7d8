//! Protocol and timing constants for the FDC1 compressor controller

/// Serial line configuration
pub mod serial {
    /// The controller only talks at a fixed rate
    pub const BAUD_RATE: u32 = 1200;
}

/// FDC1 sentence layout
pub mod protocol {
    /// First byte of every inbound sentence
    pub const SENTINEL: u8 = 0x1B;

    /// Sentence id of the telemetry sentence ('L')
    pub const TELEMETRY_ID: u8 = 0x4C;

    /// Sentence id of the settings sentence ('P')
    pub const SETTINGS_ID: u8 = 0x50;

    /// Telemetry sentence length including sentinel and checksums
    pub const TELEMETRY_LEN: usize = 8;

    /// Settings sentence length including sentinel and checksums
    pub const SETTINGS_LEN: usize = 22;

    /// Longest sentence the assembler has to hold
    pub const MAX_FRAME_SIZE: usize = SETTINGS_LEN;

    /// Stand-in for the sentinel when computing the settings even-byte checksum
    pub const SETTINGS_CHECKSUM_SEED: u8 = 0x48;

    /// Outbound command header ('H', 'P')
    pub const COMMAND_HEADER: [u8; 2] = [0x48, 0x50];

    /// Outbound command trailer
    pub const COMMAND_TRAILER: u8 = 0x0F;

    /// Outbound command length
    pub const COMMAND_LEN: usize = 7;

    /// Mode byte selecting telemetry output
    pub const MODE_BYTE_DEFAULT: u8 = 0;

    /// Mode byte selecting settings output
    pub const MODE_BYTE_SETTINGS: u8 = 192;
}

/// Raw unit conversion
pub mod scaling {
    /// Raw current units per 1000 mA
    pub const CURRENT_DIVISOR: u32 = 3160;

    /// Raw voltage units per 1000 mV
    pub const VOLTAGE_DIVISOR: u32 = 1187;
}

/// Tick scheduling
pub mod timing {
    /// Period of the polling tick. At 1200 baud a byte arrives roughly every 8 ms,
    /// so one byte per tick keeps up with the line.
    pub const TICK_PERIOD_MS: u64 = 1;
}

/// Device registry sizing
pub mod registry {
    pub const MAX_DEVICES: usize = 2;
}
