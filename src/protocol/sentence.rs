//! Sentence validation and field extraction
//!
//! # Telemetry sentence (id 0x4C, 8 bytes)
//!
//! ```text
//! [0x1B][0x4C][speed_hi][speed_lo][ma_hi][ma_lo][chk_a][chk_b]
//! ```
//!
//! - `chk_a` = byte0 ^ byte2 ^ byte4
//! - `chk_b` = byte1 ^ byte3 ^ byte5
//!
//! When the compressor is stopped (`speed_hi == 0`) `ma_lo` carries the
//! alarm code instead of a current reading.
//!
//! # Settings sentence (id 0x50, 22 bytes)
//!
//! ```text
//! [0x1B][0x50][min_hi][min_lo][max_hi][max_lo][b6][mode]
//! [12v_out: u16 BE][12v_in: u16 BE][24v_out: u16 BE][24v_in: u16 BE]
//! [42v_out: u16 BE][42v_in: u16 BE][chk_a][chk_b]
//! ```
//!
//! - `chk_a` = 0x48 ^ byte2 ^ byte4 ^ ... ^ byte18 (0x48 stands in for the sentinel)
//! - `chk_b` = byte1 ^ byte3 ^ ... ^ byte19

use crate::config::protocol::{SETTINGS_CHECKSUM_SEED, SETTINGS_LEN, TELEMETRY_LEN};
use crate::config::scaling::{CURRENT_DIVISOR, VOLTAGE_DIVISOR};
use crate::protocol::framing::{FrameError, RawFrame};

/// One decoded telemetry sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Telemetry {
    /// Compressor speed in RPM
    pub speed_rpm: u16,
    /// Current field in raw device units
    pub current_raw: u16,
}

impl Telemetry {
    /// Validate checksums and decode a telemetry sentence
    pub fn parse(frame: &[u8; TELEMETRY_LEN]) -> Result<Self, FrameError> {
        let chk_a = frame[0] ^ frame[2] ^ frame[4];
        let chk_b = frame[1] ^ frame[3] ^ frame[5];
        if chk_a != frame[6] || chk_b != frame[7] {
            return Err(FrameError::TelemetryChecksum);
        }

        Ok(Self {
            speed_rpm: u16::from_be_bytes([frame[2], frame[3]]),
            current_raw: u16::from_be_bytes([frame[4], frame[5]]),
        })
    }

    /// The controller flags a stopped compressor with a zero high speed byte
    pub fn is_running(&self) -> bool {
        self.speed_rpm >> 8 != 0
    }

    /// Current draw in milliamps
    pub fn milliamps(&self) -> u32 {
        u32::from(self.current_raw) * 1000 / CURRENT_DIVISOR
    }

    /// Alarm bits, only meaningful while stopped
    pub fn alarm_code(&self) -> u8 {
        self.current_raw.to_be_bytes()[1]
    }
}

/// Cut-out / cut-in pair for one supply voltage tier, in millivolts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoltageThresholds {
    pub cut_out_mv: u16,
    pub cut_in_mv: u16,
}

/// Device configuration reported by a settings sentence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    /// Minimum compressor speed in RPM
    pub min_speed: u16,
    /// Maximum compressor speed in RPM
    pub max_speed: u16,
    pub supply_12v: VoltageThresholds,
    pub supply_24v: VoltageThresholds,
    pub supply_42v: VoltageThresholds,
    /// Mode/configuration switch register
    pub mode_byte: u8,
}

impl Settings {
    /// Validate checksums and decode a settings sentence
    pub fn parse(frame: &[u8; SETTINGS_LEN]) -> Result<Self, FrameError> {
        let chk_a = frame[2..20]
            .iter()
            .step_by(2)
            .fold(SETTINGS_CHECKSUM_SEED, |acc, b| acc ^ b);
        let chk_b = frame[1..20].iter().step_by(2).fold(0u8, |acc, b| acc ^ b);
        if chk_a != frame[20] || chk_b != frame[21] {
            return Err(FrameError::SettingsChecksum);
        }

        Ok(Self {
            min_speed: u16::from_be_bytes([frame[2], frame[3]]),
            max_speed: u16::from_be_bytes([frame[4], frame[5]]),
            supply_12v: thresholds_at(frame, 8),
            supply_24v: thresholds_at(frame, 12),
            supply_42v: thresholds_at(frame, 16),
            mode_byte: frame[7],
        })
    }
}

fn thresholds_at(frame: &[u8; SETTINGS_LEN], offset: usize) -> VoltageThresholds {
    VoltageThresholds {
        cut_out_mv: raw_to_millivolts(frame[offset], frame[offset + 1]),
        cut_in_mv: raw_to_millivolts(frame[offset + 2], frame[offset + 3]),
    }
}

fn raw_to_millivolts(hi: u8, lo: u8) -> u16 {
    // 0xFFFF * 1000 / 1187 still fits a u16
    (u32::from(u16::from_be_bytes([hi, lo])) * 1000 / VOLTAGE_DIVISOR) as u16
}

/// A validated sentence of either type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentence {
    Telemetry(Telemetry),
    Settings(Settings),
}

impl Sentence {
    /// Validate a complete frame
    pub fn parse(frame: &RawFrame) -> Result<Self, FrameError> {
        match frame {
            RawFrame::Telemetry(bytes) => Telemetry::parse(bytes).map(Sentence::Telemetry),
            RawFrame::Settings(bytes) => Settings::parse(bytes).map(Sentence::Settings),
        }
    }
}
