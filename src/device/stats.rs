//! Running statistics over the current accumulation window
//!
//! The window is the set of telemetry sentences received since the last
//! resetting drain. All five counters belong to the window and are cleared
//! together.

use crate::protocol::sentence::Telemetry;

/// Averaged view of one accumulation window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsReport {
    /// Valid telemetry sentences in the window
    pub readings: u32,
    /// Mean speed over all readings, stopped ones included
    pub avg_rpm: u16,
    /// Mean current over all readings, stopped ones included
    pub avg_milliamps: u16,
    /// Sentences rejected for framing or checksum errors
    pub comms_errors: u16,
    /// Alarm codes OR'd together
    pub error_status: u8,
}

/// Reasons a drain produces no report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainError {
    /// No telemetry in the window, so there is nothing to average.
    ///
    /// The error counters are still reported, and still cleared when the
    /// drain was a resetting one.
    NoReadings { comms_errors: u16, error_status: u8 },
    /// No device is registered at this index
    InvalidDeviceIndex(usize),
}

/// Sums and counts for one device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsAccumulator {
    readings: u32,
    // u64 sums cannot overflow before `readings` fills up
    total_rpm: u64,
    total_milliamps: u64,
    error_status: u8,
    comms_errors: u16,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one valid telemetry sentence into the window.
    ///
    /// A full window drops further sentences so the averages stay exact.
    pub fn record(&mut self, telemetry: &Telemetry) {
        let Some(readings) = self.readings.checked_add(1) else {
            return;
        };
        self.readings = readings;
        if telemetry.is_running() {
            self.total_rpm += u64::from(telemetry.speed_rpm);
            self.total_milliamps += u64::from(telemetry.milliamps());
        } else {
            self.error_status |= telemetry.alarm_code();
        }
    }

    /// Count one rejected sentence or failed read
    pub fn record_comms_error(&mut self) {
        self.comms_errors = self.comms_errors.saturating_add(1);
    }

    pub fn readings(&self) -> u32 {
        self.readings
    }

    pub fn comms_errors(&self) -> u16 {
        self.comms_errors
    }

    pub fn error_status(&self) -> u8 {
        self.error_status
    }

    /// Average the window, clearing it when `reset` is set
    pub fn drain(&mut self, reset: bool) -> Result<StatsReport, DrainError> {
        let result = if self.readings == 0 {
            Err(DrainError::NoReadings {
                comms_errors: self.comms_errors,
                error_status: self.error_status,
            })
        } else {
            Ok(StatsReport {
                readings: self.readings,
                avg_rpm: (self.total_rpm / u64::from(self.readings)) as u16,
                avg_milliamps: (self.total_milliamps / u64::from(self.readings)) as u16,
                comms_errors: self.comms_errors,
                error_status: self.error_status,
            })
        };

        if reset {
            *self = Self::default();
        }
        result
    }
}
