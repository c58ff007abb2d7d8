//! ON/OFF edge timestamps

/// Snapshot returned by [`TransitionTimer::poll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeReport {
    /// An edge was recorded since the previous poll
    pub changed: bool,
    /// Time of the latest OFF -> ON edge
    pub on_time_ms: u64,
    /// Time of the latest ON -> OFF edge
    pub off_time_ms: u64,
}

/// Tracks when the compressor last started and stopped.
///
/// The current state is implied by which timestamp is newer; equal
/// timestamps (including the initial zeros) count as both states, so the
/// first sentence after start-up always records an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionTimer {
    on_time_ms: u64,
    off_time_ms: u64,
    changed: bool,
}

impl TransitionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe the running state from one telemetry sentence.
    ///
    /// Returns true when an edge was recorded.
    pub fn observe(&mut self, running: bool, now_ms: u64) -> bool {
        if running && self.off_time_ms >= self.on_time_ms {
            self.on_time_ms = now_ms;
        } else if !running && self.on_time_ms >= self.off_time_ms {
            self.off_time_ms = now_ms;
        } else {
            return false;
        }
        self.changed = true;
        true
    }

    /// Read both timestamps and clear the changed flag
    pub fn poll(&mut self) -> EdgeReport {
        let report = EdgeReport {
            changed: self.changed,
            on_time_ms: self.on_time_ms,
            off_time_ms: self.off_time_ms,
        };
        self.changed = false;
        report
    }
}
