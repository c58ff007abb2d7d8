//! Per-device protocol state machine
//!
//! Owns the device's byte source and everything derived from it. Bytes go in
//! through [`DeviceContext::poll`] (or [`DeviceContext::feed_byte`]), and each
//! validated sentence updates the statistics window, the edge timer or the
//! settings snapshot.

use crate::commands::{CommandSerialiser, Mode, ModeCommand};
use crate::device::settings::SettingsSnapshot;
use crate::device::stats::StatsAccumulator;
use crate::device::timing::TransitionTimer;
use crate::protocol::framing::{FrameAccumulator, FrameError};
use crate::protocol::sentence::{Sentence, Settings, Telemetry};
use crate::serial::traits::{ByteSource, SerialError};

/// State for one compressor controller
pub struct DeviceContext<S> {
    index: usize,
    port: S,
    accumulator: FrameAccumulator,
    pub(crate) stats: StatsAccumulator,
    pub(crate) timer: TransitionTimer,
    pub(crate) settings: SettingsSnapshot,
}

impl<S: ByteSource> DeviceContext<S> {
    /// Bind a new context to `port`. `index` only labels log output.
    pub fn new(index: usize, port: S) -> Self {
        Self {
            index,
            port,
            accumulator: FrameAccumulator::new(),
            stats: StatsAccumulator::new(),
            timer: TransitionTimer::new(),
            settings: SettingsSnapshot::new(),
        }
    }

    /// Consume at most one byte from the port
    pub fn poll(&mut self, now_ms: u64) {
        if !self.port.available() {
            return;
        }

        match self.port.read_byte() {
            Ok(byte) => self.feed_byte(byte, now_ms),
            Err(e) => {
                log::warn!("FDC1[{}]: read failed ({:?})", self.index, e);
                self.stats.record_comms_error();
            }
        }
    }

    /// Run one received byte through the state machine
    pub fn feed_byte(&mut self, byte: u8, now_ms: u64) {
        let frame = match self.accumulator.push(byte) {
            None => return,
            Some(Ok(frame)) => frame,
            Some(Err(e)) => return self.reject(e),
        };

        match Sentence::parse(&frame) {
            Ok(Sentence::Telemetry(telemetry)) => self.apply_telemetry(&telemetry, now_ms),
            Ok(Sentence::Settings(settings)) => self.apply_settings(settings),
            Err(e) => self.reject(e),
        }
    }

    /// Send a mode switch command. Nothing is read back.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), SerialError> {
        let command = CommandSerialiser::new().serialise(&ModeCommand::new(mode));
        log::debug!("FDC1[{}]: switching to {:?} mode", self.index, mode);
        self.port.write_all(&command)
    }

    pub fn stats(&self) -> &StatsAccumulator {
        &self.stats
    }

    pub fn settings(&self) -> &SettingsSnapshot {
        &self.settings
    }

    /// Bytes of the sentence currently being assembled
    #[cfg(test)]
    pub(crate) fn pending_len(&self) -> usize {
        self.accumulator.len()
    }

    fn apply_telemetry(&mut self, telemetry: &Telemetry, now_ms: u64) {
        log::debug!(
            "FDC1[{}]: telemetry {} rpm, {} mA",
            self.index,
            telemetry.speed_rpm,
            telemetry.milliamps()
        );
        self.stats.record(telemetry);
        if self.timer.observe(telemetry.is_running(), now_ms) {
            log::info!(
                "FDC1[{}]: compressor {} at {} ms",
                self.index,
                if telemetry.is_running() { "started" } else { "stopped" },
                now_ms
            );
        }
    }

    fn apply_settings(&mut self, settings: Settings) {
        log::debug!("FDC1[{}]: settings {:?}", self.index, settings);
        self.settings.update(settings);

        // The controller keeps streaming settings until told otherwise
        if let Err(e) = self.set_mode(Mode::Default) {
            log::warn!("FDC1[{}]: mode switch failed ({:?})", self.index, e);
        }
    }

    fn reject(&mut self, error: FrameError) {
        match error {
            FrameError::BadSentinel(_) => {
                log::trace!("FDC1[{}]: discarded {:?}", self.index, error)
            }
            _ => log::warn!("FDC1[{}]: discarded {:?}", self.index, error),
        }
        self.stats.record_comms_error();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::stats::DrainError;
    use crate::protocol::sentence::fixtures::{settings_frame, telemetry_frame};
    use crate::serial::traits::mock::MockByteSource;

    fn context() -> (DeviceContext<MockByteSource>, MockByteSource) {
        let port = MockByteSource::new();
        (DeviceContext::new(0, port.clone()), port)
    }

    fn feed_all(ctx: &mut DeviceContext<MockByteSource>, bytes: &[u8], now_ms: u64) {
        for &byte in bytes {
            ctx.feed_byte(byte, now_ms);
        }
    }

    #[test]
    fn test_non_sentinel_bytes_each_count_once() {
        let (mut ctx, _) = context();

        feed_all(&mut ctx, &[0x00, 0x42, 0x4C, 0xFF], 0);

        assert_eq!(ctx.stats().comms_errors(), 4);
        assert_eq!(ctx.pending_len(), 0);
    }

    #[test]
    fn test_unknown_sentence_id_counts_once() {
        let (mut ctx, _) = context();

        feed_all(&mut ctx, &[0x1B, 0x99], 0);

        assert_eq!(ctx.stats().comms_errors(), 1);
        assert_eq!(ctx.pending_len(), 0);
    }

    #[test]
    fn test_valid_telemetry_counts_reading() {
        let (mut ctx, _) = context();

        feed_all(&mut ctx, &telemetry_frame(2500, 1000), 0);

        assert_eq!(ctx.stats().readings(), 1);
        assert_eq!(ctx.stats().comms_errors(), 0);
        assert_eq!(ctx.pending_len(), 0);
    }

    #[test]
    fn test_flipped_payload_bit_counts_comms_error() {
        let (mut ctx, _) = context();

        for bit in 0..8 {
            for position in 2..6 {
                let mut frame = telemetry_frame(0x0A8C, 0x012C);
                frame[position] ^= 1 << bit;
                feed_all(&mut ctx, &frame, 0);
            }
        }

        assert_eq!(ctx.stats().readings(), 0);
        assert_eq!(ctx.stats().comms_errors(), 32);
    }

    #[test]
    fn test_average_after_prior_reading() {
        let (mut ctx, _) = context();

        feed_all(&mut ctx, &telemetry_frame(0x0A8C, 0), 0);
        feed_all(&mut ctx, &telemetry_frame(0x0100, 0), 0);

        let report = ctx.stats.drain(true).unwrap();
        assert_eq!(report.readings, 2);
        assert_eq!(report.avg_rpm, (0x0A8C + 256) / 2);
    }

    #[test]
    fn test_stopped_to_running_sets_on_time() {
        let (mut ctx, _) = context();

        feed_all(&mut ctx, &telemetry_frame(0, 0), 100);
        ctx.timer.poll();
        feed_all(&mut ctx, &telemetry_frame(0x0C00, 500), 600);

        let report = ctx.timer.poll();
        assert!(report.changed);
        assert_eq!(report.on_time_ms, 600);
        assert_eq!(report.off_time_ms, 100);
        assert!(!ctx.timer.poll().changed);
    }

    #[test]
    fn test_valid_settings_stored_and_default_mode_requested() {
        let (mut ctx, port) = context();
        let frame = settings_frame(1800, 3600, 0x05, [11870, 12465, 23740, 24927, 41545, 43000]);

        feed_all(&mut ctx, &frame, 0);

        let settings = ctx.settings().get();
        assert!(ctx.settings().is_received());
        assert_eq!(settings.min_speed, 1800);
        assert_eq!(settings.max_speed, 3600);
        assert_eq!(settings.mode_byte, 0x05);
        assert_eq!(settings.supply_12v.cut_out_mv, 10000);
        assert_eq!(settings.supply_42v.cut_in_mv, 36225);
        assert_eq!(port.get_tx_data().as_slice(), &[72, 80, 0, 0, 0, 0, 15]);
    }

    #[test]
    fn test_bad_settings_checksum_discarded_and_counted() {
        let (mut ctx, port) = context();
        let mut frame = settings_frame(1800, 3600, 0x05, [1; 6]);
        frame[21] ^= 0xFF;

        feed_all(&mut ctx, &frame, 0);

        assert!(!ctx.settings().is_received());
        assert_eq!(ctx.settings().get(), Settings::default());
        assert_eq!(ctx.stats().comms_errors(), 1);
        assert!(port.get_tx_data().is_empty());
    }

    #[test]
    fn test_settings_do_not_touch_readings() {
        let (mut ctx, _) = context();

        feed_all(&mut ctx, &settings_frame(1, 2, 3, [0; 6]), 0);

        assert_eq!(
            ctx.stats.drain(true),
            Err(DrainError::NoReadings {
                comms_errors: 0,
                error_status: 0
            })
        );
    }

    #[test]
    fn test_poll_reads_one_byte() {
        let (mut ctx, port) = context();
        port.queue_rx_data(&telemetry_frame(0x0100, 0));

        ctx.poll(0);
        assert_eq!(port.rx_pending(), 7);
        assert_eq!(ctx.pending_len(), 1);

        for _ in 0..7 {
            ctx.poll(0);
        }
        assert_eq!(ctx.stats().readings(), 1);

        // Nothing pending, nothing happens
        ctx.poll(0);
        assert_eq!(ctx.stats().comms_errors(), 0);
    }

    #[test]
    fn test_read_error_counts_comms_error() {
        let (mut ctx, port) = context();
        port.set_next_read_error(SerialError::ReadError);

        ctx.poll(0);

        assert_eq!(ctx.stats().comms_errors(), 1);
    }

    #[test]
    fn test_set_mode_write_failure_reported() {
        let (mut ctx, port) = context();
        port.set_next_write_error(SerialError::WriteError);

        assert_eq!(ctx.set_mode(Mode::Settings), Err(SerialError::WriteError));
        ctx.set_mode(Mode::Settings).unwrap();
        assert_eq!(port.get_tx_data().as_slice(), &[72, 80, 192, 0, 0, 0, 15]);
    }
}
