//! Frame accumulator for the FDC1 serial protocol
//!
//! Sentences have no delimiter; they are recognised by a sentinel byte, a
//! sentence id and a fixed length per sentence type.

use crate::config::protocol::{
    MAX_FRAME_SIZE, SENTINEL, SETTINGS_ID, SETTINGS_LEN, TELEMETRY_ID, TELEMETRY_LEN,
};
use heapless::Vec;

/// Reasons a sentence is thrown away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// First byte was not the sentinel
    BadSentinel(u8),
    /// Second byte was not a known sentence id
    UnknownSentence(u8),
    /// Buffer overflow while accumulating. Id checking at byte 2 and
    /// emission at the sentence length keep the buffer within
    /// `MAX_FRAME_SIZE`, so this only fires if that invariant breaks.
    Overflow,
    /// Telemetry sentence failed its XOR checksums
    TelemetryChecksum,
    /// Settings sentence failed its XOR checksums
    SettingsChecksum,
}

/// A complete, not yet validated sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawFrame {
    Telemetry([u8; TELEMETRY_LEN]),
    Settings([u8; SETTINGS_LEN]),
}

/// Accumulates incoming bytes and extracts complete FDC1 sentences.
///
/// Bytes are discarded one at a time until a sentinel is seen, then the
/// sentence id picks the expected length.
pub struct FrameAccumulator {
    buffer: Vec<u8, MAX_FRAME_SIZE>,
}

impl FrameAccumulator {
    /// Create a new empty frame accumulator.
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Push a byte into the accumulator.
    ///
    /// Returns `Some(Ok(frame))` when a sentence reaches its full length,
    /// `Some(Err(_))` when the byte breaks framing (the partial sentence is
    /// dropped), and `None` while more bytes are needed.
    pub fn push(&mut self, byte: u8) -> Option<Result<RawFrame, FrameError>> {
        // Unreachable while the length rules below hold
        if self.buffer.push(byte).is_err() {
            self.buffer.clear();
            return Some(Err(FrameError::Overflow));
        }

        match self.buffer.len() {
            1 if byte != SENTINEL => {
                self.buffer.clear();
                Some(Err(FrameError::BadSentinel(byte)))
            }
            2 if byte != TELEMETRY_ID && byte != SETTINGS_ID => {
                self.buffer.clear();
                Some(Err(FrameError::UnknownSentence(byte)))
            }
            TELEMETRY_LEN if self.buffer[1] == TELEMETRY_ID => {
                let mut frame = [0u8; TELEMETRY_LEN];
                frame.copy_from_slice(&self.buffer);
                self.buffer.clear();
                Some(Ok(RawFrame::Telemetry(frame)))
            }
            SETTINGS_LEN if self.buffer[1] == SETTINGS_ID => {
                let mut frame = [0u8; SETTINGS_LEN];
                frame.copy_from_slice(&self.buffer);
                self.buffer.clear();
                Some(Ok(RawFrame::Settings(frame)))
            }
            _ => None,
        }
    }

    /// Reset the accumulator, discarding any partial sentence.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Returns true if no partial sentence is in progress.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns the current number of bytes in the buffer.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }
}

impl Default for FrameAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
