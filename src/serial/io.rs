//! embedded_io wrapper for UART peripherals.
//!
//! Any blocking UART that implements `embedded_io::{Read, ReadReady, Write}`
//! can be used as a device byte source.

use embedded_io::{Read, ReadReady, Write};

use crate::serial::traits::{ByteSource, SerialError};

/// Wrapper around a UART that implements [`ByteSource`].
pub struct IoByteSource<T> {
    inner: T,
    // Set when read_ready failed; handed out by the next read_byte
    pending_error: bool,
}

impl<T> IoByteSource<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            pending_error: false,
        }
    }

    /// Give the UART back
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read + ReadReady + Write> ByteSource for IoByteSource<T> {
    fn available(&mut self) -> bool {
        match self.inner.read_ready() {
            Ok(ready) => ready || self.pending_error,
            Err(_) => {
                self.pending_error = true;
                true
            }
        }
    }

    fn read_byte(&mut self) -> Result<u8, SerialError> {
        if self.pending_error {
            self.pending_error = false;
            return Err(SerialError::ReadError);
        }

        let mut buf = [0u8; 1];
        match self.inner.read(&mut buf) {
            Ok(1) => Ok(buf[0]),
            Ok(_) => Err(SerialError::NoData),
            Err(_) => Err(SerialError::ReadError),
        }
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), SerialError> {
        self.inner
            .write_all(&[byte])
            .map_err(|_| SerialError::WriteError)
    }
}
