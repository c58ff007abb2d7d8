//! Byte source trait for abstraction and testability
//!
//! The tick polls each device's byte source one byte at a time, so the
//! interface is a non-blocking duplex byte channel. Hardware UARTs, bit-banged
//! software serial and test mocks all sit behind the same trait.

/// Errors that can occur during serial operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialError {
    /// Receive failed (framing, parity or driver error)
    ReadError,
    /// A read was attempted with no byte pending
    NoData,
    /// Receive buffer overflow
    OverflowError,
    /// Write error
    WriteError,
}

/// Duplex byte channel to one compressor controller
pub trait ByteSource {
    /// Returns true when at least one received byte is pending
    fn available(&mut self) -> bool;

    /// Read the next received byte
    fn read_byte(&mut self) -> Result<u8, SerialError>;

    /// Queue a byte for transmission
    fn write_byte(&mut self, byte: u8) -> Result<(), SerialError>;

    /// Queue every byte of `data`, stopping at the first failure
    fn write_all(&mut self, data: &[u8]) -> Result<(), SerialError> {
        for &byte in data {
            self.write_byte(byte)?;
        }
        Ok(())
    }
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn available(&mut self) -> bool {
        (**self).available()
    }

    fn read_byte(&mut self) -> Result<u8, SerialError> {
        (**self).read_byte()
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), SerialError> {
        (**self).write_byte(byte)
    }
}

#[cfg(test)]
pub mod mock {
    //! Mock byte source for testing

    use super::*;
    use core::cell::RefCell;
    use heapless::{Deque, Vec};
    use std::rc::Rc;

    const MOCK_RX_CAPACITY: usize = 256;
    const MOCK_TX_CAPACITY: usize = 64;

    #[derive(Default)]
    struct Shared {
        rx_buffer: Deque<u8, MOCK_RX_CAPACITY>,
        tx_buffer: Vec<u8, MOCK_TX_CAPACITY>,
        next_read_error: Option<SerialError>,
        next_write_error: Option<SerialError>,
    }

    /// Mock byte source for unit testing
    ///
    /// Clones share the same buffers, so a test can keep a handle while the
    /// registry owns the other one.
    #[derive(Clone, Default)]
    pub struct MockByteSource {
        shared: Rc<RefCell<Shared>>,
    }

    impl MockByteSource {
        /// Create a new mock byte source
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue data to be returned by read_byte()
        pub fn queue_rx_data(&self, data: &[u8]) {
            let mut shared = self.shared.borrow_mut();
            for &byte in data {
                let _ = shared.rx_buffer.push_back(byte);
            }
        }

        /// Number of queued bytes not yet read
        pub fn rx_pending(&self) -> usize {
            self.shared.borrow().rx_buffer.len()
        }

        /// Get all data written via write_byte()
        pub fn get_tx_data(&self) -> Vec<u8, MOCK_TX_CAPACITY> {
            self.shared.borrow().tx_buffer.clone()
        }

        /// Clear the TX buffer
        pub fn clear_tx_buffer(&self) {
            self.shared.borrow_mut().tx_buffer.clear();
        }

        /// Set an error to be returned by the next read_byte() call
        pub fn set_next_read_error(&self, error: SerialError) {
            self.shared.borrow_mut().next_read_error = Some(error);
        }

        /// Set an error to be returned by the next write_byte() call
        pub fn set_next_write_error(&self, error: SerialError) {
            self.shared.borrow_mut().next_write_error = Some(error);
        }
    }

    impl ByteSource for MockByteSource {
        fn available(&mut self) -> bool {
            let shared = self.shared.borrow();
            !shared.rx_buffer.is_empty() || shared.next_read_error.is_some()
        }

        fn read_byte(&mut self) -> Result<u8, SerialError> {
            let mut shared = self.shared.borrow_mut();
            if let Some(error) = shared.next_read_error.take() {
                return Err(error);
            }
            shared.rx_buffer.pop_front().ok_or(SerialError::NoData)
        }

        fn write_byte(&mut self, byte: u8) -> Result<(), SerialError> {
            let mut shared = self.shared.borrow_mut();
            if let Some(error) = shared.next_write_error.take() {
                return Err(error);
            }
            shared
                .tx_buffer
                .push(byte)
                .map_err(|_| SerialError::OverflowError)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_mock_read_in_order() {
            let mut port = MockByteSource::new();
            port.queue_rx_data(&[0x01, 0x02]);

            assert!(port.available());
            assert_eq!(port.read_byte(), Ok(0x01));
            assert_eq!(port.read_byte(), Ok(0x02));
            assert!(!port.available());
            assert_eq!(port.read_byte(), Err(SerialError::NoData));
        }

        #[test]
        fn test_mock_write_all() {
            let mut port = MockByteSource::new();
            port.write_all(&[0x48, 0x50]).unwrap();
            port.write_byte(0x0F).unwrap();

            assert_eq!(port.get_tx_data().as_slice(), &[0x48, 0x50, 0x0F]);
        }

        #[test]
        fn test_mock_write_error_stops_write_all() {
            let mut port = MockByteSource::new();
            port.set_next_write_error(SerialError::WriteError);

            assert_eq!(port.write_all(&[0x01, 0x02]), Err(SerialError::WriteError));
            assert!(port.get_tx_data().is_empty());

            // Error should be cleared
            port.write_all(&[0x03]).unwrap();
            assert_eq!(port.get_tx_data().as_slice(), &[0x03]);
        }

        #[test]
        fn test_clones_share_buffers() {
            let handle = MockByteSource::new();
            let mut owned = handle.clone();

            handle.queue_rx_data(&[0x1B]);
            assert_eq!(owned.read_byte(), Ok(0x1B));
            assert_eq!(handle.rx_pending(), 0);
        }
    }
}
