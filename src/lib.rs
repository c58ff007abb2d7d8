#![cfg_attr(not(test), no_std)]

//! Decoder for the FDC1 serial protocol spoken by variable-speed
//! refrigeration compressor controllers.
//!
//! Register each controller's serial line with a [`DeviceRegistry`], call
//! [`DeviceRegistry::tick`] about once a millisecond, and read averaged speed
//! and current, edge timestamps and device settings whenever convenient.

pub mod commands;
pub mod config;
pub mod device;
pub mod protocol;
pub mod registry;
pub mod serial;

// These modules depend on embassy features only available with embedded feature
#[cfg(feature = "embedded")]
pub mod tasks;

pub use commands::Mode;
pub use device::{DrainError, EdgeReport, StatsReport};
pub use protocol::{Settings, VoltageThresholds};
pub use registry::{Clock, DeviceRegistry, RegistryError};
pub use serial::{ByteSource, SerialError};
