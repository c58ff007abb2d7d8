//! Device registry and tick dispatch
//!
//! The registry owns up to [`MAX_DEVICES`] device contexts. One periodic
//! caller drives [`DeviceRegistry::tick`]; a separate consumer reads results
//! through the other `&self` methods.
//!
//! Each context sits behind an `embassy_sync` blocking mutex, so a read that
//! spans several fields (draining the statistics window, polling the edge
//! timer) runs with the tick shut out for its whole duration. Pick
//! `CriticalSectionRawMutex` when the tick runs from an interrupt, or a
//! cheaper raw mutex when both sides share one thread.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;

use crate::commands::Mode;
use crate::config::registry::MAX_DEVICES;
use crate::device::context::DeviceContext;
use crate::device::stats::{DrainError, StatsReport};
use crate::device::timing::EdgeReport;
use crate::protocol::sentence::Settings;
use crate::registry::clock::Clock;
use crate::serial::traits::{ByteSource, SerialError};

/// Errors returned by registry operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// All device slots are taken
    CapacityExceeded,
    /// No device is registered at this index
    InvalidDeviceIndex(usize),
    /// A command could not be written to the device
    Serial(SerialError),
}

impl From<SerialError> for RegistryError {
    fn from(error: SerialError) -> Self {
        RegistryError::Serial(error)
    }
}

/// Owns the device contexts and dispatches the polling tick
pub struct DeviceRegistry<M: RawMutex, S, C> {
    devices: Vec<Mutex<M, RefCell<DeviceContext<S>>>, MAX_DEVICES>,
    clock: C,
}

impl<M: RawMutex, S: ByteSource, C: Clock> DeviceRegistry<M, S, C> {
    /// Create an empty registry
    pub fn new(clock: C) -> Self {
        Self {
            devices: Vec::new(),
            clock,
        }
    }

    /// Register a device and ask it for its settings.
    ///
    /// Returns the index used to address the device from now on. A failed
    /// settings request is logged; the device is registered regardless and
    /// [`request_settings`](Self::request_settings) can be retried.
    pub fn register(&mut self, port: S) -> Result<usize, RegistryError> {
        if self.devices.is_full() {
            log::warn!("FDC1: registry full, device rejected");
            return Err(RegistryError::CapacityExceeded);
        }

        let index = self.devices.len();
        let mut context = DeviceContext::new(index, port);
        if let Err(e) = context.set_mode(Mode::Settings) {
            log::warn!("FDC1[{}]: settings request failed ({:?})", index, e);
        }

        self.devices
            .push(Mutex::new(RefCell::new(context)))
            .map_err(|_| RegistryError::CapacityExceeded)?;

        log::info!("FDC1[{}]: registered", index);
        Ok(index)
    }

    /// Feed at most one pending byte into every registered device
    pub fn tick(&self) {
        let now_ms = self.clock.now_ms();
        for device in &self.devices {
            device.lock(|cell| cell.borrow_mut().poll(now_ms));
        }
    }

    /// Average the statistics window, clearing it when `reset` is set
    pub fn drain(&self, index: usize, reset: bool) -> Result<StatsReport, DrainError> {
        self.with_device(index, |ctx| ctx.stats.drain(reset))
            .unwrap_or(Err(DrainError::InvalidDeviceIndex(index)))
    }

    /// Average and clear the statistics window
    pub fn read_stats(&self, index: usize) -> Result<StatsReport, DrainError> {
        self.drain(index, true)
    }

    /// Average the statistics window without clearing it
    pub fn peek_stats(&self, index: usize) -> Result<StatsReport, DrainError> {
        self.drain(index, false)
    }

    /// Latest edge timestamps; clears the changed flag
    pub fn poll_edge(&self, index: usize) -> Result<EdgeReport, RegistryError> {
        self.with_device(index, |ctx| ctx.timer.poll())
            .ok_or(RegistryError::InvalidDeviceIndex(index))
    }

    /// Last settings reported by the device, zeros if none yet
    pub fn read_settings(&self, index: usize) -> Result<Settings, RegistryError> {
        self.with_device(index, |ctx| ctx.settings.get())
            .ok_or(RegistryError::InvalidDeviceIndex(index))
    }

    /// True once a valid settings sentence has been received
    pub fn has_settings(&self, index: usize) -> Result<bool, RegistryError> {
        self.with_device(index, |ctx| ctx.settings.is_received())
            .ok_or(RegistryError::InvalidDeviceIndex(index))
    }

    /// Switch a device's reporting mode
    pub fn set_mode(&self, index: usize, mode: Mode) -> Result<(), RegistryError> {
        self.with_device(index, |ctx| ctx.set_mode(mode))
            .ok_or(RegistryError::InvalidDeviceIndex(index))?
            .map_err(RegistryError::from)
    }

    /// Ask a device for one settings sentence. It is switched back to
    /// telemetry automatically once the sentence arrives.
    pub fn request_settings(&self, index: usize) -> Result<(), RegistryError> {
        self.set_mode(index, Mode::Settings)
    }

    /// Number of registered devices
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn capacity(&self) -> usize {
        MAX_DEVICES
    }

    fn with_device<R>(
        &self,
        index: usize,
        f: impl FnOnce(&mut DeviceContext<S>) -> R,
    ) -> Option<R> {
        let device = self.devices.get(index)?;
        Some(device.lock(|cell| f(&mut cell.borrow_mut())))
    }
}
