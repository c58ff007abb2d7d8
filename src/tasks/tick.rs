//! Periodic tick task.
//!
//! Stands in for a hardware timer interrupt: wakes every
//! `TICK_PERIOD_MS` and lets the registry pull one byte per device.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Ticker};

use crate::config::timing::TICK_PERIOD_MS;
use crate::registry::{Clock, DeviceRegistry};
use crate::serial::ByteSource;

/// Task that drives the registry tick forever.
///
/// Generic over the registry's mutex, byte source and clock, so the caller
/// wraps it in its own `#[embassy_executor::task]`.
pub async fn tick_task<M, S, C>(registry: &DeviceRegistry<M, S, C>)
where
    M: RawMutex,
    S: ByteSource,
    C: Clock,
{
    let mut ticker = Ticker::every(Duration::from_millis(TICK_PERIOD_MS));

    loop {
        registry.tick();
        ticker.next().await;
    }
}
