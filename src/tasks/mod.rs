//! Embassy tasks module
//!
//! Async entry points for running the registry on an embassy executor.

pub mod tick;

pub use tick::tick_task;
