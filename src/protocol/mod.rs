pub mod framing;
pub mod sentence;

pub use framing::{FrameAccumulator, FrameError, RawFrame};
pub use sentence::{Sentence, Settings, Telemetry, VoltageThresholds};
