pub mod context;
pub mod settings;
pub mod stats;
pub mod timing;

pub use context::DeviceContext;
pub use settings::SettingsSnapshot;
pub use stats::{DrainError, StatsAccumulator, StatsReport};
pub use timing::{EdgeReport, TransitionTimer};
