pub mod clock;
pub mod devices;

#[cfg(feature = "embedded")]
pub use clock::EmbassyClock;
pub use clock::Clock;
pub use devices::{DeviceRegistry, RegistryError};
