#[cfg(feature = "embedded")]
pub mod io;
pub mod traits;

#[cfg(feature = "embedded")]
pub use io::IoByteSource;
pub use traits::{ByteSource, SerialError};
