#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
pub mod error;

/// Image reading and writing functions.
///
/// See [`functional::read_image`] and [`functional::write_image`].
pub mod functional;

/// Path utilities.
pub mod path;

pub use error::IoError;
pub use functional::{DynImage, LoadMode, SaveOptions};
