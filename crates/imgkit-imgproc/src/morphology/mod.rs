//! Morphological operations on images.

mod kernel;
pub use kernel::Kernel;

mod ops;
pub use ops::*;
