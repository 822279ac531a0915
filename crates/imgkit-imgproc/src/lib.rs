#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color transformations module.
pub mod color;

/// image cropping module.
pub mod crop;

/// image filtering module.
pub mod filter;

/// utilities for interpolation.
pub mod interpolation;

/// morphological operations module.
pub mod morphology;

/// image border padding module.
pub mod padding;

/// module containing parallization utilities.
pub mod parallel;

/// utility functions for resizing images.
pub mod resize;

/// operations to threshold images.
pub mod threshold;
