//! Filter operations
//!
//! This module provides smoothing filters built on a separable convolution.

/// Filter kernels
pub mod kernels;

/// Filter operations
mod ops;
pub use ops::*;

/// Separable filter operations
mod separable_filter;
pub use separable_filter::*;
