#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// error types for the resampling operations.
pub mod error;

/// utilities for interpolation.
pub mod interpolation;

/// small dense linear algebra helpers.
pub mod linalg;

/// module containing parallelization utilities.
pub mod parallel;

/// n-dimensional affine transformations module.
pub mod warp;

pub use error::WarpError;
