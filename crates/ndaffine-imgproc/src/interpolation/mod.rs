//! Interpolation kernels for n-dimensional resampling.
//!
//! A kernel turns a fractional coordinate into a value by combining reads of
//! the surrounding integer lattice points. Reads go through
//! [`ConstantBoundary`], which replaces any point outside the grid with a
//! background value.
//!
//! # Interpolation Modes
//!
//! - **Linear**: multilinear blend of the `2^d` corners of the enclosing cell
//! - **Cubic**: separable Catmull-Rom convolution over `4^d` taps

mod boundary;
mod cubic;
pub(crate) mod interpolate;
mod linear;

pub use boundary::ConstantBoundary;
pub use cubic::catmull_rom_weights;
pub use interpolate::{interpolate_value, InterpolationMode, Scratch};
