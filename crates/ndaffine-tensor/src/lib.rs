#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `ndaffine-tensor` provides [`Grid`], a dense row-major array whose number of
//! dimensions is only known at runtime. The shape is an ordinary vector, so the
//! same code path serves 1-D signals, 2-D images and 5-D volumes alike.
//!
//! # Quick Start
//!
//! ```rust
//! use ndaffine_tensor::Grid;
//!
//! let grid = Grid::from_shape_vec(vec![2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
//!
//! assert_eq!(grid.ndim(), 2);
//! assert_eq!(grid.get(&[1, 2]), Some(&6.0));
//! assert_eq!(grid.strides(), &[3, 1]);
//! ```
//!
//! Grids of different element types can be carried together through [`DynGrid`]:
//!
//! ```rust
//! use ndaffine_tensor::{DType, DynGrid, Grid};
//!
//! let grid = Grid::<u8>::from_shape_val(vec![4, 4], 7).unwrap();
//! let any: DynGrid = grid.into();
//! assert_eq!(any.dtype(), DType::U8);
//! assert_eq!(any.working_dtype(), DType::F64);
//! ```

/// Element types supported by grids.
pub mod dtype;

/// Dynamically typed grids.
pub mod dyn_grid;

/// The dense grid type and its error type.
pub mod grid;

pub use crate::dtype::{DType, FloatDtype, GridDtype};
pub use crate::dyn_grid::DynGrid;
pub use crate::grid::{get_strides_from_shape, unravel_index, Grid, GridError};
