use num_traits::AsPrimitive;

use crate::{DType, Grid};

/// A grid whose element type is only known at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum DynGrid {
    /// `u8` elements.
    U8(Grid<u8>),
    /// `u16` elements.
    U16(Grid<u16>),
    /// `i32` elements.
    I32(Grid<i32>),
    /// `i64` elements.
    I64(Grid<i64>),
    /// `f32` elements.
    F32(Grid<f32>),
    /// `f64` elements.
    F64(Grid<f64>),
}

macro_rules! dispatch {
    ($self:expr, $g:ident => $body:expr) => {
        match $self {
            DynGrid::U8($g) => $body,
            DynGrid::U16($g) => $body,
            DynGrid::I32($g) => $body,
            DynGrid::I64($g) => $body,
            DynGrid::F32($g) => $body,
            DynGrid::F64($g) => $body,
        }
    };
}

macro_rules! impl_from_grid {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Grid<$t>> for DynGrid {
                fn from(grid: Grid<$t>) -> Self {
                    DynGrid::$variant(grid)
                }
            }
        )*
    };
}

impl_from_grid!(u8 => U8, u16 => U16, i32 => I32, i64 => I64, f32 => F32, f64 => F64);

impl DynGrid {
    /// The element type of the stored grid.
    pub fn dtype(&self) -> DType {
        match self {
            DynGrid::U8(_) => DType::U8,
            DynGrid::U16(_) => DType::U16,
            DynGrid::I32(_) => DType::I32,
            DynGrid::I64(_) => DType::I64,
            DynGrid::F32(_) => DType::F32,
            DynGrid::F64(_) => DType::F64,
        }
    }

    /// The floating precision this grid is resampled in.
    pub fn working_dtype(&self) -> DType {
        self.dtype().promoted()
    }

    /// The size of every axis.
    pub fn shape(&self) -> &[usize] {
        dispatch!(self, g => g.shape())
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        dispatch!(self, g => g.ndim())
    }

    /// Returns the number of elements.
    pub fn numel(&self) -> usize {
        dispatch!(self, g => g.numel())
    }

    /// Copies the grid into a 64-bit float grid.
    pub fn to_f64(&self) -> Grid<f64> {
        dispatch!(self, g => g.map(|&v| -> f64 { v.as_() }))
    }

    /// The stored `f32` grid, if that is the element type.
    pub fn as_f32(&self) -> Option<&Grid<f32>> {
        match self {
            DynGrid::F32(g) => Some(g),
            _ => None,
        }
    }

    /// The stored `f64` grid, if that is the element type.
    pub fn as_f64(&self) -> Option<&Grid<f64>> {
        match self {
            DynGrid::F64(g) => Some(g),
            _ => None,
        }
    }
}
