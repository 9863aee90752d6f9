use ndaffine_tensor::{DType, GridError};

use crate::parallel::ParallelError;

/// An error type for the resampling operations.
///
/// Every variant is raised before any output element is written.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WarpError {
    /// An input has the wrong number of axes or components.
    #[error("{what} has shape {actual}, expected {expected}")]
    ShapeMismatch {
        /// Which input is malformed.
        what: &'static str,
        /// Expected shape description.
        expected: String,
        /// Actual shape description.
        actual: String,
    },

    /// The output grid does not use the working precision of the operation.
    #[error("Output dtype {actual} does not match the working dtype {expected}")]
    DtypeMismatch {
        /// The working dtype of the operation.
        expected: DType,
        /// The dtype of the supplied output.
        actual: DType,
    },

    /// The interpolation selector is not one of the supported kernels.
    #[error("Unknown interpolation order \"{0}\", valid options are \"linear\" and \"cubic\"")]
    UnknownKernel(String),

    /// The linear part of the transform has no inverse.
    #[error("The linear transformation is singular")]
    SingularTransform,

    /// The two vectors spanning a rotation plane are parallel or zero.
    #[error("Rotation plane vectors are degenerate")]
    DegeneratePlane,

    /// Error from the grid container.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Error setting up the parallel execution.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}

impl WarpError {
    pub(crate) fn shape_mismatch(
        what: &'static str,
        expected: impl std::fmt::Debug,
        actual: impl std::fmt::Debug,
    ) -> Self {
        Self::ShapeMismatch {
            what,
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
        }
    }
}
