//! N-dimensional affine resampling.
//!
//! A forward transform is described by [`AffineParams`]: a `d x d` linear
//! part applied around an origin, followed by a translation. Resampling runs
//! the transform backwards. [`AffineTransform`] folds the parameters into an
//! inverse linear part and a single offset, so that every output index maps
//! to the fractional input coordinate it reads from.
//!
//! # Examples
//!
//! Rotating a volume by 90 degrees in the plane of its last two axes:
//!
//! ```
//! use ndaffine_imgproc::interpolation::InterpolationMode;
//! use ndaffine_imgproc::warp::{rotation_from_angle_and_plane, transform_alloc, AffineParams, TransformConfig};
//! use ndaffine_tensor::Grid;
//!
//! let src = Grid::from_shape_val(vec![4, 5, 5], 1.0f64).unwrap();
//! let rotation = rotation_from_angle_and_plane(
//!     std::f64::consts::FRAC_PI_2,
//!     &[0.0, 1.0, 0.0],
//!     &[0.0, 0.0, 1.0],
//! )
//! .unwrap();
//!
//! let params = AffineParams::new(rotation, vec![0.0; 3]);
//! let dst = transform_alloc(&src, &params, InterpolationMode::Cubic, 0.0, &TransformConfig::default()).unwrap();
//! assert!(dst.iter().all(|v| (v - 1.0).abs() < 1e-10));
//! ```

mod affine;
mod resample;

pub use affine::{rotation_from_angle_and_plane, AffineParams, AffineTransform};
pub use resample::{
    affine_transform, transform, transform_alloc, transform_dyn, transform_dyn_into,
    TransformConfig,
};
