use ndaffine_tensor::{DynGrid, FloatDtype, Grid};

use super::affine::{AffineParams, AffineTransform};
use crate::error::WarpError;
use crate::interpolation::{interpolate_value, ConstantBoundary, InterpolationMode, Scratch};
use crate::parallel::{par_iter_cells_init, ExecutionStrategy};

/// Options controlling how a transform is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransformConfig {
    /// How the output cells are distributed over threads.
    #[cfg_attr(feature = "serde", serde(default))]
    pub strategy: ExecutionStrategy,
}

impl TransformConfig {
    /// Run on the calling thread only.
    pub fn serial() -> Self {
        Self {
            strategy: ExecutionStrategy::Serial,
        }
    }

    /// Run on a pool of exactly `num_workers` threads.
    pub fn with_workers(num_workers: usize) -> Self {
        Self {
            strategy: ExecutionStrategy::Fixed(num_workers),
        }
    }
}

/// Resamples `src` into `dst` through a prepared output-to-input mapping.
///
/// Every output cell `idx` receives the value interpolated from `src` at
/// `transform.map_index(idx)`, with lattice points outside `src` reading as
/// `background`. The computation is done in `f64` and rounded to `T` once.
///
/// # Arguments
///
/// * `src` - The input grid.
/// * `dst` - The output grid. Its shape selects the output region.
/// * `transform` - The output-to-input mapping.
/// * `interpolation` - The interpolation mode to use.
/// * `background` - The value of every point outside `src`.
/// * `config` - The execution options.
///
/// # Errors
///
/// Returns an error, without writing to `dst`, if the grids and the mapping
/// disagree on the number of axes or the execution strategy is invalid.
pub fn affine_transform<T: FloatDtype>(
    src: &Grid<T>,
    dst: &mut Grid<T>,
    transform: &AffineTransform,
    interpolation: InterpolationMode,
    background: T,
    config: &TransformConfig,
) -> Result<(), WarpError> {
    let ndim = src.ndim();
    if transform.ndim() != ndim {
        return Err(WarpError::shape_mismatch(
            "transform",
            [ndim],
            [transform.ndim()],
        ));
    }
    if dst.ndim() != ndim {
        return Err(WarpError::shape_mismatch("output grid", [ndim], [dst.ndim()]));
    }
    config.strategy.validate()?;

    log::debug!(
        "affine transform {:?} -> {:?} ({interpolation}, {} workers, {})",
        src.shape(),
        dst.shape(),
        config.strategy.num_workers(),
        T::DTYPE,
    );

    let sampler = ConstantBoundary::new(src, background);
    let shape = dst.shape().to_vec();

    par_iter_cells_init(
        dst.as_slice_mut(),
        &shape,
        config.strategy,
        || (vec![0.0; ndim], Scratch::new(ndim)),
        |state: &mut (Vec<f64>, Scratch), idx: &[usize]| {
            let (coords, scratch) = state;
            transform.map_index(idx, coords);
            T::from_f64(interpolate_value(&sampler, coords, interpolation, scratch))
        },
    )?;

    Ok(())
}

/// Applies a forward affine transform to `src`, writing the result into `dst`.
///
/// All parameters are checked before `dst` is touched; on error `dst` keeps
/// its previous contents.
///
/// # Arguments
///
/// * `src` - The input grid.
/// * `dst` - The output grid, with the same number of axes as `src`.
/// * `params` - The forward transform.
/// * `interpolation` - The interpolation mode to use.
/// * `background` - The value of every point outside `src`.
/// * `config` - The execution options.
///
/// # Example
///
/// ```
/// use ndaffine_imgproc::interpolation::InterpolationMode;
/// use ndaffine_imgproc::warp::{transform, AffineParams, TransformConfig};
/// use ndaffine_tensor::Grid;
///
/// let src = Grid::from_shape_vec(vec![4], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let mut dst = Grid::zeros(vec![4]).unwrap();
///
/// let params = AffineParams::from_translation(vec![1.0]);
/// transform(&src, &mut dst, &params, InterpolationMode::Linear, 0.0, &TransformConfig::serial()).unwrap();
///
/// assert_eq!(dst.as_slice(), &[0.0, 1.0, 2.0, 3.0]);
/// ```
pub fn transform<T: FloatDtype>(
    src: &Grid<T>,
    dst: &mut Grid<T>,
    params: &AffineParams,
    interpolation: InterpolationMode,
    background: T,
    config: &TransformConfig,
) -> Result<(), WarpError> {
    if dst.ndim() != src.ndim() {
        return Err(WarpError::shape_mismatch(
            "output grid",
            [src.ndim()],
            [dst.ndim()],
        ));
    }
    let transform = AffineTransform::from_params(params, src.shape())?;
    affine_transform(src, dst, &transform, interpolation, background, config)
}

/// Like [`transform`], but allocates an output with the shape of `src`.
pub fn transform_alloc<T: FloatDtype>(
    src: &Grid<T>,
    params: &AffineParams,
    interpolation: InterpolationMode,
    background: T,
    config: &TransformConfig,
) -> Result<Grid<T>, WarpError> {
    let mut dst = Grid::zeros(src.shape().to_vec())?;
    transform(src, &mut dst, params, interpolation, background, config)?;
    Ok(dst)
}

/// Applies a forward affine transform to a grid of any element type.
///
/// `f32` input is processed in `f32`; every other type is promoted to `f64`.
/// `dst` must already hold the working type.
///
/// # Errors
///
/// [`WarpError::DtypeMismatch`] if `dst` is not of the working type, plus
/// every error of [`transform`]. Nothing is written on error.
pub fn transform_dyn_into(
    src: &DynGrid,
    dst: &mut DynGrid,
    params: &AffineParams,
    interpolation: InterpolationMode,
    background: f64,
    config: &TransformConfig,
) -> Result<(), WarpError> {
    let working = src.working_dtype();
    if dst.dtype() != working {
        return Err(WarpError::DtypeMismatch {
            expected: working,
            actual: dst.dtype(),
        });
    }

    match (src, dst) {
        (DynGrid::F32(src), DynGrid::F32(dst)) => transform(
            src,
            dst,
            params,
            interpolation,
            f32::from_f64(background),
            config,
        ),
        (DynGrid::F64(src), DynGrid::F64(dst)) => {
            transform(src, dst, params, interpolation, background, config)
        }
        (src, DynGrid::F64(dst)) => {
            let promoted = src.to_f64();
            transform(&promoted, dst, params, interpolation, background, config)
        }
        (_, dst) => Err(WarpError::DtypeMismatch {
            expected: working,
            actual: dst.dtype(),
        }),
    }
}

/// Like [`transform_dyn_into`], but allocates an output of the working type
/// with the shape of `src`.
pub fn transform_dyn(
    src: &DynGrid,
    params: &AffineParams,
    interpolation: InterpolationMode,
    background: f64,
    config: &TransformConfig,
) -> Result<DynGrid, WarpError> {
    let shape = src.shape().to_vec();
    let mut dst = match src.working_dtype() {
        ndaffine_tensor::DType::F32 => DynGrid::F32(Grid::zeros(shape)?),
        _ => DynGrid::F64(Grid::zeros(shape)?),
    };
    transform_dyn_into(src, &mut dst, params, interpolation, background, config)?;
    Ok(dst)
}
