use ndaffine_tensor::GridDtype;
use num_traits::AsPrimitive;

use super::boundary::ConstantBoundary;
use super::interpolate::Scratch;

/// Number of taps per axis.
pub(crate) const CUBIC_TAPS: usize = 4;

/// The 1-D Catmull-Rom weights for the taps at offsets `-1, 0, 1, 2` from the
/// lower lattice point, for a local parameter `x` in `[0, 1)`.
///
/// # Example
///
/// ```
/// use ndaffine_imgproc::interpolation::catmull_rom_weights;
///
/// assert_eq!(catmull_rom_weights(0.0), [0.0, 1.0, 0.0, 0.0]);
/// let w = catmull_rom_weights(0.5);
/// assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
/// ```
#[inline]
pub fn catmull_rom_weights(x: f64) -> [f64; CUBIC_TAPS] {
    let x2 = x * x;
    let x3 = x2 * x;
    [
        -0.5 * x3 + x2 - 0.5 * x,
        1.5 * x3 - 2.5 * x2 + 1.0,
        -1.5 * x3 + 2.0 * x2 + 0.5 * x,
        0.5 * x3 - 0.5 * x2,
    ]
}

/// Kernel for separable cubic convolution (Catmull-Rom) in any number of
/// dimensions.
///
/// Every tap combination with a nonzero weight is fetched individually, so the
/// background substitution applies per tap: a tap outside the grid along any
/// single axis contributes the background value. An axis whose fractional part
/// is zero has a single nonzero weight and contributes one tap. A coordinate
/// out of reach of the grid returns the background.
///
/// # Arguments
///
/// * `sampler` - The boundary-aware source of lattice values.
/// * `coords` - The fractional coordinate, one entry per axis.
/// * `scratch` - Work buffers sized for `coords.len()` axes.
///
/// # Returns
///
/// The interpolated value in double precision.
pub(crate) fn multicubic_interpolation<T: GridDtype>(
    sampler: &ConstantBoundary<'_, T>,
    coords: &[f64],
    scratch: &mut Scratch,
) -> f64 {
    let ndim = coords.len();
    if !scratch.split(coords, sampler.grid().shape()) {
        return sampler.background().as_();
    }

    for k in 0..ndim {
        let w = catmull_rom_weights(scratch.frac[k]);
        scratch.weights[k * CUBIC_TAPS..(k + 1) * CUBIC_TAPS].copy_from_slice(&w);
        scratch.lo[k] = w.iter().position(|&v| v != 0.0).unwrap_or(0);
        scratch.hi[k] = w.iter().rposition(|&v| v != 0.0).unwrap_or(0);
    }

    // taps sit at offsets -1..=2 from the floor
    scratch.accumulate(sampler, ndim, -1)
}
