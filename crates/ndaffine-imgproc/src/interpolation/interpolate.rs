use std::str::FromStr;

use ndaffine_tensor::GridDtype;
use num_traits::AsPrimitive;

use super::boundary::ConstantBoundary;
use super::cubic::{multicubic_interpolation, CUBIC_TAPS};
use super::linear::multilinear_interpolation;
use crate::error::WarpError;

/// Interpolation mode for the affine transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InterpolationMode {
    /// Multilinear interpolation over the `2^d` surrounding lattice points.
    #[default]
    Linear,
    /// Separable Catmull-Rom convolution over the `4^d` surrounding lattice points.
    Cubic,
}

impl FromStr for InterpolationMode {
    type Err = WarpError;

    /// Parses `"linear"` or `"cubic"`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(InterpolationMode::Linear),
            "cubic" => Ok(InterpolationMode::Cubic),
            _ => Err(WarpError::UnknownKernel(s.to_string())),
        }
    }
}

impl std::fmt::Display for InterpolationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterpolationMode::Linear => write!(f, "linear"),
            InterpolationMode::Cubic => write!(f, "cubic"),
        }
    }
}

/// Work buffers reused across cells by one worker.
///
/// Holds the per-axis floor and fractional part, the kernel weights, the range
/// of taps with a nonzero weight, the tap index being fetched and the odometer
/// digits.
#[derive(Debug, Clone)]
pub struct Scratch {
    pub(crate) floor: Vec<isize>,
    pub(crate) frac: Vec<f64>,
    pub(crate) weights: Vec<f64>,
    pub(crate) lo: Vec<usize>,
    pub(crate) hi: Vec<usize>,
    pub(crate) tap: Vec<isize>,
    pub(crate) digits: Vec<usize>,
}

impl Scratch {
    /// Allocate buffers for grids with `ndim` axes.
    pub fn new(ndim: usize) -> Self {
        Self {
            floor: vec![0; ndim],
            frac: vec![0.0; ndim],
            weights: vec![0.0; ndim * CUBIC_TAPS],
            lo: vec![0; ndim],
            hi: vec![0; ndim],
            tap: vec![0; ndim],
            digits: vec![0; ndim],
        }
    }

    /// Split every coordinate into its floor and the fractional remainder in `[0, 1)`.
    ///
    /// Returns `false` without finishing when a coordinate is not finite or
    /// lies outside `(-2, shape + 1)`, where no tap of either kernel reaches
    /// the grid.
    #[inline]
    pub(crate) fn split(&mut self, coords: &[f64], shape: &[usize]) -> bool {
        for (k, (&c, &n)) in coords.iter().zip(shape).enumerate() {
            if !(c > -2.0 && c < n as f64 + 1.0) {
                return false;
            }
            let f = c.floor();
            self.floor[k] = f as isize;
            self.frac[k] = c - f;
        }
        true
    }

    /// Sum `weight * value` over every combination of per-axis digits in
    /// `lo[k]..=hi[k]`, reading the lattice point `floor + digit + shift`.
    ///
    /// Combinations are enumerated with an odometer, last axis fastest, so the
    /// work is the product of the per-axis tap counts and stack usage does not
    /// depend on the number of axes.
    pub(crate) fn accumulate<T: GridDtype>(
        &mut self,
        sampler: &ConstantBoundary<'_, T>,
        ndim: usize,
        shift: isize,
    ) -> f64 {
        self.digits[..ndim].copy_from_slice(&self.lo[..ndim]);

        let mut acc = 0.0;
        loop {
            let mut weight = 1.0;
            for k in 0..ndim {
                let digit = self.digits[k];
                weight *= self.weights[k * CUBIC_TAPS + digit];
                self.tap[k] = self.floor[k] + digit as isize + shift;
            }
            if weight != 0.0 {
                let value: f64 = sampler.fetch(&self.tap[..ndim]).as_();
                acc += weight * value;
            }

            let mut k = ndim;
            loop {
                if k == 0 {
                    return acc;
                }
                k -= 1;
                if self.digits[k] < self.hi[k] {
                    self.digits[k] += 1;
                    break;
                }
                self.digits[k] = self.lo[k];
            }
        }
    }
}

/// Kernel for interpolating a grid value at a fractional coordinate.
///
/// # Arguments
///
/// * `sampler` - The boundary-aware source of lattice values.
/// * `coords` - The fractional coordinate, one entry per axis.
/// * `interpolation` - The interpolation mode to use.
/// * `scratch` - Work buffers sized for `coords.len()` axes.
///
/// # Returns
///
/// The interpolated value in double precision.
///
/// # Example
///
/// ```
/// use ndaffine_imgproc::interpolation::{interpolate_value, ConstantBoundary, InterpolationMode, Scratch};
/// use ndaffine_tensor::Grid;
///
/// let grid = Grid::from_shape_vec(vec![3], vec![0.0, 10.0, 20.0]).unwrap();
/// let sampler = ConstantBoundary::new(&grid, 0.0);
/// let mut scratch = Scratch::new(1);
///
/// let v = interpolate_value(&sampler, &[1.5], InterpolationMode::Linear, &mut scratch);
/// assert_eq!(v, 15.0);
/// ```
#[inline]
pub fn interpolate_value<T: GridDtype>(
    sampler: &ConstantBoundary<'_, T>,
    coords: &[f64],
    interpolation: InterpolationMode,
    scratch: &mut Scratch,
) -> f64 {
    match interpolation {
        InterpolationMode::Linear => multilinear_interpolation(sampler, coords, scratch),
        InterpolationMode::Cubic => multicubic_interpolation(sampler, coords, scratch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_modes() {
        assert_eq!("linear".parse::<InterpolationMode>(), Ok(InterpolationMode::Linear));
        assert_eq!("Cubic".parse::<InterpolationMode>(), Ok(InterpolationMode::Cubic));
        assert_eq!(
            "quadratic".parse::<InterpolationMode>(),
            Err(WarpError::UnknownKernel("quadratic".to_string()))
        );
        assert_eq!(InterpolationMode::default(), InterpolationMode::Linear);
        assert_eq!(InterpolationMode::Cubic.to_string(), "cubic");
    }

    #[test]
    fn split_handles_negative_coordinates() {
        let mut scratch = Scratch::new(3);
        assert!(scratch.split(&[-0.25, 2.0, -1.5], &[2, 3, 1]));
        assert_eq!(scratch.floor, vec![-1, 2, -2]);
        assert_eq!(scratch.frac, vec![0.75, 0.0, 0.5]);
    }

    #[test]
    fn split_rejects_unreachable_coordinates() {
        let mut scratch = Scratch::new(2);
        let shape = [4, 4];
        assert!(scratch.split(&[-1.99, 4.99], &shape));
        for coords in [
            [-2.0, 0.0],
            [0.0, 5.0],
            [1e19, 0.0],
            [0.0, -1e19],
            [f64::NAN, 0.0],
            [0.0, f64::INFINITY],
            [f64::NEG_INFINITY, 0.0],
        ] {
            assert!(!scratch.split(&coords, &shape), "{coords:?}");
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_names() {
        let s = serde_json::to_string(&InterpolationMode::Cubic).unwrap();
        assert_eq!(s, "\"cubic\"");
        let m: InterpolationMode = serde_json::from_str("\"linear\"").unwrap();
        assert_eq!(m, InterpolationMode::Linear);
    }
}
