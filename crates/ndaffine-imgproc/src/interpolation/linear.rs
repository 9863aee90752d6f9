use ndaffine_tensor::GridDtype;
use num_traits::AsPrimitive;

use super::boundary::ConstantBoundary;
use super::cubic::CUBIC_TAPS;
use super::interpolate::Scratch;

/// Kernel for multilinear interpolation in any number of dimensions.
///
/// The value is the weighted sum over the corners of the unit hypercube
/// containing `coords`. Along axis `k` the lower (`floor`) and upper
/// (`floor + 1`) lattice points are weighted by `1 - w_k` and `w_k`, where
/// `w_k` is the fractional part.
///
/// An axis with `w_k == 0` contributes only its lower point, so a coordinate
/// on the lattice reads a single value however many axes there are, and
/// returns it exactly even when the background is not finite. A coordinate
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
pub(crate) fn multilinear_interpolation<T: GridDtype>(
    sampler: &ConstantBoundary<'_, T>,
    coords: &[f64],
    scratch: &mut Scratch,
) -> f64 {
    let ndim = coords.len();
    if !scratch.split(coords, sampler.grid().shape()) {
        return sampler.background().as_();
    }

    for k in 0..ndim {
        let w = scratch.frac[k];
        scratch.weights[k * CUBIC_TAPS] = 1.0 - w;
        scratch.weights[k * CUBIC_TAPS + 1] = w;
        scratch.lo[k] = 0;
        scratch.hi[k] = usize::from(w != 0.0);
    }

    scratch.accumulate(sampler, ndim, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndaffine_tensor::{Grid, GridError};

    #[test]
    fn lattice_points_are_exact() -> Result<(), GridError> {
        let grid = Grid::from_shape_fn(vec![3, 4], |idx| (idx[0] * 7 + idx[1] * 3) as f64 + 0.1)?;
        let sampler = ConstantBoundary::new(&grid, f64::NAN);
        let mut scratch = Scratch::new(2);
        for i in 0..3 {
            for j in 0..4 {
                let v = multilinear_interpolation(&sampler, &[i as f64, j as f64], &mut scratch);
                assert_eq!(v, grid.as_slice()[i * 4 + j]);
            }
        }
        Ok(())
    }

    #[test]
    fn bilinear_midpoint() -> Result<(), GridError> {
        let grid = Grid::from_shape_vec(vec![2, 2], vec![0.0, 1.0, 2.0, 3.0])?;
        let sampler = ConstantBoundary::new(&grid, 0.0);
        let mut scratch = Scratch::new(2);
        let v = multilinear_interpolation(&sampler, &[0.5, 0.5], &mut scratch);
        assert_relative_eq!(v, 1.5, epsilon = 1e-12);
        let v = multilinear_interpolation(&sampler, &[0.25, 1.0], &mut scratch);
        assert_relative_eq!(v, 1.5, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn linear_function_is_reproduced_in_5d() -> Result<(), GridError> {
        let shape = vec![3, 3, 2, 3, 2];
        let f = |x: &[f64]| 1.0 + x[0] - 2.0 * x[1] + 0.5 * x[2] + 3.0 * x[3] - x[4];
        let grid = Grid::from_shape_fn(shape, |idx| {
            let x: Vec<f64> = idx.iter().map(|&i| i as f64).collect();
            f(&x)
        })?;
        let sampler = ConstantBoundary::new(&grid, 0.0);
        let mut scratch = Scratch::new(5);
        let x = [0.3, 1.9, 0.5, 1.25, 0.75];
        let v = multilinear_interpolation(&sampler, &x, &mut scratch);
        assert_relative_eq!(v, f(&x), epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn blends_with_background_outside() -> Result<(), GridError> {
        let grid = Grid::from_shape_val(vec![4], 2.0f32)?;
        let sampler = ConstantBoundary::new(&grid, 15.0);
        let mut scratch = Scratch::new(1);
        let v = multilinear_interpolation(&sampler, &[-2.0 / 3.0], &mut scratch);
        assert_relative_eq!(v, 2.0 / 3.0 * 15.0 + 1.0 / 3.0 * 2.0, epsilon = 1e-6);
        let v = multilinear_interpolation(&sampler, &[10.0], &mut scratch);
        assert_eq!(v, 15.0);
        Ok(())
    }

    #[test]
    fn single_cell_axis_uses_background_off_lattice() -> Result<(), GridError> {
        let grid = Grid::from_shape_val(vec![1], 4.0f64)?;
        let sampler = ConstantBoundary::new(&grid, 0.0);
        let mut scratch = Scratch::new(1);
        assert_eq!(multilinear_interpolation(&sampler, &[0.0], &mut scratch), 4.0);
        let v = multilinear_interpolation(&sampler, &[0.25], &mut scratch);
        assert_relative_eq!(v, 3.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn far_coordinates_read_background() -> Result<(), GridError> {
        let grid = Grid::from_shape_val(vec![4, 4], 1.0f64)?;
        let sampler = ConstantBoundary::new(&grid, 5.0);
        let mut scratch = Scratch::new(2);
        for coords in [[1e19, 1.0], [1.0, -1e19], [-1e300, 1e300], [f64::NAN, 0.5]] {
            let v = multilinear_interpolation(&sampler, &coords, &mut scratch);
            assert_eq!(v, 5.0, "{coords:?}");
        }
        // just inside reach the corner still blends
        let v = multilinear_interpolation(&sampler, &[-0.5, 1.0], &mut scratch);
        assert_relative_eq!(v, 3.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn lattice_point_with_many_axes() -> Result<(), GridError> {
        let grid = Grid::from_shape_val(vec![1; 80], 2.5f64)?;
        let sampler = ConstantBoundary::new(&grid, f64::NAN);
        let mut scratch = Scratch::new(80);
        let v = multilinear_interpolation(&sampler, &[0.0; 80], &mut scratch);
        assert_eq!(v, 2.5);
        Ok(())
    }
}
