use ndaffine_tensor::Grid;

/// Reads grid values at integer lattice points, returning a constant
/// background value for any point outside the grid.
///
/// A point is outside as soon as a single component is negative or not
/// smaller than the size of its axis. There is no clamping or reflection.
///
/// # Example
///
/// ```
/// use ndaffine_imgproc::interpolation::ConstantBoundary;
/// use ndaffine_tensor::Grid;
///
/// let grid = Grid::from_shape_vec(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let sampler = ConstantBoundary::new(&grid, -1.0);
///
/// assert_eq!(sampler.fetch(&[1, 0]), 3.0);
/// assert_eq!(sampler.fetch(&[-1, 0]), -1.0);
/// assert_eq!(sampler.fetch(&[0, 2]), -1.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ConstantBoundary<'a, T> {
    grid: &'a Grid<T>,
    background: T,
}

impl<'a, T: Copy> ConstantBoundary<'a, T> {
    /// Create a sampler over `grid` that substitutes `background` outside it.
    pub fn new(grid: &'a Grid<T>, background: T) -> Self {
        Self { grid, background }
    }

    /// The grid values are read from.
    pub fn grid(&self) -> &'a Grid<T> {
        self.grid
    }

    /// The value returned for out-of-range points.
    pub fn background(&self) -> T {
        self.background
    }

    /// Fetch the value at `index`, one component per axis.
    #[inline]
    pub fn fetch(&self, index: &[isize]) -> T {
        let mut offset = 0;
        for ((&i, &size), &stride) in index
            .iter()
            .zip(self.grid.shape())
            .zip(self.grid.strides())
        {
            if i < 0 || i as usize >= size {
                return self.background;
            }
            offset += i as usize * stride;
        }
        self.grid.as_slice()[offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndaffine_tensor::GridError;

    #[test]
    fn fetch_inside_matches_grid() -> Result<(), GridError> {
        let grid = Grid::from_shape_fn(vec![3, 4, 2], |idx| {
            (idx[0] * 100 + idx[1] * 10 + idx[2]) as f64
        })?;
        let sampler = ConstantBoundary::new(&grid, f64::NAN);
        for i in 0..3isize {
            for j in 0..4isize {
                for k in 0..2isize {
                    let expected = (i * 100 + j * 10 + k) as f64;
                    assert_eq!(sampler.fetch(&[i, j, k]), expected);
                }
            }
        }
        Ok(())
    }

    #[test]
    fn any_axis_outside_gives_background() -> Result<(), GridError> {
        let grid = Grid::from_shape_val(vec![3, 3, 3], 1.0f32)?;
        let sampler = ConstantBoundary::new(&grid, 9.0);
        assert_eq!(sampler.fetch(&[1, 1, 1]), 1.0);
        assert_eq!(sampler.fetch(&[-1, 1, 1]), 9.0);
        assert_eq!(sampler.fetch(&[1, 3, 1]), 9.0);
        assert_eq!(sampler.fetch(&[1, 1, -7]), 9.0);
        assert_eq!(sampler.fetch(&[isize::MAX, 0, 0]), 9.0);
        assert_eq!(sampler.background(), 9.0);
        Ok(())
    }
}
