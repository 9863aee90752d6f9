use thiserror::Error;

/// Error type for grid construction and indexing.
#[derive(Error, Debug, PartialEq)]
pub enum GridError {
    /// Grid shape does not match the provided data.
    ///
    /// The product of the shape must equal the number of elements exactly.
    #[error("Shape mismatch: expected {expected} elements for shape, but got {actual} elements in data")]
    InvalidShape {
        /// Expected number of elements based on shape
        expected: usize,
        /// Actual number of elements in the data
        actual: usize,
    },

    /// A grid needs at least one axis.
    #[error("Grid shape must have at least one axis")]
    EmptyShape,

    /// Index exceeds grid bounds.
    #[error("Index {index} out of bounds for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index that was attempted
        index: usize,
        /// The size of the dimension being indexed
        size: usize,
    },

    /// Number of index components does not match the number of axes.
    #[error("Dimension mismatch: {message}. Expected: {expected}, got: {actual}")]
    DimensionMismatch {
        /// Human-readable description of the mismatch
        message: String,
        /// Expected shape description
        expected: String,
        /// Actual shape description
        actual: String,
    },
}

impl GridError {
    /// Creates an InvalidShape error.
    pub fn invalid_shape(expected: usize, actual: usize) -> Self {
        Self::InvalidShape { expected, actual }
    }

    /// Creates an IndexOutOfBounds error.
    pub fn index_out_of_bounds(index: usize, size: usize) -> Self {
        Self::IndexOutOfBounds { index, size }
    }

    /// Creates a DimensionMismatch error with formatted shapes.
    pub fn dimension_mismatch(
        message: impl Into<String>,
        expected: &[usize],
        actual: &[usize],
    ) -> Self {
        Self::DimensionMismatch {
            message: message.into(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }
}

/// Computes the strides for a row-major (C-contiguous) layout.
///
/// The rightmost axis has stride 1, and each axis' stride is the product of
/// all axis sizes to its right.
///
/// # Examples
///
/// ```rust
/// use ndaffine_tensor::get_strides_from_shape;
///
/// assert_eq!(get_strides_from_shape(&[2, 3]), vec![3, 1]);
/// assert_eq!(get_strides_from_shape(&[2, 3, 4]), vec![12, 4, 1]);
/// ```
pub fn get_strides_from_shape(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![0; shape.len()];
    let mut stride = 1;
    for i in (0..shape.len()).rev() {
        strides[i] = stride;
        stride *= shape[i];
    }
    strides
}

/// Decomposes a linear row-major offset into a multi-index over `shape`.
///
/// This is mixed-radix arithmetic with the axis sizes as digits' bases; the
/// last axis varies fastest. `index` must have the same length as `shape`.
///
/// ```rust
/// use ndaffine_tensor::unravel_index;
///
/// let mut index = [0; 3];
/// unravel_index(17, &[2, 3, 4], &mut index);
/// assert_eq!(index, [1, 1, 1]);
/// ```
#[inline]
pub fn unravel_index(offset: usize, shape: &[usize], index: &mut [usize]) {
    let mut rem = offset;
    for k in (0..shape.len()).rev() {
        let n = shape[k];
        if n == 0 {
            index[k] = 0;
            continue;
        }
        index[k] = rem % n;
        rem /= n;
    }
}

/// A dense n-dimensional array with owned, row-major data.
///
/// Unlike fixed-rank array types, the number of axes of a `Grid` is a runtime
/// property: the shape is stored as a vector, which lets the same resampling
/// code handle any dimensionality.
///
/// # Examples
///
/// ```rust
/// use ndaffine_tensor::Grid;
///
/// let grid = Grid::from_shape_fn(vec![2, 2], |idx| (idx[0] * 2 + idx[1]) as f32).unwrap();
/// assert_eq!(grid.as_slice(), &[0.0, 1.0, 2.0, 3.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    data: Vec<T>,
    shape: Vec<usize>,
    strides: Vec<usize>,
}

impl<T> Grid<T> {
    fn check_shape(shape: &[usize], len: usize) -> Result<(), GridError> {
        if shape.is_empty() {
            return Err(GridError::EmptyShape);
        }
        let numel = shape.iter().product::<usize>();
        if numel != len {
            return Err(GridError::invalid_shape(numel, len));
        }
        Ok(())
    }

    /// Creates a new `Grid` with the given shape and data.
    ///
    /// # Errors
    ///
    /// If the shape is empty or the number of elements does not match the
    /// shape, an error is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use ndaffine_tensor::Grid;
    ///
    /// let g = Grid::from_shape_vec(vec![2, 2], vec![1u8, 2, 3, 4]).unwrap();
    /// assert_eq!(g.shape(), &[2, 2]);
    /// ```
    pub fn from_shape_vec(shape: Vec<usize>, data: Vec<T>) -> Result<Self, GridError> {
        Self::check_shape(&shape, data.len())?;
        let strides = get_strides_from_shape(&shape);
        Ok(Self {
            data,
            shape,
            strides,
        })
    }

    /// Creates a new `Grid` with the given shape filled with `value`.
    ///
    /// # Example
    ///
    /// ```
    /// use ndaffine_tensor::Grid;
    ///
    /// let g = Grid::from_shape_val(vec![2, 1, 3], 2u8).unwrap();
    /// assert_eq!(g.as_slice(), &[2, 2, 2, 2, 2, 2]);
    /// ```
    pub fn from_shape_val(shape: Vec<usize>, value: T) -> Result<Self, GridError>
    where
        T: Clone,
    {
        if shape.is_empty() {
            return Err(GridError::EmptyShape);
        }
        let numel = shape.iter().product::<usize>();
        Self::from_shape_vec(shape, vec![value; numel])
    }

    /// Creates a new `Grid` with the given shape, generating every element
    /// from its multi-index.
    pub fn from_shape_fn<F>(shape: Vec<usize>, f: F) -> Result<Self, GridError>
    where
        F: Fn(&[usize]) -> T,
    {
        if shape.is_empty() {
            return Err(GridError::EmptyShape);
        }
        let numel = shape.iter().product::<usize>();
        let mut index = vec![0; shape.len()];
        let data = (0..numel)
            .map(|i| {
                unravel_index(i, &shape, &mut index);
                f(&index)
            })
            .collect();
        Self::from_shape_vec(shape, data)
    }

    /// Creates a new `Grid` of zeros.
    pub fn zeros(shape: Vec<usize>) -> Result<Self, GridError>
    where
        T: num_traits::Zero + Clone,
    {
        Self::from_shape_val(shape, T::zero())
    }

    /// The size of every axis.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The row-major strides, in elements.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Number of axes.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Returns the number of elements in the grid.
    #[inline]
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Get the data of the grid as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the data of the grid as a mutable slice.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Returns an iterator over the elements in row-major order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Get the offset of the element at the given index.
    ///
    /// Returns `None` when the index has the wrong number of components or any
    /// component is out of range.
    pub fn get_iter_offset(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.ndim() {
            return None;
        }
        let mut offset = 0;
        for ((&idx, &dim_size), &stride) in index.iter().zip(&self.shape).zip(&self.strides) {
            if idx >= dim_size {
                return None;
            }
            offset += idx * stride;
        }
        Some(offset)
    }

    /// Get the multi-index of the element at the given offset. The reverse of
    /// [`Self::get_iter_offset`].
    ///
    /// # Errors
    ///
    /// If the offset is out of bounds (>= numel), an error is returned.
    pub fn get_index(&self, offset: usize) -> Result<Vec<usize>, GridError> {
        let numel = self.numel();
        if offset >= numel {
            return Err(GridError::index_out_of_bounds(offset, numel));
        }
        let mut index = vec![0; self.ndim()];
        unravel_index(offset, &self.shape, &mut index);
        Ok(index)
    }

    /// Get the element at the given index, checking bounds.
    ///
    /// ```
    /// use ndaffine_tensor::Grid;
    ///
    /// let g = Grid::from_shape_vec(vec![2, 2], vec![1u8, 2, 3, 4]).unwrap();
    /// assert_eq!(g.get(&[1, 0]), Some(&3));
    /// assert!(g.get(&[2, 0]).is_none());
    /// ```
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        self.get_iter_offset(index).map(|i| &self.data[i])
    }

    /// Apply a function to every element, producing a grid of the same shape.
    pub fn map<U, F>(&self, f: F) -> Grid<U>
    where
        F: Fn(&T) -> U,
    {
        Grid {
            data: self.data.iter().map(f).collect(),
            shape: self.shape.clone(),
            strides: self.strides.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_checks_numel() {
        let res = Grid::from_shape_vec(vec![2, 3], vec![0u8; 5]);
        assert_eq!(res, Err(GridError::invalid_shape(6, 5)));
    }

    #[test]
    fn constructor_rejects_empty_shape() {
        assert_eq!(
            Grid::<f32>::from_shape_vec(vec![], vec![]),
            Err(GridError::EmptyShape)
        );
        assert_eq!(Grid::<f32>::zeros(vec![]), Err(GridError::EmptyShape));
    }

    #[test]
    fn strides_are_row_major() {
        let g = Grid::<f64>::zeros(vec![4, 3, 2, 5]).unwrap();
        assert_eq!(g.strides(), &[30, 10, 5, 1]);
        assert_eq!(g.numel(), 120);
        assert_eq!(g.ndim(), 4);
    }

    #[test]
    fn offset_and_index_are_inverse() -> Result<(), GridError> {
        let shape = vec![3, 1, 4, 2];
        let g = Grid::from_shape_fn(shape.clone(), |idx| idx.to_vec())?;
        for offset in 0..g.numel() {
            let idx = g.get_index(offset)?;
            assert_eq!(g.get_iter_offset(&idx), Some(offset));
            assert_eq!(g.as_slice()[offset], idx);
        }
        assert!(g.get_index(g.numel()).is_err());
        Ok(())
    }

    #[test]
    fn get_checks_rank_and_bounds() -> Result<(), GridError> {
        let g = Grid::from_shape_vec(vec![2, 3], (0..6).collect::<Vec<i32>>())?;
        assert_eq!(g.get(&[1, 2]), Some(&5));
        assert_eq!(g.get(&[1]), None);
        assert_eq!(g.get(&[0, 3]), None);
        Ok(())
    }

    #[test]
    fn map_keeps_shape() -> Result<(), GridError> {
        let g = Grid::from_shape_vec(vec![1, 3], vec![1u8, 2, 3])?;
        let f = g.map(|&v| v as f64 * 0.5);
        assert_eq!(f.shape(), g.shape());
        assert_eq!(f.as_slice(), &[0.5, 1.0, 1.5]);
        Ok(())
    }

    #[test]
    fn zero_sized_axis_is_allowed() -> Result<(), GridError> {
        let g = Grid::<f32>::zeros(vec![0, 4])?;
        assert_eq!(g.numel(), 0);
        assert!(g.get(&[0, 0]).is_none());
        Ok(())
    }
}
