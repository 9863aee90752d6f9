use crate::error::WarpError;
use crate::linalg::{invert, mat_vec};

/// The parameters of a forward affine transform in n dimensions.
///
/// A point `x` of the input grid is sent to
/// `linear * (x - origin) + origin + translation`, and output index `idx`
/// addresses the point `idx + output_offset` of that transformed space.
///
/// `origin` defaults to the center of the input grid, `(shape - 1) / 2`, and
/// `output_offset` defaults to zero.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AffineParams {
    /// The `d x d` linear part, given as rows.
    pub linear: Vec<Vec<f64>>,
    /// The translation applied after the linear part.
    pub translation: Vec<f64>,
    /// The point the linear part is applied around.
    #[cfg_attr(feature = "serde", serde(default))]
    pub origin: Option<Vec<f64>>,
    /// Position of output index zero in the transformed space.
    #[cfg_attr(feature = "serde", serde(default))]
    pub output_offset: Option<Vec<f64>>,
}

impl AffineParams {
    /// Create parameters from a linear part and a translation, with the default
    /// origin and output offset.
    pub fn new(linear: Vec<Vec<f64>>, translation: Vec<f64>) -> Self {
        Self {
            linear,
            translation,
            origin: None,
            output_offset: None,
        }
    }

    /// The identity transform in `ndim` dimensions.
    pub fn identity(ndim: usize) -> Self {
        Self::new(identity_rows(ndim), vec![0.0; ndim])
    }

    /// A pure translation.
    pub fn from_translation(translation: Vec<f64>) -> Self {
        Self::new(identity_rows(translation.len()), translation)
    }

    /// Set the point the linear part is applied around.
    pub fn with_origin(mut self, origin: Vec<f64>) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Set the position of output index zero in the transformed space.
    pub fn with_output_offset(mut self, output_offset: Vec<f64>) -> Self {
        self.output_offset = Some(output_offset);
        self
    }

    /// The number of rows of the linear part.
    pub fn ndim(&self) -> usize {
        self.linear.len()
    }
}

fn identity_rows(ndim: usize) -> Vec<Vec<f64>> {
    (0..ndim)
        .map(|i| (0..ndim).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect()
}

/// Maps output indices back to fractional input coordinates.
///
/// Holds the inverse linear part `M` (row-major) and the combined offset `c`,
/// so that output index `idx` reads the input at `M * idx + c`.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineTransform {
    inv_linear: Vec<f64>,
    offset: Vec<f64>,
}

impl AffineTransform {
    /// Build the output-to-input mapping from forward parameters.
    ///
    /// # Arguments
    ///
    /// * `params` - The forward transform.
    /// * `input_shape` - The shape of the grid being resampled.
    ///
    /// # Errors
    ///
    /// * [`WarpError::ShapeMismatch`] if the linear part is not `d x d` or a
    ///   vector does not have `d` components, where `d = input_shape.len()`.
    /// * [`WarpError::SingularTransform`] if the linear part has no inverse.
    ///
    /// # Example
    ///
    /// ```
    /// use ndaffine_imgproc::warp::{AffineParams, AffineTransform};
    ///
    /// let params = AffineParams::from_translation(vec![2.0, -1.0]);
    /// let transform = AffineTransform::from_params(&params, &[6, 6]).unwrap();
    ///
    /// let mut coords = [0.0; 2];
    /// transform.map_index(&[3, 3], &mut coords);
    /// assert_eq!(coords, [1.0, 4.0]);
    /// ```
    pub fn from_params(params: &AffineParams, input_shape: &[usize]) -> Result<Self, WarpError> {
        let ndim = input_shape.len();

        let cols: Vec<usize> = params.linear.iter().map(|row| row.len()).collect();
        if params.linear.len() != ndim || cols.iter().any(|&c| c != ndim) {
            return Err(WarpError::shape_mismatch(
                "linear transformation",
                [ndim, ndim],
                cols,
            ));
        }
        check_len("translation", &params.translation, ndim)?;

        let origin = match &params.origin {
            Some(origin) => {
                check_len("origin", origin, ndim)?;
                origin.clone()
            }
            None => input_shape
                .iter()
                .map(|&n| (n as f64 - 1.0) / 2.0)
                .collect(),
        };
        let output_offset = match &params.output_offset {
            Some(u) => {
                check_len("output offset", u, ndim)?;
                u.clone()
            }
            None => vec![0.0; ndim],
        };

        let inv_linear = invert(&params.linear)?;

        // c = M (u - t - o) + o
        let shifted: Vec<f64> = (0..ndim)
            .map(|k| output_offset[k] - params.translation[k] - origin[k])
            .collect();
        let mut offset = vec![0.0; ndim];
        mat_vec(&inv_linear, &shifted, &mut offset);
        offset.iter_mut().zip(&origin).for_each(|(c, &o)| *c += o);

        log::debug!("inverse linear part {inv_linear:?}, offset {offset:?}");

        Ok(Self { inv_linear, offset })
    }

    /// Build the mapping directly from an inverse linear part and offset.
    ///
    /// # Errors
    ///
    /// [`WarpError::ShapeMismatch`] if `offset` is empty or `inv_linear` does
    /// not hold `offset.len()^2` entries.
    pub fn from_inverse(inv_linear: Vec<f64>, offset: Vec<f64>) -> Result<Self, WarpError> {
        let ndim = offset.len();
        if ndim == 0 || inv_linear.len() != ndim * ndim {
            return Err(WarpError::shape_mismatch(
                "inverse linear transformation",
                ndim * ndim,
                inv_linear.len(),
            ));
        }
        Ok(Self { inv_linear, offset })
    }

    /// The number of axes the mapping works on.
    pub fn ndim(&self) -> usize {
        self.offset.len()
    }

    /// The inverse linear part, row-major.
    pub fn inverse_linear(&self) -> &[f64] {
        &self.inv_linear
    }

    /// The combined offset added after the inverse linear part.
    pub fn offset(&self) -> &[f64] {
        &self.offset
    }

    /// Write the input coordinate read by output index `idx` into `out`.
    #[inline]
    pub fn map_index(&self, idx: &[usize], out: &mut [f64]) {
        let ndim = self.offset.len();
        for (i, (o, &c)) in out.iter_mut().zip(&self.offset).enumerate() {
            let row = &self.inv_linear[i * ndim..(i + 1) * ndim];
            *o = row
                .iter()
                .zip(idx)
                .fold(c, |acc, (&m, &j)| acc + m * j as f64);
        }
    }
}

fn check_len(what: &'static str, v: &[f64], ndim: usize) -> Result<(), WarpError> {
    if v.len() != ndim {
        return Err(WarpError::shape_mismatch(what, [ndim], [v.len()]));
    }
    Ok(())
}

/// Returns the matrix of a rotation by `angle` radians in the plane spanned by
/// `v1` and `v2`.
///
/// The plane basis is orthonormalised with Gram-Schmidt, and the rotation
/// turns the first basis vector towards the second. Directions orthogonal to
/// the plane are left unchanged. In two dimensions with the unit axes as
/// `v1` and `v2` this is the usual `[[cos, -sin], [sin, cos]]`.
///
/// # Arguments
///
/// * `angle` - The rotation angle in radians.
/// * `v1` - First vector spanning the plane.
/// * `v2` - Second vector spanning the plane.
///
/// # Errors
///
/// * [`WarpError::ShapeMismatch`] if the vectors differ in length or have
///   fewer than two components.
/// * [`WarpError::DegeneratePlane`] if the vectors are zero or parallel.
///
/// # Example
///
/// ```
/// use ndaffine_imgproc::warp::rotation_from_angle_and_plane;
///
/// let r = rotation_from_angle_and_plane(std::f64::consts::FRAC_PI_2, &[1.0, 0.0], &[0.0, 1.0]).unwrap();
/// assert!((r[0][1] + 1.0).abs() < 1e-12);
/// assert!((r[1][0] - 1.0).abs() < 1e-12);
/// ```
pub fn rotation_from_angle_and_plane(
    angle: f64,
    v1: &[f64],
    v2: &[f64],
) -> Result<Vec<Vec<f64>>, WarpError> {
    let ndim = v1.len();
    if v2.len() != ndim {
        return Err(WarpError::shape_mismatch("rotation plane vector", [ndim], [v2.len()]));
    }
    if ndim < 2 {
        return Err(WarpError::shape_mismatch("rotation plane vector", "[>= 2]", [ndim]));
    }

    let dot = |a: &[f64], b: &[f64]| a.iter().zip(b).map(|(x, y)| x * y).sum::<f64>();

    let n1 = dot(v1, v1).sqrt();
    let n2 = dot(v2, v2).sqrt();
    if !(n1 > f64::EPSILON && n2 > f64::EPSILON) {
        return Err(WarpError::DegeneratePlane);
    }
    let e1: Vec<f64> = v1.iter().map(|x| x / n1).collect();

    let proj = dot(v2, &e1);
    let w: Vec<f64> = v2.iter().zip(&e1).map(|(x, e)| x - proj * e).collect();
    let nw = dot(&w, &w).sqrt();
    if nw <= 1e-12 * n2 {
        return Err(WarpError::DegeneratePlane);
    }
    let e2: Vec<f64> = w.iter().map(|x| x / nw).collect();

    // R = I + (cos - 1)(e1 e1^T + e2 e2^T) + sin (e2 e1^T - e1 e2^T)
    let (sin, cos) = angle.sin_cos();
    let rows = (0..ndim)
        .map(|i| {
            (0..ndim)
                .map(|j| {
                    let id = if i == j { 1.0 } else { 0.0 };
                    id + (cos - 1.0) * (e1[i] * e1[j] + e2[i] * e2[j])
                        + sin * (e2[i] * e1[j] - e1[i] * e2[j])
                })
                .collect()
        })
        .collect();

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn identity_maps_to_itself() -> Result<(), WarpError> {
        let transform = AffineTransform::from_params(&AffineParams::identity(3), &[4, 5, 6])?;
        assert_eq!(transform.offset(), &[0.0, 0.0, 0.0]);
        let mut coords = [0.0; 3];
        transform.map_index(&[3, 1, 5], &mut coords);
        assert_eq!(coords, [3.0, 1.0, 5.0]);
        Ok(())
    }

    #[test]
    fn scaling_about_center() -> Result<(), WarpError> {
        // doubling about the center 2.0 of a size-5 axis
        let params = AffineParams::new(vec![vec![2.0]], vec![0.0]);
        let transform = AffineTransform::from_params(&params, &[5])?;
        assert_eq!(transform.inverse_linear(), &[0.5]);
        let mut coords = [0.0];
        transform.map_index(&[4], &mut coords);
        assert_relative_eq!(coords[0], 3.0, epsilon = 1e-12);
        transform.map_index(&[2], &mut coords);
        assert_relative_eq!(coords[0], 2.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn output_offset_and_origin() -> Result<(), WarpError> {
        let params = AffineParams::from_translation(vec![1.0, 0.0])
            .with_origin(vec![0.0, 0.0])
            .with_output_offset(vec![0.0, 2.0]);
        let transform = AffineTransform::from_params(&params, &[3, 3])?;
        let mut coords = [0.0; 2];
        transform.map_index(&[1, 0], &mut coords);
        assert_eq!(coords, [0.0, 2.0]);
        Ok(())
    }

    #[test]
    fn rejects_bad_lengths() {
        let params = AffineParams::new(vec![vec![1.0, 0.0], vec![0.0]], vec![0.0, 0.0]);
        assert!(matches!(
            AffineTransform::from_params(&params, &[3, 3]),
            Err(WarpError::ShapeMismatch { what: "linear transformation", .. })
        ));

        let params = AffineParams::new(identity_rows(2), vec![0.0]);
        assert!(matches!(
            AffineTransform::from_params(&params, &[3, 3]),
            Err(WarpError::ShapeMismatch { what: "translation", .. })
        ));

        let params = AffineParams::identity(2).with_origin(vec![1.0; 3]);
        assert!(matches!(
            AffineTransform::from_params(&params, &[3, 3]),
            Err(WarpError::ShapeMismatch { what: "origin", .. })
        ));

        let params = AffineParams::identity(3);
        assert!(matches!(
            AffineTransform::from_params(&params, &[3, 3]),
            Err(WarpError::ShapeMismatch { .. })
        ));

        assert!(AffineTransform::from_inverse(vec![1.0; 3], vec![0.0; 2]).is_err());
    }

    #[test]
    fn rejects_singular() {
        let params = AffineParams::new(vec![vec![1.0, 2.0], vec![2.0, 4.0]], vec![0.0, 0.0]);
        assert_eq!(
            AffineTransform::from_params(&params, &[3, 3]),
            Err(WarpError::SingularTransform)
        );
    }

    #[test]
    fn rotation_in_2d() -> Result<(), WarpError> {
        let angle = 0.3;
        let r = rotation_from_angle_and_plane(angle, &[2.0, 0.0], &[1.0, 5.0])?;
        assert_relative_eq!(r[0][0], angle.cos(), epsilon = 1e-12);
        assert_relative_eq!(r[0][1], -angle.sin(), epsilon = 1e-12);
        assert_relative_eq!(r[1][0], angle.sin(), epsilon = 1e-12);
        assert_relative_eq!(r[1][1], angle.cos(), epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn rotation_is_orthogonal_and_fixes_complement() -> Result<(), WarpError> {
        let r = rotation_from_angle_and_plane(1.1, &[1.0, 1.0, 0.0, 0.0], &[0.0, 1.0, 0.0, 2.0])?;
        for i in 0..4 {
            for j in 0..4 {
                let dot: f64 = (0..4).map(|k| r[k][i] * r[k][j]).sum();
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(dot, expected, epsilon = 1e-12);
            }
        }
        // axis 2 is orthogonal to both plane vectors
        for (i, row) in r.iter().enumerate() {
            let expected = if i == 2 { 1.0 } else { 0.0 };
            assert_relative_eq!(row[2], expected, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn half_turn_negates_plane() -> Result<(), WarpError> {
        let r = rotation_from_angle_and_plane(PI, &[0.0, 1.0, 0.0], &[0.0, 0.0, 1.0])?;
        assert_relative_eq!(r[0][0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(r[1][1], -1.0, epsilon = 1e-12);
        assert_relative_eq!(r[2][2], -1.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn rotation_rejects_degenerate_planes() {
        assert_eq!(
            rotation_from_angle_and_plane(FRAC_PI_2, &[1.0, 2.0], &[2.0, 4.0]),
            Err(WarpError::DegeneratePlane)
        );
        assert_eq!(
            rotation_from_angle_and_plane(FRAC_PI_2, &[0.0, 0.0], &[0.0, 1.0]),
            Err(WarpError::DegeneratePlane)
        );
        assert!(matches!(
            rotation_from_angle_and_plane(FRAC_PI_2, &[1.0, 0.0], &[0.0, 1.0, 0.0]),
            Err(WarpError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            rotation_from_angle_and_plane(FRAC_PI_2, &[1.0], &[1.0]),
            Err(WarpError::ShapeMismatch { .. })
        ));
    }
}
