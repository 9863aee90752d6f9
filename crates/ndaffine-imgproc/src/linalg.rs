use faer::prelude::SpSolver;

use crate::error::WarpError;

// residual bound on |A * A^-1 - I| per row
const INVERSE_RESIDUAL_TOL: f64 = 1e-6;

/// Inverts a square matrix given as rows.
///
/// # Arguments
///
/// * `m` - The matrix rows, each of length `m.len()`.
///
/// # Returns
///
/// The inverse in row-major order, `n * n` entries.
///
/// # Errors
///
/// * [`WarpError::ShapeMismatch`] if the matrix is empty or not square.
/// * [`WarpError::SingularTransform`] if the LU factorisation hits a zero
///   pivot or the computed inverse does not reproduce the identity.
///
/// # Example
///
/// ```
/// use ndaffine_imgproc::linalg::invert;
///
/// let inv = invert(&[vec![2.0, 0.0], vec![0.0, 4.0]]).unwrap();
/// assert_eq!(inv, vec![0.5, 0.0, 0.0, 0.25]);
/// ```
pub fn invert(m: &[Vec<f64>]) -> Result<Vec<f64>, WarpError> {
    let n = m.len();
    if n == 0 || m.iter().any(|row| row.len() != n) {
        let shape: Vec<usize> = m.iter().map(|row| row.len()).collect();
        return Err(WarpError::shape_mismatch(
            "linear transformation rows",
            vec![n; n.max(1)],
            shape,
        ));
    }
    if m.iter().flatten().any(|v| !v.is_finite()) {
        return Err(WarpError::SingularTransform);
    }

    let mat = faer::Mat::<f64>::from_fn(n, n, |i, j| m[i][j]);
    let inv = mat.partial_piv_lu().solve(faer::Mat::<f64>::identity(n, n));

    let mut out = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            let v = inv.read(i, j);
            if !v.is_finite() {
                return Err(WarpError::SingularTransform);
            }
            out[i * n + j] = v;
        }
    }

    // a zero pivot that rounding turned into a tiny one still fails here
    for i in 0..n {
        for j in 0..n {
            let mut acc = 0.0;
            for k in 0..n {
                acc += m[i][k] * out[k * n + j];
            }
            let expected = if i == j { 1.0 } else { 0.0 };
            if (acc - expected).abs() > INVERSE_RESIDUAL_TOL * n as f64 {
                return Err(WarpError::SingularTransform);
            }
        }
    }

    Ok(out)
}

/// Row-major matrix-vector product `out = m * v` for an `n x n` matrix.
#[inline]
pub(crate) fn mat_vec(m: &[f64], v: &[f64], out: &mut [f64]) {
    let n = v.len();
    for (i, o) in out.iter_mut().enumerate() {
        let row = &m[i * n..(i + 1) * n];
        *o = row.iter().zip(v).map(|(a, b)| a * b).sum();
    }
}
