use nalgebra::{DMatrix, DVector};
use tracing::{debug, warn};

use crate::coefficients::CoefficientVector;
use crate::error::{EpeError, Result};

/// Fits a polynomial of degree `degree` to the points `(x, y)` by least squares.
///
/// The fit solves the Vandermonde system `V c = y` through an SVD, so
/// under-determined or rank-deficient systems return the minimum-norm solution
/// instead of failing.
///
/// # Arguments
///
/// * `x` - Sample positions
/// * `y` - Sample values, same length as `x`
/// * `degree` - Polynomial degree (must be >= 0)
///
/// # Returns
///
/// `degree + 1` coefficients in increasing-degree order
///
/// # Errors
///
/// `InvalidInput` if `x` and `y` differ in length, `degree` is negative or a
/// sample is not finite.
pub fn fit_poly(x: &[f64], y: &[f64], degree: isize) -> Result<CoefficientVector> {
    if x.len() != y.len() {
        return Err(EpeError::invalid(format!(
            "x and y must have the same length (got {} and {})",
            x.len(),
            y.len()
        )));
    }
    if degree < 0 {
        return Err(EpeError::invalid(format!("degree must be >= 0, got {}", degree)));
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(EpeError::invalid("x and y must contain only finite values"));
    }

    let num_coeffs = degree as usize + 1;
    let num_points = x.len();
    if num_points == 0 {
        return CoefficientVector::new(vec![0.0; num_coeffs]);
    }

    // Row i is [1, x_i, x_i^2, ..., x_i^degree]
    let mut vandermonde = DMatrix::<f64>::zeros(num_points, num_coeffs);
    for (i, &xi) in x.iter().enumerate() {
        for j in 0..num_coeffs {
            vandermonde[(i, j)] = xi.powi(j as i32);
        }
    }
    let rhs = DVector::<f64>::from_column_slice(y);

    let svd = vandermonde.svd(true, true);
    let cutoff = f64::EPSILON * num_points.max(num_coeffs) as f64 * svd.singular_values.max();
    let rank = svd.rank(cutoff);
    if rank < num_coeffs {
        warn!(rank, num_coeffs, num_points, "polynomial fit is rank deficient");
    }

    let solution = svd
        .solve(&rhs, cutoff)
        .map_err(|msg| EpeError::invalid(format!("least squares solve failed: {}", msg)))?;

    debug!(num_points, degree, rank, "fitted polynomial");
    CoefficientVector::new(solution.iter().copied().collect())
}
