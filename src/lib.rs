//! # Epe metrics
//!
//! Coefficient-space divergence metrics for auditing how differently two
//! fitted polynomial models behave across a feature's domain.
//!
//! Given the coefficients of two polynomials `f` and `g` (increasing-degree
//! order), the crate computes:
//!
//! - ϝ (`phi`): the p-norm distance between the zero-padded coefficient vectors
//! - δϝ (`dphi`): the same distance between the derivative coefficient vectors
//! - ϝ* (`phi_star`): the fusion `alpha * phi + beta * dphi`
//!
//! ## Features
//!
//! - Typed, validated coefficient vectors with alignment and differentiation
//! - Any norm order `p > 0`, including the maximum norm
//! - Least squares polynomial fitting
//! - Probe datasets that sweep one feature while holding the others at their
//!   training reference values
//! - CSV import of reference data and CSV export of probes and prediction slices
//!
//! ## Example
//!
//! ```rust
//! use epes::{epe_metrics, EpeConfig};
//!
//! // f(x) = 1 + x, g(x) = 1 + 2x
//! let metrics = epe_metrics(&[1.0, 1.0], &[1.0, 2.0], &EpeConfig::default()).unwrap();
//! assert_eq!(metrics.as_tuple(), (1.0, 1.0, 1.0));
//! ```

mod coefficients;
mod config;
mod csv_utils;
mod error;
mod fit;
mod metrics;
mod plot;
mod probe;

pub use coefficients::{align, derivative, poly_deriv_coeffs, CoefficientVector};
pub use config::{EpeConfig, DEFAULT_ALPHA, DEFAULT_BETA};
pub use csv_utils::{
    read_column, read_csv_column, read_reference, read_reference_csv, write_probe, write_slice,
};
pub use error::{EpeError, Result};
pub use fit::fit_poly;
pub use metrics::{epe_metrics, EpeMetrics, NormOrder};
pub use plot::{slice_plot, SliceSeries, DEFAULT_LABELS};
pub use probe::{
    make_probe, ProbeColumn, ProbeDataset, ReferenceColumn, ReferenceDataset, ReferenceValue,
    DEFAULT_PROBE_POINTS,
};

/// Fits polynomials of the same degree to two models' predictions along `x`
/// and compares the fits.
///
/// # Arguments
///
/// * `x` - Probe positions of the audited feature
/// * `y_hat_a` - Predictions of the first model at `x`
/// * `y_hat_b` - Predictions of the second model at `x`
/// * `degree` - Degree of both fitted polynomials (must be >= 0)
/// * `config` - Fusion weights and norm order
///
/// # Returns
///
/// The metrics between the two fitted polynomials
///
/// # Example
///
/// ```rust
/// use epes::{compare_fits, EpeConfig};
///
/// let x = [0.0, 1.0, 2.0, 3.0];
/// let a: Vec<f64> = x.iter().map(|v| 1.0 + v).collect();
/// let b: Vec<f64> = x.iter().map(|v| 1.0 + 2.0 * v).collect();
/// let m = compare_fits(&x, &a, &b, 1, &EpeConfig::default()).unwrap();
/// assert!((m.phi - 1.0).abs() < 1e-9);
/// ```
pub fn compare_fits(
    x: &[f64],
    y_hat_a: &[f64],
    y_hat_b: &[f64],
    degree: isize,
    config: &EpeConfig,
) -> Result<EpeMetrics> {
    config.p.validate()?;
    let f = fit_poly(x, y_hat_a, degree)?;
    let g = fit_poly(x, y_hat_b, degree)?;
    EpeMetrics::compute(&f, &g, config)
}
