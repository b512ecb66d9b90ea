use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coefficients::{align, derivative_values, CoefficientVector};
use crate::config::EpeConfig;
use crate::error::{EpeError, Result};

/// Order `p` of the vector norm used for both divergences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNormOrder", into = "RawNormOrder")]
pub enum NormOrder {
    /// `(Σ|x_i|^p)^(1/p)` for a finite `p > 0`
    Finite(f64),
    /// Maximum absolute element
    Infinity,
}

impl NormOrder {
    /// Euclidean norm
    pub const EUCLIDEAN: NormOrder = NormOrder::Finite(2.0);

    /// Validates a norm order. Positive infinity maps to `Infinity`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for `p <= 0`, NaN or negative infinity.
    pub fn new(p: f64) -> Result<Self> {
        if p.is_nan() || p <= 0.0 {
            return Err(EpeError::invalid(format!("norm order p must be > 0, got {}", p)));
        }
        if p.is_infinite() {
            Ok(NormOrder::Infinity)
        } else {
            Ok(NormOrder::Finite(p))
        }
    }

    /// Rejects a `Finite` order built directly with a non-positive `p`.
    pub fn validate(&self) -> Result<()> {
        match *self {
            NormOrder::Finite(p) => NormOrder::new(p).map(|_| ()),
            NormOrder::Infinity => Ok(()),
        }
    }

    /// The p-norm of `values`; the empty vector has norm 0.
    ///
    /// Finite orders other than 1 are computed as `m * ||x / m||_p` with `m`
    /// the largest absolute element, so `|x_i|^p` neither overflows for large
    /// elements nor underflows to 0 for a large `p`.
    pub fn norm(&self, values: &[f64]) -> f64 {
        let max = values.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
        match *self {
            NormOrder::Infinity => max,
            NormOrder::Finite(p) if p == 1.0 => values.iter().map(|x| x.abs()).sum(),
            _ if max == 0.0 || max.is_infinite() => max,
            NormOrder::Finite(p) if p == 2.0 => {
                max * values
                    .iter()
                    .map(|x| (x / max) * (x / max))
                    .sum::<f64>()
                    .sqrt()
            }
            NormOrder::Finite(p) => {
                max * values
                    .iter()
                    .map(|x| (x.abs() / max).powf(p))
                    .sum::<f64>()
                    .powf(1.0 / p)
            }
        }
    }
}

impl Default for NormOrder {
    fn default() -> Self {
        NormOrder::EUCLIDEAN
    }
}

impl fmt::Display for NormOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormOrder::Finite(p) => write!(f, "{}", p),
            NormOrder::Infinity => write!(f, "inf"),
        }
    }
}

/// Accepts a number or `inf` / `infinity` (any case).
impl FromStr for NormOrder {
    type Err = EpeError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "inf" | "+inf" | "infinity" | "+infinity" => Ok(NormOrder::Infinity),
            _ => {
                let p = s
                    .parse::<f64>()
                    .map_err(|_| EpeError::invalid(format!("'{}' is not a norm order", s)))?;
                NormOrder::new(p)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawNormOrder {
    Number(f64),
    Text(String),
}

impl TryFrom<RawNormOrder> for NormOrder {
    type Error = EpeError;

    fn try_from(raw: RawNormOrder) -> Result<Self> {
        match raw {
            RawNormOrder::Number(p) => NormOrder::new(p),
            RawNormOrder::Text(s) => s.parse(),
        }
    }
}

impl From<NormOrder> for RawNormOrder {
    fn from(order: NormOrder) -> Self {
        match order {
            NormOrder::Finite(p) => RawNormOrder::Number(p),
            NormOrder::Infinity => RawNormOrder::Text("inf".to_string()),
        }
    }
}

/// Static divergence, derivative divergence and their weighted fusion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpeMetrics {
    /// ϝ: p-norm distance between the aligned coefficient vectors
    pub phi: f64,
    /// δϝ: p-norm distance between the aligned derivative coefficient vectors
    pub dphi: f64,
    /// ϝ*: `alpha * phi + beta * dphi`
    pub phi_star: f64,
}

impl EpeMetrics {
    /// Computes the metrics for two validated coefficient vectors.
    ///
    /// Vectors of different lengths are zero-padded and the difference of
    /// the coefficients and of their derivatives are measured with the
    /// configured norm.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the configured norm order is not positive.
    pub fn compute(
        f: &CoefficientVector,
        g: &CoefficientVector,
        config: &EpeConfig,
    ) -> Result<Self> {
        config.p.validate()?;

        let (f, g) = align(f, g);
        let diff: Vec<f64> = f.iter().zip(g.iter()).map(|(a, b)| a - b).collect();
        // d(f - g) equals the aligned f' - g', and is exactly zero when f == g
        let diff1 = derivative_values(&diff);

        let phi = config.p.norm(&diff);
        let dphi = config.p.norm(&diff1);
        let phi_star = config.alpha * phi + config.beta * dphi;

        debug!(
            terms = f.len(),
            p = %config.p,
            phi,
            dphi,
            phi_star,
            "computed epe metrics"
        );

        Ok(Self { phi, dphi, phi_star })
    }

    /// The ordered triple `(phi, dphi, phi_star)`.
    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.phi, self.dphi, self.phi_star)
    }
}

impl From<EpeMetrics> for (f64, f64, f64) {
    fn from(m: EpeMetrics) -> Self {
        m.as_tuple()
    }
}

/// Computes (ϝ, δϝ, ϝ*) between two polynomials given as raw coefficients in
/// increasing-degree order.
///
/// # Errors
///
/// `InvalidInput` if either input holds a non-finite value or the norm order
/// is not positive. Nothing is computed before validation passes.
///
/// # Example
///
/// ```rust
/// use epes::{epe_metrics, EpeConfig};
///
/// // f(x) = 1 + x, g(x) = 1 + 2x
/// let m = epe_metrics(&[1.0, 1.0], &[1.0, 2.0], &EpeConfig::default()).unwrap();
/// assert_eq!(m.as_tuple(), (1.0, 1.0, 1.0));
/// ```
pub fn epe_metrics(
    coeff_f: &[f64],
    coeff_g: &[f64],
    config: &EpeConfig,
) -> Result<EpeMetrics> {
    config.p.validate()?;
    let f = CoefficientVector::try_from(coeff_f)?;
    let g = CoefficientVector::try_from(coeff_g)?;
    EpeMetrics::compute(&f, &g, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_simple_linear_pair() {
        // f(x) = 1 + x; g(x) = 1 + 2x
        let m = epe_metrics(&[1.0, 1.0], &[1.0, 2.0], &EpeConfig::default()).unwrap();
        assert_abs_diff_eq!(m.phi, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.dphi, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.phi_star, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unequal_lengths() {
        let m = epe_metrics(&[0.0], &[0.0, 1.0], &EpeConfig::default()).unwrap();
        assert_abs_diff_eq!(m.phi, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.dphi, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_inputs() {
        let m = epe_metrics(&[], &[], &EpeConfig::default()).unwrap();
        assert_eq!(m.as_tuple(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_norm_orders() {
        let v = [3.0, -4.0];
        assert_abs_diff_eq!(NormOrder::Finite(1.0).norm(&v), 7.0, epsilon = 1e-12);
        assert_abs_diff_eq!(NormOrder::EUCLIDEAN.norm(&v), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            NormOrder::Finite(3.0).norm(&v),
            91.0_f64.powf(1.0 / 3.0),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(NormOrder::Infinity.norm(&v), 4.0, epsilon = 1e-12);
        assert_eq!(NormOrder::Infinity.norm(&[]), 0.0);
    }

    #[test]
    fn test_large_finite_order() {
        let p = NormOrder::Finite(2000.0);
        assert_relative_eq!(p.norm(&[0.5]), 0.5, max_relative = 1e-12);
        assert_relative_eq!(
            p.norm(&[0.5, -0.5]),
            0.5 * 2.0_f64.powf(1.0 / 2000.0),
            max_relative = 1e-12
        );

        let m = epe_metrics(&[0.5], &[0.0], &EpeConfig::default().with_norm(p)).unwrap();
        assert_relative_eq!(m.phi, 0.5, max_relative = 1e-12);
        assert_eq!(m.dphi, 0.0);
    }

    #[test]
    fn test_tiny_values_do_not_underflow() {
        let v = [3e-200, -4e-200];
        assert_relative_eq!(NormOrder::EUCLIDEAN.norm(&v), 5e-200, max_relative = 1e-12);
        assert_relative_eq!(
            NormOrder::Finite(3.0).norm(&v),
            1e-200 * 91.0_f64.powf(1.0 / 3.0),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_identical_large_coefficients() {
        let f = [0.0, 0.0, 0.0, 1e308];
        let m = epe_metrics(&f, &f, &EpeConfig::default()).unwrap();
        assert_eq!(m.as_tuple(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_large_derivative_stays_finite() {
        // f - g = 0.5e308 x^3, so d(f - g) = 1.5e308 x^2
        let f = [0.0, 0.0, 0.0, 1e308];
        let g = [0.0, 0.0, 0.0, 0.5e308];
        let m = epe_metrics(&f, &g, &EpeConfig::default()).unwrap();
        assert_relative_eq!(m.phi, 0.5e308, max_relative = 1e-12);
        assert_relative_eq!(m.dphi, 1.5e308, max_relative = 1e-12);
        assert_relative_eq!(m.phi_star, 0.8e308, max_relative = 1e-12);
    }

    #[test]
    fn test_infinity_norm_metrics() {
        let config = EpeConfig::default().with_norm(NormOrder::Infinity);
        // f - g = [1, -3, 0.5]; f' - g' = [-3, 1]
        let m = epe_metrics(&[2.0, 0.0, 1.0], &[1.0, 3.0, 0.5], &config).unwrap();
        assert_abs_diff_eq!(m.phi, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.dphi, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_non_positive_p_rejected() {
        assert!(NormOrder::new(0.0).is_err());
        assert!(NormOrder::new(-1.0).is_err());
        assert!(NormOrder::new(f64::NAN).is_err());
        assert_eq!(NormOrder::new(f64::INFINITY).unwrap(), NormOrder::Infinity);

        let config = EpeConfig { p: NormOrder::Finite(0.0), ..EpeConfig::default() };
        let err = epe_metrics(&[1.0], &[2.0], &config).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_non_finite_coefficients_rejected() {
        let err = epe_metrics(&[1.0, f64::NAN], &[1.0], &EpeConfig::default()).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_norm_order_parsing() {
        assert_eq!("inf".parse::<NormOrder>().unwrap(), NormOrder::Infinity);
        assert_eq!("Infinity".parse::<NormOrder>().unwrap(), NormOrder::Infinity);
        assert_eq!("1.5".parse::<NormOrder>().unwrap(), NormOrder::Finite(1.5));
        assert!("0".parse::<NormOrder>().is_err());
        assert!("two".parse::<NormOrder>().is_err());
    }

    #[test]
    fn test_negative_weights_accepted() {
        let config = EpeConfig::default().with_weights(-1.0, 0.5);
        let m = epe_metrics(&[0.0, 2.0], &[0.0, 0.0], &config).unwrap();
        assert_abs_diff_eq!(m.phi_star, -1.0 * m.phi + 0.5 * m.dphi, epsilon = 1e-12);
        assert!(m.phi_star < 0.0);
    }
}
