use std::ops::Deref;
use std::str::FromStr;

use tracing::trace;

use crate::error::{EpeError, Result};

/// Coefficients of a polynomial in increasing-degree order.
///
/// Index `i` holds the coefficient of `x^i`. An empty vector is the zero
/// polynomial. Every element is finite; the only way to build one is through a
/// validating conversion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoefficientVector(Vec<f64>);

impl CoefficientVector {
    /// Validates and wraps raw coefficients.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if any coefficient is NaN or infinite.
    pub fn new(coeffs: Vec<f64>) -> Result<Self> {
        if let Some(pos) = coeffs.iter().position(|c| !c.is_finite()) {
            return Err(EpeError::invalid(format!(
                "coefficient at index {} is not a finite number ({})",
                pos, coeffs[pos]
            )));
        }
        Ok(Self(coeffs))
    }

    /// The zero polynomial
    pub fn zero() -> Self {
        Self(Vec::new())
    }

    /// Degree of the highest stored term, `None` for the zero polynomial.
    ///
    /// Trailing zeros count: `[1.0, 0.0]` has degree 1.
    pub fn degree(&self) -> Option<usize> {
        self.0.len().checked_sub(1)
    }

    /// Borrows the raw coefficients.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Unwraps into the raw coefficients.
    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }

    /// Evaluates the polynomial at `x` by Horner's rule.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.0.iter().rev().fold(0.0, |acc, &c| acc * x + c)
    }

    /// Returns a copy padded with trailing zeros up to `len` terms.
    ///
    /// Vectors already at least `len` long are returned unchanged.
    pub fn padded(&self, len: usize) -> Self {
        let mut out = self.0.clone();
        if out.len() < len {
            out.resize(len, 0.0);
        }
        Self(out)
    }

    /// Coefficients of the formal derivative.
    ///
    /// `d[i] = (i + 1) * c[i + 1]`; constants and the zero polynomial give the
    /// empty vector.
    pub fn derivative(&self) -> Self {
        Self(derivative_values(&self.0))
    }
}

impl Deref for CoefficientVector {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl TryFrom<Vec<f64>> for CoefficientVector {
    type Error = EpeError;

    fn try_from(coeffs: Vec<f64>) -> Result<Self> {
        Self::new(coeffs)
    }
}

impl TryFrom<&[f64]> for CoefficientVector {
    type Error = EpeError;

    fn try_from(coeffs: &[f64]) -> Result<Self> {
        Self::new(coeffs.to_vec())
    }
}

impl From<CoefficientVector> for Vec<f64> {
    fn from(coeffs: CoefficientVector) -> Self {
        coeffs.0
    }
}

/// Parses coefficients written as `"1.0, 2.5, -3"`, optionally bracketed.
/// Commas and whitespace both separate terms.
impl FromStr for CoefficientVector {
    type Err = EpeError;

    fn from_str(s: &str) -> Result<Self> {
        let body = s.trim();
        let body = body.strip_prefix('[').unwrap_or(body);
        let body = body.strip_suffix(']').unwrap_or(body);

        let coeffs = body
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|tok| !tok.is_empty())
            .map(|tok| {
                tok.parse::<f64>()
                    .map_err(|_| EpeError::invalid(format!("'{}' is not a number", tok)))
            })
            .collect::<Result<Vec<f64>>>()?;

        Self::new(coeffs)
    }
}

/// `d[i] = (i + 1) * c[i + 1]` over raw, already validated values.
pub(crate) fn derivative_values(coeffs: &[f64]) -> Vec<f64> {
    coeffs
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, &c)| i as f64 * c)
        .collect()
}

/// Pads two coefficient vectors with trailing zeros to a common length.
///
/// Both outputs have length `max(a.len(), b.len())`. Trailing zeros do not
/// change the polynomial a vector represents.
pub fn align(
    a: &CoefficientVector,
    b: &CoefficientVector,
) -> (CoefficientVector, CoefficientVector) {
    let n = a.len().max(b.len());
    trace!(left = a.len(), right = b.len(), aligned = n, "aligning coefficient vectors");
    (a.padded(n), b.padded(n))
}

/// Derivative coefficients of a polynomial.
pub fn derivative(coeffs: &CoefficientVector) -> CoefficientVector {
    coeffs.derivative()
}

/// Derivative coefficients of a raw coefficient slice.
///
/// # Errors
///
/// `InvalidInput` if the slice holds a non-finite value.
pub fn poly_deriv_coeffs(coeffs: &[f64]) -> Result<Vec<f64>> {
    let c = CoefficientVector::try_from(coeffs)?;
    Ok(c.derivative().into_vec())
}
