use crate::error::{EpeError, Result};

/// Legend labels used when the caller does not name the models
pub const DEFAULT_LABELS: (&str, &str) = ("Model A", "Model B");

/// Predictions of two models along one feature, ready for an external plotter.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceSeries {
    feature: String,
    labels: (String, String),
    x: Vec<f64>,
    y_hat_a: Vec<f64>,
    y_hat_b: Vec<f64>,
}

impl SliceSeries {
    /// Name of the swept feature
    pub fn feature(&self) -> &str {
        &self.feature
    }

    /// Legend labels of the two models
    pub fn labels(&self) -> (&str, &str) {
        (self.labels.0.as_str(), self.labels.1.as_str())
    }

    /// Plot title naming the feature
    pub fn title(&self) -> String {
        format!("Comparison of Models along {}", self.feature)
    }

    /// Y axis label
    pub fn y_label(&self) -> &'static str {
        "Prediction"
    }

    /// Probe positions
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Predictions of the first model
    pub fn y_hat_a(&self) -> &[f64] {
        &self.y_hat_a
    }

    /// Predictions of the second model
    pub fn y_hat_b(&self) -> &[f64] {
        &self.y_hat_b
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True when the series has no points
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// `(x, y_hat_a, y_hat_b)` per point
    pub fn rows(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.x
            .iter()
            .zip(&self.y_hat_a)
            .zip(&self.y_hat_b)
            .map(|((&x, &a), &b)| (x, a, b))
    }
}

/// Packages a one-dimensional slice of two models' predictions.
///
/// # Errors
///
/// `InvalidInput` if `x_vals`, `y_hat_a` and `y_hat_b` differ in length.
pub fn slice_plot(
    x_vals: &[f64],
    y_hat_a: &[f64],
    y_hat_b: &[f64],
    feature: &str,
    labels: (&str, &str),
) -> Result<SliceSeries> {
    if x_vals.len() != y_hat_a.len() || x_vals.len() != y_hat_b.len() {
        return Err(EpeError::invalid(format!(
            "x_vals, y_hat_a, and y_hat_b must have equal lengths (got {}, {}, {})",
            x_vals.len(),
            y_hat_a.len(),
            y_hat_b.len()
        )));
    }

    Ok(SliceSeries {
        feature: feature.to_string(),
        labels: (labels.0.to_string(), labels.1.to_string()),
        x: x_vals.to_vec(),
        y_hat_a: y_hat_a.to_vec(),
        y_hat_b: y_hat_b.to_vec(),
    })
}
