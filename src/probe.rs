//! Probe datasets: one feature swept across a domain, every other feature held
//! at its reference value.

use ahash::AHashMap;
use tracing::debug;

use crate::error::{EpeError, Result};

/// Number of probe points used when the caller has no preference
pub const DEFAULT_PROBE_POINTS: usize = 100;

/// Reference value of a column, resolved once when the dataset is loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceValue {
    /// Mean of the present values of an all-numeric column
    Numeric(f64),
    /// Most frequent present value; `None` when every cell is missing
    Categorical(Option<String>),
}

/// A named column and its reference value
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceColumn {
    /// Column header
    pub name: String,
    /// Mean or mode the probe holds the column at
    pub value: ReferenceValue,
}

/// Training features summarized into per-column reference values.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceDataset {
    columns: Vec<ReferenceColumn>,
    num_rows: usize,
}

fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || cell.eq_ignore_ascii_case("nan")
}

fn resolve_column(cells: &[&str]) -> ReferenceValue {
    let present: Vec<&str> = cells.iter().map(|c| c.trim()).filter(|c| !is_missing(c)).collect();

    if !present.is_empty() {
        let parsed: Option<Vec<f64>> = present.iter().map(|c| c.parse::<f64>().ok()).collect();
        if let Some(values) = parsed {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            return ReferenceValue::Numeric(mean);
        }
    }

    let mut counts: AHashMap<&str, usize> = AHashMap::new();
    for &cell in &present {
        *counts.entry(cell).or_insert(0) += 1;
    }
    // Highest count wins; ties go to the smallest value
    let mode = counts
        .into_iter()
        .max_by(|(a, ca), (b, cb)| ca.cmp(cb).then_with(|| b.cmp(a)))
        .map(|(value, _)| value.to_string());

    ReferenceValue::Categorical(mode)
}

impl ReferenceDataset {
    /// Builds a reference dataset from a header row and string records.
    ///
    /// Empty cells and `NaN` are treated as missing. A column whose present
    /// cells all parse as numbers is numeric; anything else is categorical.
    ///
    /// # Errors
    ///
    /// `InvalidInput` on duplicate column names or a record whose width
    /// differs from the header.
    pub fn from_records<H, R, C>(headers: H, records: R) -> Result<Self>
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: AsRef<str>,
    {
        let names: Vec<String> = headers.into_iter().map(Into::into).collect();
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(EpeError::invalid(format!("duplicate column '{}'", name)));
            }
        }

        let rows: Vec<Vec<C>> = records.into_iter().map(|r| r.into_iter().collect()).collect();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != names.len()) {
            return Err(EpeError::invalid(format!(
                "record {} has {} fields, expected {}",
                i,
                row.len(),
                names.len()
            )));
        }

        let columns = names
            .into_iter()
            .enumerate()
            .map(|(j, name)| {
                let cells: Vec<&str> = rows.iter().map(|r| r[j].as_ref()).collect();
                ReferenceColumn { name, value: resolve_column(&cells) }
            })
            .collect();

        Ok(Self { columns, num_rows: rows.len() })
    }

    /// Columns in header order
    pub fn columns(&self) -> &[ReferenceColumn] {
        &self.columns
    }

    /// Looks up a column by header
    pub fn column(&self, name: &str) -> Option<&ReferenceColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Headers in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Number of records the reference values were computed from
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }
}

/// A column of a probe dataset
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeColumn {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

impl ProbeColumn {
    /// Number of values
    pub fn len(&self) -> usize {
        match self {
            ProbeColumn::Numeric(v) => v.len(),
            ProbeColumn::Categorical(v) => v.len(),
        }
    }

    /// True when the column holds no values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The values of a numeric column, `None` for a categorical one
    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            ProbeColumn::Numeric(v) => Some(v),
            ProbeColumn::Categorical(_) => None,
        }
    }

    pub(crate) fn cell(&self, row: usize) -> String {
        match self {
            ProbeColumn::Numeric(v) => v[row].to_string(),
            ProbeColumn::Categorical(v) => v[row].clone(),
        }
    }
}

/// Synthetic dataset sweeping one feature across a domain.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeDataset {
    feature: String,
    columns: Vec<(String, ProbeColumn)>,
    num_points: usize,
}

impl ProbeDataset {
    /// Name of the swept feature
    pub fn feature(&self) -> &str {
        &self.feature
    }

    /// The swept values, `num_points` evenly spaced values from min to max
    pub fn probe_values(&self) -> &[f64] {
        self.column(&self.feature)
            .and_then(ProbeColumn::as_numeric)
            .unwrap_or(&[])
    }

    /// Looks up a column by name
    pub fn column(&self, name: &str) -> Option<&ProbeColumn> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    /// Named columns in reference order
    pub fn columns(&self) -> &[(String, ProbeColumn)] {
        &self.columns
    }

    /// Column names in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.num_points
    }

    /// True when the probe has no rows
    pub fn is_empty(&self) -> bool {
        self.num_points == 0
    }
}

/// `num` evenly spaced values over `[start, stop]`, both ends included.
fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    let step = (stop - start) / (num - 1) as f64;
    (0..num)
        .map(|i| if i == num - 1 { stop } else { start + step * i as f64 })
        .collect()
}

/// Builds a probe dataset where `feature` varies linearly across
/// `[domain_min, domain_max]` and every other column is held at its reference
/// value (mean for numeric columns, mode for categorical ones).
///
/// Columns keep the reference dataset's order.
///
/// # Errors
///
/// `InvalidInput` if `feature` is not a column, `num_points <= 1`,
/// `domain_max <= domain_min`, a bound is not finite, or another column is
/// categorical with no present value.
pub fn make_probe(
    reference: &ReferenceDataset,
    feature: &str,
    domain_min: f64,
    domain_max: f64,
    num_points: usize,
) -> Result<ProbeDataset> {
    if reference.column(feature).is_none() {
        return Err(EpeError::invalid(format!(
            "feature '{}' not found in reference columns",
            feature
        )));
    }
    if num_points <= 1 {
        return Err(EpeError::invalid(format!("num_points must be > 1, got {}", num_points)));
    }
    if !domain_min.is_finite() || !domain_max.is_finite() {
        return Err(EpeError::invalid("domain bounds must be finite"));
    }
    if domain_max <= domain_min {
        return Err(EpeError::invalid(format!(
            "domain_max must be > domain_min (got [{}, {}])",
            domain_min, domain_max
        )));
    }
    if let Some(col) = reference
        .columns()
        .iter()
        .find(|c| c.name != feature && c.value == ReferenceValue::Categorical(None))
    {
        return Err(EpeError::invalid(format!(
            "cannot determine reference value for column '{}'",
            col.name
        )));
    }

    let columns = reference
        .columns()
        .iter()
        .map(|col| {
            let column = if col.name == feature {
                ProbeColumn::Numeric(linspace(domain_min, domain_max, num_points))
            } else {
                match &col.value {
                    ReferenceValue::Numeric(mean) => ProbeColumn::Numeric(vec![*mean; num_points]),
                    ReferenceValue::Categorical(mode) => {
                        ProbeColumn::Categorical(vec![mode.clone().unwrap_or_default(); num_points])
                    }
                }
            };
            (col.name.clone(), column)
        })
        .collect();

    debug!(feature, domain_min, domain_max, num_points, "built probe dataset");

    Ok(ProbeDataset {
        feature: feature.to_string(),
        columns,
        num_points,
    })
}
