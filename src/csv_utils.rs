use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{EpeError, Result};
use crate::plot::SliceSeries;
use crate::probe::{ProbeDataset, ReferenceDataset};

/// Reads a headered CSV into a `ReferenceDataset`, resolving each column's
/// reference value.
pub fn read_reference<R: Read>(reader: R) -> Result<ReferenceDataset> {
    // Width is checked by `from_records` so ragged input reports as InvalidInput
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let records = rdr.records().collect::<std::result::Result<Vec<_>, _>>()?;

    let dataset = ReferenceDataset::from_records(headers, records.iter().map(|r| r.iter()))?;
    debug!(
        columns = dataset.columns().len(),
        rows = dataset.num_rows(),
        "loaded reference dataset"
    );
    Ok(dataset)
}

/// Reads a reference dataset from a CSV file.
pub fn read_reference_csv<P: AsRef<Path>>(path: P) -> Result<ReferenceDataset> {
    read_reference(File::open(path)?)
}

/// Reads one numeric column from headered CSV by column name.
///
/// Every row must hold a finite number in that column, so the result has
/// exactly one value per data row.
///
/// # Errors
///
/// `InvalidInput` if no header matches `column`, a row is too short, or a
/// cell is empty, unparseable or non-finite.
pub fn read_column<R: Read>(reader: R, column: &str) -> Result<Vec<f64>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let col_index = rdr
        .headers()?
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| EpeError::invalid(format!("column '{}' not found", column)))?;

    let mut values = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let cell = record.get(col_index).ok_or_else(|| {
            EpeError::invalid(format!("row {} has no value for column '{}'", row, column))
        })?;
        let value = cell
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                EpeError::invalid(format!(
                    "row {} of column '{}' is not a finite number ('{}')",
                    row, column, cell
                ))
            })?;
        values.push(value);
    }
    debug!(column, rows = values.len(), "read csv column");
    Ok(values)
}

/// Reads one numeric column from a CSV file. See [`read_column`].
pub fn read_csv_column<P: AsRef<Path>>(path: P, column: &str) -> Result<Vec<f64>> {
    read_column(File::open(path)?, column)
}

/// Writes a probe dataset as headered CSV, one row per probe point.
pub fn write_probe<W: Write>(probe: &ProbeDataset, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(probe.column_names())?;
    for row in 0..probe.len() {
        wtr.write_record(probe.columns().iter().map(|(_, col)| col.cell(row)))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes slice series as CSV with columns `feature, label_a, label_b`.
pub fn write_slice<W: Write>(series: &SliceSeries, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let (label_a, label_b) = series.labels();
    wtr.write_record([series.feature(), label_a, label_b])?;
    for (x, a, b) in series.rows() {
        wtr.write_record([x.to_string(), a.to_string(), b.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

impl ReferenceDataset {
    /// See [`read_reference`].
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        read_reference(reader)
    }
}

impl ProbeDataset {
    /// See [`write_probe`].
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        write_probe(self, writer)
    }
}

impl SliceSeries {
    /// See [`write_slice`].
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        write_slice(self, writer)
    }
}
