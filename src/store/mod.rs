//! Append-only delimited record store.
//!
//! One header line, then one comma-separated line per successful
//! measurement, appended in run order and flushed immediately so a sweep
//! killed mid-flight still leaves a valid, plottable prefix. The writer
//! owns the file for the sweep's duration; readers open it only after the
//! sweep is complete or abandoned.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SweepError};

/// Field delimiter used by both the writer and the reader.
pub const FIELD_DELIMITER: char = ',';

/// Write handle for a record store.
///
/// Creating a store truncates any prior file at the same path: a fresh
/// sweep is the sole source of truth for its store.
pub struct RecordStore {
    path: PathBuf,
    file: File,
}

impl RecordStore {
    /// Create a fresh store, discarding any existing file, and write the
    /// header line.
    pub fn create<P: AsRef<Path>>(path: P, header: &str) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::create(&path)?;
        writeln!(file, "{}", header)?;
        file.flush()?;
        Ok(Self { path, file })
    }

    /// Append one record line and flush it to disk.
    ///
    /// The line is stored verbatim apart from whitespace trimming; the
    /// writer never parses or validates it. Field-position semantics belong
    /// to the reader.
    pub fn append(&mut self, line: &str) -> Result<()> {
        writeln!(self.file, "{}", line.trim())?;
        self.file.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A pair of equal-length numeric columns extracted from a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Integer x values (sizes), in file order
    pub x: Vec<u64>,
    /// Float y values (bandwidths), in file order
    pub y: Vec<f64>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Extract two columns from a store as a [`Series`].
///
/// The header line is skipped without being parsed. Every remaining line is
/// split on [`FIELD_DELIMITER`]; token `x_field` must parse as an integer
/// and token `y_field` as a float. Records stay in file order with no
/// sorting, deduplication, or aggregation, so repeated sizes appear as
/// separate points and run-to-run variance stays visible in the plot.
///
/// The first short or non-numeric line fails the whole read with
/// [`SweepError::MalformedRecord`].
pub fn read_series<P: AsRef<Path>>(path: P, x_field: usize, y_field: usize) -> Result<Series> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SweepError::StoreNotFound(path.to_path_buf()));
    }

    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines();

    // Header is documentation for humans, never parsed for indices.
    let _header = lines.next().transpose()?;

    let needed = x_field.max(y_field) + 1;
    let mut series = Series::default();
    for (idx, line) in lines.enumerate() {
        let line = line?;
        let line_no = idx + 2;
        let tokens: Vec<&str> = line.trim().split(FIELD_DELIMITER).collect();
        if tokens.len() < needed {
            return Err(SweepError::MalformedRecord {
                line_no,
                content: line.clone(),
                reason: format!("expected at least {} fields, found {}", needed, tokens.len()),
            });
        }
        let x = tokens[x_field].trim().parse::<u64>().map_err(|e| {
            SweepError::MalformedRecord {
                line_no,
                content: line.clone(),
                reason: format!("field {}: {}", x_field, e),
            }
        })?;
        let y = tokens[y_field].trim().parse::<f64>().map_err(|e| {
            SweepError::MalformedRecord {
                line_no,
                content: line.clone(),
                reason: format!("field {}: {}", y_field, e),
            }
        })?;
        series.x.push(x);
        series.y.push(y);
    }

    Ok(series)
}

/// Read a store back as its header line plus raw token rows.
///
/// No parsing beyond splitting on the delimiter; used by the `show`
/// command to dump exactly what the sweep recorded.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<(String, Vec<Vec<String>>)> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SweepError::StoreNotFound(path.to_path_buf()));
    }

    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines();
    let header = lines.next().transpose()?.unwrap_or_default();

    let mut records = Vec::new();
    for line in lines {
        let line = line?;
        records.push(
            line.trim()
                .split(FIELD_DELIMITER)
                .map(|t| t.trim().to_string())
                .collect(),
        );
    }
    Ok((header, records))
}
