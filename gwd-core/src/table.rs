//! Header-driven CSV helpers shared by the record parsers.
//!
//! Inputs come from several preprocessing steps that never agreed on column
//! names (`station_nm` vs `station_id`, `dec_lat_va` vs `latitude`), so every
//! parser looks columns up by a list of aliases instead of by position.

use crate::error::{GwdError, Result};
use csv::{Reader, ReaderBuilder, StringRecord};
use serde::Serialize;

/// Rows that parsed cleanly, plus a count of the ones that did not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedRows<T> {
    pub rows: Vec<T>,
    /// Rows dropped for non-numeric or missing fields.
    pub skipped: usize,
}

impl<T> ParsedRows<T> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A table parsed as a whole (not row by row), plus a count of the rows
/// that did not parse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedTable<T> {
    pub table: T,
    pub skipped: usize,
}

/// Build a headed, flexible reader over `data`.
///
/// Tab-delimited input is detected from the header line, since the raw
/// USGS export is a TSV while the derived tables are CSV.
pub fn reader(data: &str) -> Reader<&[u8]> {
    let header_line = data.lines().next().unwrap_or("");
    let delimiter = if header_line.contains('\t') { b'\t' } else { b',' };
    ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(data.as_bytes())
}

/// Position of the first header matching any of `aliases` (case-insensitive).
pub fn column_index(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    aliases.iter().find_map(|alias| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(alias))
    })
}

/// Like [`column_index`] but a missing column makes the whole input unusable.
pub fn require_column(headers: &StringRecord, aliases: &[&str]) -> Result<usize> {
    column_index(headers, aliases).ok_or_else(|| GwdError::MissingColumn(aliases.join("|")))
}

/// Trimmed, non-empty text field.
pub fn text(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

/// Finite floating point field.
pub fn float(record: &StringRecord, idx: usize) -> Option<f64> {
    text(record, idx)?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Integer-like field: accepts `"2005"` as well as `"2005.0"`.
pub fn integer(record: &StringRecord, idx: usize) -> Option<i32> {
    let raw = text(record, idx)?;
    if let Ok(value) = raw.parse::<i32>() {
        return Some(value);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= i32::MAX as f64 {
        Some(value as i32)
    } else {
        None
    }
}
