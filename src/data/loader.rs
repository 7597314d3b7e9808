use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};

use super::model::{CellValue, Column, ColumnKind, Table};
use crate::error::{DashboardError, DashboardResult};

/// Tokens read as a missing value (the Pandas `read_csv` defaults).
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const TRUE_TOKENS: &[&str] = &["True", "TRUE", "true"];
const FALSE_TOKENS: &[&str] = &["False", "FALSE", "false"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read the raw bytes of a `.csv` upload from disk. Parsing is left to
/// [`parse_csv`].
pub fn read_upload(path: &Path) -> Result<Vec<u8>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "csv" {
        bail!("Unsupported file extension: .{ext} (expected .csv)");
    }

    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

/// Parse uploaded delimited-text bytes into a [`Table`].
///
/// Layout: one header row, then records. Records shorter than the header are
/// padded with missing values; longer records are rejected. Column dtypes are
/// inferred the way Pandas does (int64, float64, bool, object).
pub fn parse_csv(bytes: &[u8]) -> DashboardResult<Table> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let text = std::str::from_utf8(bytes)
        .map_err(|e| DashboardError::parse(format!("upload is not valid UTF-8: {e}")))?;

    if text.trim().is_empty() {
        return Err(DashboardError::parse("No columns to parse from file"));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = dedupe_headers(reader.headers().map_err(reader_error)?.iter());
    if headers.is_empty() {
        return Err(DashboardError::parse("No columns to parse from file"));
    }

    let records: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .map_err(reader_error)?;
    let mut raw_columns: Vec<Vec<&str>> = vec![Vec::new(); headers.len()];

    for record in &records {
        if record.len() > headers.len() {
            let line = record.position().map_or(0, |p| p.line());
            return Err(DashboardError::parse(format!(
                "Expected {} fields in line {line}, saw {}",
                headers.len(),
                record.len()
            )));
        }
        for (col_idx, raw) in raw_columns.iter_mut().enumerate() {
            raw.push(record.get(col_idx).unwrap_or(""));
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw_columns)
        .map(|(name, raw)| infer_column(name, &raw))
        .collect();

    Table::new(columns)
}

/// Anything the CSV reader rejects is a malformed upload.
fn reader_error(err: csv::Error) -> DashboardError {
    DashboardError::parse(err.to_string())
}

// ---------------------------------------------------------------------------
// Header handling
// ---------------------------------------------------------------------------

/// Name blank headers `Unnamed: {i}` and suffix repeats with `.1`, `.2`, ….
fn dedupe_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for (i, header) in raw.enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            header.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        seen.insert(name.clone());
        out.push(name);
    }
    out
}

// ---------------------------------------------------------------------------
// Dtype inference
// ---------------------------------------------------------------------------

fn is_na(s: &str) -> bool {
    NA_TOKENS.contains(&s)
}

fn parse_bool(s: &str) -> Option<bool> {
    if TRUE_TOKENS.contains(&s) {
        Some(true)
    } else if FALSE_TOKENS.contains(&s) {
        Some(false)
    } else {
        None
    }
}

/// Pick the narrowest kind every cell of the column fits:
///
/// * int64   – all cells integers, none missing
/// * float64 – all non-missing cells numeric (or every cell missing)
/// * bool    – all cells boolean literals, none missing
/// * object  – anything else
fn infer_column(name: String, raw: &[&str]) -> Column {
    if raw.is_empty() {
        return Column::new(name, ColumnKind::Text, Vec::new());
    }

    let present: Vec<&str> = raw.iter().copied().filter(|s| !is_na(s)).collect();
    let has_missing = present.len() < raw.len();

    if !has_missing && present.iter().all(|s| s.trim().parse::<i64>().is_ok()) {
        let values = raw
            .iter()
            .map(|s| {
                s.trim()
                    .parse::<i64>()
                    .map_or(CellValue::Null, CellValue::Integer)
            })
            .collect();
        return Column::new(name, ColumnKind::Integer, values);
    }

    if present.iter().all(|s| s.trim().parse::<f64>().is_ok()) {
        let values = raw
            .iter()
            .map(|s| {
                if is_na(s) {
                    CellValue::Null
                } else {
                    // `f64::from_str` also accepts spellings like `NAN` or `+nan`.
                    match s.trim().parse::<f64>() {
                        Ok(v) if !v.is_nan() => CellValue::Float(v),
                        _ => CellValue::Null,
                    }
                }
            })
            .collect();
        return Column::new(name, ColumnKind::Float, values);
    }

    if !has_missing && present.iter().all(|s| parse_bool(s).is_some()) {
        let values = raw
            .iter()
            .map(|s| parse_bool(s).map_or(CellValue::Null, CellValue::Bool))
            .collect();
        return Column::new(name, ColumnKind::Boolean, values);
    }

    let values = raw
        .iter()
        .map(|s| {
            if is_na(s) {
                CellValue::Null
            } else {
                CellValue::Text(s.to_string())
            }
        })
        .collect();
    Column::new(name, ColumnKind::Text, values)
}
