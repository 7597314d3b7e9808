//! Chart renderer: turns a [`ChartRequest`] into a plot-ready [`Chart`]
//! description, gated on the dtype of the targeted column.
//!
//! | kind      | column dtype | result                                        |
//! |-----------|--------------|-----------------------------------------------|
//! | Line      | numeric      | values against the row index                  |
//! | Bar       | object       | frequency of each category                    |
//! | Box       | numeric      | box plot with every point                     |
//! | Scatter   | numeric      | column against the table's first column       |
//! | Histogram | numeric      | 30 bins plus a marginal box plot              |
//!
//! Any other combination yields [`NotApplicable`] and nothing is drawn.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::data::model::{CellValue, Column, ColumnKind, Table};
use crate::data::summary::quantile;

pub const HISTOGRAM_BINS: usize = 30;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
    Box,
    Scatter,
    Histogram,
}

impl ChartKind {
    /// Kinds offered for the single-column selector.
    pub const SINGLE_COLUMN: [ChartKind; 4] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Box,
        ChartKind::Scatter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Line => "Line Chart",
            ChartKind::Bar => "Bar Chart",
            ChartKind::Box => "Box Plot",
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Histogram => "Histogram",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    /// `None` when nothing is selected.
    pub column: Option<String>,
    pub kind: ChartKind,
}

impl ChartRequest {
    pub fn new(column: impl Into<String>, kind: ChartKind) -> Self {
        ChartRequest {
            column: Some(column.into()),
            kind,
        }
    }
}

/// Why a request produced no chart. None of these are user-facing errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NotApplicable {
    #[error("no column selected")]
    EmptySelection,

    #[error("column '{0}' is not in the table")]
    UnknownColumn(String),

    #[error("{kind} does not apply to column '{column}' of dtype {}", .dtype.dtype_label())]
    TypeMismatch {
        kind: ChartKind,
        column: String,
        dtype: ColumnKind,
    },
}

// ---------------------------------------------------------------------------
// Chart descriptions
// ---------------------------------------------------------------------------

/// Box-plot statistics with Tukey whiskers (furthest points within 1.5·IQR).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
}

impl BoxStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25)?;
        let median = quantile(&sorted, 0.5)?;
        let q3 = quantile(&sorted, 0.75)?;
        let fence = 1.5 * (q3 - q1);

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= q1 - fence)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= q3 + fence)
            .unwrap_or(q3);

        Some(BoxStats {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Line {
        column: String,
        /// `[row index, value]`
        points: Vec<[f64; 2]>,
    },
    Bar {
        column: String,
        /// Category and its count, most frequent first.
        counts: Vec<(String, usize)>,
    },
    Box {
        column: String,
        stats: Option<BoxStats>,
        values: Vec<f64>,
    },
    Scatter {
        x_column: String,
        y_column: String,
        /// `[x, y]`; for a categorical y axis `y` is the category code.
        points: Vec<[f64; 2]>,
        /// Labels of the y category codes, `None` when y is numeric.
        y_categories: Option<Vec<String>>,
    },
    Histogram {
        column: String,
        title: String,
        bins: Vec<HistogramBin>,
        marginal: Option<BoxStats>,
    },
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Render a request, or `None` when the dtype guard fails.
pub fn render(table: &Table, request: &ChartRequest) -> Option<Chart> {
    match try_render(table, request) {
        Ok(chart) => Some(chart),
        Err(reason) => {
            log::debug!("skipping chart: {reason}");
            None
        }
    }
}

pub fn try_render(table: &Table, request: &ChartRequest) -> Result<Chart, NotApplicable> {
    let name = request
        .column
        .as_deref()
        .ok_or(NotApplicable::EmptySelection)?;
    let column = table
        .column(name)
        .ok_or_else(|| NotApplicable::UnknownColumn(name.to_string()))?;

    use ColumnKind::{Float, Integer, Text};
    match (request.kind, column.kind) {
        (ChartKind::Line, Integer | Float) => Ok(line_chart(table, column)),
        (ChartKind::Bar, Text) => Ok(bar_chart(column)),
        (ChartKind::Box, Integer | Float) => Ok(box_chart(column)),
        (ChartKind::Scatter, Integer | Float) => Ok(scatter_chart(table, column)),
        (ChartKind::Histogram, Integer | Float) => Ok(histogram(column)),
        (kind, dtype) => Err(NotApplicable::TypeMismatch {
            kind,
            column: column.name.clone(),
            dtype,
        }),
    }
}

/// One histogram per selected numeric column; other columns are skipped.
pub fn render_histograms(table: &Table, columns: &[String]) -> Vec<Chart> {
    columns
        .iter()
        .filter_map(|col| render(table, &ChartRequest::new(col.as_str(), ChartKind::Histogram)))
        .collect()
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

fn line_chart(table: &Table, column: &Column) -> Chart {
    let points = table
        .index()
        .iter()
        .zip(&column.values)
        .filter_map(|(&row, v)| v.as_f64().map(|y| [row as f64, y]))
        .collect();
    Chart::Line {
        column: column.name.clone(),
        points,
    }
}

fn bar_chart(column: &Column) -> Chart {
    Chart::Bar {
        column: column.name.clone(),
        counts: value_counts(column),
    }
}

/// Non-missing value frequencies, most frequent first; ties keep the order
/// of first appearance.
pub fn value_counts(column: &Column) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for value in column.values.iter().filter(|v| !v.is_null()) {
        let label = value.to_string();
        let count = counts.entry(label.clone()).or_insert(0);
        if *count == 0 {
            order.push(label);
        }
        *count += 1;
    }

    let mut out: Vec<(String, usize)> = order
        .into_iter()
        .map(|label| {
            let n = counts[&label];
            (label, n)
        })
        .collect();
    // Stable sort keeps first-appearance order among ties.
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

fn box_chart(column: &Column) -> Chart {
    let values = column.numeric_values();
    Chart::Box {
        column: column.name.clone(),
        stats: BoxStats::from_values(&values),
        values,
    }
}

fn scatter_chart(table: &Table, column: &Column) -> Chart {
    // The first column is used as-is, even when it is the selected column or
    // is not numeric.
    let first = table.first_column().unwrap_or(column);

    let (y_values, y_categories) = axis_values(first);
    let points = column
        .values
        .iter()
        .zip(y_values)
        .filter_map(|(x, y)| Some([x.as_f64()?, y?]))
        .collect();

    Chart::Scatter {
        x_column: column.name.clone(),
        y_column: first.name.clone(),
        points,
        y_categories,
    }
}

/// Plot coordinates for a column: numeric values as-is, anything else as
/// category codes in first-appearance order.
fn axis_values(column: &Column) -> (Vec<Option<f64>>, Option<Vec<String>>) {
    if column.kind.is_numeric() {
        return (column.values.iter().map(CellValue::as_f64).collect(), None);
    }

    let mut categories: Vec<String> = Vec::new();
    let mut codes: HashMap<String, usize> = HashMap::new();
    let values = column
        .values
        .iter()
        .map(|v| {
            if v.is_null() {
                return None;
            }
            let label = v.to_string();
            let code = *codes.entry(label.clone()).or_insert_with(|| {
                categories.push(label);
                categories.len() - 1
            });
            Some(code as f64)
        })
        .collect();
    (values, Some(categories))
}

fn histogram(column: &Column) -> Chart {
    let values = column.numeric_values();
    Chart::Histogram {
        column: column.name.clone(),
        title: format!("Distribution of {}", column.name),
        bins: histogram_bins(&values, HISTOGRAM_BINS),
        marginal: BoxStats::from_values(&values),
    }
}

/// Equal-width bins over the finite `[min, max]`; the last bin includes
/// `max`. A zero-width range is widened to `[v - 0.5, v + 0.5]`. Infinite
/// values are not binned.
pub fn histogram_bins(values: &[f64], n_bins: usize) -> Vec<HistogramBin> {
    let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let Some((min, max)) = values.iter().fold(None, |acc: Option<(f64, f64)>, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    }) else {
        return Vec::new();
    };
    if n_bins == 0 {
        return Vec::new();
    }

    let (lo, hi) = if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    };
    let width = (hi - lo) / n_bins as f64;

    let mut bins: Vec<HistogramBin> = (0..n_bins)
        .map(|i| HistogramBin {
            start: lo + width * i as f64,
            end: lo + width * (i + 1) as f64,
            count: 0,
        })
        .collect();

    for &v in &values {
        let idx = (((v - lo) / width) as usize).min(n_bins - 1);
        bins[idx].count += 1;
    }
    bins
}
