use std::collections::HashMap;

use serde::Serialize;

use super::model::{CellValue, Column, Table};

/// Rows shown in the dataset preview.
pub const PREVIEW_ROWS: usize = 5;

// ---------------------------------------------------------------------------
// Summary records
// ---------------------------------------------------------------------------

/// `describe()` row for one numeric column. `None` marks an undefined
/// statistic (no values, or fewer than two for `std`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    #[serde(rename = "25%")]
    pub q25: Option<f64>,
    #[serde(rename = "50%")]
    pub q50: Option<f64>,
    #[serde(rename = "75%")]
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// `describe()` row for a non-numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalSummary {
    pub column: String,
    pub count: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub freq: usize,
}

/// Descriptive statistics of a table: numeric columns when there are any,
/// otherwise every column described categorically.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "columns", rename_all = "snake_case")]
pub enum Summary {
    Numeric(Vec<NumericSummary>),
    Categorical(Vec<CategoricalSummary>),
    Empty,
}

impl Summary {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ---------------------------------------------------------------------------
// Reporter
// ---------------------------------------------------------------------------

/// First [`PREVIEW_ROWS`] rows of the table.
pub fn preview(table: &Table) -> Table {
    table.head(PREVIEW_ROWS)
}

pub fn describe(table: &Table) -> Summary {
    let numeric: Vec<NumericSummary> = table.numeric_columns().map(describe_numeric).collect();
    if !numeric.is_empty() {
        return Summary::Numeric(numeric);
    }
    if table.columns().is_empty() {
        return Summary::Empty;
    }
    Summary::Categorical(table.columns().iter().map(describe_categorical).collect())
}

fn describe_numeric(column: &Column) -> NumericSummary {
    let mut values = column.numeric_values();
    values.sort_by(f64::total_cmp);

    let count = values.len();
    let mean = (count > 0).then(|| values.iter().sum::<f64>() / count as f64);
    let std = mean.filter(|_| count > 1).map(|m| {
        let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    });

    NumericSummary {
        column: column.name.clone(),
        count,
        mean,
        std,
        min: values.first().copied(),
        q25: quantile(&values, 0.25),
        q50: quantile(&values, 0.5),
        q75: quantile(&values, 0.75),
        max: values.last().copied(),
    }
}

fn describe_categorical(column: &Column) -> CategoricalSummary {
    let present: Vec<&CellValue> = column.values.iter().filter(|v| !v.is_null()).collect();

    // value → (count, first position)
    let mut counts: HashMap<&CellValue, (usize, usize)> = HashMap::new();
    for (pos, &value) in present.iter().enumerate() {
        counts.entry(value).or_insert((0, pos)).0 += 1;
    }

    let top = counts
        .iter()
        .max_by(|(_, (ca, pa)), (_, (cb, pb))| ca.cmp(cb).then(pb.cmp(pa)))
        .map(|(value, (count, _))| (value.to_string(), *count));

    CategoricalSummary {
        column: column.name.clone(),
        count: present.len(),
        unique: counts.len(),
        freq: top.as_ref().map_or(0, |(_, c)| *c),
        top: top.map(|(v, _)| v),
    }
}

/// Linear-interpolated quantile of an ascending slice.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}
