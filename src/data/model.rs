use std::fmt;

use crate::error::{DashboardError, DashboardResult};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the Pandas dtypes we infer.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Hash so text and boolean cells can be counted in hash maps --

impl Eq for CellValue {}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{}", format_float(*v)),
            CellValue::Bool(true) => write!(f, "True"),
            CellValue::Bool(false) => write!(f, "False"),
            CellValue::Null => write!(f, "NaN"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` (numeric cells only).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

/// Shortest round-trip float text with a decimal point for finite values
/// (`10.0`, `0.1`).
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let s = v.to_string();
    if s.contains(['.', 'e', 'E']) {
        s
    } else {
        format!("{s}.0")
    }
}

// ---------------------------------------------------------------------------
// ColumnKind – inferred dtype of a column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Integer,
    Float,
    Boolean,
    /// Free text / categorical.
    Text,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }

    /// Pandas-style dtype label shown in the UI.
    pub fn dtype_label(self) -> &'static str {
        match self {
            ColumnKind::Integer => "int64",
            ColumnKind::Float => "float64",
            ColumnKind::Boolean => "bool",
            ColumnKind::Text => "object",
        }
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind, values: Vec<CellValue>) -> Self {
        Column {
            name: name.into(),
            kind,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Non-missing numeric values in row order.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(CellValue::as_f64).collect()
    }

    /// `(min, max)` over the finite numeric values, if any. Infinite cells
    /// lie outside this domain.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .filter_map(CellValue::as_f64)
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Columnar dataset. Every column has the same number of rows; `index` holds
/// the original row position of each row so filtered views keep their labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    index: Vec<usize>,
}

impl Table {
    /// Build a table with a fresh `0..n` index.
    pub fn new(columns: Vec<Column>) -> DashboardResult<Self> {
        let n_rows = columns.first().map_or(0, Column::len);
        if let Some(bad) = columns.iter().find(|c| c.len() != n_rows) {
            return Err(DashboardError::parse(format!(
                "column '{}' has {} rows, expected {n_rows}",
                bad.name,
                bad.len()
            )));
        }
        Ok(Table {
            columns,
            index: (0..n_rows).collect(),
        })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Integer and float columns, in table order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.kind.is_numeric())
    }

    /// The literal first column, whatever its type.
    pub fn first_column(&self) -> Option<&Column> {
        self.columns.first()
    }

    /// Original row positions of the rows in this table.
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    /// New table with the rows at `positions` (positions within *this* table).
    pub fn take_rows(&self, positions: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|col| Column {
                name: col.name.clone(),
                kind: col.kind,
                values: positions.iter().map(|&p| col.values[p].clone()).collect(),
            })
            .collect();
        Table {
            columns,
            index: positions.iter().map(|&p| self.index[p]).collect(),
        }
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> Table {
        let positions: Vec<usize> = (0..self.row_count().min(n)).collect();
        self.take_rows(&positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        Table::new(vec![
            Column::new(
                "id",
                ColumnKind::Integer,
                vec![CellValue::Integer(1), CellValue::Integer(2), CellValue::Integer(3)],
            ),
            Column::new(
                "value",
                ColumnKind::Float,
                vec![CellValue::Float(10.0), CellValue::Null, CellValue::Float(30.0)],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_ragged_columns() {
        let err = Table::new(vec![
            Column::new("a", ColumnKind::Integer, vec![CellValue::Integer(1)]),
            Column::new("b", ColumnKind::Integer, vec![]),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("column 'b' has 0 rows"));
    }

    #[test]
    fn take_rows_keeps_original_index() {
        let table = sample_table();
        let sub = table.take_rows(&[2, 0]);
        assert_eq!(sub.index(), &[2, 0]);
        assert_eq!(sub.columns()[0].values, vec![CellValue::Integer(3), CellValue::Integer(1)]);

        let subsub = sub.take_rows(&[0]);
        assert_eq!(subsub.index(), &[2]);
    }

    #[test]
    fn min_max_skips_missing() {
        let table = sample_table();
        assert_eq!(table.column("value").unwrap().min_max(), Some((10.0, 30.0)));
        let empty = Column::new("e", ColumnKind::Float, vec![CellValue::Null]);
        assert_eq!(empty.min_max(), None);
        assert!(!empty.is_empty());
    }

    #[test]
    fn min_max_ignores_infinities() {
        let col = Column::new(
            "v",
            ColumnKind::Float,
            vec![
                CellValue::Float(f64::NEG_INFINITY),
                CellValue::Float(2.0),
                CellValue::Float(f64::INFINITY),
                CellValue::Float(5.0),
            ],
        );
        assert_eq!(col.min_max(), Some((2.0, 5.0)));
        let only_inf = Column::new("i", ColumnKind::Float, vec![CellValue::Float(f64::INFINITY)]);
        assert_eq!(only_inf.min_max(), None);
    }

    #[test]
    fn head_is_clamped_to_row_count() {
        let table = sample_table();
        assert_eq!(table.head(5).row_count(), 3);
        assert_eq!(table.head(2).index(), &[0, 1]);
    }

    #[test]
    fn float_formatting_keeps_decimal_point() {
        assert_eq!(format_float(10.0), "10.0");
        assert_eq!(format_float(0.1), "0.1");
        assert_eq!(format_float(-2.5), "-2.5");
        assert_eq!(CellValue::Bool(true).to_string(), "True");
    }
}
