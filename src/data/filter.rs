use std::collections::BTreeMap;

use super::model::{Column, Table};

// ---------------------------------------------------------------------------
// Range predicate: which [low, high] window is selected per numeric column
// ---------------------------------------------------------------------------

/// Inclusive `[low, high]` window over one numeric column, remembering the
/// column's own `[min, max]` so bounds can be clamped and reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeFilter {
    pub low: f64,
    pub high: f64,
    pub min: f64,
    pub max: f64,
}

impl RangeFilter {
    /// Full-range filter over `[min, max]`.
    pub fn new(min: f64, max: f64) -> Self {
        RangeFilter {
            low: min,
            high: max,
            min,
            max,
        }
    }

    /// Full-range filter for a column, `None` when it has no numeric values.
    pub fn for_column(column: &Column) -> Option<Self> {
        if !column.kind.is_numeric() {
            return None;
        }
        column.min_max().map(|(min, max)| RangeFilter::new(min, max))
    }

    /// A bound still at the column's edge is open, so cells beyond the
    /// finite domain (infinities) stay in until that side is narrowed.
    pub fn contains(&self, v: f64) -> bool {
        (self.low <= v || self.low <= self.min) && (v <= self.high || self.high >= self.max)
    }

    /// Whether the window excludes part of the column's domain.
    pub fn is_narrowed(&self) -> bool {
        self.low > self.min || self.high < self.max
    }

    /// Move both bounds, clamped into `[min, max]` and kept ordered.
    /// Returns `true` when the window changed.
    pub fn set(&mut self, low: f64, high: f64) -> bool {
        if low.is_nan() || high.is_nan() {
            return false;
        }
        let low = low.clamp(self.min, self.max);
        let high = high.clamp(self.min, self.max).max(low);
        let changed = low != self.low || high != self.high;
        self.low = low;
        self.high = high;
        changed
    }

    pub fn reset(&mut self) {
        self.low = self.min;
        self.high = self.max;
    }
}

/// Per-column range selections: maps column_name → window.
/// Columns absent from the map are unconstrained.
pub type FilterState = BTreeMap<String, RangeFilter>;

/// Initialise a [`FilterState`] with every numeric column at its full range.
pub fn init_filter_state(table: &Table) -> FilterState {
    table
        .numeric_columns()
        .filter_map(|col| RangeFilter::for_column(col).map(|f| (col.name.clone(), f)))
        .collect()
}

/// Move one column's window. Unknown columns are ignored.
pub fn set_range(filters: &mut FilterState, column: &str, low: f64, high: f64) -> bool {
    filters
        .get_mut(column)
        .is_some_and(|f| f.set(low, high))
}

/// Restore every window to its column's full range.
pub fn reset_all(filters: &mut FilterState) {
    filters.values_mut().for_each(RangeFilter::reset);
}

/// Whether any window currently excludes part of its column.
pub fn is_narrowed(filters: &FilterState) -> bool {
    filters.values().any(RangeFilter::is_narrowed)
}

/// Return positions of rows that pass all active filters.
///
/// A row passes when, for every filtered numeric column present in the table,
/// its value lies inside the window. Missing cells never fail a window.
pub fn filtered_indices(table: &Table, filters: &FilterState) -> Vec<usize> {
    let active: Vec<(&Column, &RangeFilter)> = filters
        .iter()
        .filter_map(|(name, f)| {
            let col = table.column(name)?;
            col.kind.is_numeric().then_some((col, f))
        })
        .collect();

    (0..table.row_count())
        .filter(|&row| {
            active.iter().all(|(col, f)| match col.values[row].as_f64() {
                Some(v) => f.contains(v),
                None => true,
            })
        })
        .collect()
}

/// Apply every window at once and return the narrowed table.
pub fn apply_filters(table: &Table, filters: &FilterState) -> Table {
    table.take_rows(&filtered_indices(table, filters))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;

    fn sample() -> Table {
        parse_csv(b"id,category,value\n1,a,10.0\n2,b,20.0\n3,a,30.0\n").unwrap()
    }

    #[test]
    fn init_covers_numeric_columns_at_full_range() {
        let filters = init_filter_state(&sample());
        assert_eq!(filters.len(), 2);
        assert_eq!(filters["id"], RangeFilter::new(1.0, 3.0));
        assert_eq!(filters["value"], RangeFilter::new(10.0, 30.0));
        assert!(!filters.contains_key("category"));
    }

    #[test]
    fn full_ranges_keep_every_row() {
        let table = sample();
        let filters = init_filter_state(&table);
        assert_eq!(apply_filters(&table, &filters), table);
    }

    #[test]
    fn value_window_selects_rows_two_and_three() {
        let table = sample();
        let mut filters = init_filter_state(&table);
        assert!(set_range(&mut filters, "value", 15.0, 30.0));

        let out = apply_filters(&table, &filters);
        assert_eq!(out.index(), &[1, 2]);
        assert_eq!(out.row_count(), 2);
    }

    #[test]
    fn windows_combine_as_a_conjunction() {
        let table = sample();
        let mut filters = init_filter_state(&table);
        set_range(&mut filters, "value", 15.0, 30.0);
        set_range(&mut filters, "id", 1.0, 2.0);
        assert_eq!(filtered_indices(&table, &filters), vec![1]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let table = sample();
        let mut filters = init_filter_state(&table);
        set_range(&mut filters, "value", 15.0, 25.0);

        let once = apply_filters(&table, &filters);
        let twice = apply_filters(&once, &filters);
        assert_eq!(once, twice);
        assert!(once.row_count() <= table.row_count());
    }

    #[test]
    fn widening_restores_excluded_rows() {
        let table = sample();
        let mut filters = init_filter_state(&table);
        set_range(&mut filters, "value", 25.0, 30.0);
        assert_eq!(apply_filters(&table, &filters).row_count(), 1);

        set_range(&mut filters, "value", 10.0, 30.0);
        assert_eq!(apply_filters(&table, &filters), table);
        assert!(!is_narrowed(&filters));
    }

    #[test]
    fn zero_variance_column_keeps_all_rows() {
        let table = parse_csv(b"k,x\n5.0,1\n5.0,2\n5.0,3\n").unwrap();
        let filters = init_filter_state(&table);
        assert_eq!(filters["k"], RangeFilter::new(5.0, 5.0));
        assert_eq!(apply_filters(&table, &filters).row_count(), 3);
    }

    #[test]
    fn missing_cells_pass_any_window() {
        let table = parse_csv(b"v\n1\nNA\n3\n").unwrap();
        let mut filters = init_filter_state(&table);
        set_range(&mut filters, "v", 2.0, 3.0);
        assert_eq!(filtered_indices(&table, &filters), vec![1, 2]);
    }

    #[test]
    fn bounds_are_clamped_and_ordered() {
        let mut f = RangeFilter::new(0.0, 10.0);
        assert!(!f.set(-5.0, 50.0));
        assert_eq!((f.low, f.high), (0.0, 10.0));

        f.set(8.0, 3.0);
        assert_eq!((f.low, f.high), (8.0, 8.0));
        assert!(f.is_narrowed());

        f.reset();
        assert!(!f.is_narrowed());
    }

    #[test]
    fn reset_all_restores_full_ranges() {
        let table = sample();
        let mut filters = init_filter_state(&table);
        set_range(&mut filters, "id", 2.0, 2.0);
        set_range(&mut filters, "value", 20.0, 20.0);
        assert!(is_narrowed(&filters));

        reset_all(&mut filters);
        assert_eq!(filters, init_filter_state(&table));
    }

    #[test]
    fn unknown_columns_are_ignored() {
        let table = sample();
        let mut filters = init_filter_state(&table);
        assert!(!set_range(&mut filters, "missing", 0.0, 1.0));
        filters.insert("category".into(), RangeFilter::new(0.0, 0.0));
        assert_eq!(filtered_indices(&table, &filters), vec![0, 1, 2]);
    }

    #[test]
    fn nan_spelled_cells_survive_full_ranges() {
        let table = parse_csv(b"id,v\n1,1.0\n2,NAN\n3,3.0\n").unwrap();
        let filters = init_filter_state(&table);
        assert_eq!(filters["v"], RangeFilter::new(1.0, 3.0));
        assert_eq!(apply_filters(&table, &filters).row_count(), 3);
    }

    #[test]
    fn infinite_cells_follow_the_open_edge() {
        let table = parse_csv(b"v\n-inf\n1.0\n2.0\ninf\n").unwrap();
        let mut filters = init_filter_state(&table);
        assert_eq!(filters["v"], RangeFilter::new(1.0, 2.0));
        assert_eq!(filtered_indices(&table, &filters), vec![0, 1, 2, 3]);

        set_range(&mut filters, "v", 1.0, 1.5);
        assert_eq!(filtered_indices(&table, &filters), vec![0, 1]);

        set_range(&mut filters, "v", 1.5, 2.0);
        assert_eq!(filtered_indices(&table, &filters), vec![2, 3]);
    }

    #[test]
    fn nan_bounds_are_ignored() {
        let mut f = RangeFilter::new(0.0, 10.0);
        assert!(!f.set(f64::NAN, 5.0));
        assert_eq!(f, RangeFilter::new(0.0, 10.0));
    }
}
