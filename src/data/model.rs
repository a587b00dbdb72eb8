use std::fmt;

/// Name given to the single label column carried into the combined table.
pub const TARGET_COLUMN: &str = "Target";

// ---------------------------------------------------------------------------
// Cell – a single numeric measurement
// ---------------------------------------------------------------------------

/// One sensor reading. Missing readings are expected in the raw data and
/// are kept as `None` rather than rejected.
pub type Cell = Option<f64>;

/// Render a cell the way the CSV backup stores it: missing values become an
/// empty field, whole numbers keep a trailing `.0`, and magnitudes outside
/// `[1e-4, 1e16)` switch to exponent form (`1e+16`, `1.5e-07`).
pub fn format_cell(cell: Cell) -> String {
    let v = match cell {
        None => return String::new(),
        Some(v) if v.is_nan() => return String::new(),
        Some(v) => v,
    };
    if !v.is_finite() {
        return format!("{v}");
    }
    if v == 0.0 {
        return format!("{v:.1}");
    }

    // `{:e}` gives the shortest round-tripping mantissa, e.g. `1.5e-7`.
    let sci = format!("{v:e}");
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    if !(-4..16).contains(&exp) {
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exp.abs());
    }
    if v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

// ---------------------------------------------------------------------------
// FeatureTable – the sensor matrix
// ---------------------------------------------------------------------------

/// Positionally indexed numeric table, one row per wafer.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    /// Number of columns; every row has exactly this many cells.
    width: usize,
    rows: Vec<Vec<Cell>>,
}

impl FeatureTable {
    /// Build a table from rows, padding short rows with missing cells.
    ///
    /// The width is the longest row. Callers that need stricter shape checks
    /// (the text parser does) validate before calling this.
    pub fn from_rows(mut rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, None);
        }
        FeatureTable { width, rows }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Count of missing cells across the whole table.
    pub fn missing_cells(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|c| c.map_or(true, f64::is_nan))
            .count()
    }
}

// ---------------------------------------------------------------------------
// LabelTable – pass/fail outcome per wafer
// ---------------------------------------------------------------------------

/// One row of the label file: the outcome sentinel and whatever followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRecord {
    /// `-1` = pass, `1` = fail in the SECOM encoding.
    pub outcome: i64,
    /// Remaining fields (the timestamp), never carried into the merge.
    pub rest: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    pub records: Vec<LabelRecord>,
}

impl LabelTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The first column only, as the outcome vector.
    pub fn outcomes(&self) -> Vec<i64> {
        self.records.iter().map(|r| r.outcome).collect()
    }
}

// ---------------------------------------------------------------------------
// CombinedTable – features with the appended Target column
// ---------------------------------------------------------------------------

/// Feature table plus one outcome column, aligned by row position.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedTable {
    features: FeatureTable,
    target: Vec<i64>,
}

impl CombinedTable {
    /// Only the merge step constructs this, after checking the row counts.
    pub(crate) fn new(features: FeatureTable, target: Vec<i64>) -> Self {
        debug_assert_eq!(features.len(), target.len());
        CombinedTable { features, target }
    }

    /// Number of wafers.
    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    /// Sensor columns plus the target column.
    pub fn column_count(&self) -> usize {
        self.features.width() + 1
    }

    /// Number of sensor columns (everything but `Target`).
    pub fn sensor_count(&self) -> usize {
        self.features.width()
    }

    /// Header row: `0`, `1`, …, `N-1`, `Target`.
    pub fn column_names(&self) -> Vec<String> {
        (0..self.features.width())
            .map(|i| i.to_string())
            .chain(std::iter::once(TARGET_COLUMN.to_string()))
            .collect()
    }

    pub fn features(&self) -> &FeatureTable {
        &self.features
    }

    pub fn target(&self) -> &[i64] {
        &self.target
    }

    /// Iterate rows as `(sensor cells, target)`.
    pub fn rows(&self) -> impl Iterator<Item = (&[Cell], i64)> + '_ {
        self.features
            .rows()
            .iter()
            .map(Vec::as_slice)
            .zip(self.target.iter().copied())
    }
}

impl fmt::Display for CombinedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} wafers x {} sensors (+{})",
            self.len(),
            self.sensor_count(),
            TARGET_COLUMN
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_rows_are_padded_with_missing_cells() {
        let table = FeatureTable::from_rows(vec![vec![Some(1.0), Some(2.0)], vec![Some(3.0)]]);
        assert_eq!(table.width(), 2);
        assert_eq!(table.rows()[1], vec![Some(3.0), None]);
        assert_eq!(table.missing_cells(), 1);
    }

    #[test]
    fn combined_header_ends_with_target() {
        let features = FeatureTable::from_rows(vec![vec![Some(0.5); 3]]);
        let combined = CombinedTable::new(features, vec![-1]);
        assert_eq!(combined.column_names(), vec!["0", "1", "2", "Target"]);
        assert_eq!(combined.column_count(), 4);
        assert_eq!(combined.sensor_count(), 3);
    }

    #[test]
    fn cells_format_like_the_backup_file() {
        assert_eq!(format_cell(Some(3030.93)), "3030.93");
        assert_eq!(format_cell(Some(0.0)), "0.0");
        assert_eq!(format_cell(Some(-12.0)), "-12.0");
        assert_eq!(format_cell(None), "");
        assert_eq!(format_cell(Some(f64::NAN)), "");
    }

    #[test]
    fn extreme_magnitudes_use_exponent_form() {
        assert_eq!(format_cell(Some(1e16)), "1e+16");
        assert_eq!(format_cell(Some(1e20)), "1e+20");
        assert_eq!(format_cell(Some(-2.5e20)), "-2.5e+20");
        assert_eq!(format_cell(Some(1e-7)), "1e-07");
        assert_eq!(format_cell(Some(1.5e-5)), "1.5e-05");
        assert_eq!(format_cell(Some(0.0001)), "0.0001");
        assert_eq!(format_cell(Some(123456789012345.0)), "123456789012345.0");
        assert_eq!(format_cell(Some(f64::INFINITY)), "inf");
    }
}
