use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::ops::Range;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a lab worksheet
// ---------------------------------------------------------------------------

/// A dynamically-typed worksheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Date/time cell kept as text (ISO-8601 when the workbook provides it).
    Date(String),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => write!(f, ""),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell. Text is not parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// `Null` or whitespace-only text.
    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// SampleRecord – one row of the master table
// ---------------------------------------------------------------------------

/// A single sediment sample (one row of the master table).
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    /// Lab sample number; unique key of the row.
    pub sample_number: i64,
    /// Station the sample was taken at.
    pub station: String,
    /// Every carried lab column: column_name → value.
    pub cells: BTreeMap<String, CellValue>,
}

impl SampleRecord {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }
}

// ---------------------------------------------------------------------------
// SampleTable – an ordered view over sample rows
// ---------------------------------------------------------------------------

/// Ordered rows plus the column names in source-sheet order.
///
/// The master table, a station's sub-table and each layer are all
/// `SampleTable`s; sub-tables are cloned out of the master so every view is
/// independent and read-only after construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleTable {
    pub rows: Vec<SampleRecord>,
    pub column_names: Vec<String>,
}

impl SampleTable {
    pub fn new(rows: Vec<SampleRecord>, column_names: Vec<String>) -> Self {
        SampleTable { rows, column_names }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sample numbers in row order.
    pub fn sample_numbers(&self) -> Vec<i64> {
        self.rows.iter().map(|r| r.sample_number).collect()
    }

    /// Look up a row by sample number.
    pub fn get(&self, sample_number: i64) -> Option<&SampleRecord> {
        self.rows.iter().find(|r| r.sample_number == sample_number)
    }

    /// Rows for `sample_numbers`, in the order requested. Unknown numbers are
    /// skipped.
    pub fn select(&self, sample_numbers: &[i64]) -> SampleTable {
        let rows = sample_numbers
            .iter()
            .filter_map(|n| self.get(*n).cloned())
            .collect();
        SampleTable::new(rows, self.column_names.clone())
    }

    /// Contiguous run of rows by position.
    pub fn slice(&self, range: Range<usize>) -> SampleTable {
        SampleTable::new(self.rows[range].to_vec(), self.column_names.clone())
    }

    /// Stack tables in order. Columns are the union, first-seen order.
    pub fn concat(tables: &[SampleTable]) -> SampleTable {
        let mut seen = HashSet::new();
        let mut column_names = Vec::new();
        for col in tables.iter().flat_map(|t| t.column_names.iter()) {
            if seen.insert(col.as_str()) {
                column_names.push(col.clone());
            }
        }
        let rows = tables.iter().flat_map(|t| t.rows.iter().cloned()).collect();
        SampleTable::new(rows, column_names)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_names.iter().any(|c| c == column)
    }

    /// Values of one column in row order; rows lacking the column yield `Null`.
    pub fn column<'a>(
        &'a self,
        column: &'a str,
    ) -> impl Iterator<Item = (i64, &'a CellValue)> + 'a {
        self.rows.iter().map(move |r| {
            (
                r.sample_number,
                r.cells.get(column).unwrap_or(&CellValue::Null),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: i64, station: &str) -> SampleRecord {
        let mut cells = BTreeMap::new();
        cells.insert("Interval".to_string(), CellValue::String(format!("{n}-{}", n + 1)));
        SampleRecord {
            sample_number: n,
            station: station.to_string(),
            cells,
        }
    }

    fn table() -> SampleTable {
        SampleTable::new(
            vec![record(1, "A"), record(2, "A"), record(3, "B")],
            vec!["Interval".to_string()],
        )
    }

    #[test]
    fn select_keeps_requested_order_and_skips_unknown() {
        let t = table().select(&[3, 99, 1]);
        assert_eq!(t.sample_numbers(), vec![3, 1]);
        assert_eq!(t.column_names, vec!["Interval".to_string()]);
    }

    #[test]
    fn concat_of_slices_reconstructs_table() {
        let t = table();
        let parts = [t.slice(0..1), t.slice(1..3)];
        assert_eq!(SampleTable::concat(&parts), t);
    }

    #[test]
    fn column_yields_null_for_missing_cells() {
        let t = table();
        let values: Vec<_> = t.column("Mode").map(|(_, v)| v.clone()).collect();
        assert_eq!(values, vec![CellValue::Null; 3]);
    }

    #[test]
    fn blank_text_counts_as_null() {
        assert!(CellValue::String("   ".into()).is_null());
        assert!(!CellValue::Float(0.0).is_null());
        assert_eq!(CellValue::Integer(4).as_f64(), Some(4.0));
    }
}
