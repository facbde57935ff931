use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GrainSizeError, Result};

/// Gap between one sample's bottom and the next sample's top, in depth units,
/// at or above which a new layer starts.
pub const DEFAULT_LAYER_GAP: f64 = 0.5;

// ---------------------------------------------------------------------------
// LoadOptions
// ---------------------------------------------------------------------------

/// Everything the loader needs to know about one lab's workbook layout.
///
/// Every field has a default matching the sediment lab's files, so a JSON
/// config only has to name what differs:
///
/// ```json
/// { "workbook": "L801BK.xls", "load_duplicates": true }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Workbook to read.
    pub workbook: PathBuf,
    /// Explicit grain-size sheet. When set, no other name is tried.
    pub sheet: Option<String>,
    /// Grain-size sheet names tried in order when `sheet` is unset.
    pub sheet_candidates: Vec<String>,
    pub sample_info_sheet: String,
    /// Zero-based row holding column names; rows above it are titles.
    pub header_row: usize,
    /// First-column label starting the reference table below the samples.
    pub sentinel: String,
    /// Substring marking lab duplicate samples.
    pub duplicate_marker: String,
    pub load_duplicates: bool,
    /// Sample-number column of the Sample Info sheet.
    pub sample_number_column: String,
    /// Depth-interval column (`"top-bottom"`).
    pub interval_column: String,
    pub layer_gap: f64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            workbook: PathBuf::from("L712AK.xls"),
            sheet: None,
            sheet_candidates: vec!["SDSZ".to_string(), "Grain Size".to_string()],
            sample_info_sheet: "Sample Info".to_string(),
            header_row: 2,
            sentinel: "Lab Fraction Names".to_string(),
            duplicate_marker: "duplicate".to_string(),
            load_duplicates: false,
            sample_number_column: "Sample #".to_string(),
            interval_column: "Interval".to_string(),
            layer_gap: DEFAULT_LAYER_GAP,
        }
    }
}

impl LoadOptions {
    /// Options for `workbook` with every other setting at its default.
    pub fn for_workbook(workbook: impl Into<PathBuf>) -> Self {
        Self {
            workbook: workbook.into(),
            ..Default::default()
        }
    }

    /// Read options from a JSON file; absent keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|source| GrainSizeError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Grain-size sheet names to try, in order.
    pub fn sheet_names(&self) -> Vec<String> {
        match &self.sheet {
            Some(name) => vec![name.clone()],
            None => self.sheet_candidates.clone(),
        }
    }
}
