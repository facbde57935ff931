//! Structured error types for grain-size workbook loading and analysis.

use std::path::PathBuf;

/// All errors the library can return.
///
/// Conditions that only degrade the output (missing sentinel row, unparsable
/// depth intervals, absent percentile columns) are logged instead.
#[derive(Debug, thiserror::Error)]
pub enum GrainSizeError {
    /// The workbook file could not be opened or recognised.
    #[error("opening workbook {path}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// None of the candidate sheet names could be read.
    #[error("no readable sheet among {tried:?} (last error: {last})")]
    SheetNotFound { tried: Vec<String>, last: String },

    /// A column the loader relies on is missing from a sheet.
    #[error("sheet '{sheet}' has no '{column}' column")]
    MissingColumn { sheet: String, column: String },

    /// Two Sample Info rows share a sample number.
    #[error("sample number {sample_number} appears more than once")]
    DuplicateSampleNumber { sample_number: i64 },

    /// A station label reappears after another station's block.
    #[error("station '{station}' is not contiguous (reappears at sample {sample_number})")]
    InterleavedStation { station: String, sample_number: i64 },

    /// Station labels and sample numbers differ in length.
    #[error("{samples} sample numbers but {stations} station labels")]
    LengthMismatch { samples: usize, stations: usize },

    #[error("unknown station '{0}'")]
    UnknownStation(String),

    /// A piece of a modal-size field is not a number.
    #[error("sample {sample_number}: cannot parse mode '{value}'")]
    ModeParse { sample_number: i64, value: String },

    /// Configuration file could not be parsed.
    #[error("parsing config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Report output could not be written.
    #[error("CSV output: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GrainSizeError>;
