//! Load grain-size lab workbooks, index samples by station and split each
//! station into depositional layers.

pub mod config;
pub mod data;
pub mod error;
pub mod report;
pub mod stats;

#[cfg(test)]
mod test_utils;

pub use config::LoadOptions;
pub use data::loader::{load_workbook, LoadedWorkbook};
pub use data::model::{CellValue, SampleRecord, SampleTable};
pub use data::stations::StationIndex;
pub use error::{GrainSizeError, Result};
