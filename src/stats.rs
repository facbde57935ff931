//! Per-sample grain-size statistics read from a layer's precomputed columns.
//!
//! All sizes are in phi units (φ = -log2(size in mm)).

use crate::data::model::{CellValue, SampleTable};
use crate::error::{GrainSizeError, Result};

/// Modal-size column written by the lab software.
pub const MODE_COLUMN: &str = " Mode in Phi";

/// Percentiles the lab usually computes.
pub const STANDARD_PERCENTILES: [u32; 9] = [5, 10, 16, 25, 50, 75, 84, 90, 95];

/// Text the lab writes when a sample has no mode.
const NO_MODE: &str = "None";

/// Column holding the graphic `d{percentile}` size, e.g. `" D50 Phi"`.
pub fn percentile_column(percentile: u32) -> String {
    format!(" D{percentile} Phi")
}

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

/// Modes of every sample of a layer, in row order.
///
/// A numeric cell is a single mode; text is a `&`-separated list
/// (`"2.5 & 3.1"`). Samples the lab marked `None` have no entry at all. A
/// blank or missing cell yields `[NaN]`, so every other sample keeps its
/// place in the output.
pub fn modes(layer: &SampleTable) -> Result<Vec<Vec<f64>>> {
    let mut mode_list = Vec::new();
    for (sample_number, cell) in layer.column(MODE_COLUMN) {
        match cell {
            CellValue::String(text) if text.trim() == NO_MODE => {}
            CellValue::String(text) if !cell.is_null() => {
                mode_list.push(parse_modes(sample_number, text)?);
            }
            _ => match cell.as_f64() {
                Some(v) => mode_list.push(vec![v]),
                None => {
                    log::warn!("sample {sample_number}: no modal size recorded");
                    mode_list.push(vec![f64::NAN]);
                }
            },
        }
    }
    Ok(mode_list)
}

fn parse_modes(sample_number: i64, text: &str) -> Result<Vec<f64>> {
    text.split('&')
        .map(|piece| {
            piece
                .trim()
                .parse::<f64>()
                .map_err(|_| GrainSizeError::ModeParse {
                    sample_number,
                    value: text.to_string(),
                })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Percentiles
// ---------------------------------------------------------------------------

/// Graphic `d{percentile}` size of a single-sample layer.
///
/// Returns `None` (and logs a warning) when the lab did not compute that
/// percentile. With several rows only the first sample is read.
pub fn graphic_percentile(layer: &SampleTable, percentile: u32) -> Option<f64> {
    if layer.len() > 1 {
        log::debug!(
            "d{percentile} requested for {} samples, using the first",
            layer.len()
        );
    }
    graphic_percentiles(layer, percentile)?.into_iter().next().flatten()
}

/// Graphic `d{percentile}` size of each sample of a layer, row order.
///
/// `None` for the whole layer when the column is absent; `None` for a sample
/// whose cell is not numeric.
pub fn graphic_percentiles(layer: &SampleTable, percentile: u32) -> Option<Vec<Option<f64>>> {
    let column = percentile_column(percentile);
    if !layer.has_column(&column) {
        log::warn!(
            "no percentile calculated for d{percentile}; use one of {:?}",
            STANDARD_PERCENTILES
        );
        return None;
    }
    Some(layer.column(&column).map(|(_, cell)| cell.as_f64()).collect())
}

// ---------------------------------------------------------------------------
// Unit conversion
// ---------------------------------------------------------------------------

/// Grain diameter in millimetres for a phi size.
pub fn phi_to_mm(phi: f64) -> f64 {
    (-phi).exp2()
}

/// Phi size for a grain diameter in millimetres.
pub fn mm_to_phi(mm: f64) -> f64 {
    -mm.log2()
}
