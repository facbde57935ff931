use std::io::Write;

use serde::Serialize;

use crate::data::layers::station_intervals;
use crate::data::loader::LoadedWorkbook;
use crate::error::Result;
use crate::stats::{graphic_percentiles, modes};

// ---------------------------------------------------------------------------
// Layer summaries
// ---------------------------------------------------------------------------

/// One row of the layer report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSummary {
    pub station: String,
    /// 1-based, shallowest first.
    pub layer: usize,
    pub samples: usize,
    pub first_sample: i64,
    pub last_sample: i64,
    /// Top of the shallowest sample; empty when intervals did not parse.
    pub top: Option<f64>,
    pub bottom: Option<f64>,
    /// Mean graphic d50 (phi) over samples that have one.
    pub d50_mean: Option<f64>,
    /// Modes per sample, samples separated by `;`.
    pub modes: String,
}

/// Summarize every layer of one station.
pub fn summarize_station(workbook: &LoadedWorkbook, station: &str) -> Result<Vec<LayerSummary>> {
    let layers = workbook.layers(station)?;
    let mut summaries = Vec::with_capacity(layers.len());

    for (i, layer) in layers.iter().enumerate() {
        let numbers = layer.sample_numbers();
        let (Some(&first_sample), Some(&last_sample)) = (numbers.first(), numbers.last()) else {
            continue;
        };

        let intervals = station_intervals(layer, &workbook.interval_column);
        let top = intervals.as_ref().and_then(|iv| iv.first()).map(|iv| iv.top);
        let bottom = intervals.as_ref().and_then(|iv| iv.last()).map(|iv| iv.bottom);

        let d50_mean = graphic_percentiles(layer, 50).and_then(|values| {
            let present: Vec<f64> = values.into_iter().flatten().collect();
            if present.is_empty() {
                None
            } else {
                Some(present.iter().sum::<f64>() / present.len() as f64)
            }
        });

        let mode_text = modes(layer)?
            .iter()
            .map(|sample| {
                sample
                    .iter()
                    .map(|m| m.to_string())
                    .collect::<Vec<_>>()
                    .join(" & ")
            })
            .collect::<Vec<_>>()
            .join("; ");

        summaries.push(LayerSummary {
            station: station.to_string(),
            layer: i + 1,
            samples: layer.len(),
            first_sample,
            last_sample,
            top,
            bottom,
            d50_mean,
            modes: mode_text,
        });
    }
    Ok(summaries)
}

/// Summaries of every station, station order then layer order.
pub fn summarize_workbook(workbook: &LoadedWorkbook) -> Result<Vec<LayerSummary>> {
    let mut all = Vec::new();
    for station in workbook.station_names() {
        all.extend(summarize_station(workbook, station)?);
    }
    Ok(all)
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Write summaries as CSV with a header row.
pub fn write_csv<W: Write>(summaries: &[LayerSummary], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for summary in summaries {
        csv_writer.serialize(summary)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write summaries as a pretty-printed JSON array.
pub fn write_json<W: Write>(summaries: &[LayerSummary], writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, summaries)?;
    Ok(())
}
