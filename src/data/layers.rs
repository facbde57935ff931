use super::model::{CellValue, SampleTable};
use super::stations::StationIndex;
use crate::error::{GrainSizeError, Result};

// ---------------------------------------------------------------------------
// Depth intervals
// ---------------------------------------------------------------------------

/// Sample depth range, `top` shallower than `bottom`, in the station's units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthInterval {
    pub top: f64,
    pub bottom: f64,
}

/// Parse a lab interval string such as `"12-14"` or `" 0 - 2.5 "`.
///
/// Only the first two `-`-separated pieces are used; a trailing third piece
/// (seen in some lab sheets as a note) is ignored.
pub fn parse_interval(text: &str) -> Option<DepthInterval> {
    let mut pieces = text.split('-');
    let top = pieces.next()?.trim().parse::<f64>().ok()?;
    let bottom = pieces.next()?.trim().parse::<f64>().ok()?;
    Some(DepthInterval { top, bottom })
}

/// Parse the interval of every row; `None` if any row fails.
pub fn station_intervals(table: &SampleTable, column: &str) -> Option<Vec<DepthInterval>> {
    table
        .column(column)
        .map(|(_, cell)| match cell {
            CellValue::String(s) => parse_interval(s),
            _ => None,
        })
        .collect()
}

/// Row positions after which a new layer starts.
///
/// Position `i` is a boundary when the next sample's top lies at least
/// `gap` away from sample `i`'s bottom.
pub fn layer_boundaries(intervals: &[DepthInterval], gap: f64) -> Vec<usize> {
    intervals
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| (pair[1].top - pair[0].bottom).abs() >= gap)
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Layer splitting
// ---------------------------------------------------------------------------

/// Split one station into depositional layers.
///
/// Layers are contiguous runs of the station's samples in sheet order and
/// together cover every sample exactly once: `N` boundaries give `N + 1`
/// layers. A station whose intervals cannot all be parsed is returned as a
/// single layer.
pub fn split_layers(
    master: &SampleTable,
    stations: &StationIndex,
    station: &str,
    interval_column: &str,
    gap: f64,
) -> Result<Vec<SampleTable>> {
    let samples = stations
        .samples(station)
        .ok_or_else(|| GrainSizeError::UnknownStation(station.to_string()))?;
    let st_data = master.select(samples);

    if st_data.len() <= 1 {
        return Ok(vec![st_data]);
    }

    let Some(intervals) = station_intervals(&st_data, interval_column) else {
        log::warn!(
            "station '{station}': unparsable '{interval_column}' values, treating as one layer"
        );
        return Ok(vec![st_data]);
    };

    let boundaries = layer_boundaries(&intervals, gap);
    log::debug!(
        "station '{station}': {} samples, {} layer boundaries",
        st_data.len(),
        boundaries.len()
    );

    let mut layers = Vec::with_capacity(boundaries.len() + 1);
    let mut start = 0;
    for b in boundaries {
        layers.push(st_data.slice(start..b + 1));
        start = b + 1;
    }
    layers.push(st_data.slice(start..st_data.len()));
    Ok(layers)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use test_case::test_case;

    use super::*;
    use crate::data::model::SampleRecord;

    fn station_table(station: &str, first: i64, intervals: &[&str]) -> SampleTable {
        let rows = intervals
            .iter()
            .enumerate()
            .map(|(i, interval)| {
                let mut cells = BTreeMap::new();
                cells.insert("Interval".to_string(), CellValue::String(interval.to_string()));
                SampleRecord {
                    sample_number: first + i as i64,
                    station: station.to_string(),
                    cells,
                }
            })
            .collect();
        SampleTable::new(rows, vec!["Interval".to_string()])
    }

    fn split(intervals: &[&str]) -> (SampleTable, Vec<SampleTable>) {
        let table = station_table("ST", 1, intervals);
        let labels = vec!["ST".to_string(); table.len()];
        let index = StationIndex::build(&table.sample_numbers(), &labels).unwrap();
        let layers = split_layers(&table, &index, "ST", "Interval", 0.5).unwrap();
        (table, layers)
    }

    #[test_case("0-2", 0.0, 2.0 ; "plain")]
    #[test_case(" 2.5 - 4 ", 2.5, 4.0 ; "spaced")]
    #[test_case("10-12-note", 10.0, 12.0 ; "extra piece ignored")]
    fn parses_intervals(text: &str, top: f64, bottom: f64) {
        assert_eq!(parse_interval(text), Some(DepthInterval { top, bottom }));
    }

    #[test_case("" ; "empty")]
    #[test_case("12" ; "single number")]
    #[test_case("a-b" ; "not numeric")]
    fn rejects_malformed_intervals(text: &str) {
        assert_eq!(parse_interval(text), None);
    }

    #[test]
    fn single_sample_station_is_one_layer() {
        let (table, layers) = split(&["0-2"]);
        assert_eq!(layers, vec![table]);
    }

    #[test]
    fn abutting_intervals_stay_one_layer() {
        let (table, layers) = split(&["0-2", "2-4", "4.4-6"]);
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0], table);
    }

    #[test]
    fn single_gap_splits_after_that_sample() {
        let (_, layers) = split(&["0-2", "2-4", "10-12", "12-14"]);
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].sample_numbers(), vec![1, 2]);
        assert_eq!(layers[1].sample_numbers(), vec![3, 4]);
    }

    #[test]
    fn single_gap_after_first_sample_still_gives_two_layers() {
        // A lone boundary right after the first sample is a real split, not
        // the one-sample case.
        let (_, layers) = split(&["0-2", "5-7", "7-9"]);
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].sample_numbers(), vec![1]);
        assert_eq!(layers[1].sample_numbers(), vec![2, 3]);
    }

    #[test]
    fn gap_exactly_at_threshold_is_a_boundary() {
        let (_, layers) = split(&["0-2", "2.5-3", "3.4-4"]);
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].sample_numbers(), vec![1]);
    }

    #[test]
    fn layers_concatenate_back_to_station() {
        let (table, layers) = split(&["0-1", "3-4", "4-5", "8-9", "20-21"]);
        assert_eq!(layers.len(), 4);
        assert_eq!(SampleTable::concat(&layers), table);
    }

    #[test]
    fn unparsable_interval_falls_back_to_one_layer() {
        let (table, layers) = split(&["0-2", "surface", "10-12"]);
        assert_eq!(layers, vec![table]);
    }

    #[test]
    fn unknown_station_is_an_error() {
        let table = station_table("ST", 1, &["0-2"]);
        let index = StationIndex::build(&[1], &["ST".to_string()]).unwrap();
        assert!(matches!(
            split_layers(&table, &index, "NOPE", "Interval", 0.5),
            Err(GrainSizeError::UnknownStation(name)) if name == "NOPE"
        ));
    }

    #[test]
    fn boundaries_use_absolute_gap() {
        let intervals = [
            DepthInterval { top: 0.0, bottom: 2.0 },
            DepthInterval { top: 1.0, bottom: 3.0 },
            DepthInterval { top: 3.2, bottom: 4.0 },
        ];
        // Overlap of 1.0 counts as a gap; 0.2 does not.
        assert_eq!(layer_boundaries(&intervals, 0.5), vec![0]);
    }
}
