use std::collections::HashMap;

use crate::error::{GrainSizeError, Result};

// ---------------------------------------------------------------------------
// StationIndex – station name → ordered sample numbers
// ---------------------------------------------------------------------------

/// Stations in first-occurrence order, each with its samples in row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationIndex {
    entries: Vec<(String, Vec<i64>)>,
    position: HashMap<String, usize>,
}

impl StationIndex {
    /// Partition `sample_numbers` into per-station runs.
    ///
    /// `labels[i]` is the station of `sample_numbers[i]`, both in sheet row
    /// order. A station's run ends at the last row carrying its name and the
    /// next station starts right after, so every station must occupy one
    /// contiguous block; a name that reappears after a different station is
    /// rejected with [`GrainSizeError::InterleavedStation`].
    pub fn build(sample_numbers: &[i64], labels: &[String]) -> Result<Self> {
        if sample_numbers.len() != labels.len() {
            return Err(GrainSizeError::LengthMismatch {
                samples: sample_numbers.len(),
                stations: labels.len(),
            });
        }

        let mut index = StationIndex::default();
        for (&sample, label) in sample_numbers.iter().zip(labels) {
            match index.position.get(label).copied() {
                Some(pos) if pos + 1 == index.entries.len() => {
                    index.entries[pos].1.push(sample);
                }
                Some(_) => {
                    return Err(GrainSizeError::InterleavedStation {
                        station: label.clone(),
                        sample_number: sample,
                    });
                }
                None => {
                    index.position.insert(label.clone(), index.entries.len());
                    index.entries.push((label.clone(), vec![sample]));
                }
            }
        }
        log::debug!(
            "indexed {} samples into {} stations",
            sample_numbers.len(),
            index.entries.len()
        );
        Ok(index)
    }

    /// Distinct station names, first-occurrence order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Sample numbers of one station.
    pub fn samples(&self, station: &str) -> Option<&[i64]> {
        self.position
            .get(station)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[i64])> {
        self.entries
            .iter()
            .map(|(name, samples)| (name.as_str(), samples.as_slice()))
    }

    /// Number of stations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
