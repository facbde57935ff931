use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Display;

use calamine::{open_workbook_auto, Data, Range, Reader};

use super::layers::split_layers;
use super::model::{CellValue, SampleRecord, SampleTable};
use super::stations::StationIndex;
use crate::config::LoadOptions;
use crate::error::{GrainSizeError, Result};

/// Column attached to every master row with the sample's station.
pub const STATION_COLUMN: &str = "Station Name";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the grain-size and Sample Info sheets of a lab workbook and join them
/// into one master table keyed by sample number.
///
/// The file format is picked from the extension (`.xls`, `.xlsx`, `.ods`, …).
/// The grain-size sheet is the first readable name of
/// [`LoadOptions::sheet_names`].
pub fn load_workbook(options: &LoadOptions) -> Result<LoadedWorkbook> {
    let path = &options.workbook;
    let mut workbook =
        open_workbook_auto(path).map_err(|source| GrainSizeError::Workbook {
            path: path.clone(),
            source,
        })?;

    let (sheet, grain_range) =
        resolve_sheet(&options.sheet_names(), |name| workbook.worksheet_range(name))?;
    log::debug!("reading grain-size data from sheet '{sheet}'");
    let grain = read_sheet(&sheet, &grain_range, options.header_row);

    let info_name = options.sample_info_sheet.clone();
    let (_, info_range) =
        resolve_sheet(&[info_name.clone()], |name| workbook.worksheet_range(name))?;
    let info = read_sheet(&info_name, &info_range, options.header_row);

    assemble(&grain, &info, options)
}

/// Try each sheet name in order and return the first that reads.
///
/// Every failure is logged; when all fail the last one is surfaced.
pub fn resolve_sheet<T, E, F>(candidates: &[String], mut read: F) -> Result<(String, T)>
where
    E: Display,
    F: FnMut(&str) -> std::result::Result<T, E>,
{
    let mut last = String::from("no sheet names configured");
    for name in candidates {
        match read(name) {
            Ok(value) => return Ok((name.clone(), value)),
            Err(e) => {
                log::debug!("sheet '{name}' not readable: {e}");
                last = e.to_string();
            }
        }
    }
    Err(GrainSizeError::SheetNotFound {
        tried: candidates.to_vec(),
        last,
    })
}

// ---------------------------------------------------------------------------
// Raw sheets
// ---------------------------------------------------------------------------

/// A worksheet split into its header row and the data rows below it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawSheet {
    /// Build from an absolute cell grid (row 0 = first sheet row).
    /// Rows above `header_row` are titles and are dropped.
    pub fn from_grid(name: &str, mut grid: Vec<Vec<CellValue>>, header_row: usize) -> Self {
        if grid.len() <= header_row {
            return RawSheet {
                name: name.to_string(),
                ..Default::default()
            };
        }
        let rows = grid.split_off(header_row + 1);
        let header = grid[header_row]
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if cell.is_null() {
                    format!("Unnamed: {i}")
                } else {
                    cell.to_string()
                }
            })
            .collect();
        RawSheet {
            name: name.to_string(),
            header,
            rows,
        }
    }

    fn column_index(&self, column: &str) -> Result<usize> {
        self.header
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| GrainSizeError::MissingColumn {
                sheet: self.name.clone(),
                column: column.to_string(),
            })
    }
}

/// Convert a calamine range into a [`RawSheet`].
///
/// Calamine trims the used range, so the range offset is padded back to keep
/// `header_row` an absolute sheet row.
pub fn read_sheet(name: &str, range: &Range<Data>, header_row: usize) -> RawSheet {
    let (row0, col0) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut grid: Vec<Vec<CellValue>> = vec![Vec::new(); row0];
    for row in range.rows() {
        let mut cells = vec![CellValue::Null; col0];
        cells.extend(row.iter().map(cell_from_data));
        grid.push(cells);
    }
    RawSheet::from_grid(name, grid, header_row)
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) => CellValue::Date(data.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Date(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Null,
    }
}

// ---------------------------------------------------------------------------
// Master table assembly
// ---------------------------------------------------------------------------

/// Everything loaded from one workbook.
#[derive(Debug, Clone)]
pub struct LoadedWorkbook {
    /// Sample Info rows joined with grain-size rows, Sample Info order.
    pub master: SampleTable,
    pub stations: StationIndex,
    /// Grain-size sheet actually read.
    pub sheet: String,
    pub interval_column: String,
    pub layer_gap: f64,
}

impl LoadedWorkbook {
    /// Distinct station names, first-occurrence order.
    pub fn station_names(&self) -> Vec<&str> {
        self.stations.names()
    }

    pub fn sample(&self, sample_number: i64) -> Option<&SampleRecord> {
        self.master.get(sample_number)
    }

    /// All rows of one station.
    pub fn station_table(&self, station: &str) -> Option<SampleTable> {
        self.stations
            .samples(station)
            .map(|samples| self.master.select(samples))
    }

    /// Depositional layers of one station.
    pub fn layers(&self, station: &str) -> Result<Vec<SampleTable>> {
        split_layers(
            &self.master,
            &self.stations,
            station,
            &self.interval_column,
            self.layer_gap,
        )
    }
}

/// Join an already-read grain-size sheet and Sample Info sheet.
///
/// The grain-size sheet's first column is the sample label, the Sample Info
/// sheet's first column is the station name. Sample Info rows define the
/// master table's rows and order; grain-size columns are attached to the row
/// with the same sample number when there is one.
pub fn assemble(
    grain: &RawSheet,
    info: &RawSheet,
    options: &LoadOptions,
) -> Result<LoadedWorkbook> {
    let grain_rows = sample_rows(grain, options);
    let grain_by_number = index_by_sample_number(&grain_rows);

    let number_col = info.column_index(&options.sample_number_column)?;
    let mut column_names: Vec<String> = info.header.iter().skip(1).cloned().collect();
    let info_columns: HashSet<&str> = info.header.iter().map(String::as_str).collect();
    let grain_columns: Vec<(usize, &String)> = grain
        .header
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, name)| !info_columns.contains(name.as_str()))
        .collect();
    column_names.extend(grain_columns.iter().map(|(_, name)| (*name).clone()));
    column_names.push(STATION_COLUMN.to_string());

    let mut rows = Vec::new();
    let mut seen = HashSet::new();
    for info_row in &info.rows {
        let Some(sample_number) = info_row.get(number_col).and_then(sample_number_of) else {
            continue;
        };
        if !seen.insert(sample_number) {
            return Err(GrainSizeError::DuplicateSampleNumber { sample_number });
        }

        let station = info_row
            .first()
            .map(|c| c.to_string().trim().to_string())
            .unwrap_or_default();
        if station.is_empty() {
            log::warn!("sample {sample_number} has no station name");
        }

        let mut cells = BTreeMap::new();
        for (i, name) in info.header.iter().enumerate().skip(1) {
            cells.insert(name.clone(), cell_at(info_row, i));
        }
        match grain_by_number.get(&sample_number) {
            Some(grain_row) => {
                for (i, name) in &grain_columns {
                    cells.insert((*name).clone(), cell_at(grain_row, *i));
                }
            }
            None => log::debug!("sample {sample_number} has no grain-size row"),
        }
        cells.insert(STATION_COLUMN.to_string(), CellValue::String(station.clone()));

        rows.push(SampleRecord {
            sample_number,
            station,
            cells,
        });
    }

    let master = SampleTable::new(rows, column_names);
    let labels: Vec<String> = master.rows.iter().map(|r| r.station.clone()).collect();
    let stations = StationIndex::build(&master.sample_numbers(), &labels)?;
    log::info!(
        "loaded {} samples in {} stations from sheet '{}'",
        master.len(),
        stations.len(),
        grain.name
    );

    Ok(LoadedWorkbook {
        master,
        stations,
        sheet: grain.name.clone(),
        interval_column: options.interval_column.clone(),
        layer_gap: options.layer_gap,
    })
}

/// Grain-size rows that describe samples: blank rows, the reference table
/// below the sentinel and (unless requested) lab duplicates are removed.
fn sample_rows<'a>(grain: &'a RawSheet, options: &LoadOptions) -> Vec<&'a Vec<CellValue>> {
    let labelled = grain
        .rows
        .iter()
        .filter(|row| row.first().is_some_and(|c| !c.is_null()));

    let mut rows = Vec::new();
    let mut found_sentinel = false;
    for row in labelled {
        if row[0].to_string().trim() == options.sentinel {
            found_sentinel = true;
            break;
        }
        rows.push(row);
    }
    if !found_sentinel {
        log::warn!(
            "could not find '{}' table at bottom of sheet '{}'",
            options.sentinel,
            grain.name
        );
    }

    if !options.load_duplicates {
        let before = rows.len();
        rows.retain(|row| !row[0].to_string().contains(&options.duplicate_marker));
        log::debug!("dropped {} duplicate samples", before - rows.len());
    }
    rows
}

fn index_by_sample_number<'a>(rows: &[&'a Vec<CellValue>]) -> HashMap<i64, &'a Vec<CellValue>> {
    let mut by_number = HashMap::new();
    for row in rows {
        let label = &row[0];
        match sample_number_of(label) {
            Some(n) if by_number.contains_key(&n) => {
                log::warn!("grain-size row '{label}' repeats sample {n}, keeping the first");
            }
            Some(n) => {
                by_number.insert(n, *row);
            }
            None => log::warn!("grain-size row '{label}' has no sample number, skipped"),
        }
    }
    by_number
}

/// Sample number of a label cell: the number itself, or the first run of
/// digits in a text label such as `"15 duplicate"`.
pub fn sample_number_of(cell: &CellValue) -> Option<i64> {
    match cell {
        CellValue::Integer(i) => Some(*i),
        CellValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
        CellValue::String(s) => {
            let digits: String = s
                .chars()
                .skip_while(|c| !c.is_ascii_digit())
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse().ok()
        }
        _ => None,
    }
}

fn cell_at(row: &[CellValue], i: usize) -> CellValue {
    row.get(i).cloned().unwrap_or(CellValue::Null)
}
