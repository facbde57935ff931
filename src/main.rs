use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};

use grainsize_layers::report::{summarize_workbook, write_csv, write_json};
use grainsize_layers::{load_workbook, LoadOptions};

/// Usage: `grainsize-layers [CONFIG.json] [--json]`
///
/// Without a config file the lab defaults are used (`L712AK.xls` in the
/// working directory). Set `RUST_LOG=debug` for loader diagnostics.
fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let mut config = None;
    let mut json = false;
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json = true;
        } else {
            config = Some(arg);
        }
    }

    let options = match &config {
        Some(path) => LoadOptions::from_json_file(Path::new(path))
            .with_context(|| format!("loading config {path}"))?,
        None => LoadOptions::default(),
    };

    let workbook = load_workbook(&options)
        .with_context(|| format!("loading {}", options.workbook.display()))?;
    log::info!(
        "{} stations: {}",
        workbook.stations.len(),
        workbook.station_names().join(", ")
    );

    let summaries = summarize_workbook(&workbook).context("summarizing layers")?;
    let stdout = io::stdout().lock();
    if json {
        write_json(&summaries, stdout).context("writing JSON")?;
    } else {
        write_csv(&summaries, stdout).context("writing CSV")?;
    }
    Ok(())
}
