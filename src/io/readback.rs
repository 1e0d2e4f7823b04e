//! Read exported result files back for plotting.
//!
//! The `plot` subcommand works from files a previous `run` or `sweep` wrote,
//! so only the columns a plot needs are required here.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::domain::KeplerPair;
use crate::error::AppError;
use crate::io::ingest::{build_header_map, find_column};

#[derive(Debug, Clone, Copy, Deserialize)]
struct KeplerRow {
    x: f64,
    y: f64,
    mass_estimation: f64,
}

/// One sweep row reduced to what the sweep plot shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    pub threshold: f64,
    pub percent_error_mean: f64,
    pub disqualified: usize,
}

/// Read a single-run Kepler data file.
pub fn read_kepler_csv(path: &Path) -> Result<Vec<(KeplerPair, f64)>, AppError> {
    read_kepler(open(path)?)
}

pub fn read_kepler<R: Read>(input: R) -> Result<Vec<(KeplerPair, f64)>, AppError> {
    let mut reader = csv::Reader::from_reader(input);
    let mut out = Vec::new();
    for result in reader.deserialize::<KeplerRow>() {
        let row = result.map_err(|e| AppError::config(format!("Invalid Kepler data row: {e}")))?;
        out.push((KeplerPair { x: row.x, y: row.y }, row.mass_estimation));
    }
    Ok(out)
}

/// Read a sweep result file, compact or extended layout.
///
/// In the extended layout the first method's `percent_error_mean` column is used.
pub fn read_sweep_csv(path: &Path) -> Result<Vec<SweepPoint>, AppError> {
    read_sweep(open(path)?)
}

pub fn read_sweep<R: Read>(input: R) -> Result<Vec<SweepPoint>, AppError> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader
        .headers()
        .map_err(|e| AppError::config(format!("Failed to read sweep header: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let threshold_col = find_column(&header_map, &["max_eccentricity"])?;
    let disqualified_col = find_column(&header_map, &["sats_disqualified"])?;
    let error_col = headers
        .iter()
        .position(|h| h.trim().to_ascii_lowercase().ends_with("percent_error_mean"))
        .ok_or_else(|| AppError::config("Missing required column: `percent_error_mean`"))?;

    let mut out = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| AppError::config(format!("Invalid sweep row {}: {e}", idx + 1)))?;
        let number = |col: usize| -> Result<f64, AppError> {
            let raw = record.get(col).unwrap_or("").trim();
            raw.parse::<f64>()
                .map_err(|_| AppError::config(format!("Invalid number `{raw}` in sweep row {}", idx + 1)))
        };
        let disqualified_raw = record.get(disqualified_col).unwrap_or("").trim();
        let disqualified = disqualified_raw.parse::<usize>().map_err(|_| {
            AppError::config(format!(
                "Invalid count `{disqualified_raw}` in sweep row {}",
                idx + 1
            ))
        })?;

        out.push(SweepPoint {
            threshold: number(threshold_col)?,
            percent_error_mean: number(error_col)?,
            disqualified,
        });
    }
    Ok(out)
}

fn open(path: &Path) -> Result<File, AppError> {
    File::open(path).map_err(|e| AppError::config(format!("Failed to open '{}': {e}", path.display())))
}
