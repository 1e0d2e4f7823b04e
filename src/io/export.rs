//! Result exports.
//!
//! - single run: one `x,y,mass_estimation` row per qualified record
//! - sweep: one row per emitted scenario; a compact header when one method is
//!   active, an extended per-method header (plus `sats_used`) otherwise
//!
//! Kepler coordinates and masses are written in scientific notation
//! (`5.9e31`); thresholds, percentages and counts in plain notation.
//!
//! Writers are flushed before returning so a successful return means the file
//! is complete.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{KeplerPair, Method};
use crate::error::AppError;
use crate::sweep::ScenarioResult;

pub const KEPLER_HEADER: [&str; 3] = ["x", "y", "mass_estimation"];

pub const SWEEP_HEADER: [&str; 8] = [
    "max_eccentricity",
    "mass_mean",
    "mass_median",
    "mass_std_dev",
    "mass_std_dev_percent",
    "percent_error_mean",
    "percent_error_median",
    "sats_disqualified",
];

/// Write the single-run Kepler data file.
pub fn write_kepler_csv(path: &Path, rows: &[(KeplerPair, f64)]) -> Result<(), AppError> {
    let file = create(path)?;
    write_kepler(file, rows)
}

pub fn write_kepler<W: Write>(out: W, rows: &[(KeplerPair, f64)]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(KEPLER_HEADER).map_err(write_err)?;
    for (pair, mass) in rows {
        writer
            .write_record([sci(pair.x), sci(pair.y), sci(*mass)])
            .map_err(write_err)?;
    }
    writer.flush().map_err(|e| write_err(e.into()))
}

/// Write the sweep result table.
pub fn write_sweep_csv(path: &Path, scenarios: &[ScenarioResult], methods: &[Method]) -> Result<(), AppError> {
    let file = create(path)?;
    write_sweep(file, scenarios, methods)
}

pub fn write_sweep<W: Write>(out: W, scenarios: &[ScenarioResult], methods: &[Method]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    let extended = methods.len() > 1;

    writer.write_record(sweep_header(methods)).map_err(write_err)?;

    for s in scenarios {
        let mut row = vec![s.threshold.to_string()];
        for &method in methods {
            let m = s.summary(method).ok_or_else(|| {
                AppError::config(format!(
                    "Scenario at {} has no `{}` statistics.",
                    s.threshold,
                    method.column_prefix()
                ))
            })?;
            row.extend([
                sci(m.mean),
                sci(m.median),
                sci(m.std_dev),
                m.std_dev_percent.to_string(),
                m.percent_error_mean.to_string(),
                m.percent_error_median.to_string(),
            ]);
        }
        row.push(s.disqualified.to_string());
        if extended {
            row.push(s.sats_used().to_string());
        }
        writer.write_record(&row).map_err(write_err)?;
    }

    writer.flush().map_err(|e| write_err(e.into()))
}

/// Column names for the sweep table with the given methods.
pub fn sweep_header(methods: &[Method]) -> Vec<String> {
    if methods.len() <= 1 {
        return SWEEP_HEADER.iter().map(|s| s.to_string()).collect();
    }

    let mut header = vec!["max_eccentricity".to_string()];
    for method in methods {
        let p = method.column_prefix();
        header.extend([
            format!("{p}_mass_mean"),
            format!("{p}_mass_median"),
            format!("{p}_mass_std_dev"),
            format!("{p}_mass_std_dev_percent"),
            format!("{p}_percent_error_mean"),
            format!("{p}_percent_error_median"),
        ]);
    }
    header.push("sats_disqualified".to_string());
    header.push("sats_used".to_string());
    header
}

/// Shortest round-tripping scientific notation.
fn sci(v: f64) -> String {
    format!("{v:e}")
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path)
        .map_err(|e| AppError::config(format!("Failed to create output CSV '{}': {e}", path.display())))
}

fn write_err(e: csv::Error) -> AppError {
    AppError::config(format!("Failed to write output CSV: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::EstimateSummary;
    use crate::sweep::MethodSummary;

    fn summary(mean: f64) -> EstimateSummary {
        EstimateSummary {
            n: 2,
            mean,
            median: mean,
            std_dev: 0.0,
            std_dev_percent: 0.0,
            percent_error_mean: 1.5,
            percent_error_median: 2.5,
        }
    }

    fn scenario(methods: &[Method]) -> ScenarioResult {
        ScenarioResult {
            threshold: 0.05,
            methods: methods
                .iter()
                .map(|&method| MethodSummary {
                    method,
                    summary: summary(6.0e24),
                })
                .collect(),
            disqualified: 3,
            total: 10,
        }
    }

    #[test]
    fn kepler_file_has_header_and_rows() {
        let mut buf = Vec::new();
        write_kepler(&mut buf, &[(KeplerPair { x: 5.9e31, y: 7.4e9 }, 5.97e24)]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "x,y,mass_estimation\n5.9e31,7.4e9,5.97e24\n");
    }

    #[test]
    fn kepler_values_read_back_unchanged() {
        let rows = [(KeplerPair { x: 5.912345678901234e31, y: 7.438e9 }, 5.9731e24)];
        let mut buf = Vec::new();
        write_kepler(&mut buf, &rows).unwrap();
        let back = crate::io::read_kepler(buf.as_slice()).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0], rows[0]);
    }

    #[test]
    fn kepler_file_with_no_rows_is_header_only() {
        let mut buf = Vec::new();
        write_kepler(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "x,y,mass_estimation\n");
    }

    #[test]
    fn single_method_sweep_uses_compact_header() {
        let mut buf = Vec::new();
        write_sweep(&mut buf, &[scenario(&[Method::Kepler])], &[Method::Kepler]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), SWEEP_HEADER.join(","));
        assert_eq!(
            lines.next().unwrap(),
            "0.05,6e24,6e24,0e0,0,1.5,2.5,3"
        );
    }

    #[test]
    fn two_method_sweep_uses_extended_header() {
        let methods = [Method::Kepler, Method::Velocity];
        let mut buf = Vec::new();
        write_sweep(&mut buf, &[scenario(&methods)], &methods).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let header: Vec<&str> = text.lines().next().unwrap().split(',').collect();
        assert_eq!(header.len(), 1 + 6 * 2 + 2);
        assert_eq!(header[1], "kepler_mass_mean");
        assert_eq!(header[7], "velocity_mass_mean");
        assert_eq!(header[13], "sats_disqualified");
        assert_eq!(header[14], "sats_used");
        assert!(text.lines().nth(1).unwrap().ends_with(",3,7"));
    }
}
