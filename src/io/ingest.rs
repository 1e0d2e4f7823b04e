//! Delimited catalog ingest.
//!
//! Reads a satellite catalog (tab-separated by default, as published) and
//! returns one [`RawRow`] per data row. No conversion happens here; typed
//! parsing and qualification belong to the catalog normalizer.
//!
//! - the header must name every required column (exit code 2 otherwise)
//! - extra columns are ignored
//! - lines starting with `#` are comments
//! - quote characters are field data, not quoting; the normalizer strips them
//! - short rows are padded with empty fields, which the normalizer treats as missing

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::catalog::RawRow;
use crate::error::AppError;

/// Accepted header names per required column, compared case-insensitively.
///
/// The first entry is the name used by the published database.
pub const ORBIT_CLASS: &[&str] = &["class of orbit", "orbit_class"];
pub const LONGITUDE: &[&str] = &["longitude of geo (degrees)", "longitude"];
pub const PERIGEE: &[&str] = &["perigee (km)", "perigee_km"];
pub const APOGEE: &[&str] = &["apogee (km)", "apogee_km"];
pub const ECCENTRICITY: &[&str] = &["eccentricity"];
pub const INCLINATION: &[&str] = &["inclination (degrees)", "inclination"];
pub const PERIOD: &[&str] = &["period (minutes)", "period_min"];
pub const LAUNCH_MASS: &[&str] = &["launch mass (kg.)", "launch mass (kg)", "launch_mass_kg"];

/// A row the CSV reader itself could not decode.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: raw rows in file order plus reader-level errors.
#[derive(Debug, Clone, Default)]
pub struct IngestedRows {
    pub rows: Vec<RawRow>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    orbit_class: usize,
    longitude: usize,
    perigee: usize,
    apogee: usize,
    eccentricity: usize,
    inclination: usize,
    period: usize,
    launch_mass: usize,
}

/// Read the catalog file at `path`.
pub fn read_raw_rows(path: &Path, delimiter: u8) -> Result<IngestedRows, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::config(format!("Failed to open catalog '{}': {e}", path.display())))?;
    read_raw_rows_from(file, delimiter)
}

/// Read a catalog from any reader.
pub fn read_raw_rows_from<R: Read>(reader: R, delimiter: u8) -> Result<IngestedRows, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::config(format!("Failed to read catalog header: {e}")))?
        .clone();
    let columns = resolve_columns(&build_header_map(&headers))?;

    let mut out = IngestedRows::default();

    for (idx, result) in reader.records().enumerate() {
        // Data rows are 1-based; file lines add one for the header.
        let row = idx + 1;
        out.rows_read += 1;

        match result {
            Ok(record) => out.rows.push(raw_row(row, &record, &columns)),
            Err(e) => out.row_errors.push(RowError {
                line: e.position().map(|p| p.line() as usize).unwrap_or(row + 1),
                message: format!("CSV parse error: {e}"),
            }),
        }
    }

    Ok(out)
}

fn raw_row(row: usize, record: &StringRecord, columns: &ColumnMap) -> RawRow {
    let field = |idx: usize| record.get(idx).unwrap_or("").to_string();
    RawRow {
        row,
        orbit_class: field(columns.orbit_class),
        longitude: field(columns.longitude),
        perigee: field(columns.perigee),
        apogee: field(columns.apogee),
        eccentricity: field(columns.eccentricity),
        inclination: field(columns.inclination),
        period: field(columns.period),
        launch_mass: field(columns.launch_mass),
    }
}

pub(crate) fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

pub(crate) fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

pub(crate) fn find_column(header_map: &HashMap<String, usize>, names: &[&str]) -> Result<usize, AppError> {
    names
        .iter()
        .find_map(|n| header_map.get(*n).copied())
        .ok_or_else(|| AppError::config(format!("Missing required column: `{}`", names[0])))
}

fn resolve_columns(header_map: &HashMap<String, usize>) -> Result<ColumnMap, AppError> {
    Ok(ColumnMap {
        orbit_class: find_column(header_map, ORBIT_CLASS)?,
        longitude: find_column(header_map, LONGITUDE)?,
        perigee: find_column(header_map, PERIGEE)?,
        apogee: find_column(header_map, APOGEE)?,
        eccentricity: find_column(header_map, ECCENTRICITY)?,
        inclination: find_column(header_map, INCLINATION)?,
        period: find_column(header_map, PERIOD)?,
        launch_mass: find_column(header_map, LAUNCH_MASS)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Name\tClass of Orbit\tLongitude of GEO (degrees)\tPerigee (km)\tApogee (km)\tEccentricity\tInclination (degrees)\tPeriod (minutes)\tLaunch Mass (kg.)\tOperator";

    #[test]
    fn reads_published_tab_format() {
        let text = format!(
            "{HEADER}\n\
             # a comment line\n\
             SAT-1\tLEO\t0\t200\t\"1,200\"\t0.07\t51.6\t90\t\"2,500\"\tACME\n\
             SAT-2\tGEO\t-75\t35,786\t35,786\t0\t0.1\t1436.1\t3,000\tACME\n"
        );
        let out = read_raw_rows_from(text.as_bytes(), b'\t').unwrap();
        assert_eq!(out.rows_read, 2);
        assert_eq!(out.rows.len(), 2);
        assert!(out.row_errors.is_empty());

        let r = &out.rows[0];
        assert_eq!(r.row, 1);
        assert_eq!(r.orbit_class, "LEO");
        assert_eq!(r.perigee, "200");
        assert_eq!(r.apogee, "\"1,200\"");
        assert_eq!(r.launch_mass, "\"2,500\"");
        assert_eq!(out.rows[1].row, 2);
        assert_eq!(out.rows[1].perigee, "35,786");
    }

    #[test]
    fn unbalanced_quote_in_ignored_column_keeps_later_rows() {
        let text = format!(
            "{HEADER}\tComments\n\
             SAT-1\tLEO\t0\t400\t400\t0\t51.6\t92.68\t1,000\tACME\t\"ex-Foo, renamed\n\
             SAT-2\tLEO\t0\t500\t510\t0.001\t97.4\t94.6\t800\tACME\t\n\
             SAT-3\tGEO\t-75\t35,786\t35,786\t0\t0.1\t1436.1\t3,000\tACME\tok\n"
        );
        let out = read_raw_rows_from(text.as_bytes(), b'\t').unwrap();
        assert_eq!(out.rows_read, 3);
        assert_eq!(out.rows.len(), 3);
        assert!(out.row_errors.is_empty());
        assert_eq!(out.rows[1].perigee, "500");
        assert_eq!(out.rows[2].orbit_class, "GEO");
    }

    #[test]
    fn short_rows_become_empty_fields() {
        let text = format!("{HEADER}\nSAT-1\tLEO\t0\t200\n");
        let out = read_raw_rows_from(text.as_bytes(), b'\t').unwrap();
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].period, "");
        assert_eq!(out.rows[0].launch_mass, "");
    }

    #[test]
    fn missing_required_column_is_a_config_error() {
        let text = "Class of Orbit\tPerigee (km)\nLEO\t200\n";
        let err = read_raw_rows_from(text.as_bytes(), b'\t').unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("longitude of geo"));
    }

    #[test]
    fn accepts_snake_case_headers_and_bom() {
        let text = "\u{feff}orbit_class,longitude,perigee_km,apogee_km,eccentricity,inclination,period_min,launch_mass_kg\n\
                    LEO,0,400,400,0,51.6,92.68,1000\n";
        let out = read_raw_rows_from(text.as_bytes(), b',').unwrap();
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].period, "92.68");
    }
}
