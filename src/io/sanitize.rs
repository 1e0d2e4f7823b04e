//! Catalog pre-processing.
//!
//! Cleans a raw catalog export before it is fed to `run` or `sweep`:
//!
//! 1. lines whose delimiter count differs from the header's are dropped
//! 2. the surviving rows are parsed as delimited records (quotes are data);
//!    eccentricity is re-derived from apogee and perigee, and rows whose
//!    orbital columns do not parse are dropped as corrupt
//!
//! Output uses the input delimiter and never adds quoting.

use std::fs;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info};

use crate::error::AppError;
use crate::io::ingest::{APOGEE, ECCENTRICITY, PERIGEE, PERIOD, build_header_map, find_column};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    pub lines_read: usize,
    /// 1-based file line numbers dropped for a wrong field count.
    pub misaligned: Vec<usize>,
    /// 1-based file line numbers dropped for unparsable orbital columns.
    pub corrupt: Vec<usize>,
    pub rows_written: usize,
}

#[derive(Debug, Clone, Copy)]
struct OrbitColumns {
    perigee: usize,
    apogee: usize,
    eccentricity: usize,
    period: usize,
}

/// Clean the catalog at `input` and write the result to `output`.
pub fn sanitize_file(input: &Path, output: &Path, delimiter: u8) -> Result<SanitizeReport, AppError> {
    let bytes = fs::read(input)
        .map_err(|e| AppError::config(format!("Failed to read catalog '{}': {e}", input.display())))?;
    let (text, report) = sanitize(&bytes, delimiter)?;
    fs::write(output, text)
        .map_err(|e| AppError::config(format!("Failed to write '{}': {e}", output.display())))?;

    info!(
        lines = report.lines_read,
        misaligned = report.misaligned.len(),
        corrupt = report.corrupt.len(),
        written = report.rows_written,
        "Pre-processed {} -> {}",
        input.display(),
        output.display()
    );
    Ok(report)
}

/// Clean raw catalog bytes. Invalid UTF-8 sequences are dropped.
pub fn sanitize(bytes: &[u8], delimiter: u8) -> Result<(String, SanitizeReport), AppError> {
    let text: String = String::from_utf8_lossy(bytes)
        .chars()
        .filter(|&c| c != char::REPLACEMENT_CHARACTER)
        .collect();
    let delim = delimiter as char;

    let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());
    let (_, header) = lines
        .next()
        .ok_or_else(|| AppError::config("Catalog is empty; no header line found."))?;
    let expected = header.matches(delim).count();

    let mut report = SanitizeReport::default();

    // Phase 1: field-count filter on the raw text.
    let mut aligned = String::with_capacity(text.len());
    let mut line_numbers = Vec::new();
    aligned.push_str(header);
    aligned.push('\n');
    for (idx, line) in lines {
        let line_no = idx + 1;
        report.lines_read += 1;

        if line.matches(delim).count() != expected {
            debug!(line = line_no, "dropping misaligned line");
            report.misaligned.push(line_no);
            continue;
        }
        aligned.push_str(line);
        aligned.push('\n');
        line_numbers.push(line_no);
    }

    // Phase 2: typed reparse of the aligned rows.
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .quoting(false)
        .flexible(true)
        .from_reader(aligned.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| AppError::config(format!("Failed to read catalog header: {e}")))?
        .clone();
    let columns = orbit_columns(&headers)?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(Vec::with_capacity(aligned.len()));
    writer.write_record(&headers).map_err(write_err)?;

    for (result, line_no) in reader.records().zip(line_numbers) {
        let recomputed = result
            .ok()
            .and_then(|record| recompute_eccentricity(&record, &columns).map(|e| (record, e)));
        match recomputed {
            Some((record, e)) => {
                let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
                fields[columns.eccentricity] = e.to_string();
                writer.write_record(&fields).map_err(write_err)?;
                report.rows_written += 1;
            }
            None => {
                debug!(line = line_no, "dropping corrupt line");
                report.corrupt.push(line_no);
            }
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::config(format!("Failed to write cleaned catalog: {e}")))?;
    let out = String::from_utf8(bytes)
        .map_err(|e| AppError::config(format!("Cleaned catalog is not UTF-8: {e}")))?;
    Ok((out, report))
}

fn orbit_columns(headers: &StringRecord) -> Result<OrbitColumns, AppError> {
    let header_map = build_header_map(headers);
    Ok(OrbitColumns {
        perigee: find_column(&header_map, PERIGEE)?,
        apogee: find_column(&header_map, APOGEE)?,
        eccentricity: find_column(&header_map, ECCENTRICITY)?,
        period: find_column(&header_map, PERIOD)?,
    })
}

fn recompute_eccentricity(record: &StringRecord, columns: &OrbitColumns) -> Option<f64> {
    let number = |idx: usize| -> Option<f64> {
        let cleaned: String = record.get(idx)?.chars().filter(|c| !matches!(c, ',' | '"')).collect();
        cleaned.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    };

    number(columns.period)?;
    number(columns.eccentricity)?;
    let perigee = number(columns.perigee)?;
    let apogee = number(columns.apogee)?;

    let e = (apogee - perigee) / (apogee + perigee);
    e.is_finite().then_some(e)
}

fn write_err(e: csv::Error) -> AppError {
    AppError::config(format!("Failed to write cleaned catalog: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Name\tPerigee (km)\tApogee (km)\tEccentricity\tPeriod (minutes)";

    #[test]
    fn drops_misaligned_and_corrupt_lines() {
        let raw = format!(
            "{HEADER}\n\
             A\t600\t1,000\t0.5\t100\n\
             B\t600\t1000\n\
             C\t700\tabc\t0.1\t98\n\
             D\t400\t400\t0.2\t92.6\n"
        );
        let (text, report) = sanitize(raw.as_bytes(), b'\t').unwrap();

        assert_eq!(report.lines_read, 4);
        assert_eq!(report.misaligned, vec![3]);
        assert_eq!(report.corrupt, vec![4]);
        assert_eq!(report.rows_written, 2);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "A\t600\t1,000\t0.25\t100");
        assert_eq!(lines[2], "D\t400\t400\t0\t92.6");
    }

    #[test]
    fn quotes_stay_as_field_data() {
        let raw = format!("{HEADER}\n\"Sat, A\t\"600\"\t\"1,000\"\t0\t100\nB\t400\t400\t0\t92.6\n");
        let (text, report) = sanitize(raw.as_bytes(), b'\t').unwrap();
        assert_eq!(report.rows_written, 2);
        assert!(report.corrupt.is_empty());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "\"Sat, A\t\"600\"\t\"1,000\"\t0.25\t100");
        assert_eq!(lines[2], "B\t400\t400\t0\t92.6");
    }

    #[test]
    fn invalid_utf8_is_dropped() {
        let mut raw = format!("{HEADER}\n").into_bytes();
        raw.extend_from_slice(b"S\xffAT\t400\t400\t0\t92.6\n");
        let (text, report) = sanitize(&raw, b'\t').unwrap();
        assert_eq!(report.rows_written, 1);
        assert!(text.lines().nth(1).unwrap().starts_with("SAT\t"));
    }

    #[test]
    fn empty_input_is_a_config_error() {
        let err = sanitize(b"", b'\t').unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn writes_cleaned_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw.txt");
        let output = dir.path().join("clean.txt");
        fs::write(&input, format!("{HEADER}\nA\t600\t1000\t0\t100\n")).unwrap();

        let report = sanitize_file(&input, &output, b'\t').unwrap();
        assert_eq!(report.rows_written, 1);
        let written = fs::read_to_string(&output).unwrap();
        assert!(written.ends_with("A\t600\t1000\t0.25\t100\n"));
    }
}
