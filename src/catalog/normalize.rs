//! Raw row normalization.
//!
//! Turns one string-valued catalog row into a typed [`Record`]:
//!
//! - empty required fields short-circuit to a terminal missing-field record
//! - thousands separators and quote characters are stripped before parsing
//! - kilometres become metres and minutes become seconds
//! - the load-time qualifier is applied immediately
//!
//! Bad rows are reported as [`RowFault`]s, never as errors: processing always
//! continues with the next row.

use crate::catalog::qualify;
use crate::domain::{OrbitalFields, Record};

const KM_TO_M: f64 = 1_000.0;
const MIN_TO_S: f64 = 60.0;

/// One catalog row as read from the delimited file, before any conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based data row index.
    pub row: usize,
    pub orbit_class: String,
    pub longitude: String,
    pub perigee: String,
    pub apogee: String,
    pub eccentricity: String,
    pub inclination: String,
    pub period: String,
    pub launch_mass: String,
}

impl RawRow {
    /// Field values joined for diagnostics.
    pub fn describe(&self) -> String {
        [
            self.orbit_class.as_str(),
            &self.longitude,
            &self.perigee,
            &self.apogee,
            &self.eccentricity,
            &self.inclination,
            &self.period,
            &self.launch_mass,
        ]
        .join(" | ")
    }

    fn required(&self) -> [(&'static str, &str); 8] {
        [
            ("orbit class", self.orbit_class.as_str()),
            ("longitude", &self.longitude),
            ("perigee", &self.perigee),
            ("apogee", &self.apogee),
            ("eccentricity", &self.eccentricity),
            ("inclination", &self.inclination),
            ("period", &self.period),
            ("launch mass", &self.launch_mass),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// A required field was empty.
    MissingField,
    /// A numeric field was present but did not parse to a finite number.
    Unparsable,
}

/// A row-level data quality problem.
#[derive(Debug, Clone, PartialEq)]
pub struct RowFault {
    pub row: usize,
    pub kind: FaultKind,
    pub message: String,
    /// Raw values of the row, for diagnostics.
    pub raw: String,
}

/// Normalizer output: the record (always produced) plus an optional fault.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub record: Record,
    pub fault: Option<RowFault>,
}

/// Normalize one raw row against the qualifier in effect at load time.
pub fn normalize_row(raw: &RawRow, threshold: f64) -> Normalized {
    if let Some((name, _)) = raw.required().into_iter().find(|(_, v)| v.trim().is_empty()) {
        return Normalized {
            record: Record::incomplete(raw.row, raw.orbit_class.trim().to_string()),
            fault: Some(RowFault {
                row: raw.row,
                kind: FaultKind::MissingField,
                message: format!("missing required field `{name}`"),
                raw: raw.describe(),
            }),
        };
    }

    match parse_fields(raw) {
        Ok(fields) => {
            let qualification = qualify::evaluate(&fields, threshold);
            Normalized {
                record: Record::new(raw.row, raw.orbit_class.trim().to_string(), fields, qualification),
                fault: None,
            }
        }
        Err(message) => Normalized {
            record: Record::incomplete(raw.row, raw.orbit_class.trim().to_string()),
            fault: Some(RowFault {
                row: raw.row,
                kind: FaultKind::Unparsable,
                message,
                raw: raw.describe(),
            }),
        },
    }
}

/// Remove thousands separators and quote characters from a numeric field.
pub fn strip_numeric(s: &str) -> String {
    s.chars().filter(|c| *c != ',' && *c != '"').collect::<String>().trim().to_string()
}

fn parse_fields(raw: &RawRow) -> Result<OrbitalFields, String> {
    Ok(OrbitalFields {
        longitude_deg: parse_number("longitude", &raw.longitude)?,
        perigee_m: parse_number("perigee", &raw.perigee)? * KM_TO_M,
        apogee_m: parse_number("apogee", &raw.apogee)? * KM_TO_M,
        eccentricity: parse_number("eccentricity", &raw.eccentricity)?,
        inclination_deg: parse_number("inclination", &raw.inclination)?,
        period_s: parse_number("period", &raw.period)? * MIN_TO_S,
        launch_mass_kg: parse_number("launch mass", &raw.launch_mass)?,
    })
}

fn parse_number(name: &str, value: &str) -> Result<f64, String> {
    let cleaned = strip_numeric(value);
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("invalid `{name}` value '{value}'")),
    }
}
