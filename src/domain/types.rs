//! Shared domain types.
//!
//! These types are used by every stage of the pipeline:
//!
//! - raw catalog rows become [`Record`]s holding typed [`OrbitalFields`]
//! - qualification is tracked as a [`Qualification`] sum type
//! - estimators fill in [`Estimates`] for qualified records
//! - run configuration is derived from CLI flags into [`RunConfig`] / [`SweepConfig`]

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::sweep::SweepRange;

/// Typed physical fields of one catalog entry, in SI units.
///
/// Built once by the normalizer and never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalFields {
    pub longitude_deg: f64,
    /// Perigee altitude above the surface (m).
    pub perigee_m: f64,
    /// Apogee altitude above the surface (m).
    pub apogee_m: f64,
    pub eccentricity: f64,
    pub inclination_deg: f64,
    /// Orbital period (s).
    pub period_s: f64,
    /// Launch mass (kg). Informational only.
    pub launch_mass_kg: f64,
}

impl OrbitalFields {
    /// Mean of apogee and perigee altitudes plus the central body radius.
    ///
    /// For an ellipse measured from the body's centre this is the semi-major axis.
    pub fn semi_major_like_radius(&self, body_radius_m: f64) -> f64 {
        (self.apogee_m + self.perigee_m) / 2.0 + body_radius_m
    }
}

/// Why a record does not take part in the current statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisqualificationReason {
    /// A required field was empty or could not be parsed. Terminal.
    MissingField,
    /// Eccentricity is above the current qualifier. Re-evaluated on every threshold change.
    EccentricityExceeded,
}

impl DisqualificationReason {
    pub fn label(self) -> &'static str {
        match self {
            DisqualificationReason::MissingField => "missing-field",
            DisqualificationReason::EccentricityExceeded => "eccentricity-exceeded",
        }
    }
}

/// Qualification state of a record.
///
/// `Disqualified(MissingField)` is a sink: the catalog never re-evaluates it.
/// `Qualified` and `Disqualified(EccentricityExceeded)` toggle as the threshold moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Qualification {
    Qualified,
    Disqualified(DisqualificationReason),
}

impl Qualification {
    pub fn is_qualified(self) -> bool {
        matches!(self, Qualification::Qualified)
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Qualification::Disqualified(DisqualificationReason::MissingField)
        )
    }

    pub fn reason(self) -> Option<DisqualificationReason> {
        match self {
            Qualification::Qualified => None,
            Qualification::Disqualified(reason) => Some(reason),
        }
    }
}

/// Mass estimation method.
///
/// `Kepler` is the direct rearrangement of Kepler's third law; `Velocity` is the
/// secondary, orbital-speed based estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Kepler,
    Velocity,
}

impl Method {
    pub const ALL: [Method; 2] = [Method::Kepler, Method::Velocity];
    pub const COUNT: usize = Self::ALL.len();

    /// Slot in per-record estimate arrays.
    pub fn index(self) -> usize {
        match self {
            Method::Kepler => 0,
            Method::Velocity => 1,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Method::Kepler => "Kepler 3rd law",
            Method::Velocity => "Orbital velocity",
        }
    }

    /// Prefix used for column names in the extended sweep CSV.
    pub fn column_prefix(self) -> &'static str {
        match self {
            Method::Kepler => "kepler",
            Method::Velocity => "velocity",
        }
    }
}

/// Coordinate pair of the generalized Kepler relation.
///
/// `y = T²`, `x = 4π·a³ / G`; the pair lies on `y = (π / M)·x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeplerPair {
    pub x: f64,
    pub y: f64,
}

/// Derived values of one qualified record, as of the last compute pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimates {
    pub pair: KeplerPair,
    masses: [Option<f64>; Method::COUNT],
}

impl Estimates {
    pub fn new(pair: KeplerPair) -> Self {
        Self {
            pair,
            masses: [None; Method::COUNT],
        }
    }

    pub fn with_mass(mut self, method: Method, mass: f64) -> Self {
        self.masses[method.index()] = Some(mass);
        self
    }

    pub fn mass(&self, method: Method) -> Option<f64> {
        self.masses[method.index()]
    }
}

/// One catalog entry.
///
/// Identity is the 1-based data row index. Raw typed fields are fixed at
/// construction; only qualification and estimates change afterwards, and only
/// through the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    row: usize,
    orbit_class: String,
    fields: Option<OrbitalFields>,
    qualification: Qualification,
    estimates: Option<Estimates>,
}

impl Record {
    /// A record with all fields parsed; `qualification` is the load-time verdict.
    pub fn new(row: usize, orbit_class: String, fields: OrbitalFields, qualification: Qualification) -> Self {
        Self {
            row,
            orbit_class,
            fields: Some(fields),
            qualification,
            estimates: None,
        }
    }

    /// A record that is permanently out of the statistics (missing or unparsable field).
    pub fn incomplete(row: usize, orbit_class: String) -> Self {
        Self {
            row,
            orbit_class,
            fields: None,
            qualification: Qualification::Disqualified(DisqualificationReason::MissingField),
            estimates: None,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn orbit_class(&self) -> &str {
        &self.orbit_class
    }

    pub fn fields(&self) -> Option<&OrbitalFields> {
        self.fields.as_ref()
    }

    pub fn qualification(&self) -> Qualification {
        self.qualification
    }

    pub fn is_qualified(&self) -> bool {
        self.qualification.is_qualified()
    }

    /// Estimates from the most recent compute pass that covered this record.
    ///
    /// May be stale for records that are currently disqualified.
    pub fn estimates(&self) -> Option<&Estimates> {
        self.estimates.as_ref()
    }

    pub(crate) fn set_qualification(&mut self, qualification: Qualification) {
        self.qualification = qualification;
    }

    pub(crate) fn set_estimates(&mut self, estimates: Estimates) {
        self.estimates = Some(estimates);
    }
}

/// Physical constants and the literature reference, threaded explicitly into
/// estimators and aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalConstants {
    /// Gravitational constant G (m³·kg⁻¹·s⁻²).
    pub gravitational_constant: f64,
    /// Radius of the central body (m).
    pub body_radius_m: f64,
    /// Accepted mass of the central body (kg), used for percent error.
    pub reference_mass_kg: f64,
}

impl PhysicalConstants {
    pub const EARTH: PhysicalConstants = PhysicalConstants {
        gravitational_constant: 6.67e-11,
        body_radius_m: 6_371_000.0,
        reference_mass_kg: 5.97e24,
    };
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self::EARTH
    }
}

/// What the sweep does when a threshold leaves no qualifying records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmptyScenarioPolicy {
    /// Log the threshold and continue with the next step.
    Skip,
    /// Stop the sweep with an aggregation fault.
    Abort,
}

/// Options shared by every command that loads a catalog.
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    pub input_path: PathBuf,
    pub delimiter: u8,
    pub constants: PhysicalConstants,
    /// Active estimation methods, in output order.
    pub methods: Vec<Method>,
    pub show_records: bool,
}

#[derive(Debug, Clone)]
pub struct PlotOptions {
    pub enabled: bool,
    pub width: usize,
    pub height: usize,
}

/// Single-run configuration as understood by the pipeline.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub catalog: CatalogOptions,
    pub output_path: PathBuf,
    pub eccentricity_qualifier: f64,
    pub plot: PlotOptions,
}

/// Sweep (MEQ) configuration as understood by the pipeline.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub catalog: CatalogOptions,
    pub output_path: PathBuf,
    pub range: SweepRange,
    pub on_empty: EmptyScenarioPolicy,
    pub plot: PlotOptions,
}
