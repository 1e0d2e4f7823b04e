//! Reporting: load summaries and formatted terminal output.

pub mod format;

pub use format::*;

use crate::catalog::Catalog;
use crate::domain::DisqualificationReason;

/// Counts shown after a catalog load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub input: String,
    pub rows: usize,
    pub qualified: usize,
    pub missing_field: usize,
    pub eccentricity_exceeded: usize,
    pub faults: usize,
}

impl LoadSummary {
    pub fn from_catalog(input: impl Into<String>, catalog: &Catalog) -> Self {
        Self {
            input: input.into(),
            rows: catalog.len(),
            qualified: catalog.qualified_count(),
            missing_field: catalog.disqualified_by(DisqualificationReason::MissingField),
            eccentricity_exceeded: catalog.disqualified_by(DisqualificationReason::EccentricityExceeded),
            faults: catalog.row_faults().len(),
        }
    }
}
