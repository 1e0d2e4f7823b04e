//! Eccentricity sweep (multiple eccentricity qualifier mode).
//!
//! For each qualifier in the range the driver:
//!
//! 1. pushes the threshold into the catalog and requalifies
//! 2. recomputes estimates for every active method
//! 3. aggregates each method's estimates
//! 4. drops the scenario if an earlier emitted scenario had the same
//!    disqualified count
//!
//! Deduplicating on the disqualified count alone is coarse: two different
//! qualifying sets of equal size collapse into one row. Output compatibility
//! depends on it, so it is kept as is.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::domain::{EmptyScenarioPolicy, Method};
use crate::stats::{EstimateSummary, StatsError, summarize};

pub mod thresholds;

pub use thresholds::*;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SweepError {
    #[error("invalid sweep range: {reason}")]
    InvalidRange { reason: String },

    #[error("no qualifying satellites at eccentricity qualifier {threshold}")]
    NoQualifyingData { threshold: f64 },
}

/// Aggregates of one method within a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MethodSummary {
    pub method: Method,
    pub summary: EstimateSummary,
}

/// Outcome of one sweep step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioResult {
    pub threshold: f64,
    pub methods: Vec<MethodSummary>,
    pub disqualified: usize,
    pub total: usize,
}

impl ScenarioResult {
    pub fn sats_used(&self) -> usize {
        self.total - self.disqualified
    }

    pub fn summary(&self, method: Method) -> Option<&EstimateSummary> {
        self.methods
            .iter()
            .find(|m| m.method == method)
            .map(|m| &m.summary)
    }
}

/// The exported table plus bookkeeping about what was left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SweepOutcome {
    /// Emitted scenarios, ascending threshold.
    pub scenarios: Vec<ScenarioResult>,
    pub attempted: usize,
    /// Thresholds dropped as duplicates of an earlier disqualified count.
    pub duplicates: Vec<f64>,
    /// Thresholds skipped because nothing qualified.
    pub empty: Vec<f64>,
}

/// Run the sweep over `range`, mutating the catalog's threshold and derived state.
pub fn run_sweep(
    catalog: &mut Catalog,
    range: &SweepRange,
    on_empty: EmptyScenarioPolicy,
) -> Result<SweepOutcome, SweepError> {
    let methods: Vec<Method> = catalog.methods().to_vec();
    let mut seen = HashSet::new();
    let mut outcome = SweepOutcome::default();

    info!(
        min = range.min,
        max = range.max,
        step = range.step_size(),
        scenarios = range.steps + 1,
        "testing eccentricity qualifiers"
    );

    for threshold in range.thresholds() {
        outcome.attempted += 1;

        catalog.set_threshold(threshold);
        catalog.requalify();
        catalog.compute_estimates();

        let disqualified = catalog.disqualified_count();

        let summaries: Result<Vec<MethodSummary>, StatsError> = methods
            .iter()
            .map(|&method| {
                let values = catalog.estimates(method);
                summarize(&values, catalog.constants().reference_mass_kg)
                    .map(|summary| MethodSummary { method, summary })
            })
            .collect();

        let methods_out = match summaries {
            Ok(m) => m,
            Err(StatsError::NoQualifyingData) => match on_empty {
                EmptyScenarioPolicy::Abort => {
                    return Err(SweepError::NoQualifyingData { threshold });
                }
                EmptyScenarioPolicy::Skip => {
                    warn!(threshold, "no qualifying satellites; scenario skipped");
                    outcome.empty.push(threshold);
                    continue;
                }
            },
        };

        if !seen.insert(disqualified) {
            debug!(threshold, disqualified, "same disqualified count as an earlier scenario; dropped");
            outcome.duplicates.push(threshold);
            continue;
        }

        debug!(threshold, disqualified, used = catalog.qualified_count(), "scenario computed");

        outcome.scenarios.push(ScenarioResult {
            threshold,
            methods: methods_out,
            disqualified,
            total: catalog.len(),
        });
    }

    Ok(outcome)
}
