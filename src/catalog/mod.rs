//! The in-memory satellite catalog.
//!
//! Owns the ordered record list and the current eccentricity qualifier.
//! Mutation is confined to three operations:
//!
//! - [`Catalog::set_threshold`] stores a new qualifier (no reclassification)
//! - [`Catalog::requalify`] recomputes every non-terminal record's state from its fields
//! - [`Catalog::compute_estimates`] refreshes derived values for qualified records
//!
//! Everything else is a read-only query over the current state.

use rayon::prelude::*;
use tracing::warn;

use crate::domain::{DisqualificationReason, KeplerPair, Method, PhysicalConstants, Record};
use crate::estimate::compute_estimates;

pub mod normalize;
pub mod qualify;

pub use normalize::{FaultKind, RawRow, RowFault, normalize_row};

#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<Record>,
    threshold: f64,
    constants: PhysicalConstants,
    methods: Vec<Method>,
    faults: Vec<RowFault>,
}

impl Catalog {
    /// Build the catalog from raw rows, in row order.
    ///
    /// Each row is normalized and qualified against `threshold`. Row faults are
    /// logged and kept for reporting; they never abort the load.
    pub fn load<I>(rows: I, threshold: f64, constants: PhysicalConstants, methods: Vec<Method>) -> Self
    where
        I: IntoIterator<Item = RawRow>,
    {
        let mut records = Vec::new();
        let mut faults = Vec::new();

        for raw in rows {
            let out = normalize_row(&raw, threshold);
            if let Some(fault) = out.fault {
                warn!(row = fault.row, kind = ?fault.kind, values = %fault.raw, "{}", fault.message);
                faults.push(fault);
            }
            records.push(out.record);
        }

        Self {
            records,
            threshold,
            constants,
            methods,
            faults,
        }
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Re-apply the qualification policy at the current threshold.
    ///
    /// Always recomputes from the immutable fields; idempotent.
    pub fn requalify(&mut self) {
        let threshold = self.threshold;
        for record in &mut self.records {
            let next = qualify::reevaluate(record.qualification(), record.fields(), threshold);
            record.set_qualification(next);
        }
    }

    /// Run every active estimator over the currently qualified records.
    ///
    /// Disqualified records keep whatever estimates they had before.
    pub fn compute_estimates(&mut self) {
        let constants = self.constants;
        let methods = &self.methods;
        self.records
            .par_iter_mut()
            .filter(|r| r.is_qualified())
            .for_each(|record| {
                if let Some(fields) = record.fields().copied() {
                    record.set_estimates(compute_estimates(&fields, &constants, methods));
                }
            });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn qualified_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_qualified()).count()
    }

    pub fn disqualified_count(&self) -> usize {
        self.len() - self.qualified_count()
    }

    pub fn disqualified_by(&self, reason: DisqualificationReason) -> usize {
        self.records
            .iter()
            .filter(|r| r.qualification().reason() == Some(reason))
            .count()
    }

    /// One method's estimate for every qualified record, in record order.
    ///
    /// Reflects the most recent [`Catalog::compute_estimates`] call, which must
    /// follow any requalification; the result then has one entry per qualified
    /// record.
    pub fn estimates(&self, method: Method) -> Vec<f64> {
        let values: Vec<f64> = self
            .qualified()
            .filter_map(|r| r.estimates().and_then(|e| e.mass(method)))
            .collect();
        debug_assert_eq!(
            values.len(),
            self.qualified_count(),
            "qualified records without a `{}` estimate; call compute_estimates after requalify",
            method.column_prefix()
        );
        values
    }

    /// Kepler coordinate pairs and primary estimates of the qualified records.
    pub fn kepler_rows(&self) -> Vec<(KeplerPair, f64)> {
        let primary = self.primary_method();
        self.qualified()
            .filter_map(|r| {
                let e = r.estimates()?;
                Some((e.pair, e.mass(primary)?))
            })
            .collect()
    }

    pub fn kepler_pairs(&self) -> Vec<KeplerPair> {
        self.qualified()
            .filter_map(|r| r.estimates().map(|e| e.pair))
            .collect()
    }

    pub fn qualified(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(|r| r.is_qualified())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn row_faults(&self) -> &[RowFault] {
        &self.faults
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// First active method; the one exported as `mass_estimation`.
    pub fn primary_method(&self) -> Method {
        self.methods.first().copied().unwrap_or(Method::Kepler)
    }

    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }
}
