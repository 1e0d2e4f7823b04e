//! Shared pipeline logic used by the `run` and `sweep` subcommands.
//!
//! ingest -> normalize/qualify -> estimate -> aggregate (-> sweep)
//!
//! The subcommand handlers then only deal with presentation and exports.

use std::time::Instant;

use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::domain::{CatalogOptions, Method, RunConfig, SweepConfig};
use crate::error::AppError;
use crate::estimate::{KeplerFit, fit_kepler_line};
use crate::io::read_raw_rows;
use crate::report::LoadSummary;
use crate::stats::{EstimateSummary, summarize};
use crate::sweep::SweepOutcome;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct SingleRunOutput {
    pub catalog: Catalog,
    pub load: LoadSummary,
    /// Empty when no record qualified.
    pub summaries: Vec<(Method, EstimateSummary)>,
    pub fit: Option<KeplerFit>,
}

/// All computed outputs of a sweep.
#[derive(Debug, Clone)]
pub struct SweepRunOutput {
    pub catalog: Catalog,
    pub load: LoadSummary,
    pub outcome: SweepOutcome,
}

/// Read the catalog file and qualify every row against `threshold`.
pub fn load_catalog(options: &CatalogOptions, threshold: f64) -> Result<Catalog, AppError> {
    let started = Instant::now();
    let ingested = read_raw_rows(&options.input_path, options.delimiter)?;

    for e in &ingested.row_errors {
        warn!(line = e.line, "{}", e.message);
    }

    let catalog = Catalog::load(ingested.rows, threshold, options.constants, options.methods.clone());

    info!(
        rows = catalog.len(),
        disqualified = catalog.disqualified_count(),
        unreadable = ingested.row_errors.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "parsed {}",
        options.input_path.display()
    );
    Ok(catalog)
}

/// Execute a single run at the configured eccentricity qualifier.
pub fn run_single(config: &RunConfig) -> Result<SingleRunOutput, AppError> {
    let mut catalog = load_catalog(&config.catalog, config.eccentricity_qualifier)?;
    let load = LoadSummary::from_catalog(config.catalog.input_path.display().to_string(), &catalog);

    catalog.compute_estimates();

    let summaries = if catalog.qualified_count() == 0 {
        warn!(
            threshold = config.eccentricity_qualifier,
            "no satellites qualify; output will contain only the header"
        );
        Vec::new()
    } else {
        let reference = catalog.constants().reference_mass_kg;
        catalog
            .methods()
            .iter()
            .map(|&method| Ok((method, summarize(&catalog.estimates(method), reference)?)))
            .collect::<Result<Vec<_>, AppError>>()?
    };

    let fit = fit_kepler_line(&catalog.kepler_pairs());

    info!(
        qualified = catalog.qualified_count(),
        calculations = catalog.qualified_count() * catalog.methods().len(),
        "single run complete"
    );

    Ok(SingleRunOutput {
        catalog,
        load,
        summaries,
        fit,
    })
}

/// Execute the eccentricity sweep.
///
/// The catalog is loaded with the range minimum as its initial qualifier.
pub fn run_sweep(config: &SweepConfig) -> Result<SweepRunOutput, AppError> {
    let mut catalog = load_catalog(&config.catalog, config.range.min)?;
    let load = LoadSummary::from_catalog(config.catalog.input_path.display().to_string(), &catalog);

    let started = Instant::now();
    let outcome = crate::sweep::run_sweep(&mut catalog, &config.range, config.on_empty)?;

    info!(
        calculations = catalog.len() * catalog.methods().len() * outcome.attempted,
        emitted = outcome.scenarios.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "sweep complete"
    );

    Ok(SweepRunOutput { catalog, load, outcome })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmptyScenarioPolicy, PhysicalConstants, PlotOptions};
    use crate::sweep::SweepRange;
    use std::fs;
    use std::path::Path;

    const HEADER: &str = "Name\tClass of Orbit\tLongitude of GEO (degrees)\tPerigee (km)\tApogee (km)\tEccentricity\tInclination (degrees)\tPeriod (minutes)\tLaunch Mass (kg.)";

    fn write_catalog(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("catalog.txt");
        let body = [
            HEADER,
            "ISS\tLEO\t0\t408\t410\t0.0001\t51.6\t92.68\t\"420,000\"",
            "GPS\tMEO\t0\t20,180\t20,190\t0.002\t55\t717.97\t2,000",
            "GEO-1\tGEO\t-75\t35,780\t35,792\t0.0002\t0.1\t1436.1\t3,000",
            "HEO\tElliptical\t0\t500\t39,000\t0.74\t63.4\t717.7\t1,600",
            "BAD\tLEO\t0\t\t500\t0.001\t98\t94\t100",
        ]
        .join("\n");
        fs::write(&path, body + "\n").unwrap();
        path
    }

    fn options(path: &Path) -> CatalogOptions {
        CatalogOptions {
            input_path: path.to_path_buf(),
            delimiter: b'\t',
            constants: PhysicalConstants::EARTH,
            methods: vec![Method::Kepler, Method::Velocity],
            show_records: false,
        }
    }

    fn no_plot() -> PlotOptions {
        PlotOptions {
            enabled: false,
            width: 100,
            height: 25,
        }
    }

    #[test]
    fn single_run_aggregates_qualified_records() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_catalog(dir.path());
        let config = RunConfig {
            catalog: options(&input),
            output_path: dir.path().join("out.csv"),
            eccentricity_qualifier: 0.01,
            plot: no_plot(),
        };

        let out = run_single(&config).unwrap();
        assert_eq!(out.load.rows, 5);
        assert_eq!(out.load.qualified, 3);
        assert_eq!(out.load.missing_field, 1);
        assert_eq!(out.load.eccentricity_exceeded, 1);
        assert_eq!(out.summaries.len(), 2);

        let kepler = &out.summaries[0].1;
        assert_eq!(kepler.n, 3);
        assert!(kepler.percent_error_mean < 2.0, "{kepler:?}");

        let fit = out.fit.unwrap();
        assert!((fit.implied_mass_kg - 5.97e24).abs() / 5.97e24 < 0.02);
    }

    #[test]
    fn single_run_with_nothing_qualified_has_no_summaries() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_catalog(dir.path());
        let config = RunConfig {
            catalog: options(&input),
            output_path: dir.path().join("out.csv"),
            eccentricity_qualifier: 0.0,
            plot: no_plot(),
        };

        let out = run_single(&config).unwrap();
        assert_eq!(out.catalog.qualified_count(), 0);
        assert!(out.summaries.is_empty());
        assert!(out.fit.is_none());
    }

    #[test]
    fn sweep_emits_one_row_per_distinct_disqualified_count() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_catalog(dir.path());
        let config = SweepConfig {
            catalog: options(&input),
            output_path: dir.path().join("sweep.csv"),
            range: SweepRange::new(0.0, 1.0, 10).unwrap(),
            on_empty: EmptyScenarioPolicy::Skip,
            plot: no_plot(),
        };

        let out = run_sweep(&config).unwrap();
        assert_eq!(out.outcome.attempted, 11);
        // 0.0 qualifies nothing; 0.1 admits the three near-circular orbits;
        // 0.8 admits the elliptical one.
        assert_eq!(out.outcome.empty, vec![0.0]);
        let counts: Vec<usize> = out.outcome.scenarios.iter().map(|s| s.disqualified).collect();
        assert_eq!(counts, vec![2, 1]);
    }

    #[test]
    fn missing_input_is_a_config_error() {
        let opts = options(Path::new("/definitely/not/here.txt"));
        let err = load_catalog(&opts, 0.1).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
