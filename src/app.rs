//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and installs logging
//! - validates flags into run configuration
//! - runs the single-run or sweep pipeline
//! - writes exports and prints reports/plots

use std::path::Path;

use clap::Parser;
use tracing::info;

use crate::cli::{CatalogArgs, Cli, Command, PlotCommand, PlotFileArgs, PlotFlags, PreprocessArgs, RunArgs, SweepArgs};
use crate::domain::{CatalogOptions, Method, PhysicalConstants, PlotOptions, RunConfig, SweepConfig};
use crate::error::{AppError, EXIT_NUMERIC};
use crate::sweep::SweepRange;

pub mod pipeline;

/// Entry point for the `kmass` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    crate::logging::init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Run(args) => handle_run(&args),
        Command::Sweep(args) => handle_sweep(&args),
        Command::Preprocess(args) => handle_preprocess(&args),
        Command::Plot(PlotCommand::Kepler(args)) => handle_plot_kepler(&args),
        Command::Plot(PlotCommand::Sweep(args)) => handle_plot_sweep(&args),
    }
}

fn handle_run(args: &RunArgs) -> Result<(), AppError> {
    let config = run_config_from_args(args)?;
    let run = pipeline::run_single(&config)?;

    let rows = run.catalog.kepler_rows();
    crate::io::write_kepler_csv(&config.output_path, &rows)?;
    info!(rows = rows.len(), "wrote {}", config.output_path.display());

    println!("{}", crate::report::format_load_summary(&run.load));
    if config.catalog.show_records {
        println!("{}", crate::report::format_records(run.catalog.records()));
    }
    println!(
        "{}",
        crate::report::format_single_run(
            config.eccentricity_qualifier,
            config.catalog.constants.reference_mass_kg,
            &run.summaries,
            run.fit.as_ref(),
        )
    );

    if config.plot.enabled {
        let pairs: Vec<_> = rows.iter().map(|(pair, _)| *pair).collect();
        let plot =
            crate::plot::render_kepler_plot(&pairs, run.fit.as_ref(), config.plot.width, config.plot.height);
        println!("{plot}");
    }

    Ok(())
}

fn handle_sweep(args: &SweepArgs) -> Result<(), AppError> {
    let config = sweep_config_from_args(args)?;
    let run = pipeline::run_sweep(&config)?;

    crate::io::write_sweep_csv(&config.output_path, &run.outcome.scenarios, run.catalog.methods())?;
    info!(
        scenarios = run.outcome.scenarios.len(),
        "wrote {}",
        config.output_path.display()
    );

    println!("{}", crate::report::format_load_summary(&run.load));
    if config.catalog.show_records {
        println!("{}", crate::report::format_records(run.catalog.records()));
    }
    println!(
        "{}",
        crate::report::format_sweep_table(&run.outcome, run.catalog.primary_method())
    );

    if config.plot.enabled {
        let points: Vec<_> = run
            .outcome
            .scenarios
            .iter()
            .filter_map(|s| {
                let m = s.summary(run.catalog.primary_method())?;
                Some(crate::io::SweepPoint {
                    threshold: s.threshold,
                    percent_error_mean: m.percent_error_mean,
                    disqualified: s.disqualified,
                })
            })
            .collect();
        println!(
            "{}",
            crate::plot::render_sweep_plot(&points, config.plot.width, config.plot.height)
        );
    }

    Ok(())
}

fn handle_preprocess(args: &PreprocessArgs) -> Result<(), AppError> {
    require_file(&args.input)?;
    let report = crate::io::sanitize_file(&args.input, &args.output, args.delimiter)?;
    println!(
        "Pre-processed {} lines: {} written, {} misaligned, {} corrupt",
        report.lines_read,
        report.rows_written,
        report.misaligned.len(),
        report.corrupt.len()
    );
    Ok(())
}

fn handle_plot_kepler(args: &PlotFileArgs) -> Result<(), AppError> {
    let rows = crate::io::read_kepler_csv(&args.file)?;
    let pairs: Vec<_> = rows.iter().map(|(pair, _)| *pair).collect();
    let fit = crate::estimate::fit_kepler_line(&pairs).ok_or_else(|| {
        AppError::new(
            EXIT_NUMERIC,
            format!("Could not fit a Kepler line through {} point(s).", pairs.len()),
        )
    })?;

    println!(
        "{}",
        crate::plot::render_kepler_plot(&pairs, Some(&fit), args.width, args.height)
    );
    println!(
        "slope={} intercept={} R2={} implied mass={} kg",
        crate::report::fmt_sig(fit.slope),
        crate::report::fmt_sig(fit.intercept),
        crate::report::fmt_sig(fit.r_squared),
        crate::report::fmt_sig(fit.implied_mass_kg)
    );
    Ok(())
}

fn handle_plot_sweep(args: &PlotFileArgs) -> Result<(), AppError> {
    let points = crate::io::read_sweep_csv(&args.file)?;
    println!(
        "{}",
        crate::plot::render_sweep_plot(&points, args.width, args.height)
    );
    Ok(())
}

pub fn run_config_from_args(args: &RunArgs) -> Result<RunConfig, AppError> {
    let catalog = catalog_options_from_args(&args.catalog)?;
    if !args.ecc.is_finite() || args.ecc < 0.0 {
        return Err(AppError::config(format!(
            "Eccentricity qualifier must be a finite, non-negative number (got {}).",
            args.ecc
        )));
    }

    Ok(RunConfig {
        catalog,
        output_path: args.catalog.output.clone(),
        eccentricity_qualifier: args.ecc,
        plot: plot_options(&args.catalog.plot),
    })
}

pub fn sweep_config_from_args(args: &SweepArgs) -> Result<SweepConfig, AppError> {
    let catalog = catalog_options_from_args(&args.catalog)?;
    let range = SweepRange::new(args.min, args.max, args.steps)?;

    Ok(SweepConfig {
        catalog,
        output_path: args.catalog.output.clone(),
        range,
        on_empty: args.on_empty,
        plot: plot_options(&args.catalog.plot),
    })
}

fn catalog_options_from_args(args: &CatalogArgs) -> Result<CatalogOptions, AppError> {
    require_file(&args.input)?;

    let constants = PhysicalConstants {
        gravitational_constant: positive("--gravitational-constant", args.gravitational_constant)?,
        body_radius_m: positive("--earth-radius", args.earth_radius)?,
        reference_mass_kg: positive("--reference-mass", args.reference_mass)?,
    };

    let methods = if args.secondary {
        Method::ALL.to_vec()
    } else {
        vec![Method::Kepler]
    };

    Ok(CatalogOptions {
        input_path: args.input.clone(),
        delimiter: args.delimiter,
        constants,
        methods,
        show_records: args.show_records,
    })
}

fn plot_options(flags: &PlotFlags) -> PlotOptions {
    PlotOptions {
        enabled: flags.plot,
        width: flags.width,
        height: flags.height,
    }
}

fn require_file(path: &Path) -> Result<(), AppError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(AppError::config(format!("Input file '{}' does not exist.", path.display())))
    }
}

fn positive(flag: &str, v: f64) -> Result<f64, AppError> {
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(AppError::config(format!("{flag} must be a finite, positive number (got {v}).")))
    }
}
