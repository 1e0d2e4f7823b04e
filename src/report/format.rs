//! Formatted terminal output.
//!
//! Formatting lives here so the catalog and statistics code stays free of
//! presentation concerns, and output changes stay localized.

use crate::domain::{Method, Record};
use crate::estimate::KeplerFit;
use crate::stats::EstimateSummary;
use crate::sweep::SweepOutcome;

use super::LoadSummary;

/// Significant figures used for every number in a table.
pub const SIG_FIGS: i32 = 5;

const COL: usize = 13;

/// Dataset summary printed after a catalog load.
pub fn format_load_summary(summary: &LoadSummary) -> String {
    let mut out = String::new();
    out.push_str("=== kmass - Earth mass from satellite orbits ===\n");
    out.push_str(&format!("Input: {}\n", summary.input));
    out.push_str(&format!(
        "Rows: n={} | qualified={} | disqualified={} (missing field={}, eccentricity={})\n",
        summary.rows,
        summary.qualified,
        summary.missing_field + summary.eccentricity_exceeded,
        summary.missing_field,
        summary.eccentricity_exceeded,
    ));
    if summary.faults > 0 {
        out.push_str(&format!("Row faults: {}\n", summary.faults));
    }
    out
}

/// Per-method statistics of a single run, plus the Kepler line fit.
pub fn format_single_run(
    threshold: f64,
    reference_mass: f64,
    summaries: &[(Method, EstimateSummary)],
    fit: Option<&KeplerFit>,
) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\nEccentricity qualifier: {} | reference mass: {} kg\n",
        fmt_sig(threshold),
        fmt_sig(reference_mass)
    ));

    if !summaries.is_empty() {
        out.push_str(&format!(
            "{:<22} {:>6} {:>COL$} {:>COL$} {:>COL$} {:>COL$} {:>COL$}\n",
            "method", "n", "mean", "median", "std_dev", "%err_mean", "%err_median"
        ));
        out.push_str(&format!(
            "{:-<22} {:-<6} {:-<COL$} {:-<COL$} {:-<COL$} {:-<COL$} {:-<COL$}\n",
            "", "", "", "", "", "", ""
        ));
        for (method, s) in summaries {
            out.push_str(&format!(
                "{:<22} {:>6} {:>COL$} {:>COL$} {:>COL$} {:>COL$} {:>COL$}\n",
                truncate(method.display_name(), 22),
                s.n,
                fmt_sig(s.mean),
                fmt_sig(s.median),
                fmt_sig(s.std_dev),
                fmt_sig(s.percent_error_mean),
                fmt_sig(s.percent_error_median),
            ));
        }
    }

    out.push_str("\nKepler line (y = a + b*x):\n");
    match fit {
        Some(f) => {
            out.push_str(&format!(
                "- n={} slope={} intercept={} R2={}\n",
                f.n,
                fmt_sig(f.slope),
                fmt_sig(f.intercept),
                fmt_sig(f.r_squared)
            ));
            out.push_str(&format!("- implied mass (pi/slope): {} kg\n", fmt_sig(f.implied_mass_kg)));
        }
        None => out.push_str("- not available (needs at least two qualified records)\n"),
    }
    out
}

/// One line per emitted sweep scenario, using the first method's statistics.
pub fn format_sweep_table(outcome: &SweepOutcome, method: Method) -> String {
    let mut out = String::new();
    out.push_str(&format!("\nSweep ({}):\n", method.display_name()));
    out.push_str(
        format!(
            "{:>COL$} {:>COL$} {:>COL$} {:>COL$} {:>COL$} {:>8}\n",
            "max_ecc", "mean", "median", "std_dev_%", "%err_mean", "disq"
        )
        .trim_end(),
    );
    out.push('\n');

    for s in &outcome.scenarios {
        let Some(m) = s.summary(method) else { continue };
        out.push_str(&format!(
            "{:>COL$} {:>COL$} {:>COL$} {:>COL$} {:>COL$} {:>8}\n",
            fmt_sig(s.threshold),
            fmt_sig(m.mean),
            fmt_sig(m.median),
            fmt_sig(m.std_dev_percent),
            fmt_sig(m.percent_error_mean),
            s.disqualified,
        ));
    }

    out.push_str(&format!(
        "Scenarios: attempted={} emitted={} duplicates={} empty={}\n",
        outcome.attempted,
        outcome.scenarios.len(),
        outcome.duplicates.len(),
        outcome.empty.len()
    ));
    out
}

/// Padded table of every record's class, typed fields and state.
pub fn format_records(records: &[Record]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:>6} {:<COL$} {:>COL$} {:>COL$} {:>COL$} {:>COL$} {:>COL$} {:>COL$} {:>COL$} {:<COL$}\n",
            "row", "class", "longitude", "perigee_m", "apogee_m", "ecc", "incl", "period_s", "mass_kg", "state"
        )
        .trim_end(),
    );
    out.push('\n');

    for r in records {
        let state = match r.qualification().reason() {
            None => "qualified",
            Some(reason) => reason.label(),
        };
        let line = match r.fields() {
            Some(f) => format!(
                "{:>6} {:<COL$} {:>COL$} {:>COL$} {:>COL$} {:>COL$} {:>COL$} {:>COL$} {:>COL$} {:<COL$}\n",
                r.row(),
                truncate(r.orbit_class(), COL),
                fmt_sig(f.longitude_deg),
                fmt_sig(f.perigee_m),
                fmt_sig(f.apogee_m),
                fmt_sig(f.eccentricity),
                fmt_sig(f.inclination_deg),
                fmt_sig(f.period_s),
                fmt_sig(f.launch_mass_kg),
                state,
            ),
            None => format!(
                "{:>6} {:<COL$} {:>COL$} {:>COL$} {:>COL$} {:>COL$} {:>COL$} {:>COL$} {:>COL$} {:<COL$}\n",
                r.row(),
                truncate(r.orbit_class(), COL),
                "-",
                "-",
                "-",
                "-",
                "-",
                "-",
                "-",
                state,
            ),
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Round to [`SIG_FIGS`] significant figures.
pub fn round_sig(v: f64, sig: i32) -> f64 {
    if v == 0.0 || !v.is_finite() {
        return v;
    }
    let magnitude = v.abs().log10().floor() as i32;
    let factor = 10f64.powi(sig - 1 - magnitude);
    (v * factor).round() / factor
}

/// Plain notation for moderate magnitudes, scientific otherwise.
pub fn fmt_sig(v: f64) -> String {
    if v == 0.0 || !v.is_finite() {
        return format!("{v}");
    }
    let a = v.abs();
    if (1e-3..1e6).contains(&a) {
        format!("{}", round_sig(v, SIG_FIGS))
    } else {
        format!("{:.*e}", (SIG_FIGS - 1) as usize, v)
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
