//! Scenario aggregation.
//!
//! For one method at one threshold we report:
//!
//! - arithmetic mean
//! - median by single-sided selection: the middle element for odd `n`, the
//!   lower of the two central elements for even `n` (never averaged)
//! - population standard deviation (divide by `n`)
//! - percent error of mean and median against the reference value
//! - relative standard deviation in percent

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("no qualifying data to aggregate")]
    NoQualifyingData,
}

/// Summary statistics of one estimate list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EstimateSummary {
    pub n: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub std_dev_percent: f64,
    pub percent_error_mean: f64,
    pub percent_error_median: f64,
}

/// Aggregate `values` against `reference`.
pub fn summarize(values: &[f64], reference: f64) -> Result<EstimateSummary, StatsError> {
    if values.is_empty() {
        return Err(StatsError::NoQualifyingData);
    }

    let mean = mean(values);
    let median = median(values);
    let std_dev = population_std_dev(values, mean);

    Ok(EstimateSummary {
        n: values.len(),
        mean,
        median,
        std_dev,
        std_dev_percent: std_dev / mean * 100.0,
        percent_error_mean: percent_error(mean, reference),
        percent_error_median: percent_error(median, reference),
    })
}

/// `|value - reference| / reference * 100`.
pub fn percent_error(value: f64, reference: f64) -> f64 {
    ((value - reference) / reference * 100.0).abs()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    let mid = (sorted.len() - 1) / 2;
    let (_, m, _) = sorted.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
    *m
}

fn population_std_dev(values: &[f64], mean: f64) -> f64 {
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / values.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_small_sample() {
        let s = summarize(&[1.0, 2.0, 3.0, 4.0], 2.5).unwrap();
        assert_eq!(s.n, 4);
        assert!((s.mean - 2.5).abs() < 1e-12);
        assert!((s.std_dev - 1.118_033_988_749_895).abs() < 1e-9);
        assert!((s.median - 2.0).abs() < 1e-12);
        assert!(s.percent_error_mean.abs() < 1e-12);
    }

    #[test]
    fn median_selects_lower_middle() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.0);
        assert_eq!(median(&[6.0, 5.0]), 5.0);
        assert_eq!(median(&[7.0]), 7.0);
    }

    #[test]
    fn percent_error_against_reference() {
        let reference = 5.97e24;
        assert!(percent_error(5.97e24, reference) < 1e-9);
        let e = percent_error(6.57e24, reference);
        assert!((e - 10.050_251_256_281_4).abs() < 1e-6, "e={e}");
        // Symmetric in sign.
        assert!((percent_error(5.37e24, reference) - e).abs() < 1e-6);
    }

    #[test]
    fn relative_std_dev_is_percent_of_mean() {
        let s = summarize(&[10.0, 10.0, 10.0], 10.0).unwrap();
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.std_dev_percent, 0.0);

        let s = summarize(&[9.0, 11.0], 10.0).unwrap();
        assert!((s.std_dev_percent - 10.0).abs() < 1e-12);
    }

    #[test]
    fn empty_input_is_an_aggregation_fault() {
        assert_eq!(summarize(&[], 1.0), Err(StatsError::NoQualifyingData));
    }
}
