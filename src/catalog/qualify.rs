//! Eccentricity qualification policy.
//!
//! A record qualifies when its eccentricity is at or below the current
//! qualifier. A qualifier of exactly `0` is special-cased: only perfectly
//! circular orbits (`e == 0`) qualify.

use crate::domain::{DisqualificationReason, OrbitalFields, Qualification};

/// Pass/fail decision for one eccentricity against one qualifier.
pub fn qualifies(eccentricity: f64, threshold: f64) -> bool {
    if threshold == 0.0 {
        eccentricity == 0.0
    } else {
        eccentricity <= threshold
    }
}

/// Qualification of a complete record at `threshold`.
pub fn evaluate(fields: &OrbitalFields, threshold: f64) -> Qualification {
    if qualifies(fields.eccentricity, threshold) {
        Qualification::Qualified
    } else {
        Qualification::Disqualified(DisqualificationReason::EccentricityExceeded)
    }
}

/// Recompute a record's state from its source fields.
///
/// Terminal states (and records without fields) are returned unchanged.
pub fn reevaluate(current: Qualification, fields: Option<&OrbitalFields>, threshold: f64) -> Qualification {
    if current.is_terminal() {
        return current;
    }
    match fields {
        Some(fields) => evaluate(fields, threshold),
        None => Qualification::Disqualified(DisqualificationReason::MissingField),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields_with_eccentricity(e: f64) -> OrbitalFields {
        OrbitalFields {
            longitude_deg: 0.0,
            perigee_m: 500_000.0,
            apogee_m: 500_000.0,
            eccentricity: e,
            inclination_deg: 0.0,
            period_s: 5_670.0,
            launch_mass_kg: 0.0,
        }
    }

    #[test]
    fn at_or_below_threshold_qualifies() {
        assert!(qualifies(0.01, 0.01));
        assert!(qualifies(0.005, 0.01));
        assert!(!qualifies(0.0100001, 0.01));
    }

    #[test]
    fn zero_threshold_requires_exact_circular_orbit() {
        assert!(qualifies(0.0, 0.0));
        assert!(!qualifies(1e-12, 0.0));
        // A negative eccentricity is nonsense, but it would pass `e <= 0`; the
        // zero qualifier is an exact-match rule, not an ordering rule.
        assert!(!qualifies(-0.1, 0.0));
    }

    #[test]
    fn terminal_state_is_never_reevaluated() {
        let missing = Qualification::Disqualified(DisqualificationReason::MissingField);
        let fields = fields_with_eccentricity(0.0);
        assert_eq!(reevaluate(missing, Some(&fields), 1.0), missing);
    }

    #[test]
    fn eccentricity_disqualification_toggles() {
        let fields = fields_with_eccentricity(0.2);
        let tight = reevaluate(Qualification::Qualified, Some(&fields), 0.1);
        assert_eq!(
            tight,
            Qualification::Disqualified(DisqualificationReason::EccentricityExceeded)
        );
        let wide = reevaluate(tight, Some(&fields), 0.5);
        assert_eq!(wide, Qualification::Qualified);
    }
}
