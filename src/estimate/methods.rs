//! Per-record mass estimators.
//!
//! Both methods take a qualified record's typed fields plus the physical
//! constants and return one scalar mass estimate (kg). They perform no
//! qualification checks; the catalog only calls them for qualified records.
//!
//! - [`KeplerThirdLaw`]: `M = 4π²·a³ / (T²·G)`
//! - [`OrbitalVelocity`]: `M = v²·a / G` with `v = perimeter / T`, the perimeter
//!   of the orbital ellipse from Ramanujan's second approximation. Identical to
//!   the Kepler estimate for circular orbits.
//!
//! Here `a = (apogee + perigee)/2 + R`.

use std::f64::consts::PI;

use crate::domain::{Estimates, KeplerPair, Method, OrbitalFields, PhysicalConstants};

/// A closed-form mass estimate over one record.
pub trait MassEstimator: Sync {
    fn method(&self) -> Method;

    fn estimate(&self, fields: &OrbitalFields, constants: &PhysicalConstants) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KeplerThirdLaw;

impl MassEstimator for KeplerThirdLaw {
    fn method(&self) -> Method {
        Method::Kepler
    }

    fn estimate(&self, fields: &OrbitalFields, constants: &PhysicalConstants) -> f64 {
        let a = fields.semi_major_like_radius(constants.body_radius_m);
        let numer = 4.0 * PI * PI * a.powi(3);
        let denom = fields.period_s.powi(2) * constants.gravitational_constant;
        numer / denom
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OrbitalVelocity;

impl MassEstimator for OrbitalVelocity {
    fn method(&self) -> Method {
        Method::Velocity
    }

    fn estimate(&self, fields: &OrbitalFields, constants: &PhysicalConstants) -> f64 {
        let r = constants.body_radius_m;
        let a = fields.semi_major_like_radius(r);
        let b = ((fields.apogee_m + r) * (fields.perigee_m + r)).sqrt();
        let speed = ellipse_perimeter(a, b) / fields.period_s;
        speed * speed * a / constants.gravitational_constant
    }
}

/// Resolve the estimator implementation for a method.
pub fn estimator(method: Method) -> &'static dyn MassEstimator {
    match method {
        Method::Kepler => &KeplerThirdLaw,
        Method::Velocity => &OrbitalVelocity,
    }
}

/// Coordinate pair for slope-based estimation: `y = T²`, `x = 4π·a³ / G`.
pub fn kepler_pair(fields: &OrbitalFields, constants: &PhysicalConstants) -> KeplerPair {
    let a = fields.semi_major_like_radius(constants.body_radius_m);
    KeplerPair {
        x: 4.0 * PI * a.powi(3) / constants.gravitational_constant,
        y: fields.period_s.powi(2),
    }
}

/// Compute the coordinate pair and every requested method's estimate.
pub fn compute_estimates(fields: &OrbitalFields, constants: &PhysicalConstants, methods: &[Method]) -> Estimates {
    methods
        .iter()
        .fold(Estimates::new(kepler_pair(fields, constants)), |acc, &method| {
            acc.with_mass(method, estimator(method).estimate(fields, constants))
        })
}

/// Ramanujan's second approximation of an ellipse perimeter.
fn ellipse_perimeter(a: f64, b: f64) -> f64 {
    let h = ((a - b) / (a + b)).powi(2);
    PI * (a + b) * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orbit(perigee_km: f64, apogee_km: f64, period_min: f64) -> OrbitalFields {
        OrbitalFields {
            longitude_deg: 0.0,
            perigee_m: perigee_km * 1_000.0,
            apogee_m: apogee_km * 1_000.0,
            eccentricity: 0.0,
            inclination_deg: 0.0,
            period_s: period_min * 60.0,
            launch_mass_kg: 0.0,
        }
    }

    #[test]
    fn geostationary_orbit_recovers_earth_mass() {
        let c = PhysicalConstants::EARTH;
        let m = KeplerThirdLaw.estimate(&orbit(35_786.0, 35_786.0, 1_436.1), &c);
        assert!((m - c.reference_mass_kg).abs() / c.reference_mass_kg < 0.01, "m={m}");
    }

    #[test]
    fn methods_agree_for_circular_orbits() {
        let c = PhysicalConstants::EARTH;
        let f = orbit(400.0, 400.0, 92.68);
        let k = KeplerThirdLaw.estimate(&f, &c);
        let v = OrbitalVelocity.estimate(&f, &c);
        assert!((k - v).abs() / k < 1e-12);
    }

    #[test]
    fn methods_diverge_for_eccentric_orbits() {
        let c = PhysicalConstants::EARTH;
        let f = orbit(500.0, 39_000.0, 720.0);
        let k = KeplerThirdLaw.estimate(&f, &c);
        let v = OrbitalVelocity.estimate(&f, &c);
        assert!(v < k);
        assert!((k - v).abs() / k > 0.1);
    }

    #[test]
    fn kepler_pair_slope_encodes_mass() {
        let c = PhysicalConstants::EARTH;
        let f = orbit(400.0, 400.0, 92.68);
        let pair = kepler_pair(&f, &c);
        let mass = KeplerThirdLaw.estimate(&f, &c);
        // y = (π / M) x
        assert!((PI * pair.x / pair.y - mass).abs() / mass < 1e-12);
    }

    #[test]
    fn compute_estimates_fills_only_requested_methods() {
        let c = PhysicalConstants::EARTH;
        let e = compute_estimates(&orbit(400.0, 400.0, 92.68), &c, &[Method::Kepler]);
        assert!(e.mass(Method::Kepler).is_some());
        assert!(e.mass(Method::Velocity).is_none());
    }

    #[test]
    fn perimeter_of_circle() {
        assert!((ellipse_perimeter(1.0, 1.0) - 2.0 * PI).abs() < 1e-12);
    }
}
