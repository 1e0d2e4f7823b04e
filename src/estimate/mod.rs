//! Mass estimation.
//!
//! - closed-form per-record estimators behind [`MassEstimator`] (`methods`)
//! - the least-squares Kepler line over the whole qualified set (`regression`)

pub mod methods;
pub mod regression;

pub use methods::*;
pub use regression::*;
