//! `kepler-mass` library crate.
//!
//! The binary (`kmass`) is a thin wrapper around this library so that:
//!
//! - catalog, estimation and sweep logic is testable without spawning processes
//! - the pipeline can be driven from other front-ends

pub mod app;
pub mod catalog;
pub mod cli;
pub mod domain;
pub mod error;
pub mod estimate;
pub mod io;
pub mod logging;
pub mod math;
pub mod plot;
pub mod report;
pub mod stats;
pub mod sweep;
