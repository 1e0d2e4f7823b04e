//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - typed catalog entries (`Record`, `OrbitalFields`)
//! - qualification state (`Qualification`, `DisqualificationReason`)
//! - estimation outputs (`Estimates`, `KeplerPair`, `Method`)
//! - run configuration (`RunConfig`, `SweepConfig`, `PhysicalConstants`)

pub mod types;

pub use types::*;
