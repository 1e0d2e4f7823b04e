//! Aggregate statistics over per-record mass estimates.

pub mod summary;

pub use summary::*;
