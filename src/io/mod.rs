//! Input/output helpers.
//!
//! - delimited catalog ingest (`ingest`)
//! - result exports (`export`)
//! - catalog pre-processing (`sanitize`)
//! - reading exported results back for plotting (`readback`)

pub mod export;
pub mod ingest;
pub mod readback;
pub mod sanitize;

pub use export::*;
pub use ingest::*;
pub use readback::*;
pub use sanitize::*;
