//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - aggregate exports (JSON/CSV) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
