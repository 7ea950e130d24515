//! Data sources other than user-supplied CSVs.

pub mod sample;

pub use sample::*;
