//! Terminal plotting helpers for the CLI.

pub mod ascii;

pub use ascii::*;
