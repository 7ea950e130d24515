//! Reporting utilities: plain-text tables for the dashboard sections.

pub mod format;

pub use format::*;
