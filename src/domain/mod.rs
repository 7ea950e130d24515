//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the loaded dataset (`SaleRecord`, `SalesDataset`)
//! - filter inputs (`FilterCriteria`, `DateRange`, `PipelineOptions`)
//! - aggregate outputs (`DailyTotal`, `ProductTotal`, `CategoryShare`, `CorrelationMatrix`, ...)

pub mod types;

pub use types::*;
