//! The filter-aggregate pipeline.
//!
//! Responsibilities:
//!
//! - narrow the dataset to a borrowed view (`filter`)
//! - daily totals and their rolling average (`series`)
//! - top-N products (`ranking`) and category shares (`shares`)
//! - Pearson correlation over the numeric fields (`correlation`)
//!
//! Every function here is pure and total: empty or degenerate input produces
//! empty or `None` output, never an error.

pub mod correlation;
pub mod filter;
pub mod ranking;
pub mod series;
pub mod shares;
pub mod summary;

pub use correlation::*;
pub use filter::*;
pub use ranking::*;
pub use series::*;
pub use shares::*;
pub use summary::*;
