//! Run reports
//!
//! Renders a finished [`RunReport`](crate::engine::RunReport) as aligned text
//! or as a single JSON document.

mod types;
mod writer;

pub use types::OutputFormat;
pub use writer::Reporter;
