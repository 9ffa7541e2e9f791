// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # vcd-netquery
//!
//! Lists the networks of a cloud director organization through the paged
//! query API, deduplicating records across pages.
//!
//! ## Features
//!
//! - **Sessions**: Basic login, legacy or bearer token picked by API version
//! - **Paging**: Server `lastPage` link drives the walk, one page at a time
//! - **Deduplication**: Records keyed by a urn derived from their `href`
//! - **Reports**: Aligned text or JSON, with reconciliation counters
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vcd_netquery::config::Settings;
//! use vcd_netquery::engine::QueryEngine;
//! use vcd_netquery::http::HttpClient;
//! use vcd_netquery::report::{OutputFormat, Reporter};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> vcd_netquery::Result<()> {
//!     let settings = Settings::load(Some("vcd.yaml".as_ref()), Default::default())?;
//!     let engine = QueryEngine::new(HttpClient::with_config(settings.http_config())?);
//!
//!     let report = engine.run(&settings.run_config()?).await?;
//!     Reporter::new(OutputFormat::Pretty).write(&report, &mut std::io::stdout())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐  token  ┌───────────┐  pages  ┌───────────┐  result  ┌──────────┐
//! │   Auth   │ ──────▶ │ Paginate  │ ──────▶ │ Aggregate │ ───────▶ │  Report  │
//! │ sessions │         │ plan/walk │         │ urn index │          │ text/json│
//! └──────────┘         └───────────┘         └───────────┘          └──────────┘
//!       │                    │
//!       └──────── HTTP executor (reqwest) + XML decoder ────────
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Query records and urn derivation
pub mod record;

/// Session login and logout
pub mod auth;

/// HTTP executor with optional rate limiting
pub mod http;

/// Query-records XML decoding
pub mod decode;

/// Pagination plan and page walk
pub mod pagination;

/// Deduplicating aggregation
pub mod aggregate;

/// Run orchestration
pub mod engine;

/// Text and JSON reports
pub mod report;

/// Layered settings
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use aggregate::{AggregateResult, FinalAggregate};
pub use engine::{QueryEngine, RunConfig, RunReport};
pub use record::Record;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
