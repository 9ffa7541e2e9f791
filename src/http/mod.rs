//! HTTP executor module
//!
//! Performs single, non-retried requests against the management API.
//!
//! # Features
//!
//! - **Executor trait**: `HttpExecutor` is the seam the session, pagination and
//!   engine layers talk to, so tests can drive them with a fake
//! - **Expected status**: every request names the status it must come back with
//! - **Rate Limiting**: optional token bucket throttle using governor
//! - **TLS override**: certificate trust is a client construction setting

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpExecutor, HttpRequest, HttpResponse};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
