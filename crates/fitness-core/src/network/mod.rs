//! Network utilities for HTTP operations.

mod client;

pub use client::{extract_domain, HttpClient, RateLimitState};
