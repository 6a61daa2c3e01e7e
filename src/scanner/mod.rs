// src/scanner/mod.rs
// =============================================================================
// This module wraps the IP Quality Score malicious URL scanner API.
//
// Submodules:
// - client: the MalUrl client (fetch + accessors)
// - report: typed JSON response body
// - validate: local URL check run before each request
// - strictness: the 0/1/2 scan sensitivity knob
// - error: what can go wrong while scanning
// =============================================================================

mod client;
mod error;
mod report;
mod strictness;
mod validate;

pub use client::{MalUrl, DEFAULT_BASE_URL, DOES_NOT_EXIST, NA};
pub use error::ScanError;
pub use report::{DomainAge, UrlReport, QUOTA_EXCEEDED};
pub use strictness::Strictness;
pub use validate::is_valid_url;
