// src/lib.rs
// =============================================================================
// malurl: scan links in real time with the IP Quality Score API.
//
// Modules:
// - scanner: the API client and its response model
// - output: plain / rainbow summaries of a scan
// - config: config file + flag resolution for the CLI
// - logging: tracing subscriber setup
// =============================================================================

pub mod config;
pub mod logging;
pub mod output;
pub mod scanner;

pub use scanner::{
    is_valid_url, DomainAge, MalUrl, ScanError, Strictness, UrlReport, DOES_NOT_EXIST, NA,
};
