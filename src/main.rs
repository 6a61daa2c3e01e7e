// src/main.rs
// =============================================================================
// This is the entry point of the malurl CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Resolve the API key and settings (flags > env > config file)
// 3. Scan each URL in turn with a single MalUrl client
// 4. Print each result (summary or JSON)
// 5. Exit with a code: 0 = all clean, 1 = unsafe URL found, 2 = error
// =============================================================================

// Module declarations - the CLI definition is private to the binary;
// everything else comes from the malurl library crate
mod cli;           // src/cli.rs - command-line parsing

// anyhow::Result lets run() bubble up any error type with the ? operator
use anyhow::{Context, Result};
use clap::Parser;  // Parser trait enables the parse() method
use serde::Serialize;
use std::time::Duration;

use cli::Cli;
use malurl::config;
use malurl::logging::init_logging;
use malurl::{MalUrl, UrlReport};

// One entry of the --json output array.
#[derive(Debug, Serialize)]
struct ScanOutcome {
    url: String,
    report: Option<UrlReport>,
}

// Tally of what we saw, used for the exit code.
#[derive(Debug, Default)]
struct Tally {
    unsafe_found: usize,
    failed: usize,
}

impl Tally {
    fn exit_code(&self) -> i32 {
        if self.unsafe_found > 0 {
            1
        } else if self.failed > 0 {
            2
        } else {
            0
        }
    }
}

// The #[tokio::main] attribute builds a runtime and runs our async main in it
#[tokio::main]
async fn main() {
    // Parse command-line arguments (handles --help and --version for us)
    let cli = Cli::parse();

    // Logging is nice to have; a failure here shouldn't stop the scan
    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Warning: {e:#}");
    }

    // Run the application and turn its result into a process exit code
    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // Setup errors (no API key, bad config file) land here
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = every URL scanned and none unsafe
//   Ok(1) = at least one URL flagged unsafe
//   Ok(2) = some scan failed
//   Err   = setup failed before any scan
async fn run(cli: Cli) -> Result<i32> {
    // Settings: flags/env first, then the config file, then defaults
    let file = config::load_optional(cli.config.as_deref())?;
    let settings = config::resolve(cli.overrides(), file)?;

    // One HTTP client and one scanner for the whole run
    let http = build_http_client(settings.timeout)?;
    let mut scanner = MalUrl::with_client(
        http,
        settings.base_url,
        settings.api_key,
        settings.strictness,
    );

    tracing::info!(
        count = cli.urls.len(),
        strictness = %scanner.strictness(),
        "scanning urls"
    );

    let mut tally = Tally::default();
    let mut outcomes = Vec::new();

    // One request at a time: each fetch replaces the client's last result.
    for (i, url) in cli.urls.iter().enumerate() {
        // A failed fetch still leaves a failure record behind, so the
        // summary below always has something to print
        if let Err(e) = scanner.fetch(url).await {
            tracing::warn!(url = url.as_str(), "scan failed: {e}");
            // In JSON mode the error is already inside the report
            if !cli.json {
                eprintln!("⚠️  {url}: {e}");
            }
        }

        // Count outcomes for the exit code
        if !scanner.success() {
            tally.failed += 1;
        }
        if scanner.is_unsafe() {
            tally.unsafe_found += 1;
        }

        if cli.json {
            outcomes.push(ScanOutcome {
                url: url.clone(),
                report: scanner.report().cloned(),
            });
        } else {
            // Blank line between summaries
            if i > 0 {
                println!();
            }
            scanner.print(cli.rainbow);
        }
    }

    // JSON is printed once at the end as a single array
    if cli.json {
        let json_output = serde_json::to_string_pretty(&outcomes)?;
        println!("{}", json_output);
    }

    Ok(tally.exit_code())
}

// Builds the reqwest client with the configured timeout and our user agent
fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("malurl/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to create HTTP client")
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is the scan loop sequential?
//    - Each fetch costs one request from a metered monthly quota
//    - MalUrl keeps only the last result, so fetch needs &mut self anyway
//    - Awaiting one URL at a time keeps it simple and easy on the quota
//
// 2. Why std::process::exit instead of returning from main?
//    - It lets us pick the exact exit code, which CI scripts can check
//
// 3. Why does main print errors with {e:#}?
//    - The alternate format of anyhow::Error includes every .context() layer
//      on one line, e.g. "failed to read config file x: No such file"
// -----------------------------------------------------------------------------
