// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things). Secrets and common knobs
// can also come from MALURL_* environment variables via clap's `env`.
// =============================================================================

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use malurl::config::Overrides;
use malurl::Strictness;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
#[derive(Parser, Debug)]
#[command(
    name = "malurl",
    version,
    about = "Scan links with the IP Quality Score API to detect suspicious URLs",
    long_about = "malurl asks IP Quality Score whether each URL is associated with phishing, \
                  malware, spam or other abuse. URLs are checked one at a time; malformed \
                  URLs are rejected locally so they don't count against your monthly quota."
)]
pub struct Cli {
    // Positional arguments: at least one URL is required
    /// URLs to scan (e.g., https://example.com)
    #[arg(required = true, value_name = "URL")]
    pub urls: Vec<String>,

    // `env` means MALURL_API_KEY is used when the flag is missing;
    // hide_env_values keeps the key out of --help output
    /// IP Quality Score API key
    #[arg(short = 'k', long, env = "MALURL_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    // value_parser runs our own function so 3 or -1 fail at parse time
    /// Scan strictness: 0 (default), 1 or 2. Higher flags more URLs.
    #[arg(short, long, env = "MALURL_STRICTNESS", value_parser = parse_strictness)]
    pub strictness: Option<Strictness>,

    /// Config file (default: ~/.config/malurl/config.toml if it exists)
    #[arg(short, long, env = "MALURL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the IP Quality Score API host
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds (default: 30)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output results in JSON format instead of a summary
    #[arg(long, conflicts_with = "rainbow")]
    pub json: bool,

    /// Color the summary as a rainbow gradient
    #[arg(long)]
    pub rainbow: bool,

    // ArgAction::Count turns -vv into 2
    /// More log output on stderr (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// The settings the user gave explicitly, for merging with the config file.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_key: self.api_key.clone(),
            strictness: self.strictness,
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout,
        }
    }
}

// clap value parser: reuses Strictness's FromStr so the error text matches
// what the config file reports
fn parse_strictness(value: &str) -> Result<Strictness, String> {
    value.parse().map_err(|e: malurl::ScanError| e.to_string())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Option<String> for the API key?
//    - The key may come from the config file instead, so "not given" must
//      be distinguishable from any value
//    - config::resolve() decides what wins
//
// 2. What does #[arg(env = "...")] do?
//    - clap falls back to the environment variable when the flag is absent
//    - The flag still wins if both are set
//
// 3. Why is the binary a separate crate from the library?
//    - src/lib.rs is the reusable client; src/main.rs and this file only
//      exist for the command-line tool
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use malurl::config::{resolve, FileConfig};

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_flags() {
        let cli = Cli::try_parse_from([
            "malurl",
            "--api-key",
            "abc",
            "-s",
            "2",
            "--rainbow",
            "-vv",
            "https://a.example.com",
            "https://b.example.com",
        ])
        .unwrap();

        assert_eq!(cli.api_key.as_deref(), Some("abc"));
        assert_eq!(cli.strictness, Some(Strictness::High));
        assert!(cli.rainbow);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.urls.len(), 2);

        let overrides = cli.overrides();
        assert_eq!(overrides.api_key.as_deref(), Some("abc"));
        assert_eq!(overrides.strictness, Some(Strictness::High));
    }

    #[test]
    fn test_rejects_bad_strictness() {
        assert!(Cli::try_parse_from(["malurl", "-s", "3", "https://example.com"]).is_err());
        // `=` keeps clap from reading "-1" as a flag, so the value parser runs
        let err = Cli::try_parse_from(["malurl", "-s=-1", "https://example.com"]).unwrap_err();
        assert!(err.to_string().contains("strictness must be 0, 1 or 2"));
        let err =
            Cli::try_parse_from(["malurl", "--strictness=9", "https://example.com"]).unwrap_err();
        assert!(err.to_string().contains("strictness must be 0, 1 or 2"));
    }

    #[test]
    fn test_env_key_sits_between_flag_and_file() {
        let file = FileConfig {
            api_key: Some("from-file".to_string()),
            ..FileConfig::default()
        };

        // Only this test touches MALURL_API_KEY.
        std::env::set_var("MALURL_API_KEY", "from-env");
        let from_env = Cli::try_parse_from(["malurl", "https://example.com"]);
        let from_flag = Cli::try_parse_from(["malurl", "-k", "from-flag", "https://example.com"]);
        std::env::remove_var("MALURL_API_KEY");
        let from_file = Cli::try_parse_from(["malurl", "https://example.com"]);

        let settings = resolve(from_env.unwrap().overrides(), file.clone()).unwrap();
        assert_eq!(settings.api_key, "from-env");

        let settings = resolve(from_flag.unwrap().overrides(), file.clone()).unwrap();
        assert_eq!(settings.api_key, "from-flag");

        let settings = resolve(from_file.unwrap().overrides(), file).unwrap();
        assert_eq!(settings.api_key, "from-file");
    }

    #[test]
    fn test_requires_a_url() {
        assert!(Cli::try_parse_from(["malurl", "-k", "abc"]).is_err());
    }

    #[test]
    fn test_json_and_rainbow_conflict() {
        assert!(
            Cli::try_parse_from(["malurl", "--json", "--rainbow", "https://example.com"]).is_err()
        );
    }
}
