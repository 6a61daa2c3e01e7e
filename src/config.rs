// src/config.rs
// =============================================================================
// Where the CLI gets its API key and scan settings from.
//
// Precedence, highest first:
//   1. command-line flags (and their MALURL_* environment fallbacks, which
//      clap folds into the same fields)
//   2. the config file: --config PATH, or ~/.config/malurl/config.toml
//   3. built-in defaults
//
// The config file is optional and never written for the user, since the
// only thing really worth putting in it is a secret.
// =============================================================================

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::scanner::{Strictness, DEFAULT_BASE_URL};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Contents of `config.toml`. Every key is optional.
///
/// ```toml
/// api_key = "..."
/// strictness = 1
/// base_url = "https://www.ipqualityscore.com"
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub strictness: Option<Strictness>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Values supplied on the command line (already merged with env vars).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub strictness: Option<Strictness>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Fully resolved settings used to build the scanner.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: String,
    pub strictness: Strictness,
    pub base_url: String,
    pub timeout: Duration,
}

/// Default config location under `$XDG_CONFIG_HOME`.
pub fn default_config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("malurl")?;
    Ok(xdg_dirs.get_config_home().join("config.toml"))
}

/// Parse a config file.
pub fn load_file(path: &Path) -> Result<FileConfig> {
    // .with_context() adds the path to the error so the user knows which file
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let cfg: FileConfig = toml::from_str(&data)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(cfg)
}

/// Load the config file if there is one.
///
/// An explicit path must exist. The default path is skipped silently when
/// missing.
pub fn load_optional(explicit: Option<&Path>) -> Result<FileConfig> {
    // The user asked for this file, so a missing one is an error
    if let Some(path) = explicit {
        return load_file(path);
    }

    let path = match default_config_path() {
        Ok(path) => path,
        Err(e) => {
            tracing::debug!("no XDG config directory: {e}");
            return Ok(FileConfig::default());
        }
    };

    if !path.exists() {
        tracing::debug!("no config file at {}", path.display());
        return Ok(FileConfig::default());
    }

    tracing::info!("using config file {}", path.display());
    load_file(&path)
}

/// Merge overrides on top of the file config and fill in defaults.
pub fn resolve(overrides: Overrides, file: FileConfig) -> Result<Settings> {
    // Option::or picks the first Some: flag/env, then file
    let api_key = overrides
        .api_key
        .or(file.api_key)
        .map(|key| key.trim().to_string())
        .unwrap_or_default();

    // Without a key every request would fail at IPQS, so stop here
    if api_key.is_empty() {
        bail!(
            "no IP Quality Score API key: pass --api-key, set MALURL_API_KEY, \
             or add api_key to the config file"
        );
    }

    let timeout_secs = overrides
        .timeout_secs
        .or(file.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    if timeout_secs == 0 {
        bail!("timeout must be at least one second");
    }

    Ok(Settings {
        api_key,
        strictness: overrides.strictness.or(file.strictness).unwrap_or_default(),
        base_url: overrides
            .base_url
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        timeout: Duration::from_secs(timeout_secs),
    })
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why are all FileConfig fields Option?
//    - The file is partial by nature; a missing key means "not set here"
//    - #[serde(default)] lets toml leave them as None
//
// 2. What does #[serde(deny_unknown_fields)] buy us?
//    - A typo like `apikey = "..."` becomes a parse error instead of a
//      silently ignored line
//
// 3. What is bail!?
//    - anyhow's shorthand for `return Err(anyhow!(...))`
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_file() {
        let cfg: FileConfig = toml::from_str(
            r#"
            api_key = "abc"
            strictness = 2
            base_url = "http://localhost:9000"
            timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(cfg.api_key.as_deref(), Some("abc"));
        assert_eq!(cfg.strictness, Some(Strictness::High));
        assert_eq!(cfg.base_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(cfg.timeout_secs, Some(5));
    }

    #[test]
    fn test_rejects_bad_strictness_in_file() {
        assert!(toml::from_str::<FileConfig>("strictness = 9").is_err());
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(toml::from_str::<FileConfig>("apikey = \"typo\"").is_err());
    }

    #[test]
    fn test_flags_beat_file() {
        let file = FileConfig {
            api_key: Some("from-file".to_string()),
            strictness: Some(Strictness::Medium),
            base_url: None,
            timeout_secs: Some(10),
        };
        let overrides = Overrides {
            api_key: Some("from-flag".to_string()),
            strictness: Some(Strictness::High),
            ..Overrides::default()
        };

        let settings = resolve(overrides, file).unwrap();
        assert_eq!(settings.api_key, "from-flag");
        assert_eq!(settings.strictness, Strictness::High);
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_file_fills_gaps() {
        let file = FileConfig {
            api_key: Some("from-file".to_string()),
            ..FileConfig::default()
        };

        let settings = resolve(Overrides::default(), file).unwrap();
        assert_eq!(settings.api_key, "from-file");
        assert_eq!(settings.strictness, Strictness::Low);
        assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let err = resolve(Overrides::default(), FileConfig::default()).unwrap_err();
        assert!(err.to_string().contains("API key"));

        let blank = Overrides {
            api_key: Some("   ".to_string()),
            ..Overrides::default()
        };
        assert!(resolve(blank, FileConfig::default()).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let overrides = Overrides {
            api_key: Some("k".to_string()),
            timeout_secs: Some(0),
            ..Overrides::default()
        };
        assert!(resolve(overrides, FileConfig::default()).is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_key = \"disk-key\"\nstrictness = 1").unwrap();

        let cfg = load_optional(Some(file.path())).unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("disk-key"));
        assert_eq!(cfg.strictness, Some(Strictness::Medium));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_optional(Some(&missing)).is_err());
    }
}
