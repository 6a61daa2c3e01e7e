// src/scanner/strictness.rs
// =============================================================================
// How aggressively IP Quality Score flags URLs.
//
// IPQS accepts 0, 1 or 2. Anything else is rejected when the integer is
// converted, so a client can never hold an out-of-range value.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ScanError;

/// Scan strictness passed straight through to IPQS.
///
/// Higher levels catch more malicious URLs at the cost of more false
/// positives. Serializes as the bare integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub enum Strictness {
    #[default]
    Low,
    Medium,
    High,
}

impl Strictness {
    pub fn level(self) -> u8 {
        match self {
            Strictness::Low => 0,
            Strictness::Medium => 1,
            Strictness::High => 2,
        }
    }
}

impl TryFrom<i64> for Strictness {
    type Error = ScanError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Strictness::Low),
            1 => Ok(Strictness::Medium),
            2 => Ok(Strictness::High),
            other => Err(ScanError::InvalidStrictness(other.to_string())),
        }
    }
}

impl From<Strictness> for u8 {
    fn from(value: Strictness) -> Self {
        value.level()
    }
}

impl FromStr for Strictness {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| ScanError::InvalidStrictness(s.to_string()))?;
        Strictness::try_from(value)
    }
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}
