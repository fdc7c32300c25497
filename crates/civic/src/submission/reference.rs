//! Tracking identifiers handed out for submitted reports.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ReferenceError;

/// Prefix used when the configuration does not name one.
pub const DEFAULT_PREFIX: &str = "DL-CIV";

/// Numeric suffixes are drawn from `0..SUFFIX_RANGE`.
const SUFFIX_RANGE: u128 = 100_000;

static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<prefix>[A-Z][A-Z0-9]*(?:-[A-Z][A-Z0-9]*)*)-(?P<number>\d+)$")
        .expect("reference pattern is valid")
});

/// A report reference number, `PREFIX-<digits>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceNumber(String);

impl ReferenceNumber {
    /// Fabricates a new reference number with a random numeric suffix.
    pub fn generate(prefix: &str) -> Self {
        let suffix = Uuid::new_v4().as_u128() % SUFFIX_RANGE;
        Self(format!("{}-{}", prefix, suffix))
    }

    pub fn parse(s: &str) -> Result<Self, ReferenceError> {
        if REFERENCE_PATTERN.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(ReferenceError(s.to_string()))
        }
    }

    pub fn is_valid_prefix(prefix: &str) -> bool {
        REFERENCE_PATTERN.is_match(&format!("{}-0", prefix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn prefix(&self) -> &str {
        self.0.rsplit_once('-').map(|(p, _)| p).unwrap_or_default()
    }

    pub fn number(&self) -> u64 {
        self.0
            .rsplit_once('-')
            .and_then(|(_, n)| n.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for ReferenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ReferenceNumber {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ReferenceNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_matches_pattern() {
        for _ in 0..50 {
            let reference = ReferenceNumber::generate(DEFAULT_PREFIX);
            assert!(ReferenceNumber::parse(reference.as_str()).is_ok(), "{}", reference);
            assert_eq!(reference.prefix(), "DL-CIV");
            assert!(reference.number() < 100_000);
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ReferenceNumber::parse("DL-CIV-").is_err());
        assert!(ReferenceNumber::parse("DL-CIV-12a").is_err());
        assert!(ReferenceNumber::parse("12345").is_err());
        assert!(ReferenceNumber::parse("dl-civ-1").is_err());
        assert!(ReferenceNumber::parse("R-9981").is_ok());
    }

    #[test]
    fn test_prefix_validation() {
        assert!(ReferenceNumber::is_valid_prefix("DL-CIV"));
        assert!(ReferenceNumber::is_valid_prefix("MUM2"));
        assert!(!ReferenceNumber::is_valid_prefix("dl"));
        assert!(!ReferenceNumber::is_valid_prefix(""));
    }

    #[test]
    fn test_serializes_as_string() {
        let reference = ReferenceNumber::parse("DL-CIV-8291").unwrap();
        assert_eq!(serde_json::to_string(&reference).unwrap(), "\"DL-CIV-8291\"");
    }
}
