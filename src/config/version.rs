//! Requester API version definitions.
//!
//! This module provides the [`ApiVersion`] enum for specifying which version
//! of the requester API to send in the `Version` parameter.

use chrono::NaiveDate;

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Requester API version.
///
/// The API is versioned by release date. [`ApiVersion::latest`] is the
/// version this SDK was written against; `Custom` allows pinning any other
/// dated version without waiting for a new release.
///
/// # Example
///
/// ```rust
/// use mturk_api::ApiVersion;
///
/// let version = ApiVersion::latest();
/// assert_eq!(version.to_string(), "2014-08-15");
///
/// let version: ApiVersion = "2012-03-25".parse().unwrap();
/// assert_eq!(version, ApiVersion::Custom("2012-03-25".to_string()));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// API version 2014-08-15.
    V2014_08_15,
    /// Any other dated version.
    Custom(String),
}

impl ApiVersion {
    /// Returns the latest supported API version.
    #[must_use]
    pub const fn latest() -> Self {
        Self::V2014_08_15
    }

    /// Returns `true` if this is the version the SDK was written against.
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        matches!(self, Self::V2014_08_15)
    }

    fn is_valid_date(s: &str) -> bool {
        // NaiveDate alone would accept "2014-8-5" and signed years
        let fixed_width = s.len() == 10
            && s.bytes().enumerate().all(|(i, b)| match i {
                4 | 7 => b == b'-',
                _ => b.is_ascii_digit(),
            });
        fixed_width && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::latest()
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V2014_08_15 => f.write_str("2014-08-15"),
            Self::Custom(version) => f.write_str(version),
        }
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !Self::is_valid_date(trimmed) {
            return Err(ConfigError::InvalidApiVersion {
                version: s.to_string(),
            });
        }
        match trimmed {
            "2014-08-15" => Ok(Self::V2014_08_15),
            other => Ok(Self::Custom(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_is_supported() {
        assert!(ApiVersion::latest().is_supported());
        assert_eq!(ApiVersion::default(), ApiVersion::latest());
    }

    #[test]
    fn test_parse_known_version() {
        let version: ApiVersion = "2014-08-15".parse().unwrap();
        assert_eq!(version, ApiVersion::V2014_08_15);
    }

    #[test]
    fn test_parse_custom_version() {
        let version: ApiVersion = "2012-03-25".parse().unwrap();
        assert_eq!(version.to_string(), "2012-03-25");
        assert!(!version.is_supported());
    }

    #[test]
    fn test_parse_rejects_malformed_versions() {
        for bad in [
            "",
            "2014-08",
            "2014-13-01",
            "2014-08-32",
            "2014-02-31",
            "2015-02-29",
            "2014-8-5",
            "14-08-15",
            "2014/08/15",
        ] {
            assert!(
                matches!(
                    bad.parse::<ApiVersion>(),
                    Err(ConfigError::InvalidApiVersion { .. })
                ),
                "expected {bad:?} to be rejected"
            );
        }
    }
}
