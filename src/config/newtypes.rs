//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;

/// A validated AWS access key id.
///
/// This newtype ensures the key is non-empty and provides type safety
/// to prevent accidental misuse of raw strings.
///
/// # Example
///
/// ```rust
/// use mturk_api::AccessKeyId;
///
/// let key = AccessKeyId::new("AKIAEXAMPLE").unwrap();
/// assert_eq!(key.as_ref(), "AKIAEXAMPLE");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessKeyId(String);

impl AccessKeyId {
    /// Creates a new validated access key id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAccessKeyId`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptyAccessKeyId);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for AccessKeyId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated AWS secret access key.
///
/// This newtype ensures the secret key is non-empty and masks its value
/// in debug output to prevent accidental exposure in logs.
///
/// # Example
///
/// ```rust
/// use mturk_api::SecretKey;
///
/// let secret = SecretKey::new("my-secret").unwrap();
/// assert_eq!(format!("{:?}", secret), "SecretKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(String);

impl SecretKey {
    /// Creates a new validated secret key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptySecretKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptySecretKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for SecretKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(*****)")
    }
}

/// A validated base URL used in place of the environment endpoint.
///
/// Requests are sent to this URL instead of the production or sandbox
/// endpoint, which is useful behind proxies and against mock servers.
///
/// # Example
///
/// ```rust
/// use mturk_api::HostUrl;
///
/// let url = HostUrl::new("http://localhost:8080").unwrap();
/// assert_eq!(url.scheme(), "http");
/// assert_eq!(url.host_name(), Some("localhost"));
/// assert_eq!(url.base_url(), "http://localhost:8080/");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostUrl {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl HostUrl {
    /// Creates a new validated host URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHostUrl`] if the URL has no scheme or no host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().to_string();

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidHostUrl { url: url.clone() })?;

        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidHostUrl { url: url.clone() });
        }

        let host_start = scheme_end + 3;
        if host_start >= url.len() {
            return Err(ConfigError::InvalidHostUrl { url: url.clone() });
        }

        // Host ends at port, path, query, or end of string
        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);

        if host_end == host_start {
            return Err(ConfigError::InvalidHostUrl { url: url.clone() });
        }

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        let host = &self.url[self.host_start..self.host_end];
        if host.is_empty() {
            None
        } else {
            Some(host)
        }
    }

    /// Returns the URL with exactly one trailing slash, ready for a query string.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}/", self.url.trim_end_matches('/'))
    }
}

impl AsRef<str> for HostUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_key_id_rejects_empty_string() {
        assert!(matches!(
            AccessKeyId::new(""),
            Err(ConfigError::EmptyAccessKeyId)
        ));
    }

    #[test]
    fn test_secret_key_rejects_empty_string() {
        assert!(matches!(SecretKey::new(""), Err(ConfigError::EmptySecretKey)));
    }

    #[test]
    fn test_secret_key_masks_value_in_debug() {
        let secret = SecretKey::new("super-secret-key").unwrap();
        let debug_output = format!("{:?}", secret);
        assert_eq!(debug_output, "SecretKey(*****)");
        assert!(!debug_output.contains("super-secret-key"));
    }

    #[test]
    fn test_host_url_validates_format() {
        let url = HostUrl::new("https://proxy.example.com").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_name(), Some("proxy.example.com"));

        let url = HostUrl::new("http://127.0.0.1:3000").unwrap();
        assert_eq!(url.host_name(), Some("127.0.0.1"));
    }

    #[test]
    fn test_host_url_rejects_invalid() {
        assert!(HostUrl::new("proxy.example.com").is_err());
        assert!(HostUrl::new("https://").is_err());
        assert!(HostUrl::new("://example.com").is_err());
        assert!(HostUrl::new("http://:8080").is_err());
    }

    #[test]
    fn test_host_url_base_url_has_single_trailing_slash() {
        assert_eq!(
            HostUrl::new("http://localhost:8080").unwrap().base_url(),
            "http://localhost:8080/"
        );
        assert_eq!(
            HostUrl::new("http://localhost:8080//").unwrap().base_url(),
            "http://localhost:8080/"
        );
    }
}
