//! Target environments of the Mechanical Turk requester API.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Base URL for requests in the production environment.
pub const PRODUCTION_URL: &str = "https://mechanicalturk.amazonaws.com/";

/// Base URL for requests in the sandbox environment.
pub const SANDBOX_URL: &str = "https://mechanicalturk.sandbox.amazonaws.com/";

/// The environment a set of credentials talks to.
///
/// Work published in the sandbox is free and never reaches real workers,
/// which makes it the right target while developing.
///
/// # Example
///
/// ```rust
/// use mturk_api::Environment;
///
/// let env: Environment = "sandbox".parse().unwrap();
/// assert!(env.is_sandbox());
/// assert_eq!(env.base_url(), "https://mechanicalturk.sandbox.amazonaws.com/");
/// assert_eq!(Environment::default(), Environment::Production);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Environment {
    /// The live marketplace.
    #[default]
    Production,
    /// The requester sandbox.
    Sandbox,
}

impl Environment {
    /// Returns the fixed base URL for this environment.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_URL,
            Self::Sandbox => SANDBOX_URL,
        }
    }

    /// Returns `true` for [`Environment::Sandbox`].
    #[must_use]
    pub const fn is_sandbox(self) -> bool {
        matches!(self, Self::Sandbox)
    }
}

impl From<bool> for Environment {
    fn from(sandbox: bool) -> Self {
        if sandbox {
            Self::Sandbox
        } else {
            Self::Production
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Sandbox => f.write_str("sandbox"),
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "sandbox" => Ok(Self::Sandbox),
            _ => Err(ConfigError::InvalidEnvironment {
                name: s.to_string(),
            }),
        }
    }
}

impl Serialize for Environment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_urls_differ_per_environment() {
        assert_eq!(
            Environment::Production.base_url(),
            "https://mechanicalturk.amazonaws.com/"
        );
        assert_eq!(
            Environment::Sandbox.base_url(),
            "https://mechanicalturk.sandbox.amazonaws.com/"
        );
    }

    #[test]
    fn test_from_bool_maps_sandbox_flag() {
        assert_eq!(Environment::from(true), Environment::Sandbox);
        assert_eq!(Environment::from(false), Environment::Production);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("SANDBOX".parse::<Environment>().unwrap(), Environment::Sandbox);
        assert_eq!(
            " Production ".parse::<Environment>().unwrap(),
            Environment::Production
        );
    }

    #[test]
    fn test_parse_rejects_unknown_names() {
        let result = "staging".parse::<Environment>();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvironment { name }) if name == "staging"
        ));
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&Environment::Sandbox).unwrap();
        assert_eq!(json, r#""sandbox""#);
        let env: Environment = serde_json::from_str(r#""production""#).unwrap();
        assert_eq!(env, Environment::Production);
    }
}
