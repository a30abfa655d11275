//! Error types for the Mechanical Turk API SDK.
//!
//! This module contains error types used throughout the SDK for configuration
//! and validation errors.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use mturk_api::{AccessKeyId, ConfigError};
//!
//! let result = AccessKeyId::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyAccessKeyId)));
//! ```

use thiserror::Error;

/// Errors that can occur during SDK configuration.
///
/// This enum represents all possible errors that can occur when creating
/// or validating configuration types. Each variant provides a clear,
/// actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Access key id cannot be empty.
    #[error("Access key id cannot be empty. Please provide a valid AWS access key id.")]
    EmptyAccessKeyId,

    /// Secret key cannot be empty.
    #[error("Secret key cannot be empty. Please provide a valid AWS secret access key.")]
    EmptySecretKey,

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected format: 'YYYY-MM-DD' (e.g., '2014-08-15').")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// Environment name is not recognized.
    #[error("Invalid environment '{name}'. Expected 'production' or 'sandbox'.")]
    InvalidEnvironment {
        /// The unrecognized name that was provided.
        name: String,
    },

    /// Host URL is invalid.
    #[error("Invalid host URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://proxy.example.com').")]
    InvalidHostUrl {
        /// The invalid URL that was provided.
        url: String,
    },
}
