//! Configuration types for the Mechanical Turk API SDK.
//!
//! This module provides the configuration types used to initialize the SDK.
//! Credentials are deliberately kept out of [`MturkConfig`]: they live in
//! [`crate::auth::Credentials`] and are handed to the client through a
//! [`crate::auth::CredentialsProvider`].
//!
//! # Overview
//!
//! - [`MturkConfig`]: Optional client settings
//! - [`MturkConfigBuilder`]: A builder for constructing [`MturkConfig`] instances
//! - [`AccessKeyId`]: A validated access key id newtype
//! - [`SecretKey`]: A validated secret key newtype with masked debug output
//! - [`HostUrl`]: A validated base URL overriding the environment endpoint
//! - [`Environment`]: Production or sandbox
//! - [`ApiVersion`]: The requester API version to use
//!
//! # Example
//!
//! ```rust
//! use mturk_api::{ApiVersion, HostUrl, MturkConfig};
//!
//! let config = MturkConfig::builder()
//!     .api_version(ApiVersion::latest())
//!     .host(HostUrl::new("http://localhost:8080").unwrap())
//!     .user_agent_prefix("MyApp/1.0")
//!     .build();
//!
//! assert_eq!(config.user_agent_prefix(), Some("MyApp/1.0"));
//! ```

mod environment;
mod newtypes;
mod version;

pub use environment::{Environment, PRODUCTION_URL, SANDBOX_URL};
pub use newtypes::{AccessKeyId, HostUrl, SecretKey};
pub use version::ApiVersion;

/// Client settings for the Mechanical Turk API SDK.
///
/// # Thread Safety
///
/// `MturkConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug, Default)]
pub struct MturkConfig {
    host: Option<HostUrl>,
    api_version: ApiVersion,
    user_agent_prefix: Option<String>,
}

impl MturkConfig {
    /// Creates a new builder for constructing a `MturkConfig`.
    #[must_use]
    pub fn builder() -> MturkConfigBuilder {
        MturkConfigBuilder::new()
    }

    /// Returns the host override, if configured.
    #[must_use]
    pub const fn host(&self) -> Option<&HostUrl> {
        self.host.as_ref()
    }

    /// Returns the API version sent with every call.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify MturkConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MturkConfig>();
};

/// Builder for constructing [`MturkConfig`] instances.
///
/// # Defaults
///
/// - `host`: `None` (the credentials' environment decides the endpoint)
/// - `api_version`: [`ApiVersion::latest`]
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct MturkConfigBuilder {
    host: Option<HostUrl>,
    api_version: Option<ApiVersion>,
    user_agent_prefix: Option<String>,
}

impl MturkConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends every request to `host` instead of the environment endpoint.
    #[must_use]
    pub fn host(mut self, host: HostUrl) -> Self {
        self.host = Some(host);
        self
    }

    /// Sets the API version.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`MturkConfig`].
    #[must_use]
    pub fn build(self) -> MturkConfig {
        MturkConfig {
            host: self.host,
            api_version: self.api_version.unwrap_or_else(ApiVersion::latest),
            user_agent_prefix: self.user_agent_prefix,
        }
    }
}
