//! Requester credentials and the providers that hand them to a client.
//!
//! A client never reads process-wide state. It asks its
//! [`CredentialsProvider`] for a snapshot at the start of each call, so
//! swapping credentials with [`SharedCredentials::replace`] only affects
//! calls that begin afterwards.

use std::sync::{Arc, PoisonError, RwLock};

use crate::config::{AccessKeyId, Environment, SecretKey};

/// The key pair and target environment used to sign requests.
///
/// # Example
///
/// ```rust
/// use mturk_api::{AccessKeyId, Credentials, Environment, SecretKey};
///
/// let credentials = Credentials::new(
///     AccessKeyId::new("AKIAEXAMPLE").unwrap(),
///     SecretKey::new("secret").unwrap(),
///     Environment::Sandbox,
/// );
///
/// assert!(credentials.is_sandbox());
/// assert_eq!(credentials.access_key_id().as_ref(), "AKIAEXAMPLE");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    access_key_id: AccessKeyId,
    secret_key: SecretKey,
    environment: Environment,
}

impl Credentials {
    /// Creates credentials for the given environment.
    #[must_use]
    pub const fn new(
        access_key_id: AccessKeyId,
        secret_key: SecretKey,
        environment: Environment,
    ) -> Self {
        Self {
            access_key_id,
            secret_key,
            environment,
        }
    }

    /// Returns the access key id sent as `AWSAccessKeyId`.
    #[must_use]
    pub const fn access_key_id(&self) -> &AccessKeyId {
        &self.access_key_id
    }

    /// Returns the secret key used to sign requests.
    #[must_use]
    pub const fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    /// Returns the target environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Returns `true` when requests go to the sandbox.
    #[must_use]
    pub const fn is_sandbox(&self) -> bool {
        self.environment.is_sandbox()
    }
}

/// Source of the credentials a client signs each call with.
pub trait CredentialsProvider: Send + Sync {
    /// Returns the credentials to use for a call that is starting now.
    fn credentials(&self) -> Arc<Credentials>;
}

impl CredentialsProvider for Credentials {
    fn credentials(&self) -> Arc<Credentials> {
        Arc::new(self.clone())
    }
}

impl CredentialsProvider for Arc<Credentials> {
    fn credentials(&self) -> Arc<Credentials> {
        Arc::clone(self)
    }
}

/// Credentials that can be swapped for every client sharing them.
///
/// Cloning a `SharedCredentials` yields another handle onto the same slot.
///
/// # Example
///
/// ```rust
/// use mturk_api::{AccessKeyId, Credentials, CredentialsProvider, Environment, SecretKey, SharedCredentials};
///
/// let sandbox = Credentials::new(
///     AccessKeyId::new("AK").unwrap(),
///     SecretKey::new("SK").unwrap(),
///     Environment::Sandbox,
/// );
/// let shared = SharedCredentials::new(sandbox);
/// let in_flight = shared.credentials();
///
/// shared.replace(Credentials::new(
///     AccessKeyId::new("AK2").unwrap(),
///     SecretKey::new("SK2").unwrap(),
///     Environment::Production,
/// ));
///
/// assert!(in_flight.is_sandbox());
/// assert!(!shared.credentials().is_sandbox());
/// ```
#[derive(Clone, Debug)]
pub struct SharedCredentials {
    current: Arc<RwLock<Arc<Credentials>>>,
}

impl SharedCredentials {
    /// Creates a shared slot holding `credentials`.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(credentials))),
        }
    }

    /// Swaps in new credentials for calls that start after this returns.
    pub fn replace(&self, credentials: Credentials) {
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Arc::new(credentials);
        tracing::debug!("Replaced shared credentials");
    }
}

impl CredentialsProvider for SharedCredentials {
    fn credentials(&self) -> Arc<Credentials> {
        let slot = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*slot)
    }
}

// Verify provider types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Credentials>();
    assert_send_sync::<SharedCredentials>();
};

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(key: &str, environment: Environment) -> Credentials {
        Credentials::new(
            AccessKeyId::new(key).unwrap(),
            SecretKey::new("secret").unwrap(),
            environment,
        )
    }

    #[test]
    fn test_accessors() {
        let creds = credentials("AK", Environment::Production);
        assert_eq!(creds.access_key_id().as_ref(), "AK");
        assert_eq!(creds.secret_key().as_ref(), "secret");
        assert_eq!(creds.environment(), Environment::Production);
        assert!(!creds.is_sandbox());
    }

    #[test]
    fn test_debug_masks_secret() {
        let debug = format!("{:?}", credentials("AK", Environment::Sandbox));
        assert!(debug.contains("SecretKey(*****)"));
        assert!(!debug.contains("\"secret\""));
    }

    #[test]
    fn test_arc_provider_returns_same_allocation() {
        let creds = Arc::new(credentials("AK", Environment::Sandbox));
        assert!(Arc::ptr_eq(&creds.credentials(), &creds));
    }

    #[test]
    fn test_replace_does_not_affect_captured_snapshot() {
        let shared = SharedCredentials::new(credentials("first", Environment::Sandbox));
        let snapshot = shared.credentials();

        shared.replace(credentials("second", Environment::Production));

        assert_eq!(snapshot.access_key_id().as_ref(), "first");
        assert_eq!(shared.credentials().access_key_id().as_ref(), "second");
    }

    #[test]
    fn test_clones_share_the_same_slot() {
        let shared = SharedCredentials::new(credentials("first", Environment::Sandbox));
        let other = shared.clone();

        other.replace(credentials("second", Environment::Sandbox));

        assert_eq!(shared.credentials().access_key_id().as_ref(), "second");
    }
}
