//! Authentication types for the Mechanical Turk API SDK.
//!
//! The requester API authenticates every call individually: the access key
//! id travels in the query string next to a timestamp and an HMAC-SHA1
//! signature computed with the secret key. There are no sessions or tokens.
//!
//! # Overview
//!
//! - [`Credentials`]: Access key id, secret key and target environment
//! - [`CredentialsProvider`]: Where a client gets its credentials for each call
//! - [`SharedCredentials`]: A swappable provider shared between clients
//! - [`signature`]: Signature and timestamp computation
//!
//! # Example
//!
//! ```rust
//! use mturk_api::{AccessKeyId, Credentials, Environment, SecretKey};
//!
//! let credentials = Credentials::new(
//!     AccessKeyId::new("AKIAEXAMPLE").unwrap(),
//!     SecretKey::new("secret").unwrap(),
//!     Environment::Sandbox,
//! );
//! assert!(credentials.is_sandbox());
//! ```

mod credentials;
pub mod signature;

pub use credentials::{Credentials, CredentialsProvider, SharedCredentials};
