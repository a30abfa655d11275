//! Client for the Mechanical Turk requester API.
//!
//! This module provides the [`MturkClient`] type, which signs operation
//! calls, sends them and validates the replies.

use std::sync::Arc;

use crate::auth::signature::{self, SERVICE_NAME};
use crate::auth::{Credentials, CredentialsProvider};
use crate::clients::errors::{MturkError, RequestError};
use crate::clients::operation_call::{encode_query, OperationCall};
use crate::clients::paginator::Paginator;
use crate::clients::response::{Envelope, OperationResult};
use crate::config::{ApiVersion, HostUrl, MturkConfig};

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Client for the requester API.
///
/// Each [`execute`](Self::execute) is exactly one HTTP round trip. Nothing
/// is retried; transient failures such as throttling surface as
/// [`RequestError::Rejected`] with the provider's code.
///
/// # Thread Safety
///
/// `MturkClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use mturk_api::{AccessKeyId, Credentials, Environment, MturkClient, SecretKey};
///
/// let credentials = Credentials::new(
///     AccessKeyId::new("AKIAEXAMPLE").unwrap(),
///     SecretKey::new("secret").unwrap(),
///     Environment::Sandbox,
/// );
/// let client = MturkClient::new(credentials, None);
///
/// let call = OperationCall::builder("GetAccountBalance").build()?;
/// let envelope = client.execute(&call).await?;
/// let balance = envelope.retrieve_result("GetAccountBalanceResult")?;
/// ```
pub struct MturkClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Where each call gets its credentials.
    credentials: Arc<dyn CredentialsProvider>,
    /// Overrides the environment endpoint when set.
    host: Option<HostUrl>,
    /// Sent as the `Version` parameter.
    api_version: ApiVersion,
    /// Sent as the `User-Agent` header.
    user_agent: String,
}

// Verify MturkClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MturkClient>();
};

impl std::fmt::Debug for MturkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MturkClient")
            .field("host", &self.host)
            .field("api_version", &self.api_version)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl MturkClient {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `credentials` - A [`Credentials`] value, an `Arc<Credentials>`, a
    ///   [`SharedCredentials`](crate::auth::SharedCredentials) or any other provider
    /// * `config` - Optional settings for host override, API version and user agent
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(
        credentials: impl CredentialsProvider + 'static,
        config: Option<&MturkConfig>,
    ) -> Self {
        let user_agent_prefix = config
            .and_then(MturkConfig::user_agent_prefix)
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}MTurk API Library v{SDK_VERSION} | Rust {rust_version}");

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            credentials: Arc::new(credentials),
            host: config.and_then(|c| c.host().cloned()),
            api_version: config.map_or_else(ApiVersion::latest, |c| c.api_version().clone()),
            user_agent,
        }
    }

    /// Returns the API version sent with every call.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the `User-Agent` header value.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the base URL calls made with `credentials` are sent to.
    #[must_use]
    pub fn base_url(&self, credentials: &Credentials) -> String {
        self.host.as_ref().map_or_else(
            || credentials.environment().base_url().to_string(),
            HostUrl::base_url,
        )
    }

    /// Builds the full parameter list for `call`: the reserved protocol
    /// parameters in protocol order, then the caller's in name order.
    #[must_use]
    pub fn signed_parameters(
        &self,
        call: &OperationCall,
        credentials: &Credentials,
        timestamp: &str,
    ) -> Vec<(String, String)> {
        let signature = signature::sign(
            SERVICE_NAME,
            call.operation(),
            timestamp,
            credentials.secret_key().as_ref(),
        );

        let mut params = vec![
            ("Service".to_string(), SERVICE_NAME.to_string()),
            ("Version".to_string(), self.api_version.to_string()),
            (
                "AWSAccessKeyId".to_string(),
                credentials.access_key_id().as_ref().to_string(),
            ),
            ("Operation".to_string(), call.operation().to_string()),
            ("Timestamp".to_string(), timestamp.to_string()),
            ("Signature".to_string(), signature),
        ];
        params.extend(
            call.parameters()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        params
    }

    /// Sends one call and performs the request-level check on the reply.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] (wrapped in [`MturkError::Request`]) if the
    /// transport fails, the reply is not a well-formed envelope, or the
    /// provider rejects the call.
    pub async fn execute(&self, call: &OperationCall) -> Result<Envelope, MturkError> {
        // Snapshot once so a concurrent swap cannot split this call across two key pairs
        let credentials = self.credentials.credentials();
        let timestamp = signature::current_timestamp();

        let base_url = self.base_url(&credentials);
        let query = encode_query(self.signed_parameters(call, &credentials, &timestamp));
        let url = format!("{base_url}?{query}");

        tracing::debug!(
            operation = call.operation(),
            endpoint = %base_url,
            "Sending requester API call"
        );

        let res = self
            .client
            .get(&url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await?;
        let status = res.status();
        let body = res.text().await?;

        let envelope = match Envelope::from_xml(&body) {
            Err(RequestError::MalformedBody { .. }) if !status.is_success() => {
                return Err(RequestError::UnexpectedStatus {
                    status: status.as_u16(),
                    body,
                }
                .into());
            }
            Err(RequestError::Rejected {
                message,
                code,
                request_id,
            }) => {
                tracing::warn!(
                    operation = call.operation(),
                    code = code.as_deref().unwrap_or("unknown"),
                    request_id = request_id.as_deref().unwrap_or("unknown"),
                    "Requester API rejected the call: {}",
                    message
                );
                return Err(RequestError::Rejected {
                    message,
                    code,
                    request_id,
                }
                .into());
            }
            other => other?,
        };

        tracing::debug!(
            operation = call.operation(),
            request_id = envelope.request_id(),
            "Received requester API reply"
        );
        Ok(envelope)
    }

    /// Runs an operation and returns its validated result.
    ///
    /// The result node is expected to be named `<name>Result`.
    ///
    /// # Errors
    ///
    /// Returns [`MturkError::InvalidArgument`] for a blank name or reserved
    /// parameter, [`MturkError::Request`] for request-level failures and
    /// [`MturkError::Operation`] for operation-level failures.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// match client.execute_operation("BlockWorker", [("WorkerId", "W1"), ("Reason", "spam")]).await? {
    ///     OperationResult::Empty => println!("blocked"),
    ///     OperationResult::Payload(node) => println!("{}", node.to_json()),
    /// }
    /// ```
    pub async fn execute_operation<I, K, V>(
        &self,
        name: &str,
        parameters: I,
    ) -> Result<OperationResult, MturkError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let call = OperationCall::new(name, parameters)?;
        let result_name = format!("{}Result", call.operation());
        let envelope = self.execute(&call).await?;
        envelope.retrieve_result(&result_name).map_err(|e| {
            tracing::warn!(
                operation = call.operation(),
                request_id = envelope.request_id(),
                "Operation failed: {}",
                e
            );
            MturkError::Operation(e)
        })
    }

    /// Returns a paginator walking a collection operation page by page.
    ///
    /// The result node is expected to be named `<operation>Result`.
    #[must_use]
    pub fn paginate(&self, call: OperationCall) -> Paginator<'_> {
        let result_name = format!("{}Result", call.operation());
        Paginator::new(self, call, result_name)
    }
}
