//! Operation calls and their query-string encoding.
//!
//! This module provides the [`OperationCall`] type and its builder for
//! naming a remote operation and its parameters.

use std::collections::BTreeMap;

use crate::clients::errors::InvalidArgumentError;

/// Query parameters the client always sets itself, in the order they are sent.
pub const RESERVED_PARAMETERS: [&str; 6] = [
    "Service",
    "Version",
    "AWSAccessKeyId",
    "Operation",
    "Timestamp",
    "Signature",
];

/// Returns `true` if `name` is one of the [`RESERVED_PARAMETERS`].
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    RESERVED_PARAMETERS.contains(&name)
}

/// A remote operation and the caller's parameters.
///
/// Parameters are kept sorted by name so the encoded query string is stable.
///
/// # Example
///
/// ```rust
/// use mturk_api::clients::OperationCall;
///
/// let call = OperationCall::builder("BlockWorker")
///     .param("WorkerId", "A3D9BS7QW6ORGG")
///     .param("Reason", "Ignored the instructions")
///     .build()
///     .unwrap();
///
/// assert_eq!(call.operation(), "BlockWorker");
/// assert_eq!(call.param("WorkerId"), Some("A3D9BS7QW6ORGG"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationCall {
    operation: String,
    parameters: BTreeMap<String, String>,
}

impl OperationCall {
    /// Creates a new builder for the named operation.
    #[must_use]
    pub fn builder(operation: impl Into<String>) -> OperationCallBuilder {
        OperationCallBuilder::new(operation)
    }

    /// Creates a call from any iterable of name/value pairs.
    ///
    /// # Errors
    ///
    /// See [`OperationCallBuilder::build`].
    pub fn new<I, K, V>(operation: impl Into<String>, parameters: I) -> Result<Self, InvalidArgumentError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        parameters
            .into_iter()
            .fold(Self::builder(operation), |builder, (k, v)| builder.param(k, v))
            .build()
    }

    /// Returns the operation name.
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Returns the caller's parameters.
    #[must_use]
    pub const fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    /// Returns one parameter value.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    /// Returns a copy with `name` set to `value`, replacing any earlier value.
    ///
    /// Used for client-owned parameters such as the page cursor; reserved
    /// names are still refused.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgumentError::ReservedParameter`] for reserved names.
    pub fn with_param(
        &self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, InvalidArgumentError> {
        let name = name.into();
        if is_reserved(&name) {
            return Err(InvalidArgumentError::ReservedParameter { name });
        }
        let mut call = self.clone();
        call.parameters.insert(name, value.into());
        Ok(call)
    }
}

/// Builder for constructing [`OperationCall`] instances.
#[derive(Debug)]
pub struct OperationCallBuilder {
    operation: String,
    parameters: BTreeMap<String, String>,
}

impl OperationCallBuilder {
    fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Adds a parameter. A repeated name keeps the last value.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Adds a parameter when `value` is `Some`.
    #[must_use]
    pub fn param_opt(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.param(name, value),
            None => self,
        }
    }

    /// Builds the [`OperationCall`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgumentError::EmptyOperationName`] if the operation
    /// name is blank, and [`InvalidArgumentError::ReservedParameter`] if a
    /// parameter collides with one of the [`RESERVED_PARAMETERS`].
    pub fn build(self) -> Result<OperationCall, InvalidArgumentError> {
        if self.operation.trim().is_empty() {
            return Err(InvalidArgumentError::EmptyOperationName);
        }
        if let Some(name) = self.parameters.keys().find(|k| is_reserved(k)) {
            return Err(InvalidArgumentError::ReservedParameter { name: name.clone() });
        }
        Ok(OperationCall {
            operation: self.operation,
            parameters: self.parameters,
        })
    }
}

/// Percent-encodes name/value pairs into a query string, keeping their order.
///
/// ```rust
/// use mturk_api::clients::encode_query;
///
/// let query = encode_query([("Subject", "Hi there"), ("Reason", "a&b=c")]);
/// assert_eq!(query, "Subject=Hi%20there&Reason=a%26b%3Dc");
/// ```
pub fn encode_query<I, K, V>(pairs: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .into_iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                urlencoding::encode(k.as_ref()),
                urlencoding::encode(v.as_ref())
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
