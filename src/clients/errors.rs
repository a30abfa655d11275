//! Error types for calls to the requester API.
//!
//! Failures come in three independent tiers:
//!
//! - [`RequestError`]: the call never produced a trustworthy envelope. The
//!   body was not XML, the protocol scaffolding was missing, the transport
//!   failed, or the provider rejected the call itself (bad credentials,
//!   throttling, unknown operation).
//! - [`OperationError`]: the call was accepted but the operation's own
//!   validation failed (bad input, unknown worker).
//! - [`InvalidArgumentError`]: caught locally before anything was sent.
//!
//! [`MturkError`] unifies them so callers can match one tier at a time.
//! No tier is retried by the SDK.
//!
//! # Example
//!
//! ```rust,ignore
//! use mturk_api::{MturkError, RequestError};
//!
//! match client.execute_operation("GetAccountBalance", []).await {
//!     Ok(result) => println!("{result:?}"),
//!     Err(MturkError::Request(RequestError::Rejected { code, .. }))
//!         if code.as_deref() == Some("AWS.ServiceUnavailable") =>
//!     {
//!         // throttled, try again later
//!     }
//!     Err(MturkError::Request(e)) => println!("request-level error: {e}"),
//!     Err(MturkError::Operation(e)) => println!("operation-level error: {e}"),
//!     Err(MturkError::InvalidArgument(e)) => println!("bad argument: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::xml::XmlError;

/// A call failed before a trustworthy envelope was obtained.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The body could not be parsed as well-formed XML.
    #[error("Response body is not well-formed XML: {source}")]
    MalformedBody {
        /// Why parsing failed.
        #[from]
        source: XmlError,
    },

    /// A non-2xx status arrived with a body that is not an envelope.
    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus {
        /// The HTTP status code.
        status: u16,
        /// The raw response body.
        body: String,
    },

    /// The envelope has no `OperationRequest` node.
    #[error("It was impossible to retrieve an error message from the API. Please check your SDK configuration.")]
    MissingOperationRequest,

    /// The `OperationRequest` node has no `RequestId`.
    #[error("It was impossible to retrieve a RequestId.")]
    MissingRequestId,

    /// The provider rejected the call.
    #[error("{message}")]
    Rejected {
        /// The provider's error message.
        message: String,
        /// The provider's error code, if sent.
        code: Option<String>,
        /// The request id of the rejected call, if sent.
        request_id: Option<String>,
    },
}

impl RequestError {
    /// Returns the provider error code, when the provider sent one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Rejected { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

/// An accepted call whose operation reported failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// The envelope has no node with the expected result name.
    #[error("The Result object '{result_name}' was missing from the Response.")]
    MissingResult {
        /// The expected result node name.
        result_name: String,
    },

    /// The result node has no `Request` sub-node.
    #[error("The Request information were missing from the Result object '{result_name}'.")]
    MissingRequestInfo {
        /// The result node name.
        result_name: String,
    },

    /// The provider marked the result invalid and explained why.
    #[error("{message}")]
    Rejected {
        /// The provider's error message.
        message: String,
        /// The provider's error code, if sent.
        code: Option<String>,
    },

    /// The provider marked the result invalid without an explanation.
    #[error("An unknown error made the Response invalid.")]
    Unknown,

    /// A field the caller relies on is absent from the payload.
    #[error("The field '{field}' was missing from the Result object.")]
    MissingField {
        /// The missing field name.
        field: String,
    },

    /// A field is present but its value cannot be interpreted.
    #[error("The field '{field}' has an invalid value '{value}'.")]
    InvalidField {
        /// The field name.
        field: String,
        /// The raw value received.
        value: String,
    },
}

impl OperationError {
    /// Returns the provider error code, when the provider sent one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Rejected { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

/// A local validation failure; nothing was sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidArgumentError {
    /// The operation name is empty.
    #[error("The operation name cannot be empty.")]
    EmptyOperationName,

    /// A caller parameter uses a protocol-reserved name.
    #[error("The parameter '{name}' is reserved by the protocol and cannot be set by callers.")]
    ReservedParameter {
        /// The reserved name.
        name: String,
    },

    /// The record cap is negative.
    #[error("The maximum number of records must be a non-negative integer or unlimited, got {value}.")]
    NegativeMaxRecords {
        /// The rejected value.
        value: i64,
    },

    /// The page size is outside the accepted range.
    #[error("The page size must be between 1 and {max}, got {value}.")]
    PageSizeOutOfRange {
        /// The rejected value.
        value: u32,
        /// The largest accepted page size.
        max: u32,
    },

    /// A text argument is too short or too long.
    #[error("The {field} must contain between {min} and {max} characters, got {actual}.")]
    LengthOutOfRange {
        /// The argument name.
        field: &'static str,
        /// Minimum accepted length.
        min: usize,
        /// Maximum accepted length.
        max: usize,
        /// Length received.
        actual: usize,
    },

    /// A required text argument is empty.
    #[error("The {field} cannot be empty.")]
    EmptyValue {
        /// The argument name.
        field: &'static str,
    },
}

/// Unified error type for every SDK call.
#[derive(Debug, Error)]
pub enum MturkError {
    /// Request-level failure.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Operation-level failure.
    #[error(transparent)]
    Operation(#[from] OperationError),

    /// Local validation failure.
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgumentError),
}

impl MturkError {
    /// Returns the provider error code from either tier, when one was sent.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Request(e) => e.code(),
            Self::Operation(e) => e.code(),
            Self::InvalidArgument(_) => None,
        }
    }
}

impl From<reqwest::Error> for MturkError {
    fn from(error: reqwest::Error) -> Self {
        Self::Request(RequestError::Network(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_rejection_displays_provider_message() {
        let error = RequestError::Rejected {
            message: "The specified access key is invalid.".to_string(),
            code: Some("AWS.NotAuthorized".to_string()),
            request_id: None,
        };
        assert_eq!(error.to_string(), "The specified access key is invalid.");
        assert_eq!(error.code(), Some("AWS.NotAuthorized"));
    }

    #[test]
    fn test_missing_operation_request_points_at_configuration() {
        let message = RequestError::MissingOperationRequest.to_string();
        assert!(message.contains("configuration"));
        assert_eq!(RequestError::MissingOperationRequest.code(), None);
    }

    #[test]
    fn test_operation_rejection_carries_code() {
        let error = OperationError::Rejected {
            message: "Worker not found".to_string(),
            code: Some("AWS.MechanicalTurk.WorkerDoesNotExist".to_string()),
        };
        assert_eq!(error.code(), Some("AWS.MechanicalTurk.WorkerDoesNotExist"));
        assert_eq!(OperationError::Unknown.code(), None);
    }

    #[test]
    fn test_unified_error_forwards_code_and_message() {
        let error: MturkError = OperationError::Rejected {
            message: "bad input".to_string(),
            code: Some("X".to_string()),
        }
        .into();
        assert_eq!(error.code(), Some("X"));
        assert_eq!(error.to_string(), "bad input");
        assert!(matches!(error, MturkError::Operation(_)));
    }

    #[test]
    fn test_invalid_argument_messages() {
        let error = InvalidArgumentError::LengthOutOfRange {
            field: "subject",
            min: 1,
            max: 200,
            actual: 201,
        };
        let message = error.to_string();
        assert!(message.contains("subject"));
        assert!(message.contains("200"));
        assert!(message.contains("201"));

        let error = InvalidArgumentError::ReservedParameter {
            name: "Signature".to_string(),
        };
        assert!(error.to_string().contains("Signature"));
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let _: &dyn std::error::Error = &RequestError::MissingRequestId;
        let _: &dyn std::error::Error = &OperationError::Unknown;
        let _: &dyn std::error::Error = &InvalidArgumentError::EmptyOperationName;
        let _: &dyn std::error::Error = &MturkError::from(OperationError::Unknown);
    }
}
