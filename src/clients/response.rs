//! Response envelopes and their validation.
//!
//! Every reply is an envelope shaped like:
//!
//! ```xml
//! <GetAccountBalanceResponse>
//!   <OperationRequest>
//!     <RequestId>...</RequestId>
//!     <!-- <Errors><Error><Code/><Message/></Error></Errors> on rejection -->
//!   </OperationRequest>
//!   <GetAccountBalanceResult>
//!     <Request>
//!       <IsValid>True</IsValid>
//!       <!-- <Errors><Error>...</Error></Errors> when invalid -->
//!     </Request>
//!     <AvailableBalance>...</AvailableBalance>
//!   </GetAccountBalanceResult>
//! </GetAccountBalanceResponse>
//! ```
//!
//! [`Envelope::from_xml`] performs the request-level check and
//! [`Envelope::retrieve_result`] the operation-level one.

use crate::clients::errors::{OperationError, RequestError};
use crate::clients::xml::XmlNode;

/// The outcome of a successful operation.
///
/// Operations that only acknowledge (blocking a worker, for instance) come
/// back as [`OperationResult::Empty`]; operations that return data come back
/// as [`OperationResult::Payload`] holding the result node without its
/// `Request` sub-node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperationResult {
    /// The operation succeeded and returned no fields.
    Empty,
    /// The operation succeeded and returned these fields.
    Payload(XmlNode),
}

impl OperationResult {
    /// Returns `true` for [`OperationResult::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the payload, if any.
    #[must_use]
    pub const fn payload(&self) -> Option<&XmlNode> {
        match self {
            Self::Empty => None,
            Self::Payload(node) => Some(node),
        }
    }

    /// Consumes the result and returns the payload, if any.
    #[must_use]
    pub fn into_payload(self) -> Option<XmlNode> {
        match self {
            Self::Empty => None,
            Self::Payload(node) => Some(node),
        }
    }
}

/// A reply that passed the request-level check.
#[derive(Clone, Debug)]
pub struct Envelope {
    root: XmlNode,
    request_id: String,
}

impl Envelope {
    /// Parses a response body and performs the request-level check.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::MalformedBody`] if the body is not XML,
    /// [`RequestError::MissingOperationRequest`] or
    /// [`RequestError::MissingRequestId`] if the scaffolding is missing, and
    /// [`RequestError::Rejected`] if the provider reported an error.
    pub fn from_xml(body: &str) -> Result<Self, RequestError> {
        let root = XmlNode::parse(body)?;
        Self::from_root(root)
    }

    /// Performs the request-level check on an already parsed tree.
    ///
    /// # Errors
    ///
    /// See [`Envelope::from_xml`].
    pub fn from_root(root: XmlNode) -> Result<Self, RequestError> {
        let operation_request = root
            .child("OperationRequest")
            .ok_or(RequestError::MissingOperationRequest)?;
        let request_id = operation_request
            .child_text("RequestId")
            .ok_or(RequestError::MissingRequestId)?
            .to_string();

        if let Some((message, code)) = first_error(operation_request) {
            return Err(RequestError::Rejected {
                message,
                code,
                request_id: Some(request_id),
            });
        }

        Ok(Self { root, request_id })
    }

    /// Returns the provider's id for this call.
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the whole parsed reply.
    #[must_use]
    pub const fn root(&self) -> &XmlNode {
        &self.root
    }

    /// Performs the operation-level check and extracts the result.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::MissingResult`] if there is no node named
    /// `result_name`, [`OperationError::MissingRequestInfo`] if it has no
    /// `Request` sub-node, and [`OperationError::Rejected`] or
    /// [`OperationError::Unknown`] if `Request/IsValid` is not true.
    pub fn retrieve_result(&self, result_name: &str) -> Result<OperationResult, OperationError> {
        let result = self
            .root
            .child(result_name)
            .ok_or_else(|| OperationError::MissingResult {
                result_name: result_name.to_string(),
            })?;
        let request = result
            .child("Request")
            .ok_or_else(|| OperationError::MissingRequestInfo {
                result_name: result_name.to_string(),
            })?;

        if !request.child_text("IsValid").is_some_and(parse_bool) {
            return Err(match first_error(request) {
                Some((message, code)) => OperationError::Rejected { message, code },
                None => OperationError::Unknown,
            });
        }

        let mut payload = result.clone();
        payload.children.retain(|c| c.name != "Request");
        if payload.has_children() {
            Ok(OperationResult::Payload(payload))
        } else {
            Ok(OperationResult::Empty)
        }
    }
}

/// Reads `Errors/Error/{Message,Code}` under `node`.
fn first_error(node: &XmlNode) -> Option<(String, Option<String>)> {
    let error = node.child("Errors")?.child("Error")?;
    let message = error.child_text("Message").unwrap_or_default().to_string();
    let code = error.child_text("Code").map(str::to_string);
    Some((message, code))
}

/// Interprets the provider's boolean encodings.
///
/// `true`, `1`, `yes` and `on` (any case, surrounding whitespace ignored)
/// are true; everything else is false.
#[must_use]
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}
