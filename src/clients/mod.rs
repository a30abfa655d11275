//! Client types for requester API communication.
//!
//! This module provides the layer that turns an operation name and its
//! parameters into a signed HTTP call, and the reply into either a result or
//! one of the error tiers.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`MturkClient`]: The async client that signs, sends and validates calls
//! - [`OperationCall`]: An operation name with the caller's parameters
//! - [`Envelope`]: A reply that passed the request-level check
//! - [`OperationResult`]: The result of an operation, empty or with a payload
//! - [`Paginator`]: Drives a collection operation page by page
//! - [`XmlNode`]: The element tree replies are parsed into
//!
//! # Example
//!
//! ```rust,ignore
//! use mturk_api::{Credentials, Environment, MturkClient, OperationCall};
//!
//! let client = MturkClient::new(credentials, None);
//!
//! let call = OperationCall::builder("GetBlockedWorkers").build()?;
//! let mut pages = client.paginate(call);
//! pages.set_max_records(Some(500))?;
//! let blocks = pages.collect_all("WorkerBlock").await?;
//! ```
//!
//! # Retry Behavior
//!
//! Nothing is retried. Throttling and service outages surface as
//! [`RequestError::Rejected`] carrying the provider's code.

mod client;
mod errors;
mod operation_call;
mod paginator;
mod response;
mod xml;

pub use client::{MturkClient, SDK_VERSION};
pub use errors::{InvalidArgumentError, MturkError, OperationError, RequestError};
pub use operation_call::{
    encode_query, is_reserved, OperationCall, OperationCallBuilder, RESERVED_PARAMETERS,
};
pub use paginator::{Page, PageCursor, Paginator, MAX_PAGE_SIZE};
pub use response::{parse_bool, Envelope, OperationResult};
pub use xml::{XmlError, XmlNode};
