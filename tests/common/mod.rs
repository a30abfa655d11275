//! Helpers shared by the integration tests.
//!
//! A `wiremock` server stands in for the provider; replies are assembled
//! from the envelope pieces below.

#![allow(dead_code)]

use std::collections::HashMap;

use mturk_api::auth::signature::{sign, SERVICE_NAME};
use mturk_api::{
    AccessKeyId, Credentials, Environment, HostUrl, MturkClient, MturkConfig, SecretKey,
};
use wiremock::{Match, MockServer, Request, ResponseTemplate};

pub const ACCESS_KEY_ID: &str = "AKIDEXAMPLE";
pub const SECRET_KEY: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

/// Creates sandbox credentials with the test key pair.
pub fn test_credentials() -> Credentials {
    Credentials::new(
        AccessKeyId::new(ACCESS_KEY_ID).unwrap(),
        SecretKey::new(SECRET_KEY).unwrap(),
        Environment::Sandbox,
    )
}

/// Creates a config pointing at the mock server.
pub fn mock_config(server: &MockServer) -> MturkConfig {
    MturkConfig::builder()
        .host(HostUrl::new(server.uri()).unwrap())
        .build()
}

/// Creates a client with the test credentials talking to the mock server.
pub fn mock_client(server: &MockServer) -> MturkClient {
    MturkClient::new(test_credentials(), Some(&mock_config(server)))
}

/// Wraps an operation result in a full reply envelope.
pub fn envelope(operation: &str, request_id: &str, result: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\
         <{operation}Response>\
         <OperationRequest><RequestId>{request_id}</RequestId></OperationRequest>\
         {result}\
         </{operation}Response>"
    )
}

/// A result node marked valid, followed by `fields`.
pub fn valid_result(operation: &str, fields: &str) -> String {
    format!(
        "<{operation}Result><Request><IsValid>True</IsValid></Request>{fields}</{operation}Result>"
    )
}

/// A result node marked invalid with one error.
pub fn invalid_result(operation: &str, code: &str, message: &str) -> String {
    format!(
        "<{operation}Result><Request><IsValid>False</IsValid>\
         <Errors><Error><Code>{code}</Code><Message>{message}</Message></Error></Errors>\
         </Request></{operation}Result>"
    )
}

/// A reply rejected at the request level.
pub fn rejected_envelope(operation: &str, code: &str, message: &str) -> String {
    format!(
        "<{operation}Response><OperationRequest><RequestId>rejected-1</RequestId>\
         <Errors><Error><Code>{code}</Code><Message>{message}</Message></Error></Errors>\
         </OperationRequest></{operation}Response>"
    )
}

/// A successful reply carrying `fields`.
pub fn ok_reply(operation: &str, fields: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(envelope(
        operation,
        "req-ok",
        &valid_result(operation, fields),
    ))
}

/// One page of blocked workers: counters plus a `WorkerBlock` per id.
pub fn blocked_page(total: u64, worker_ids: &[&str]) -> ResponseTemplate {
    let blocks: String = worker_ids
        .iter()
        .map(|id| format!("<WorkerBlock><WorkerId>{id}</WorkerId><Reason>Reason for {id}</Reason></WorkerBlock>"))
        .collect();
    ok_reply(
        "GetBlockedWorkers",
        &format!(
            "<PageNumber>1</PageNumber><NumResults>{}</NumResults>\
             <TotalNumResults>{total}</TotalNumResults>{blocks}",
            worker_ids.len()
        ),
    )
}

/// A page whose counters claim `num_results` records without listing them.
pub fn counted_page(total: u64, num_results: u64) -> ResponseTemplate {
    ok_reply(
        "GetBlockedWorkers",
        &format!("<NumResults>{num_results}</NumResults><TotalNumResults>{total}</TotalNumResults>"),
    )
}

/// Returns the query parameters of a received request.
pub fn query_map(request: &Request) -> HashMap<String, String> {
    request.url.query_pairs().into_owned().collect()
}

/// Matches requests whose `Signature` is valid for `secret`.
pub struct SignedWith(pub String);

impl Match for SignedWith {
    fn matches(&self, request: &Request) -> bool {
        let query = query_map(request);
        match (
            query.get("Service"),
            query.get("Operation"),
            query.get("Timestamp"),
            query.get("Signature"),
        ) {
            (Some(service), Some(operation), Some(timestamp), Some(signature)) => {
                service == SERVICE_NAME && sign(service, operation, timestamp, &self.0) == *signature
            }
            _ => false,
        }
    }
}
