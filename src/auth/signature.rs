//! Request signing for the requester API.
//!
//! Every call carries a `Signature` parameter: the base64-encoded
//! HMAC-SHA1 of `service ++ operation ++ timestamp`, keyed with the secret
//! key. The timestamp is sent alongside it, so the provider can recompute
//! the signature and reject stale requests.
//!
//! # Example
//!
//! ```rust
//! use mturk_api::auth::signature::{sign, SERVICE_NAME};
//!
//! let signature = sign(SERVICE_NAME, "GetAccountBalance", "2015-03-04T12:30:45Z", "secret");
//! assert_eq!(signature, "TatNywCGWlx5Kfsl79XxLE8xG84=");
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// The service identifier signed into, and sent with, every call.
pub const SERVICE_NAME: &str = "AWSMechanicalTurkRequester";

/// `strftime` layout of the `Timestamp` parameter.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Computes the request signature.
///
/// The inputs are concatenated without separators. An empty secret key is
/// accepted and yields a well-defined signature the provider will reject.
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn sign(service: &str, operation: &str, timestamp: &str, secret_key: &str) -> String {
    let mut mac =
        HmacSha1::new_from_slice(secret_key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(service.as_bytes());
    mac.update(operation.as_bytes());
    mac.update(timestamp.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Formats `time` as an ISO 8601 UTC timestamp without fractional seconds.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use mturk_api::auth::signature::format_timestamp;
///
/// let time = Utc.with_ymd_and_hms(2015, 3, 4, 2, 5, 9).unwrap();
/// assert_eq!(format_timestamp(time), "2015-03-04T02:05:09Z");
/// ```
#[must_use]
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Returns the current wall-clock time as a request timestamp.
#[must_use]
pub fn current_timestamp() -> String {
    format_timestamp(Utc::now())
}
