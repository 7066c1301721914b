//! Domain Services

use crate::error::GENERIC_ERROR_MESSAGE;
use kernel::error::wire::message_from_body;

/// Pull a caller-facing message out of a backend error body.
///
/// Only a string `message` (or `error`, which some backend handlers use)
/// is taken; everything else about the payload is dropped.
pub fn upstream_error_message(body: &[u8]) -> String {
    message_from_body(body).unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
}
