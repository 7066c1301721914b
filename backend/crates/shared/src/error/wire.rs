//! Error bodies on the wire
//!
//! Every hub service answers failures with a JSON object carrying a
//! human-readable `message`. Some backend handlers use `error` instead.

/// Caller-facing message from an error body, if it has one
pub fn message_from_body(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["message", "error"].iter().find_map(|key| {
        value
            .get(*key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}
