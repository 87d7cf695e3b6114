//! Request framing: single JSON object, JSON array batch, or newline-delimited JSON.

use serde_json::Value;

use crate::types::{McpError, McpResult};

/// Decode a raw payload into an ordered list of request values.
///
/// Fails only when the payload is not UTF-8 text; JSON problems never fail the
/// payload as a whole.
pub fn decode_payload(payload: &[u8]) -> McpResult<Vec<Value>> {
    let text = std::str::from_utf8(payload)
        .map_err(|e| McpError::InvalidRequest(format!("payload is not valid UTF-8: {e}")))?;
    Ok(decode_text(text))
}

/// Decode text into request values, trying the whole payload first.
///
/// A whole-payload object yields itself, an array yields its elements in order,
/// and any other JSON value yields itself as one opaque request that routing
/// will reject. If the whole payload is not JSON, every non-blank line is parsed
/// on its own and lines that fail to parse are dropped.
pub fn decode_text(text: &str) -> Vec<Value> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => items,
        Ok(value) => vec![value],
        Err(_) => text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match parse_line(line) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("Dropping unparseable line {line:?}: {e}");
                    None
                }
            })
            .collect(),
    }
}

/// Parse a single line of text as one JSON value.
pub fn parse_line(line: &str) -> McpResult<Value> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(McpError::ParseError("Empty message".to_string()));
    }

    serde_json::from_str(trimmed).map_err(|e| McpError::ParseError(e.to_string()))
}
