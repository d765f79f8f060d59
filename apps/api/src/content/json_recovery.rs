//! Best-effort JSON extraction from model output.
//!
//! Models sometimes wrap the object in prose or code fences. Recovery is one
//! heuristic only: slice from the first `{` to the last `}`. Braces inside
//! string literals can defeat it; nothing smarter is attempted.

use serde_json::{Map, Value};

/// Parses `text` as JSON, falling back to the first-`{`/last-`}` slice.
///
/// - Whole text parses: that value (of any JSON type).
/// - No `{` or no `}`: an empty object.
/// - The slice does not parse: the slice's parse error.
pub fn parse_lenient(text: &str) -> Result<Value, serde_json::Error> {
    if let Ok(value) = serde_json::from_str(text) {
        return Ok(value);
    }

    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Ok(Value::Object(Map::new()));
    };

    // A `}` before the first `{` yields an empty slice, which fails to parse.
    let slice = text.get(start..=end).unwrap_or("");
    serde_json::from_str(slice)
}
