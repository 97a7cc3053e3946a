//! Encoding of value documents.

use auditrail_config::SerializerOptions;
use serde_json::{Map, Value};

/// Encode a value document as JSON text.
pub(crate) fn encode(values: Map<String, Value>, options: &SerializerOptions) -> serde_json::Result<String> {
    let document = Value::Object(values);
    if options.pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    }
}
