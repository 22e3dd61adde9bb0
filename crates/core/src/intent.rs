use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ExtractionError;
use crate::models::{Intent, IntentRecord};

#[derive(Debug, Deserialize)]
struct WireIntentRecord {
    intent: Intent,
    #[serde(default, deserialize_with = "empty_if_null")]
    query: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    store_name: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    location: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    address: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    origin: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    destination: String,
    #[serde(default, deserialize_with = "false_if_null")]
    needs_origin: bool,
}

/// Parses and validates the classifier's assembled output.
pub fn parse_intent_record(raw_output: &str, message: &str) -> Result<IntentRecord, ExtractionError> {
    let trimmed = raw_output.trim();

    let value: Value = serde_json::from_str(trimmed).map_err(|err| ExtractionError::Parse {
        raw: trimmed.to_string(),
        reason: err.to_string(),
    })?;

    if !value.is_object() {
        return Err(ExtractionError::Validation {
            raw: trimmed.to_string(),
            reason: format!("expected a JSON object, found {}", json_type_name(&value)),
        });
    }

    let wire: WireIntentRecord =
        serde_json::from_value(value).map_err(|err| ExtractionError::Validation {
            raw: trimmed.to_string(),
            reason: err.to_string(),
        })?;

    Ok(IntentRecord {
        intent: wire.intent,
        query: wire.query,
        store_name: wire.store_name,
        location: wire.location,
        address: wire.address,
        origin: wire.origin,
        destination: wire.destination,
        raw_response: message.to_string(),
        needs_origin: wire.needs_origin,
    })
}

fn empty_if_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn false_if_null<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
