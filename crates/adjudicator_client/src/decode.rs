use std::collections::BTreeMap;

use adjudicator_core::{DecodedEvent, Stage};
use serde_json::{Map, Value};

use crate::DecodeError;

/// Decode one stream payload into an event.
///
/// Fields are read leniently: wrong types and empty strings count as absent,
/// unknown fields are ignored. Only a payload that is not a JSON object fails.
pub fn decode_event(payload: &str) -> Result<DecodedEvent, DecodeError> {
    let value: Value = serde_json::from_str(payload)?;
    let Value::Object(fields) = value else {
        return Err(DecodeError::NotAnObject);
    };

    Ok(DecodedEvent {
        heartbeat: fields.get("heartbeat").is_some_and(is_truthy),
        status: text(&fields, "status").map(|raw| Stage::parse(&raw)),
        stage: text(&fields, "stage").map(|raw| Stage::parse(&raw)),
        percent: fields.get("percent").and_then(percent),
        message: text(&fields, "message"),
        previews: fields.get("snippets").and_then(snippets),
        title: text(&fields, "title"),
        entity_a: text(&fields, "belligerent_1"),
        entity_b: text(&fields, "belligerent_2"),
        summary_a: text(&fields, "summary_1"),
        summary_b: text(&fields, "summary_2"),
        attempt: fields
            .get("attempt")
            .and_then(Value::as_u64)
            .map(|attempt| u32::try_from(attempt).unwrap_or(u32::MAX)),
        redirect: text(&fields, "redirect"),
        job_id: fields.get("debate_id").and_then(identifier),
    })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        _ => None,
    }
}

fn percent(value: &Value) -> Option<u8> {
    let raw = value.as_f64()?;
    Some(raw.round().clamp(0.0, 100.0) as u8)
}

fn snippets(value: &Value) -> Option<BTreeMap<String, String>> {
    let Value::Object(entries) = value else {
        return None;
    };
    Some(
        entries
            .iter()
            .filter_map(|(key, value)| value.as_str().map(|text| (key.clone(), text.to_string())))
            .collect(),
    )
}

fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        _ => None,
    }
}
