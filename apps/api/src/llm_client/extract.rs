//! Pulling structured data out of free-text model output.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Returns the substring from the first `{` to the last `}` inclusive.
///
/// Handles code fences and chatter around the object. Returns `None` when
/// there is no brace pair.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Parses the embedded JSON object into `T`, falling back to `T::default()`
/// when the model did not return usable JSON.
///
/// Fields are taken one at a time: a `null` or wrongly typed field keeps its
/// default while the remaining fields are still used. Schemas are expected to
/// use `#[serde(default)]` so that missing fields are filled in.
pub fn parse_or_default<T>(text: &str) -> T
where
    T: DeserializeOwned + Serialize + Default,
{
    let Some(json) = extract_json_object(text) else {
        warn!("AI response contained no JSON object; using defaults");
        return T::default();
    };

    let response = match serde_json::from_str::<Map<String, Value>>(json) {
        Ok(map) => map,
        Err(e) => {
            warn!("AI response was not valid JSON ({e}); using defaults");
            return T::default();
        }
    };

    let present: Map<String, Value> = response
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .collect();
    if let Ok(parsed) = serde_json::from_value::<T>(Value::Object(present.clone())) {
        return parsed;
    }

    let mut merged = match serde_json::to_value(T::default()) {
        Ok(Value::Object(map)) => map,
        _ => return T::default(),
    };
    let mut rejected = Vec::new();
    for (key, value) in present {
        let previous = merged.insert(key.clone(), value);
        if serde_json::from_value::<T>(Value::Object(merged.clone())).is_err() {
            match previous {
                Some(previous) => merged.insert(key.clone(), previous),
                None => merged.remove(&key),
            };
            rejected.push(key);
        }
    }
    warn!("AI response fields {rejected:?} did not match the expected schema; using their defaults");

    serde_json::from_value(Value::Object(merged)).unwrap_or_default()
}

/// Accepts a 0–100 score given as an integer, a float, or a numeric string
/// ("85", "85%"), clamping into range.
pub fn score<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    number
        .filter(|n| n.is_finite())
        .map(|n| n.round().clamp(0.0, 100.0) as u32)
        .ok_or_else(|| serde::de::Error::custom(format!("expected a score, got {value}")))
}

/// Accepts either a list of strings or a single string.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    })
}
