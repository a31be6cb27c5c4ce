// SPDX-License-Identifier: MIT

//! Helpers for pulling structured data out of raw model text.

use serde_json::Value;

/// Extract the JSON object embedded in model output.
///
/// Models in JSON mode usually return a bare object, but some wrap it in a
/// code fence or add a sentence around it. The span from the first `{` to
/// the last `}` is parsed; anything else yields `None`.
pub fn extract_json_object(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }

    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(value @ Value::Object(_)) => Some(value),
        Ok(_) => None,
        Err(e) => {
            log::debug!("Failed to parse model output as JSON: {}", e);
            None
        }
    }
}
