//! Dify response decoding.

use serde_json::Value;

/// Parsed Dify chat-message response.
///
/// The upstream service has emitted three incompatible shapes over time:
/// a plain-text `answer`, a JSON-encoded `answer` wrapping a `messages`
/// array, and a top-level `messages` array. The full original payload stays
/// in `raw` for forensic use.
#[derive(Clone, Debug)]
pub struct DifyResponse {
    pub answer: Option<String>,
    pub messages: Option<Vec<Value>>,
    pub conversation_id: Option<String>,
    pub message_id: Option<String>,
    pub total_price: f64,
    pub raw: Value,
}

impl DifyResponse {
    pub fn from_value(raw: Value) -> Self {
        let answer = raw.get("answer").and_then(Value::as_str).map(str::to_string);
        let messages = raw
            .get("messages")
            .and_then(Value::as_array)
            .map(|a| a.to_vec());
        let conversation_id = raw
            .get("conversation_id")
            .and_then(Value::as_str)
            .map(str::to_string);
        let message_id = raw
            .get("message_id")
            .and_then(Value::as_str)
            .map(str::to_string);
        let total_price = total_price_from(&raw);

        Self {
            answer,
            messages,
            conversation_id,
            message_id,
            total_price,
            raw,
        }
    }

    /// Extract the plain-text chunks of the response, in order.
    ///
    /// Fixed priority: (1) a non-JSON `answer` is a single chunk; (2) a
    /// JSON-object `answer` contributes its embedded `messages` texts;
    /// (3) a top-level `messages` array contributes its texts; (4) nothing.
    /// Shape 2 is a superset check of shape 1, so the order must not change.
    pub fn parsed_texts(&self) -> Vec<String> {
        if let Some(answer) = self.answer.as_deref() {
            if !answer.trim_start().starts_with('{') {
                return vec![answer.to_string()];
            }
            if let Ok(embedded) = serde_json::from_str::<Value>(answer) {
                if let Some(messages) = embedded.get("messages").and_then(Value::as_array) {
                    return texts_from(messages);
                }
            }
        }

        if let Some(messages) = &self.messages {
            return texts_from(messages);
        }

        Vec::new()
    }
}

fn texts_from(messages: &[Value]) -> Vec<String> {
    messages
        .iter()
        .filter_map(|m| m.get("text").and_then(Value::as_str))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Usage cost lives under `metadata.usage.total_price`, reported either as
/// a string or a number depending on the Dify version. Missing → 0.0.
fn total_price_from(raw: &Value) -> f64 {
    let Some(price) = raw
        .get("metadata")
        .and_then(|m| m.get("usage"))
        .and_then(|u| u.get("total_price"))
    else {
        return 0.0;
    };

    match price {
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        other => other.as_f64().unwrap_or(0.0),
    }
}
