//! Tolerant adapter from raw vendor JSON to the normalized trace form
//!
//! Traces come from a third-party runtime whose exact shape may drift, so
//! this adapter accepts both the kind/part_kind message shape and the legacy
//! role/content shape, stringifies structured content instead of dropping it,
//! and degrades to [`ParsedTrace::Malformed`] rather than erroring. Nothing
//! in this module returns a `Result`.

use serde_json::Value;

use super::{MessageKind, TraceMessage, TracePart};

/// Outcome of normalizing a raw trace document.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedTrace {
    /// No trace was recorded (the timeout path).
    Absent,
    /// The document exists but is not recognizable as a trace.
    Malformed,
    /// The minimal error marker stored on the failed execution path.
    Error(String),
    Messages(Vec<TraceMessage>),
}

/// Normalize a raw trace document.
pub fn parse_raw_trace(raw: Option<&str>) -> ParsedTrace {
    let raw = match raw {
        Some(raw) => raw,
        None => return ParsedTrace::Absent,
    };

    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            log::debug!("Trace is not valid JSON: {}", err);
            return ParsedTrace::Malformed;
        }
    };

    match value {
        Value::Object(map) => match map.get("error") {
            Some(error) => ParsedTrace::Error(stringify(error)),
            None => ParsedTrace::Malformed,
        },
        Value::Array(entries) => {
            let messages: Vec<TraceMessage> =
                entries.iter().filter_map(message_from_value).collect();
            ParsedTrace::Messages(messages)
        }
        _ => ParsedTrace::Malformed,
    }
}

fn message_from_value(value: &Value) -> Option<TraceMessage> {
    let map = value.as_object()?;

    if let Some(parts) = map.get("parts").and_then(Value::as_array) {
        let kind = kind_from_str(map.get("kind").and_then(Value::as_str).unwrap_or(""));
        let parts = parts.iter().filter_map(part_from_value).collect();
        return Some(TraceMessage { kind, parts });
    }

    // Legacy role/content shape: one text part per message.
    if let Some(role) = map.get("role").and_then(Value::as_str) {
        let kind = match role {
            "assistant" | "model" | "response" => MessageKind::Response,
            "user" | "system" => MessageKind::Request,
            other => MessageKind::Other(other.to_string()),
        };
        let content = map.get("content").map(stringify).unwrap_or_default();
        return Some(TraceMessage {
            kind,
            parts: vec![TracePart::Text { content }],
        });
    }

    None
}

fn kind_from_str(kind: &str) -> MessageKind {
    match kind {
        "request" => MessageKind::Request,
        "response" => MessageKind::Response,
        other => MessageKind::Other(other.to_string()),
    }
}

fn part_from_value(value: &Value) -> Option<TracePart> {
    let map = value.as_object()?;
    let part_kind = map
        .get("part_kind")
        .or_else(|| map.get("type"))
        .and_then(Value::as_str)
        .unwrap_or("text");

    match part_kind {
        "tool-call" | "tool_call" => Some(TracePart::ToolCall {
            call_id: call_id_of(map)?,
            tool_name: map
                .get("tool_name")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
            args: args_of(map),
            parent_id: map
                .get("parent_id")
                .or_else(|| map.get("parent_call_id"))
                .and_then(Value::as_str)
                .map(str::to_string),
        }),
        "tool-return" | "tool-result" | "tool_return" => Some(TracePart::ToolReturn {
            call_id: call_id_of(map)?,
            content: map
                .get("content")
                .or_else(|| map.get("result"))
                .cloned()
                .unwrap_or(Value::Null),
        }),
        _ => {
            let content = map.get("content").map(stringify).unwrap_or_default();
            Some(TracePart::Text { content })
        }
    }
}

fn call_id_of(map: &serde_json::Map<String, Value>) -> Option<String> {
    map.get("call_id")
        .or_else(|| map.get("tool_call_id"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn args_of(map: &serde_json::Map<String, Value>) -> Value {
    let args = map
        .get("args")
        .or_else(|| map.get("arguments"))
        .cloned()
        .unwrap_or(Value::Null);
    // Some backends double-encode arguments as a JSON string.
    if let Value::String(s) = &args {
        if let Ok(decoded) = serde_json::from_str::<Value>(s) {
            if decoded.is_object() {
                return decoded;
            }
        }
    }
    args
}

/// Render any JSON value as display text without dropping structure.
pub(crate) fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_and_malformed_inputs() {
        assert_eq!(parse_raw_trace(None), ParsedTrace::Absent);
        assert_eq!(parse_raw_trace(Some("not json {")), ParsedTrace::Malformed);
        assert_eq!(parse_raw_trace(Some("42")), ParsedTrace::Malformed);
        assert_eq!(parse_raw_trace(Some("{\"foo\": 1}")), ParsedTrace::Malformed);
    }

    #[test]
    fn test_error_marker() {
        let raw = json!({"error": "connection refused"}).to_string();
        assert_eq!(
            parse_raw_trace(Some(&raw)),
            ParsedTrace::Error("connection refused".to_string())
        );
    }

    #[test]
    fn test_kind_part_kind_shape() {
        let raw = json!([
            {"kind": "request", "parts": [{"part_kind": "text", "content": "2+2?"}]},
            {"kind": "response", "parts": [
                {"part_kind": "tool-call", "call_id": "c1", "tool_name": "calc",
                 "args": {"expr": "2+2"}},
                {"part_kind": "tool-return", "call_id": "c1", "content": 4},
                {"part_kind": "text", "content": "The answer is 4."}
            ]}
        ])
        .to_string();

        let messages = match parse_raw_trace(Some(&raw)) {
            ParsedTrace::Messages(messages) => messages,
            other => panic!("expected messages, got {:?}", other),
        };
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].kind, MessageKind::Request);
        assert_eq!(messages[1].parts.len(), 3);
        assert!(matches!(
            &messages[1].parts[0],
            TracePart::ToolCall { tool_name, .. } if tool_name == "calc"
        ));
    }

    #[test]
    fn test_legacy_role_shape() {
        let raw = json!([
            {"role": "user", "content": "hello"},
            {"role": "assistant", "content": "hi there"}
        ])
        .to_string();

        let messages = match parse_raw_trace(Some(&raw)) {
            ParsedTrace::Messages(messages) => messages,
            other => panic!("expected messages, got {:?}", other),
        };
        assert_eq!(messages[0].kind, MessageKind::Request);
        assert_eq!(messages[1].kind, MessageKind::Response);
        assert_eq!(
            messages[1].parts,
            vec![TracePart::text("hi there")]
        );
    }

    #[test]
    fn test_structured_content_is_stringified_not_dropped() {
        let raw = json!([
            {"role": "assistant", "content": {"nested": true}}
        ])
        .to_string();

        let messages = match parse_raw_trace(Some(&raw)) {
            ParsedTrace::Messages(messages) => messages,
            other => panic!("expected messages, got {:?}", other),
        };
        assert_eq!(
            messages[0].parts,
            vec![TracePart::text("{\"nested\":true}")]
        );
    }

    #[test]
    fn test_double_encoded_args_are_decoded() {
        let raw = json!([
            {"kind": "response", "parts": [
                {"part_kind": "tool-call", "tool_call_id": "c9", "tool_name": "lookup",
                 "arguments": "{\"key\": \"value\"}"}
            ]}
        ])
        .to_string();

        let messages = match parse_raw_trace(Some(&raw)) {
            ParsedTrace::Messages(messages) => messages,
            other => panic!("expected messages, got {:?}", other),
        };
        match &messages[0].parts[0] {
            TracePart::ToolCall { call_id, args, .. } => {
                assert_eq!(call_id, "c9");
                assert_eq!(args["key"], "value");
            }
            other => panic!("expected tool call, got {:?}", other),
        }
    }

    #[test]
    fn test_round_trip_of_serialized_normalized_messages() {
        let messages = vec![
            TraceMessage::request(vec![TracePart::text("prompt")]),
            TraceMessage::response(vec![
                TracePart::ToolCall {
                    call_id: "c1".to_string(),
                    tool_name: "check_prime".to_string(),
                    args: json!({"n": 17}),
                    parent_id: None,
                },
                TracePart::ToolReturn {
                    call_id: "c1".to_string(),
                    content: json!({"is_prime": true}),
                },
            ]),
        ];
        let raw = serde_json::to_string(&messages).unwrap();
        assert_eq!(
            parse_raw_trace(Some(&raw)),
            ParsedTrace::Messages(messages)
        );
    }
}
