//! Final-answer extraction from a normalized trace
//!
//! `extract_answer` is a pure function with a fixed priority chain. It never
//! fails: every unusable input degrades to the empty string, which is the
//! documented "no answer found" result. The tool-activity fallback exists
//! because some backends answer purely through tool side-effects and emit no
//! closing text.

use super::normalize::{parse_raw_trace, stringify, ParsedTrace};
use super::{response_text, TraceMessage, TracePart};

/// Prefix used to surface the failed-path error marker as answer text, so a
/// stored error is distinguishable from a genuine answer.
pub const ERROR_ANSWER_PREFIX: &str = "Agent error:";

/// Extract the best-effort final natural-language answer from a raw trace.
pub fn extract_answer(raw: Option<&str>) -> String {
    let messages = match parse_raw_trace(raw) {
        ParsedTrace::Absent | ParsedTrace::Malformed => return String::new(),
        ParsedTrace::Error(error) => return format!("{} {}", ERROR_ANSWER_PREFIX, error),
        ParsedTrace::Messages(messages) => messages,
    };

    // Ordered strategies; the first one yielding text wins.
    let strategies: [fn(&[TraceMessage]) -> Option<String>; 2] =
        [response_text, tool_activity];
    strategies
        .iter()
        .find_map(|strategy| strategy(&messages))
        .unwrap_or_default()
}

/// Fallback description of tool activity: "Called <tool>" per invocation and
/// "Result: <content>" per non-empty tool result, in trace order.
fn tool_activity(messages: &[TraceMessage]) -> Option<String> {
    let mut lines = Vec::new();
    for message in messages {
        for part in &message.parts {
            match part {
                TracePart::ToolCall { tool_name, .. } => {
                    lines.push(format!("Called {}", tool_name));
                }
                TracePart::ToolReturn { content, .. } => {
                    let rendered = stringify(content);
                    if !rendered.trim().is_empty() && !content.is_null() {
                        lines.push(format!("Result: {}", rendered));
                    }
                }
                TracePart::Text { .. } => {}
            }
        }
    }
    if lines.is_empty() {
        None
    } else {
        Some(lines.join(" "))
    }
}
