//! Normalized interaction-trace representation and its consumers
//!
//! Agent runtimes emit weakly-typed, vendor-shaped JSON logs. Everything in
//! this module works against one normalized form: a sequence of
//! [`TraceMessage`]s, each carrying typed [`TracePart`]s. The adapter in
//! [`normalize`] maps whatever the runtime emitted into that form; the answer
//! extractor and the tool-call hierarchy builder never touch vendor JSON
//! directly. Both are pure, synchronous functions that recover locally from
//! every malformed input instead of raising.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod answer;
pub mod hierarchy;
pub mod normalize;

pub use answer::extract_answer;
pub use hierarchy::{extract_tool_hierarchy, forest_depth, leaf_count, ToolCallNode};
pub use normalize::{parse_raw_trace, ParsedTrace};

/// Which side of the conversation a message belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Request,
    Response,
    #[serde(untagged)]
    Other(String),
}

/// One message of a normalized trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceMessage {
    pub kind: MessageKind,
    #[serde(default)]
    pub parts: Vec<TracePart>,
}

impl TraceMessage {
    pub fn request(parts: Vec<TracePart>) -> Self {
        Self {
            kind: MessageKind::Request,
            parts,
        }
    }

    pub fn response(parts: Vec<TracePart>) -> Self {
        Self {
            kind: MessageKind::Response,
            parts,
        }
    }
}

/// One typed part of a trace message.
///
/// Tool arguments and results are inherently heterogeneous across tools, so
/// both stay open `serde_json::Value`s rather than a fixed schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "part_kind", rename_all = "kebab-case")]
pub enum TracePart {
    Text {
        content: String,
    },
    ToolCall {
        call_id: String,
        tool_name: String,
        args: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_id: Option<String>,
    },
    ToolReturn {
        call_id: String,
        content: Value,
    },
}

impl TracePart {
    pub fn text(content: impl Into<String>) -> Self {
        TracePart::Text {
            content: content.into(),
        }
    }
}

/// Joined plain text of all `Text` parts on the response side, or `None`
/// when the trace carries no response text at all.
pub(crate) fn response_text(messages: &[TraceMessage]) -> Option<String> {
    let mut segments = Vec::new();
    for message in messages {
        if message.kind != MessageKind::Response {
            continue;
        }
        for part in &message.parts {
            if let TracePart::Text { content } = part {
                if !content.trim().is_empty() {
                    segments.push(content.trim().to_string());
                }
            }
        }
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments.join(" "))
    }
}
