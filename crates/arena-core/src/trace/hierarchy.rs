//! Tool-call hierarchy reconstruction
//!
//! Rebuilds the parent/child nesting among tool invocations found in a
//! trace. A call whose declared parent is absent or unknown is promoted to
//! root; a call without a matching result keeps `result: None` (covers calls
//! truncated by timeout). Construction visits each call_id at most once, so
//! the output forest is acyclic even for adversarial parent references.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::normalize::{parse_raw_trace, stringify, ParsedTrace};
use super::{TraceMessage, TracePart};

const SUMMARY_RESULT_LIMIT: usize = 60;

/// A node in the reconstructed tool-call tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallNode {
    pub call_id: String,
    pub tool_name: String,
    pub args: Value,
    pub result: Option<Value>,
    pub children: Vec<ToolCallNode>,
}

impl ToolCallNode {
    /// One-line human-readable rendering: `name(k=v, ...) → <result>` with
    /// the result truncated for display.
    pub fn summary(&self) -> String {
        let args = match self.args.as_object() {
            Some(map) => map
                .iter()
                .map(|(k, v)| format!("{}={}", k, stringify(v)))
                .collect::<Vec<_>>()
                .join(", "),
            None if self.args.is_null() => String::new(),
            None => stringify(&self.args),
        };
        let result = match &self.result {
            Some(value) => truncate(&stringify(value), SUMMARY_RESULT_LIMIT),
            None => "<no result>".to_string(),
        };
        format!("{}({}) → {}", self.tool_name, args, result)
    }
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(limit).collect();
        format!("{}...", truncated)
    }
}

struct CallRecord {
    call_id: String,
    tool_name: String,
    args: Value,
    parent_id: Option<String>,
    result: Option<Value>,
}

/// Reconstruct the tool-call forest from a raw trace.
///
/// Absent, malformed and tool-free traces all yield an empty forest.
pub fn extract_tool_hierarchy(raw: Option<&str>) -> Vec<ToolCallNode> {
    let messages = match parse_raw_trace(raw) {
        ParsedTrace::Messages(messages) => messages,
        _ => return Vec::new(),
    };
    build_forest(&messages)
}

fn build_forest(messages: &[TraceMessage]) -> Vec<ToolCallNode> {
    let mut records: Vec<CallRecord> = Vec::new();

    for message in messages {
        for part in &message.parts {
            match part {
                TracePart::ToolCall {
                    call_id,
                    tool_name,
                    args,
                    parent_id,
                } => {
                    // First sighting of a call_id wins; repeats are ignored.
                    if records.iter().any(|r| &r.call_id == call_id) {
                        continue;
                    }
                    records.push(CallRecord {
                        call_id: call_id.clone(),
                        tool_name: tool_name.clone(),
                        args: args.clone(),
                        parent_id: parent_id.clone(),
                        result: None,
                    });
                }
                TracePart::ToolReturn { call_id, content } => {
                    if let Some(record) =
                        records.iter_mut().find(|r| &r.call_id == call_id)
                    {
                        if record.result.is_none() {
                            record.result = Some(content.clone());
                        }
                    }
                }
                TracePart::Text { .. } => {}
            }
        }
    }

    assemble(records)
}

fn assemble(records: Vec<CallRecord>) -> Vec<ToolCallNode> {
    let known: Vec<String> = records.iter().map(|r| r.call_id.clone()).collect();

    // child index lists per parent, preserving first-seen order
    let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    let mut roots: Vec<usize> = Vec::new();
    for (index, record) in records.iter().enumerate() {
        let parent_index = record
            .parent_id
            .as_ref()
            .filter(|parent| **parent != record.call_id)
            .and_then(|parent| known.iter().position(|id| id == parent));
        match parent_index {
            Some(parent) => children_of[parent].push(index),
            // Dangling or absent parent: promoted to root, not an error.
            None => roots.push(index),
        }
    }

    let mut visited = vec![false; records.len()];
    let mut forest: Vec<ToolCallNode> = roots
        .iter()
        .map(|&index| build_node(index, &records, &children_of, &mut visited))
        .collect();

    // Any record unreachable from a root sits on a parent cycle; break the
    // cycle by promoting it.
    for index in 0..records.len() {
        if !visited[index] {
            forest.push(build_node(index, &records, &children_of, &mut visited));
        }
    }

    forest
}

fn build_node(
    index: usize,
    records: &[CallRecord],
    children_of: &[Vec<usize>],
    visited: &mut [bool],
) -> ToolCallNode {
    visited[index] = true;
    let record = &records[index];
    let children = children_of[index]
        .iter()
        .filter(|&&child| !visited[child])
        .copied()
        .collect::<Vec<_>>()
        .into_iter()
        .map(|child| build_node(child, records, children_of, visited))
        .collect();
    ToolCallNode {
        call_id: record.call_id.clone(),
        tool_name: record.tool_name.clone(),
        args: record.args.clone(),
        result: record.result.clone(),
        children,
    }
}

/// Maximum root-to-leaf edge count across the forest; 0 for an empty forest.
pub fn forest_depth(forest: &[ToolCallNode]) -> usize {
    forest.iter().map(node_depth).max().unwrap_or(0)
}

fn node_depth(node: &ToolCallNode) -> usize {
    node.children
        .iter()
        .map(|child| 1 + node_depth(child))
        .max()
        .unwrap_or(0)
}

/// Number of nodes with zero children.
pub fn leaf_count(forest: &[ToolCallNode]) -> usize {
    forest
        .iter()
        .map(|node| {
            if node.children.is_empty() {
                1
            } else {
                leaf_count(&node.children)
            }
        })
        .sum()
}
