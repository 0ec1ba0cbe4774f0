//! Evaluation of agent answers by a grading agent
//!
//! Turns the evaluator model's free-text grading output into a validated
//! score and explanation. Evaluator models do not reliably follow the
//! requested output grammar, so extraction is a layered chain of strategies.
//! The explicit `Score:` marker is authoritative whenever it appears anywhere
//! in the text; an out-of-range marker value is a hard failure (clamping
//! would hide evaluator malfunction). The loose standalone-integer scan runs
//! only when no marker exists at all, since an unrelated number in the
//! explanation must not shadow an explicit marker.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use regex::Regex;

use crate::agent::Agent;
use crate::errors::EvalError;
use crate::models::{AgentExecution, EvaluationResult};
use crate::timeout::with_timeout;
use crate::trace::{extract_answer, response_text};

pub const TASK_PROMPT_PLACEHOLDER: &str = "{task_prompt}";
pub const AGENT_RESPONSE_PLACEHOLDER: &str = "{agent_response}";

const EXCERPT_LIMIT: usize = 120;

/// Substitute both placeholders into the template. The template is checked
/// at configuration-validation time; this re-checks defensively.
pub fn render_eval_prompt(
    template: &str,
    task_prompt: &str,
    agent_response: &str,
) -> Result<String, EvalError> {
    for placeholder in [TASK_PROMPT_PLACEHOLDER, AGENT_RESPONSE_PLACEHOLDER] {
        if !template.contains(placeholder) {
            return Err(EvalError::MissingPlaceholder { placeholder });
        }
    }
    Ok(template
        .replace(TASK_PROMPT_PLACEHOLDER, task_prompt)
        .replace(AGENT_RESPONSE_PLACEHOLDER, agent_response))
}

// Patterns are compiled once; extraction runs once per execution in a batch.
fn marker_score(text: &str) -> Option<(i64, usize)> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = RE
        .get_or_init(|| Regex::new(r"(?i)\bscore\s*:\s*(-?\d+)").ok())
        .as_ref()?;
    let captures = re.captures(text)?;
    let matched = captures.get(1)?;
    let value = matched.as_str().parse().ok()?;
    Some((value, matched.end()))
}

fn standalone_score(text: &str) -> Option<i64> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = RE
        .get_or_init(|| Regex::new(r"\b(\d{1,3})\b").ok())
        .as_ref()?;
    re.captures_iter(text)
        .filter_map(|captures| captures.get(1)?.as_str().parse::<i64>().ok())
        .find(|value| (0..=100).contains(value))
}

fn excerpt(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= EXCERPT_LIMIT {
        trimmed.to_string()
    } else {
        trimmed.chars().take(EXCERPT_LIMIT).collect()
    }
}

/// Extract the numeric score from the evaluator's response text.
pub fn extract_score(text: &str) -> Result<u8, EvalError> {
    if let Some((value, _)) = marker_score(text) {
        if (0..=100).contains(&value) {
            return Ok(value as u8);
        }
        return Err(EvalError::ScoreOutOfRange(value));
    }
    match standalone_score(text) {
        Some(value) => Ok(value as u8),
        None => Err(EvalError::ScoreNotFound {
            excerpt: excerpt(text),
        }),
    }
}

fn explicit_explanation(text: &str) -> Option<String> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = RE
        .get_or_init(|| Regex::new(r"(?is)\bexplanation\s*:\s*(.+)").ok())
        .as_ref()?;
    let captures = re.captures(text)?;
    let value = captures.get(1)?.as_str().trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn after_score_marker(text: &str) -> Option<String> {
    let (_, end) = marker_score(text)?;
    let rest = text[end..].trim();
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

fn whole_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Extract the explanation text with layered fallbacks: explicit
/// `Explanation:` marker, then everything after the score marker, then the
/// whole response.
pub fn extract_explanation(text: &str) -> Result<String, EvalError> {
    let strategies: [fn(&str) -> Option<String>; 3] =
        [explicit_explanation, after_score_marker, whole_text];
    strategies
        .iter()
        .find_map(|strategy| strategy(text))
        .ok_or(EvalError::EmptyExplanation)
}

/// Run the evaluator agent against (task prompt, extracted answer) and parse
/// its verdict into a validated [`EvaluationResult`].
pub async fn evaluate_execution(
    execution_id: i64,
    task_prompt: &str,
    agent_response: &str,
    eval_agent: &Arc<dyn Agent>,
    template: &str,
    timeout: Duration,
) -> Result<EvaluationResult, EvalError> {
    let prompt = render_eval_prompt(template, task_prompt, agent_response)?;

    let run = match with_timeout(eval_agent.run(&prompt), timeout).await {
        None => {
            return Err(EvalError::Timeout {
                seconds: timeout.as_secs_f64(),
            })
        }
        Some(Err(err)) => return Err(EvalError::AgentFailed(err.to_string())),
        Some(Ok(run)) => run,
    };

    let text = response_text(&run.messages).ok_or(EvalError::EmptyResponse)?;
    let score = extract_score(&text)?;
    let explanation = extract_explanation(&text)?;

    log::info!(
        "Evaluated execution {}: score={}, explanation_length={}",
        execution_id,
        score,
        explanation.len()
    );

    EvaluationResult::new(execution_id, score, explanation)
        .map_err(|err| EvalError::Invalid(err.to_string()))
}

/// Evaluate a batch of persisted executions, continuing past individual
/// failures. Executions without an extractable answer and failed evaluations
/// both yield `None`; the execution's status and stored trace preserve the
/// reason.
pub async fn evaluate_batch(
    executions: &[AgentExecution],
    task_prompt: &str,
    eval_agent: &Arc<dyn Agent>,
    template: &str,
    timeout: Duration,
) -> Vec<Option<EvaluationResult>> {
    let mut results = Vec::with_capacity(executions.len());
    for execution in executions {
        let execution_id = match execution.id {
            Some(id) => id,
            None => {
                log::warn!(
                    "Skipping evaluation of unpersisted execution {}",
                    execution.model_identifier()
                );
                results.push(None);
                continue;
            }
        };
        let answer = extract_answer(execution.raw_trace.as_deref());
        if answer.is_empty() {
            log::info!(
                "No extractable answer for execution {} ({}); skipping evaluation",
                execution_id,
                execution.model_identifier()
            );
            results.push(None);
            continue;
        }
        match evaluate_execution(
            execution_id,
            task_prompt,
            &answer,
            eval_agent,
            template,
            timeout,
        )
        .await
        {
            Ok(result) => results.push(Some(result)),
            Err(err) => {
                log::warn!("Evaluation of execution {} failed: {}", execution_id, err);
                results.push(None);
            }
        }
    }
    results
}
