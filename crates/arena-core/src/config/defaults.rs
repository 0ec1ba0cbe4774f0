//! Default configuration values

pub const DEFAULT_EXECUTION_TIMEOUT_SECONDS: u64 = 60;
pub const DEFAULT_EVAL_TIMEOUT_SECONDS: u64 = 30;

pub const DEFAULT_EVALUATION_PROMPT: &str = "\
You are evaluating the performance of an AI agent that completed a task.

Task: {task_prompt}

Agent's Response: {agent_response}

Please evaluate the agent's response on the following criteria:
1. Correctness: Did the agent correctly complete the task?
2. Efficiency: Did the agent use tools appropriately?
3. Completeness: Did the agent provide a complete answer?

Provide:
1. A score from 0-100 (where 100 is perfect)
2. A brief explanation of your evaluation

Response format:
Score: [number]
Explanation: [your explanation]";

pub(crate) fn default_execution_timeout() -> u64 {
    DEFAULT_EXECUTION_TIMEOUT_SECONDS
}

pub(crate) fn default_eval_timeout() -> u64 {
    DEFAULT_EVAL_TIMEOUT_SECONDS
}

pub(crate) fn default_eval_prompt() -> String {
    DEFAULT_EVALUATION_PROMPT.to_string()
}
