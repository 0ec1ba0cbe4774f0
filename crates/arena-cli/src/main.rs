//! `arena` command-line interface
//!
//! Loads a YAML configuration, runs a task prompt against the configured
//! agents and prints the ranked leaderboard, per-agent answers and tool-call
//! summaries as plain text.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use arena_core::runner::TaskRunOutcome;
use arena_core::trace::{extract_tool_hierarchy, forest_depth, leaf_count, ToolCallNode};
use arena_core::{build_agents, build_eval_agent, load_config, run_task, MemoryStorage};

#[derive(Parser)]
#[command(name = "arena", about = "Run a task prompt against competing AI agents")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "arena.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Execute a task prompt against all configured agents and rank results
    Run {
        /// The natural-language task prompt
        prompt: String,
        /// Emit the full outcome as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },
    /// Load and validate the configuration, then exit
    Validate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .await
        .with_context(|| format!("loading {}", cli.config.display()))?;
    log::info!(
        "Loaded configuration from {} ({} task agents)",
        cli.config.display(),
        config.task_agents.len()
    );

    match cli.command {
        Command::Validate => {
            println!(
                "Configuration OK: {} task agents, evaluator {}/{}",
                config.task_agents.len(),
                config.evaluation_agent.provider,
                config.evaluation_agent.model
            );
            Ok(())
        }
        Command::Run { prompt, json } => {
            let agents = build_agents(&config.task_agents)?;
            let eval_agent = build_eval_agent(&config.evaluation_agent)?;
            let storage = MemoryStorage::new();

            log::info!("Submitting task prompt ({} chars)", prompt.len());
            let outcome = run_task(&prompt, &config, &agents, &eval_agent, &storage).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_outcome(&outcome);
            }
            Ok(())
        }
    }
}

fn print_outcome(outcome: &TaskRunOutcome) {
    println!("Task #{}: {}", outcome.task_id, outcome.prompt);
    println!();
    println!("Leaderboard");
    println!(
        "{:<4} {:<28} {:<10} {:>7} {:>10} {:>8}",
        "#", "model", "status", "score", "duration", "tokens"
    );
    for (rank, row) in outcome.leaderboard.iter().enumerate() {
        println!(
            "{:<4} {:<28} {:<10} {:>7} {:>10} {:>8}",
            rank + 1,
            format!("{}/{}", row.provider, row.model),
            row.status.to_string(),
            row.score
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            row.duration_seconds
                .map(|d| format!("{:.2}s", d))
                .unwrap_or_else(|| "-".to_string()),
            row.token_count
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string()),
        );
    }

    for report in &outcome.executions {
        println!();
        println!("--- {} ---", report.execution.model_identifier());
        if report.answer.is_empty() {
            println!("(no answer extracted)");
        } else {
            println!("{}", report.answer);
        }
        if let Some(evaluation) = &report.evaluation {
            println!(
                "Score {} ({}): {}",
                evaluation.score,
                evaluation.grade(),
                evaluation.explanation
            );
        }
        let forest = extract_tool_hierarchy(report.execution.raw_trace.as_deref());
        if !forest.is_empty() {
            println!(
                "Tool calls (depth {}, {} leaves):",
                forest_depth(&forest),
                leaf_count(&forest)
            );
            print_forest(&forest, 1);
        }
    }
}

fn print_forest(nodes: &[ToolCallNode], indent: usize) {
    for node in nodes {
        println!("{}{}", "  ".repeat(indent), node.summary());
        print_forest(&node.children, indent + 1);
    }
}
