use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use duomind_core::{ChemicalState, DuomindConfig};
use duomind_limbic::{infer_context, update};
use duomind_memory::{inspect, parse_timestamp, render, EventLog, EventSelection};
use duomind_reasoning::{
    select_temperatures, simulate, FusionPolicy, TaskInput, TaskRunner, SIMULATION_CONFIDENCE,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML config file (missing file → defaults)
    #[arg(short, long, env = "DUOMIND_CONFIG", default_value = "duomind.toml", global = true)]
    config: PathBuf,

    /// Event log path, overriding the config file
    #[arg(long, global = true)]
    log: Option<PathBuf>,

    /// Debug-level logging (RUST_LOG still wins when set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one task through both roles and log the decision
    Run {
        task: String,
        /// Reconciler confidence in [0, 1]
        #[arg(long)]
        confidence: Option<f64>,
        /// Extra context appended to both prompts
        #[arg(long)]
        context: Option<String>,
        /// JSON file holding the chemical state; read before, written after
        #[arg(long)]
        state: Option<PathBuf>,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the inferred context and affective update for a task
    Motivation {
        task: String,
        #[arg(long)]
        state: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Inspect recent event-log records
    Diff {
        /// Show the last N records
        #[arg(long, default_value_t = 20, conflicts_with = "since")]
        last: usize,
        /// Show records newer than an ISO-8601 timestamp or unix seconds
        #[arg(long)]
        since: Option<String>,
    },
    /// Dry-run the fusion rule on stub candidates (no model, no log)
    Simulate {
        task: String,
        #[arg(long, default_value = "demo")]
        mode: String,
        #[arg(long, default_value_t = SIMULATION_CONFIDENCE)]
        confidence: f64,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Read a persisted chemical state. A missing file means "no prior state".
fn load_state(path: &Path) -> Result<Option<ChemicalState>> {
    match std::fs::read_to_string(path) {
        Ok(raw) => {
            let state = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid chemical state in {}", path.display()))?;
            Ok(Some(state))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

fn save_state(path: &Path, state: &ChemicalState) -> Result<()> {
    let raw = serde_json::to_string_pretty(state)?;
    std::fs::write(path, raw).with_context(|| format!("Failed to write {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = DuomindConfig::load_or_default(&cli.config);
    if let Some(log) = cli.log {
        config.memory.log_path = log;
    }

    match cli.command {
        Commands::Run {
            task,
            confidence,
            context,
            state,
            json,
        } => {
            tracing::info!(
                "Running task via {} (log: {})",
                config.llm.provider,
                config.memory.log_path.display()
            );
            let runner = TaskRunner::from_config(&config)?;
            let prior = match &state {
                Some(path) => load_state(path)?,
                None => None,
            };
            let outcome = runner
                .run(
                    &task,
                    TaskInput {
                        prior,
                        context: None,
                        confidence,
                        extra_context: context,
                    },
                )
                .await?;
            if let Some(path) = &state {
                save_state(path, &outcome.motivation.chemicals)?;
                tracing::debug!("Saved chemical state to {}", path.display());
            }
            tracing::info!(
                "Task {} finished, chose {}",
                outcome.task_id,
                outcome.decision.chosen_role
            );

            if json {
                let out = json!({
                    "task_id": outcome.task_id.to_string(),
                    "mode": outcome.motivation.mode,
                    "score": outcome.motivation.score,
                    "decision": outcome.decision,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                let d = &outcome.decision;
                println!("Chosen: {} ({})", d.chosen_role, d.rationale);
                println!(
                    "State:  {} mode={}",
                    d.chemicals.format_compact(),
                    outcome.motivation.mode
                );
                println!();
                println!("{}", d.final_text);
            }
        }
        Commands::Motivation { task, state, json } => {
            let prior = match &state {
                Some(path) => load_state(path)?,
                None => None,
            };
            let context = infer_context(&task);
            let result = update(prior.as_ref(), &context);
            let source = config.runner.temperature_source;
            let temps = select_temperatures(
                source,
                &config.architect,
                &config.oracle,
                &result.chemicals,
            );

            if json {
                let out = json!({
                    "task": task,
                    "context": context,
                    "chemicals": result.chemicals,
                    "score": result.score,
                    "mode": result.mode,
                    "temperatures": temps,
                    "temperature_source": source.as_str(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!(
                    "Context:      novelty={:.2} difficulty={:.2} urgency={:.2} social={:.2}",
                    context.novelty,
                    context.difficulty,
                    context.user_urgency,
                    context.social_relevance
                );
                println!("Chemicals:    {}", result.chemicals.format_compact());
                println!("Score:        {:.3}", result.score);
                println!("Mode:         {}", result.mode);
                println!(
                    "Temperatures: architect={:.2} oracle={:.2} ({})",
                    temps.architect_temperature,
                    temps.oracle_temperature,
                    source.as_str()
                );
            }
        }
        Commands::Diff { last, since } => {
            let log = EventLog::new(config.memory.log_path.clone());
            let selection = match since {
                Some(raw) => EventSelection::Since(parse_timestamp(&raw)?),
                None => EventSelection::Last(last),
            };
            let events = inspect(&log, selection).await;
            println!("{}", render(&events));
        }
        Commands::Simulate {
            task,
            mode,
            confidence,
        } => {
            let policy = FusionPolicy::from(&config.fusion);
            let result = simulate(&task, &mode, confidence, &policy);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
