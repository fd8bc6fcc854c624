//! Task runner: one task in, one logged decision out.
//!
//! Stages, each recorded as one event-log append:
//!
//! 1. affective update → `motivation_update`
//! 2. both roles generate → `architect_output` / `oracle_output`
//!    (or `<role>_error`)
//! 3. fusion → `final_choice` (or `task_failed` when no role answered)
//!
//! The runner holds no chemical state between tasks. Callers thread
//! `TaskOutcome::motivation.chemicals` into the next `TaskInput::prior`.

use crate::brain::{select_temperatures, Brain, Role, RoleOutput};
use crate::error::{GenerationError, TaskError};
use crate::providers::build_generator;
use crate::reconcile::{FusionPolicy, ReconciliationDecision};
use duomind_core::config::RunnerConfig;
use duomind_core::{
    BrainTemperatures, ChemicalState, DuomindConfig, MotivationContext, MotivationResult,
};
use duomind_limbic::{infer_context, update};
use duomind_memory::EventLog;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Per-task inputs. Everything is optional.
#[derive(Debug, Clone, Default)]
pub struct TaskInput {
    /// Chemical state left by the previous task; neutral when absent
    pub prior: Option<ChemicalState>,
    /// Explicit context; inferred from the task text when absent
    pub context: Option<MotivationContext>,
    /// Reconciler confidence; the runner's configured default when absent
    pub confidence: Option<f64>,
    /// Extra material appended to both prompts
    pub extra_context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub task_id: Uuid,
    pub context: MotivationContext,
    /// Carries the new chemical state for the next task
    pub motivation: MotivationResult,
    pub decision: ReconciliationDecision,
}

/// Affective state and temperatures settled before generation.
struct Prepared {
    context: MotivationContext,
    motivation: MotivationResult,
    temperatures: BrainTemperatures,
}

pub struct TaskRunner {
    architect: Brain,
    oracle: Brain,
    log: Arc<EventLog>,
    policy: FusionPolicy,
    settings: RunnerConfig,
}

impl TaskRunner {
    pub fn new(architect: Brain, oracle: Brain, log: Arc<EventLog>) -> Self {
        Self {
            architect,
            oracle,
            log,
            policy: FusionPolicy::default(),
            settings: RunnerConfig::default(),
        }
    }

    pub fn with_policy(mut self, policy: FusionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_settings(mut self, settings: RunnerConfig) -> Self {
        self.settings = settings;
        self
    }

    /// Wire both roles, the policy and the event log from configuration.
    pub fn from_config(config: &DuomindConfig) -> Result<Self, GenerationError> {
        let architect = Brain::architect(
            config.architect.clone(),
            build_generator(&config.llm, Role::Architect.as_str())?,
        );
        let oracle = Brain::oracle(
            config.oracle.clone(),
            build_generator(&config.llm, Role::Oracle.as_str())?,
        );
        let log = Arc::new(EventLog::new(config.memory.log_path.clone()));
        Ok(Self::new(architect, oracle, log)
            .with_policy(FusionPolicy::from(&config.fusion))
            .with_settings(config.runner.clone()))
    }

    pub fn event_log(&self) -> &Arc<EventLog> {
        &self.log
    }

    /// Run one task end to end, logging every stage.
    #[tracing::instrument(skip(self, input), fields(task_id = tracing::field::Empty))]
    pub async fn run(&self, task: &str, input: TaskInput) -> Result<TaskOutcome, TaskError> {
        let task_id = Uuid::new_v4();
        tracing::Span::current().record("task_id", tracing::field::display(task_id));
        let meta = json!({ "source": "task_runner", "task_id": task_id.to_string() });

        // Stage 1: affect
        let prepared = self.prepare(task, input.prior.as_ref(), input.context);
        tracing::info!(
            "Motivation {} score={:.3} mode={}",
            prepared.motivation.chemicals.format_compact(),
            prepared.motivation.score,
            prepared.motivation.mode
        );
        self.log
            .append(
                "motivation_update",
                json!({
                    "task": task,
                    "context": prepared.context,
                    "chemicals": prepared.motivation.chemicals,
                    "score": prepared.motivation.score,
                    "mode": prepared.motivation.mode,
                    "temperatures": prepared.temperatures,
                    "temperature_source": self.settings.temperature_source.as_str(),
                }),
                Some(meta.clone()),
            )
            .await?;

        // Stage 2: generation
        let (architect, oracle) = self
            .generate(task, input.extra_context.as_deref(), &prepared.temperatures)
            .await;
        self.log_role(&meta, task, Role::Architect, &architect).await?;
        self.log_role(&meta, task, Role::Oracle, &oracle).await?;

        // Stage 3: fusion
        let (architect_text, oracle_text) = match (architect, oracle) {
            (Err(a), Err(o)) => {
                tracing::error!("Both roles failed, no decision for this task");
                self.log
                    .append(
                        "task_failed",
                        json!({
                            "task": task,
                            "architect_error": a.to_string(),
                            "oracle_error": o.to_string(),
                        }),
                        Some(meta),
                    )
                    .await?;
                return Err(TaskError::AllRolesFailed {
                    architect: a,
                    oracle: o,
                });
            }
            (a, o) => (candidate_text(a), candidate_text(o)),
        };

        let confidence = input.confidence.unwrap_or(self.settings.confidence);
        let decision = self.policy.fuse(
            &architect_text,
            &oracle_text,
            confidence,
            prepared.motivation.chemicals,
            prepared.temperatures,
        );
        tracing::info!("Final choice: {} ({})", decision.chosen_role, decision.rationale);

        self.log
            .append(
                "final_choice",
                json!({
                    "task": task,
                    "chosen_role": decision.chosen_role,
                    "final_text": decision.final_text,
                    "rationale": decision.rationale,
                    "rule": decision.rule,
                    "confidence": decision.confidence,
                    "chemicals": decision.chemicals,
                    "temperatures": decision.temperatures,
                }),
                Some(meta),
            )
            .await?;

        Ok(TaskOutcome {
            task_id,
            context: prepared.context,
            motivation: prepared.motivation,
            decision,
        })
    }

    /// Generate and fuse for a bare task string without touching the log.
    ///
    /// Starts from the neutral state, infers the context and uses the
    /// configured default confidence.
    pub async fn reconcile_task(&self, task: &str) -> Result<ReconciliationDecision, TaskError> {
        let prepared = self.prepare(task, None, None);
        let (architect, oracle) = self.generate(task, None, &prepared.temperatures).await;
        let (architect_text, oracle_text) = match (architect, oracle) {
            (Err(a), Err(o)) => {
                return Err(TaskError::AllRolesFailed {
                    architect: a,
                    oracle: o,
                })
            }
            (a, o) => (candidate_text(a), candidate_text(o)),
        };
        Ok(self.policy.fuse(
            &architect_text,
            &oracle_text,
            self.settings.confidence,
            prepared.motivation.chemicals,
            prepared.temperatures,
        ))
    }

    fn prepare(
        &self,
        task: &str,
        prior: Option<&ChemicalState>,
        context: Option<MotivationContext>,
    ) -> Prepared {
        let context = context.unwrap_or_else(|| infer_context(task)).clamped();
        let motivation = update(prior, &context);
        let temperatures = self.role_temperatures(&motivation.chemicals);
        tracing::debug!(
            "Temperatures architect={:.2} oracle={:.2} ({})",
            temperatures.architect_temperature,
            temperatures.oracle_temperature,
            self.settings.temperature_source.as_str()
        );
        Prepared {
            context,
            motivation,
            temperatures,
        }
    }

    fn role_temperatures(&self, chemicals: &ChemicalState) -> BrainTemperatures {
        select_temperatures(
            self.settings.temperature_source,
            self.architect.config(),
            self.oracle.config(),
            chemicals,
        )
    }

    async fn generate(
        &self,
        task: &str,
        extra_context: Option<&str>,
        temps: &BrainTemperatures,
    ) -> (
        Result<RoleOutput, GenerationError>,
        Result<RoleOutput, GenerationError>,
    ) {
        let architect = self.call_role(
            &self.architect,
            task,
            extra_context,
            temps.architect_temperature,
        );
        let oracle = self.call_role(&self.oracle, task, extra_context, temps.oracle_temperature);
        if self.settings.concurrent {
            tokio::join!(architect, oracle)
        } else {
            (architect.await, oracle.await)
        }
    }

    /// One role call, bounded by the generation timeout (0 disables it).
    async fn call_role(
        &self,
        brain: &Brain,
        task: &str,
        extra_context: Option<&str>,
        temperature: f64,
    ) -> Result<RoleOutput, GenerationError> {
        let call = brain.think(task, extra_context, temperature);
        if self.settings.generation_timeout_secs == 0 {
            return call.await;
        }
        let limit = Duration::from_secs(self.settings.generation_timeout_secs);
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout(limit)),
        }
    }

    async fn log_role(
        &self,
        meta: &Value,
        task: &str,
        role: Role,
        result: &Result<RoleOutput, GenerationError>,
    ) -> Result<(), TaskError> {
        match result {
            Ok(out) => {
                tracing::info!("{} produced {} chars", role, out.text.chars().count());
                self.log
                    .append(
                        &format!("{}_output", role),
                        json!({
                            "task": task,
                            "text": out.text,
                            "temperature": out.temperature,
                        }),
                        Some(meta.clone()),
                    )
                    .await?;
            }
            Err(e) => {
                tracing::warn!("{} failed: {}", role, e);
                self.log
                    .append(
                        &format!("{}_error", role),
                        json!({ "task": task, "error": e.to_string() }),
                        Some(meta.clone()),
                    )
                    .await?;
            }
        }
        Ok(())
    }
}

/// A failed role competes as an empty candidate.
fn candidate_text(result: Result<RoleOutput, GenerationError>) -> String {
    result.map(|o| o.text).unwrap_or_default()
}
