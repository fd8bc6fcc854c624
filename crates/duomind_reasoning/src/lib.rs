//! Dual-brain reasoning: two generation roles, a reconciler that picks one
//! candidate, and the runner that ties them to the affective mapper and the
//! event log.

pub mod brain;
pub mod error;
pub mod llm;
pub mod prompts;
pub mod providers;
pub mod reconcile;
pub mod retry;
pub mod runner;
pub mod simulation;

pub use brain::{role_local_temperature, select_temperatures, Brain, Role, RoleOutput};
pub use error::{GenerationError, TaskError};
pub use llm::{CompletionParams, TextGenerator};
pub use reconcile::{reconcile, FusionPolicy, FusionRule, ReconciliationDecision};
pub use runner::{TaskInput, TaskOutcome, TaskRunner};
pub use simulation::{simulate, SimulationResult, SIMULATION_CONFIDENCE};
