//! The two generation roles.
//!
//! A `Brain` is one role bound to a backend. It never picks its own
//! temperature during a task run: the caller hands one in, normally from the
//! global mapper. `role_local_temperature` is the opt-in alternative layer.

use crate::error::GenerationError;
use crate::llm::{CompletionParams, TextGenerator};
use crate::prompts;
use duomind_core::config::{RoleConfig, TemperatureSource};
use duomind_core::{sanitize, BrainTemperatures, ChemicalState};
use duomind_limbic::temperatures;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Which of the two generators a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Logical, low-temperature planner
    Architect,
    /// Creative, high-temperature generator
    Oracle,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Architect => "architect",
            Role::Oracle => "oracle",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One role's answer to one task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleOutput {
    pub role: Role,
    pub text: String,
    /// Temperature the backend was called with
    pub temperature: f64,
}

/// Recenter a role's base temperature around the chemical state.
///
/// - Architect: warmed by dopamine, cooled by norepinephrine.
/// - Oracle: warmed by dopamine, cooled by serotonin.
///
/// Deviations are measured from the neutral level, so a neutral state
/// (or no state) yields the base temperature. Result is clamped to the
/// role's configured range.
pub fn role_local_temperature(
    role: Role,
    config: &RoleConfig,
    chemicals: Option<&ChemicalState>,
) -> f64 {
    let base = sanitize(config.base_temperature, 0.5);
    let raw = match chemicals {
        None => base,
        Some(c) => {
            let d = c.dopamine() - ChemicalState::NEUTRAL_LEVEL;
            match role {
                Role::Architect => {
                    base + 0.2 * d - 0.2 * (c.norepinephrine() - ChemicalState::NEUTRAL_LEVEL)
                }
                Role::Oracle => {
                    base + 0.25 * d - 0.15 * (c.serotonin() - ChemicalState::NEUTRAL_LEVEL)
                }
            }
        }
    };
    let (lo, hi) = config.range();
    sanitize(raw, base).clamp(lo, hi)
}

/// Temperatures for both roles from whichever layer `source` names.
pub fn select_temperatures(
    source: TemperatureSource,
    architect: &RoleConfig,
    oracle: &RoleConfig,
    chemicals: &ChemicalState,
) -> BrainTemperatures {
    match source {
        TemperatureSource::Mapper => temperatures(chemicals),
        TemperatureSource::RoleLocal => BrainTemperatures::new(
            role_local_temperature(Role::Architect, architect, Some(chemicals)),
            role_local_temperature(Role::Oracle, oracle, Some(chemicals)),
            architect.range(),
            oracle.range(),
        ),
    }
}

pub struct Brain {
    role: Role,
    config: RoleConfig,
    generator: Arc<dyn TextGenerator>,
}

impl fmt::Debug for Brain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Brain")
            .field("role", &self.role)
            .field("generator", &self.generator.name())
            .finish()
    }
}

impl Brain {
    pub fn new(role: Role, config: RoleConfig, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            role,
            config,
            generator,
        }
    }

    pub fn architect(config: RoleConfig, generator: Arc<dyn TextGenerator>) -> Self {
        Self::new(Role::Architect, config, generator)
    }

    pub fn oracle(config: RoleConfig, generator: Arc<dyn TextGenerator>) -> Self {
        Self::new(Role::Oracle, config, generator)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn config(&self) -> &RoleConfig {
        &self.config
    }

    /// This role's temperature under the role-local layer.
    pub fn role_local_temperature(&self, chemicals: Option<&ChemicalState>) -> f64 {
        role_local_temperature(self.role, &self.config, chemicals)
    }

    pub fn build_prompt(&self, task: &str, context: Option<&str>) -> String {
        match self.role {
            Role::Architect => prompts::architect_prompt(task, context),
            Role::Oracle => prompts::oracle_prompt(task, context),
        }
    }

    /// Generate this role's candidate for `task` at `temperature`.
    pub async fn think(
        &self,
        task: &str,
        context: Option<&str>,
        temperature: f64,
    ) -> Result<RoleOutput, GenerationError> {
        let prompt = self.build_prompt(task, context);
        let params = CompletionParams {
            temperature,
            max_tokens: self.config.max_tokens,
        };
        tracing::debug!(
            "{} thinking via {} at temperature {:.2}",
            self.role,
            self.generator.name(),
            temperature
        );
        let text = self.generator.generate(&prompt, params).await?;
        Ok(RoleOutput {
            role: self.role,
            text,
            temperature,
        })
    }
}
