//! Chemical state: the four-scalar affective vector
//!
//! The state is a heuristic bias, not a biological model. Each scalar lives in
//! [0, 1] and the type never hands out a mutable reference, so every snapshot
//! taken for logging stays valid after the next update.

use serde::{Deserialize, Deserializer, Serialize};

/// Guard against NaN and Infinity in affective values.
/// If the value is NaN or Inf, replace with the provided fallback.
#[inline]
pub fn sanitize(v: f64, fallback: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        tracing::warn!("NaN/Inf detected in chemical input, resetting to fallback {}", fallback);
        fallback
    }
}

/// Deserialize an `f64` that may be missing, null, or non-finite in persisted JSON.
///
/// Anything that is not a finite number becomes `0.5`, the neutral level.
pub fn deserialize_safe_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(match raw {
        Some(v) if v.is_finite() => v,
        _ => ChemicalState::NEUTRAL_LEVEL,
    })
}

#[inline]
fn clamp01(v: f64) -> f64 {
    sanitize(v, ChemicalState::NEUTRAL_LEVEL).clamp(0.0, 1.0)
}

/// Four named neuromodulator levels, each clamped to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawChemicals")]
pub struct ChemicalState {
    /// Curiosity / reward anticipation. Drives exploration.
    dopamine: f64,
    /// Stability / mood. Calms the logical role.
    serotonin: f64,
    /// Alertness / urgency. Focus under pressure.
    norepinephrine: f64,
    /// Social / bonding signal.
    oxytocin: f64,
}

#[derive(Deserialize)]
struct RawChemicals {
    #[serde(default = "neutral_level", deserialize_with = "deserialize_safe_f64")]
    dopamine: f64,
    #[serde(default = "neutral_level", deserialize_with = "deserialize_safe_f64")]
    serotonin: f64,
    #[serde(default = "neutral_level", deserialize_with = "deserialize_safe_f64")]
    norepinephrine: f64,
    #[serde(default = "neutral_level", deserialize_with = "deserialize_safe_f64")]
    oxytocin: f64,
}

fn neutral_level() -> f64 {
    ChemicalState::NEUTRAL_LEVEL
}

impl From<RawChemicals> for ChemicalState {
    fn from(raw: RawChemicals) -> Self {
        Self::new(raw.dopamine, raw.serotonin, raw.norepinephrine, raw.oxytocin)
    }
}

impl Default for ChemicalState {
    fn default() -> Self {
        Self::neutral()
    }
}

impl ChemicalState {
    /// Baseline level of every chemical in the neutral state.
    pub const NEUTRAL_LEVEL: f64 = 0.5;

    /// Build a state, silently clamping every value into [0, 1].
    pub fn new(dopamine: f64, serotonin: f64, norepinephrine: f64, oxytocin: f64) -> Self {
        Self {
            dopamine: clamp01(dopamine),
            serotonin: clamp01(serotonin),
            norepinephrine: clamp01(norepinephrine),
            oxytocin: clamp01(oxytocin),
        }
    }

    /// The fixed starting point used when no prior state exists (all 0.5).
    pub const fn neutral() -> Self {
        Self {
            dopamine: Self::NEUTRAL_LEVEL,
            serotonin: Self::NEUTRAL_LEVEL,
            norepinephrine: Self::NEUTRAL_LEVEL,
            oxytocin: Self::NEUTRAL_LEVEL,
        }
    }

    pub fn dopamine(&self) -> f64 {
        self.dopamine
    }

    pub fn serotonin(&self) -> f64 {
        self.serotonin
    }

    pub fn norepinephrine(&self) -> f64 {
        self.norepinephrine
    }

    pub fn oxytocin(&self) -> f64 {
        self.oxytocin
    }

    /// How far exploration outweighs urgency (positive = explore-leaning).
    pub fn explore_bias(&self) -> f64 {
        self.dopamine - self.norepinephrine
    }

    /// Compact numeric form for log lines and prompts.
    pub fn format_compact(&self) -> String {
        format!(
            "[DA={:.2} 5HT={:.2} NE={:.2} OXT={:.2}]",
            self.dopamine, self.serotonin, self.norepinephrine, self.oxytocin
        )
    }
}

/// Per-role sampling temperatures derived from a chemical state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrainTemperatures {
    /// Temperature for the logical planner.
    pub architect_temperature: f64,
    /// Temperature for the creative generator.
    pub oracle_temperature: f64,
}

impl BrainTemperatures {
    /// Build temperatures, clamping each into its role's declared range.
    pub fn new(
        architect_temperature: f64,
        oracle_temperature: f64,
        architect_range: (f64, f64),
        oracle_range: (f64, f64),
    ) -> Self {
        Self {
            architect_temperature: sanitize(architect_temperature, architect_range.0)
                .clamp(architect_range.0, architect_range.1),
            oracle_temperature: sanitize(oracle_temperature, oracle_range.0)
                .clamp(oracle_range.0, oracle_range.1),
        }
    }
}
