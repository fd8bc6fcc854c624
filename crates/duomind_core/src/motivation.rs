//! Motivation context and result types.

use crate::chemistry::{sanitize, ChemicalState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Situational signals feeding the affective update. All in [0, 1], 0 when absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotivationContext {
    /// How new / unknown the situation feels
    pub novelty: f64,
    /// How hard the task seems
    pub difficulty: f64,
    /// How urgent the user made it sound
    pub user_urgency: f64,
    /// 1.0 if we just succeeded at something
    pub recent_success: f64,
    /// 1.0 if we just failed at something
    pub recent_failure: f64,
    /// How much the task involves people / relationships
    pub social_relevance: f64,
}

impl MotivationContext {
    /// Copy with every field sanitized and clamped into [0, 1].
    ///
    /// Context values are heuristic signals, so out-of-range input is
    /// clamped rather than rejected.
    pub fn clamped(&self) -> Self {
        let c = |v: f64| sanitize(v, 0.0).clamp(0.0, 1.0);
        Self {
            novelty: c(self.novelty),
            difficulty: c(self.difficulty),
            user_urgency: c(self.user_urgency),
            recent_success: c(self.recent_success),
            recent_failure: c(self.recent_failure),
            social_relevance: c(self.social_relevance),
        }
    }
}

/// Coarse behavioural mode derived from the motivation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotivationMode {
    Idle,
    Explore,
    Exploit,
}

impl MotivationMode {
    /// Below this score the agent idles.
    pub const IDLE_THRESHOLD: f64 = 0.25;

    /// idle if score < 0.25; explore if dopamine >= norepinephrine; else exploit.
    pub fn classify(score: f64, dopamine: f64, norepinephrine: f64) -> Self {
        if score < Self::IDLE_THRESHOLD {
            MotivationMode::Idle
        } else if dopamine >= norepinephrine {
            MotivationMode::Explore
        } else {
            MotivationMode::Exploit
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MotivationMode::Idle => "idle",
            MotivationMode::Explore => "explore",
            MotivationMode::Exploit => "exploit",
        }
    }
}

impl fmt::Display for MotivationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of one affective update. Derived, never persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotivationResult {
    pub chemicals: ChemicalState,
    pub score: f64,
    pub mode: MotivationMode,
}

impl MotivationResult {
    /// Score and classify an already-updated chemical state.
    pub fn from_chemicals(chemicals: ChemicalState) -> Self {
        let score = 0.6 * chemicals.dopamine() + 0.4 * chemicals.norepinephrine();
        let mode = MotivationMode::classify(score, chemicals.dopamine(), chemicals.norepinephrine());
        Self {
            chemicals,
            score,
            mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_idle() {
        assert_eq!(MotivationMode::classify(0.20, 0.9, 0.1), MotivationMode::Idle);
    }

    #[test]
    fn test_classify_explore() {
        assert_eq!(MotivationMode::classify(0.30, 0.4, 0.3), MotivationMode::Explore);
        // tie goes to explore
        assert_eq!(MotivationMode::classify(0.30, 0.3, 0.3), MotivationMode::Explore);
    }

    #[test]
    fn test_classify_exploit() {
        assert_eq!(MotivationMode::classify(0.30, 0.2, 0.45), MotivationMode::Exploit);
    }

    #[test]
    fn test_from_chemicals_score() {
        let r = MotivationResult::from_chemicals(ChemicalState::new(1.0, 0.5, 0.0, 0.5));
        assert!((r.score - 0.6).abs() < 1e-6);
        assert_eq!(r.mode, MotivationMode::Explore);

        let r = MotivationResult::from_chemicals(ChemicalState::new(0.0, 0.5, 0.0, 0.5));
        assert_eq!(r.score, 0.0);
        assert_eq!(r.mode, MotivationMode::Idle);
    }

    #[test]
    fn test_context_clamped() {
        let ctx = MotivationContext {
            novelty: 2.0,
            difficulty: -1.0,
            user_urgency: f64::NAN,
            ..Default::default()
        }
        .clamped();
        assert_eq!(ctx.novelty, 1.0);
        assert_eq!(ctx.difficulty, 0.0);
        assert_eq!(ctx.user_urgency, 0.0);
    }

    #[test]
    fn test_context_missing_fields_default_zero() {
        let ctx: MotivationContext = serde_json::from_str(r#"{"novelty": 0.8}"#).unwrap();
        assert_eq!(ctx.novelty, 0.8);
        assert_eq!(ctx.difficulty, 0.0);
        assert_eq!(ctx.social_relevance, 0.0);
    }

    #[test]
    fn test_mode_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&MotivationMode::Exploit).unwrap(), "\"exploit\"");
        assert_eq!(MotivationMode::Idle.to_string(), "idle");
    }
}
