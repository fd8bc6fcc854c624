//! Reconciler: pick one of two candidates and explain why.
//!
//! Pure and deterministic. The same candidates, confidence, state and policy
//! always produce the same decision, which embeds the chemical and
//! temperature snapshots it was made under so a logged decision can be
//! replayed without any other state.

use crate::brain::Role;
use duomind_core::config::{FusionConfig, FusionPolicyKind};
use duomind_core::{sanitize, BrainTemperatures, ChemicalState};
use duomind_limbic::temperatures;
use serde::{Deserialize, Serialize};

// ============================================================================
// Policy
// ============================================================================

/// How the reconciler chooses between the two roles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum FusionPolicy {
    /// Prefer the architect above a confidence threshold, unless exploration
    /// clearly outweighs urgency, in which case the oracle wins.
    ConfidenceExplore { threshold: f64, explore_margin: f64 },
    PreferArchitect,
    PreferOracle,
}

impl FusionPolicy {
    pub const DEFAULT_THRESHOLD: f64 = 0.5;
    pub const DEFAULT_EXPLORE_MARGIN: f64 = 0.25;
}

impl Default for FusionPolicy {
    fn default() -> Self {
        FusionPolicy::ConfidenceExplore {
            threshold: Self::DEFAULT_THRESHOLD,
            explore_margin: Self::DEFAULT_EXPLORE_MARGIN,
        }
    }
}

impl From<&FusionConfig> for FusionPolicy {
    fn from(config: &FusionConfig) -> Self {
        match config.policy {
            FusionPolicyKind::ConfidenceExplore => FusionPolicy::ConfidenceExplore {
                threshold: sanitize(config.threshold, Self::DEFAULT_THRESHOLD),
                explore_margin: sanitize(config.explore_margin, Self::DEFAULT_EXPLORE_MARGIN),
            },
            FusionPolicyKind::PreferArchitect => FusionPolicy::PreferArchitect,
            FusionPolicyKind::PreferOracle => FusionPolicy::PreferOracle,
        }
    }
}

/// Which rule settled the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionRule {
    ConfidenceAboveThreshold,
    ConfidenceAtOrBelowThreshold,
    ExploreOverride,
    FixedPreference,
    /// The other candidate was empty
    EmptyCandidate,
    BothEmpty,
}

// ============================================================================
// Decision
// ============================================================================

/// The final choice for one task. Produced once, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationDecision {
    pub chosen_role: Role,
    pub final_text: String,
    pub rationale: String,
    pub rule: FusionRule,
    /// Confidence after clamping to [0, 1]
    pub confidence: f64,
    pub chemicals: ChemicalState,
    pub temperatures: BrainTemperatures,
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

impl FusionPolicy {
    /// The role this policy prefers when both candidates are usable.
    fn prefer(&self, confidence: f64, chemicals: &ChemicalState) -> (Role, FusionRule, String) {
        match *self {
            FusionPolicy::ConfidenceExplore {
                threshold,
                explore_margin,
            } => {
                let bias = chemicals.explore_bias();
                if bias > explore_margin {
                    (
                        Role::Oracle,
                        FusionRule::ExploreOverride,
                        format!(
                            "explore bias {:.2} (dopamine - norepinephrine) exceeds margin {:.2}; \
                             overriding confidence {:.2} in favour of oracle",
                            bias, explore_margin, confidence
                        ),
                    )
                } else if confidence > threshold {
                    (
                        Role::Architect,
                        FusionRule::ConfidenceAboveThreshold,
                        format!(
                            "confidence {:.2} above threshold {:.2}; preferring architect",
                            confidence, threshold
                        ),
                    )
                } else {
                    (
                        Role::Oracle,
                        FusionRule::ConfidenceAtOrBelowThreshold,
                        format!(
                            "confidence {:.2} at or below threshold {:.2}; preferring oracle",
                            confidence, threshold
                        ),
                    )
                }
            }
            FusionPolicy::PreferArchitect => (
                Role::Architect,
                FusionRule::FixedPreference,
                "policy always prefers architect".to_string(),
            ),
            FusionPolicy::PreferOracle => (
                Role::Oracle,
                FusionRule::FixedPreference,
                "policy always prefers oracle".to_string(),
            ),
        }
    }

    /// Choose between the two candidates.
    ///
    /// An empty (whitespace-only) candidate always loses. When both are
    /// empty the policy's preferred role is named with empty text.
    pub fn fuse(
        &self,
        architect_output: &str,
        oracle_output: &str,
        confidence: f64,
        chemicals: ChemicalState,
        temperatures: BrainTemperatures,
    ) -> ReconciliationDecision {
        let confidence = sanitize(confidence, 0.5).clamp(0.0, 1.0);

        let (chosen_role, rule, rationale) =
            match (is_blank(architect_output), is_blank(oracle_output)) {
                (true, false) => (
                    Role::Oracle,
                    FusionRule::EmptyCandidate,
                    "architect candidate was empty; choosing oracle".to_string(),
                ),
                (false, true) => (
                    Role::Architect,
                    FusionRule::EmptyCandidate,
                    "oracle candidate was empty; choosing architect".to_string(),
                ),
                (true, true) => {
                    let (role, _, why) = self.prefer(confidence, &chemicals);
                    (
                        role,
                        FusionRule::BothEmpty,
                        format!("both candidates were empty; defaulting to {} ({})", role, why),
                    )
                }
                (false, false) => self.prefer(confidence, &chemicals),
            };

        let final_text = match chosen_role {
            Role::Architect => architect_output,
            Role::Oracle => oracle_output,
        };

        tracing::debug!("Fusion chose {} via {:?}: {}", chosen_role, rule, rationale);

        ReconciliationDecision {
            chosen_role,
            final_text: final_text.to_string(),
            rationale,
            rule,
            confidence,
            chemicals,
            temperatures,
        }
    }
}

/// Reconcile with the default policy, snapshotting the mapper's temperatures
/// for `chemicals`.
pub fn reconcile(
    architect_output: &str,
    oracle_output: &str,
    confidence: f64,
    chemicals: &ChemicalState,
) -> ReconciliationDecision {
    FusionPolicy::default().fuse(
        architect_output,
        oracle_output,
        confidence,
        *chemicals,
        temperatures(chemicals),
    )
}
