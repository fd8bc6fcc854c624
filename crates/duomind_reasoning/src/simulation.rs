//! Dry-run of the fusion rule on stub candidates.
//!
//! No backend is called and nothing is logged. Useful for checking which
//! role the current policy would favour before wiring a real model.

use crate::reconcile::{FusionPolicy, ReconciliationDecision};
use duomind_core::ChemicalState;
use duomind_limbic::temperatures;
use serde::Serialize;

/// Confidence handed to the reconciler when the caller does not pick one.
pub const SIMULATION_CONFIDENCE: f64 = 0.65;

#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    /// Free-form label echoed back to the caller
    pub mode: String,
    pub task: String,
    /// Always true; lets consumers tell simulated decisions apart
    pub simulation: bool,
    pub decision: ReconciliationDecision,
}

pub fn simulate(task: &str, mode: &str, confidence: f64, policy: &FusionPolicy) -> SimulationResult {
    let chemicals = ChemicalState::neutral();
    let architect = format!("[SIM-ARCH] Logical plan for task: {}", task);
    let oracle = format!("[SIM-ORACLE] Creative angle for task: {}", task);
    let decision = policy.fuse(
        &architect,
        &oracle,
        confidence,
        chemicals,
        temperatures(&chemicals),
    );
    tracing::debug!("Simulated '{}' in {} mode → {}", task, mode, decision.chosen_role);
    SimulationResult {
        mode: mode.to_string(),
        task: task.to_string(),
        simulation: true,
        decision,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::Role;

    #[test]
    fn test_default_simulation_prefers_architect() {
        let r = simulate("write a haiku", "demo", SIMULATION_CONFIDENCE, &FusionPolicy::default());
        assert!(r.simulation);
        assert_eq!(r.mode, "demo");
        assert_eq!(r.decision.chosen_role, Role::Architect);
        assert_eq!(
            r.decision.final_text,
            "[SIM-ARCH] Logical plan for task: write a haiku"
        );
        assert_eq!(r.decision.chemicals, ChemicalState::neutral());
    }

    #[test]
    fn test_low_confidence_simulation_prefers_oracle() {
        let r = simulate("x", "demo", 0.2, &FusionPolicy::default());
        assert_eq!(r.decision.chosen_role, Role::Oracle);
        assert!(r.decision.final_text.starts_with("[SIM-ORACLE]"));
    }

    #[test]
    fn test_simulation_serializes() {
        let r = simulate("x", "demo", SIMULATION_CONFIDENCE, &FusionPolicy::default());
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["simulation"], true);
        assert_eq!(v["task"], "x");
        assert_eq!(v["decision"]["chosen_role"], "architect");
    }
}
