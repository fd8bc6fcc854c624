//! Affective mapper
//!
//! Two pure functions: `update` evolves the chemical state from a context, and
//! `temperatures` projects a state onto the two generation roles.
//!
//! Unlike a heartbeat-driven limbic loop, nothing here is continuous: one task
//! produces exactly one update, and the caller threads the result forward.

use duomind_core::{BrainTemperatures, ChemicalState, MotivationContext, MotivationResult};

/// Range the mapper clamps both temperatures into.
pub const MAPPER_RANGE: (f64, f64) = (0.0, 1.0);

/// Compute a new chemical state from the previous one and a context.
///
/// With no prior state the update starts from the neutral baseline (all 0.5).
/// Every chemical is computed from the previous snapshot and then clamped on
/// its own; norepinephrine reads the already-updated serotonin.
pub fn update(prior: Option<&ChemicalState>, context: &MotivationContext) -> MotivationResult {
    let prev = prior.copied().unwrap_or_else(ChemicalState::neutral);
    let ctx = context.clamped();

    // dopamine: up with novelty and success, down with failure
    let dopamine = prev.dopamine() + 0.3 * ctx.novelty + 0.2 * ctx.recent_success
        - 0.2 * ctx.recent_failure;

    // serotonin: up with success, down with failure and extreme difficulty
    let serotonin = prev.serotonin() + 0.1 * ctx.recent_success
        - 0.2 * ctx.recent_failure
        - 0.1 * (ctx.difficulty - 0.7).max(0.0);

    // norepinephrine: up with urgency and difficulty, calmed by the new serotonin
    let norepinephrine =
        prev.norepinephrine() + 0.3 * ctx.user_urgency + 0.2 * ctx.difficulty - 0.1 * serotonin;

    // oxytocin: up with social tasks, down slightly on failure
    let oxytocin = prev.oxytocin() + 0.3 * ctx.social_relevance - 0.1 * ctx.recent_failure;

    let chemicals = ChemicalState::new(dopamine, serotonin, norepinephrine, oxytocin);
    let result = MotivationResult::from_chemicals(chemicals);

    tracing::debug!(
        "Chemical update {} → {} score={:.3} mode={}",
        prev.format_compact(),
        chemicals.format_compact(),
        result.score,
        result.mode
    );

    result
}

/// Map a chemical state onto the two role temperatures.
///
/// The logical role is damped by exploration and urgency and stabilised by
/// calm; the creative role rises with exploration, tolerates urgency, and is
/// boosted by social signal.
pub fn temperatures(state: &ChemicalState) -> BrainTemperatures {
    let architect = 0.2 + 0.3 * (1.0 - state.dopamine()) + 0.4 * state.serotonin()
        - 0.3 * state.norepinephrine();
    let oracle =
        0.2 + 0.5 * state.dopamine() + 0.2 * state.norepinephrine() + 0.3 * state.oxytocin();

    BrainTemperatures::new(architect, oracle, MAPPER_RANGE, MAPPER_RANGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use duomind_core::MotivationMode;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_no_prior_starts_neutral() {
        let r = update(None, &MotivationContext::default());
        // Empty context: only the serotonin brake on norepinephrine applies
        assert!(approx(r.chemicals.dopamine(), 0.5));
        assert!(approx(r.chemicals.serotonin(), 0.5));
        assert!(approx(r.chemicals.norepinephrine(), 0.45));
        assert!(approx(r.chemicals.oxytocin(), 0.5));
        assert!(approx(r.score, 0.6 * 0.5 + 0.4 * 0.45));
        assert_eq!(r.mode, MotivationMode::Explore);
    }

    #[test]
    fn test_novelty_raises_dopamine() {
        let ctx = MotivationContext {
            novelty: 1.0,
            ..Default::default()
        };
        let r = update(None, &ctx);
        assert!(approx(r.chemicals.dopamine(), 0.8));
    }

    #[test]
    fn test_norepinephrine_reads_updated_serotonin() {
        let prior = ChemicalState::new(0.5, 0.5, 0.5, 0.5);
        let ctx = MotivationContext {
            recent_success: 1.0,
            ..Default::default()
        };
        let r = update(Some(&prior), &ctx);
        // serotonin 0.5 + 0.1 = 0.6, so norepinephrine drops by 0.06 not 0.05
        assert!(approx(r.chemicals.serotonin(), 0.6));
        assert!(approx(r.chemicals.norepinephrine(), 0.44));
    }

    #[test]
    fn test_difficulty_above_threshold_lowers_serotonin() {
        let ctx = MotivationContext {
            difficulty: 1.0,
            ..Default::default()
        };
        let r = update(None, &ctx);
        assert!(approx(r.chemicals.serotonin(), 0.47));
        let easy = MotivationContext {
            difficulty: 0.7,
            ..Default::default()
        };
        assert!(approx(update(None, &easy).chemicals.serotonin(), 0.5));
    }

    #[test]
    fn test_failure_affects_all_but_norepinephrine_directly() {
        let ctx = MotivationContext {
            recent_failure: 1.0,
            ..Default::default()
        };
        let r = update(None, &ctx);
        assert!(approx(r.chemicals.dopamine(), 0.3));
        assert!(approx(r.chemicals.serotonin(), 0.3));
        assert!(approx(r.chemicals.oxytocin(), 0.4));
        // 0.5 - 0.1 * 0.3
        assert!(approx(r.chemicals.norepinephrine(), 0.47));
    }

    #[test]
    fn test_update_clamps_saturated_state() {
        let prior = ChemicalState::new(1.0, 0.0, 1.0, 1.0);
        let ctx = MotivationContext {
            novelty: 1.0,
            user_urgency: 1.0,
            difficulty: 1.0,
            social_relevance: 1.0,
            ..Default::default()
        };
        let r = update(Some(&prior), &ctx);
        assert_eq!(r.chemicals.dopamine(), 1.0);
        assert_eq!(r.chemicals.serotonin(), 0.0);
        assert_eq!(r.chemicals.norepinephrine(), 1.0);
        assert_eq!(r.chemicals.oxytocin(), 1.0);
    }

    #[test]
    fn test_out_of_range_context_is_clamped() {
        let wild = MotivationContext {
            novelty: 50.0,
            ..Default::default()
        };
        let tame = MotivationContext {
            novelty: 1.0,
            ..Default::default()
        };
        assert_eq!(update(None, &wild), update(None, &tame));
    }

    #[test]
    fn test_prior_is_not_mutated() {
        let prior = ChemicalState::neutral();
        let ctx = MotivationContext {
            novelty: 1.0,
            ..Default::default()
        };
        let _ = update(Some(&prior), &ctx);
        assert_eq!(prior, ChemicalState::neutral());
    }

    #[test]
    fn test_neutral_temperatures() {
        let t = temperatures(&ChemicalState::neutral());
        // 0.2 + 0.15 + 0.2 - 0.15
        assert!(approx(t.architect_temperature, 0.4));
        // 0.2 + 0.25 + 0.1 + 0.15
        assert!(approx(t.oracle_temperature, 0.7));
    }

    #[test]
    fn test_temperatures_clamped() {
        let hot = temperatures(&ChemicalState::new(1.0, 0.0, 1.0, 1.0));
        assert_eq!(hot.oracle_temperature, 1.0);
        assert_eq!(hot.architect_temperature, 0.0);
    }

    #[test]
    fn test_exploration_cools_architect_and_heats_oracle() {
        let calm = temperatures(&ChemicalState::new(0.2, 0.5, 0.5, 0.5));
        let curious = temperatures(&ChemicalState::new(0.9, 0.5, 0.5, 0.5));
        assert!(curious.architect_temperature < calm.architect_temperature);
        assert!(curious.oracle_temperature > calm.oracle_temperature);
    }
}
