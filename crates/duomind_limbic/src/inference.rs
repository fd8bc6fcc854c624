//! Keyword-based context inference from free-text task descriptions.
//!
//! A deliberately crude heuristic: each rule fires independently when any of
//! its keywords occurs in the lowercased task, and raises its fields to fixed
//! targets. A later rule never lowers a value an earlier rule set, and firing
//! twice does not accumulate.

use duomind_core::MotivationContext;

/// Baseline difficulty assumed for any task.
const BASE_DIFFICULTY: f64 = 0.2;
/// Baseline urgency assumed for any task.
const BASE_URGENCY: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Novelty,
    Difficulty,
    UserUrgency,
    SocialRelevance,
}

/// One keyword category and the context targets it sets.
#[derive(Debug, Clone, Copy)]
struct KeywordRule {
    name: &'static str,
    keywords: &'static [&'static str],
    targets: &'static [(Field, f64)],
}

const RULES: &[KeywordRule] = &[
    KeywordRule {
        name: "novelty",
        keywords: &["learn", "explore", "new", "unknown"],
        targets: &[(Field::Novelty, 0.8)],
    },
    KeywordRule {
        name: "debugging",
        keywords: &["debug", "error", "bug", "fix"],
        targets: &[(Field::Difficulty, 0.8), (Field::UserUrgency, 0.9)],
    },
    KeywordRule {
        name: "urgency",
        keywords: &["urgent", "asap", "now", "deadline"],
        targets: &[(Field::UserUrgency, 0.9)],
    },
    KeywordRule {
        name: "social",
        keywords: &["friend", "relationship", "social", "family"],
        targets: &[(Field::SocialRelevance, 0.8)],
    },
];

impl KeywordRule {
    /// Case-insensitive membership test against an already-lowercased task.
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// Infer a rough motivation context from a task string.
///
/// `recent_success` and `recent_failure` are never inferred from text; they
/// stay at 0 and are left for callers that track outcomes.
pub fn infer_context(task: &str) -> MotivationContext {
    let lowered = task.to_lowercase();
    let mut ctx = MotivationContext {
        difficulty: BASE_DIFFICULTY,
        user_urgency: BASE_URGENCY,
        ..Default::default()
    };

    for rule in RULES.iter().filter(|r| r.matches(&lowered)) {
        tracing::debug!("Context rule '{}' fired", rule.name);
        for &(field, target) in rule.targets {
            let slot = match field {
                Field::Novelty => &mut ctx.novelty,
                Field::Difficulty => &mut ctx.difficulty,
                Field::UserUrgency => &mut ctx.user_urgency,
                Field::SocialRelevance => &mut ctx.social_relevance,
            };
            *slot = slot.max(target);
        }
    }

    ctx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_urgent_bug() {
        let ctx = infer_context("help me debug this urgent bug");
        assert!(ctx.difficulty >= 0.8);
        assert!(ctx.user_urgency >= 0.9);
        assert_eq!(ctx.novelty, 0.0);
        assert_eq!(ctx.social_relevance, 0.0);
    }

    #[test]
    fn test_plain_task_gets_baseline() {
        let ctx = infer_context("summarise this paragraph");
        assert_eq!(ctx.novelty, 0.0);
        assert_eq!(ctx.difficulty, BASE_DIFFICULTY);
        assert_eq!(ctx.user_urgency, BASE_URGENCY);
        assert_eq!(ctx.recent_success, 0.0);
        assert_eq!(ctx.recent_failure, 0.0);
    }

    #[test]
    fn test_case_insensitive() {
        let ctx = infer_context("EXPLORE the Unknown");
        assert_eq!(ctx.novelty, 0.8);
    }

    #[test]
    fn test_categories_fire_independently() {
        let ctx = infer_context("learn how to fix my friend's laptop");
        assert_eq!(ctx.novelty, 0.8);
        assert_eq!(ctx.difficulty, 0.8);
        assert_eq!(ctx.user_urgency, 0.9);
        assert_eq!(ctx.social_relevance, 0.8);
    }

    #[test]
    fn test_repeated_keywords_do_not_accumulate() {
        let ctx = infer_context("learn learn explore new unknown things");
        assert_eq!(ctx.novelty, 0.8);
    }

    #[test]
    fn test_builtin_rules_order() {
        let names: Vec<_> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["novelty", "debugging", "urgency", "social"]);
    }
}
