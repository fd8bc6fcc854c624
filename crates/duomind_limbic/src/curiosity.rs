//! Curiosity queue
//!
//! Open questions the system is unsure about, ranked by uncertainty. Items
//! come from users or from the system itself; the most uncertain one is
//! pulled first and a frontier report summarises what is still open.

use chrono::{DateTime, Utc};
use duomind_core::sanitize;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Uncertainty assumed when a caller gives a non-finite score.
pub const DEFAULT_UNCERTAINTY: f64 = 0.5;

/// How many open questions a frontier report lists.
const REPORT_EXAMPLES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuriosityItem {
    pub id: Uuid,
    pub question: String,
    /// Who raised it, e.g. "user" or "system"
    pub source: String,
    pub created_at: DateTime<Utc>,
    /// 0.0-1.0, higher is pulled first
    pub uncertainty: f64,
    pub notes: Option<String>,
}

/// Summary of what is still open.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrontierReport {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_uncertainty_question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_uncertainty_score: Option<f64>,
    /// Up to five open questions, oldest first
    pub examples: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// In-memory queue of open questions, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct CuriosityQueue {
    items: Vec<CuriosityItem>,
}

impl CuriosityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a question. Uncertainty is clamped into [0, 1].
    pub fn add_item(
        &mut self,
        question: impl Into<String>,
        source: impl Into<String>,
        uncertainty: f64,
        notes: Option<String>,
    ) -> &CuriosityItem {
        let item = CuriosityItem {
            id: Uuid::new_v4(),
            question: question.into(),
            source: source.into(),
            created_at: Utc::now(),
            uncertainty: sanitize(uncertainty, DEFAULT_UNCERTAINTY).clamp(0.0, 1.0),
            notes,
        };
        tracing::debug!(
            "Curiosity item '{}' from {} at uncertainty {:.2}",
            item.question,
            item.source,
            item.uncertainty
        );
        self.items.push(item);
        &self.items[self.items.len() - 1]
    }

    /// Remove and return the most uncertain item. Ties go to the oldest.
    pub fn pop_highest_uncertainty(&mut self) -> Option<CuriosityItem> {
        let idx = self.highest_index()?;
        Some(self.items.remove(idx))
    }

    pub fn frontier_report(&self) -> FrontierReport {
        let Some(idx) = self.highest_index() else {
            return FrontierReport {
                count: 0,
                highest_uncertainty_question: None,
                highest_uncertainty_score: None,
                examples: Vec::new(),
                message: Some("No open curiosity items.".to_string()),
            };
        };
        let highest = &self.items[idx];
        FrontierReport {
            count: self.items.len(),
            highest_uncertainty_question: Some(highest.question.clone()),
            highest_uncertainty_score: Some(highest.uncertainty),
            examples: self
                .items
                .iter()
                .take(REPORT_EXAMPLES)
                .map(|i| i.question.clone())
                .collect(),
            message: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn highest_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (idx, item) in self.items.iter().enumerate() {
            match best {
                Some(b) if self.items[b].uncertainty >= item.uncertainty => {}
                _ => best = Some(idx),
            }
        }
        best
    }
}
