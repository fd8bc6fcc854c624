//! # Duomind Limbic Layer
//!
//! Fast, pure state regulation for the dual-brain core:
//!
//! 1. Infer a [`MotivationContext`](duomind_core::MotivationContext) from task text
//! 2. Update the chemical state from the previous snapshot and that context
//! 3. Map the chemical state onto per-role sampling temperatures
//!
//! It also keeps the [`CuriosityQueue`] of open questions ranked by
//! uncertainty.
//!
//! The mapper owns no state. Callers hold the current
//! [`ChemicalState`](duomind_core::ChemicalState) and pass it back in, so
//! concurrent tasks never share a live affective instance.

mod curiosity;
mod inference;
mod mapper;

pub use curiosity::{CuriosityItem, CuriosityQueue, FrontierReport, DEFAULT_UNCERTAINTY};
pub use inference::infer_context;
pub use mapper::{temperatures, update, MAPPER_RANGE};
