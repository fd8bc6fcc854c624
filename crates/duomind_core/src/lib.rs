//! # Duomind Core
//!
//! Value types shared by every layer of the dual-brain core: the four-scalar
//! chemical state, the temperatures derived from it, the motivation context
//! and result, and the TOML configuration.

pub mod chemistry;
pub mod config;
pub mod motivation;

pub use chemistry::{deserialize_safe_f64, sanitize, BrainTemperatures, ChemicalState};
pub use config::DuomindConfig;
pub use motivation::{MotivationContext, MotivationMode, MotivationResult};
