use crate::chemistry::sanitize;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone)]
pub struct DuomindConfig {
    pub llm: LlmConfig,
    pub architect: RoleConfig,
    pub oracle: RoleConfig,
    pub fusion: FusionConfig,
    pub runner: RunnerConfig,
    pub memory: MemoryConfig,
}

impl DuomindConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    /// After loading, env var overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config = Self::from_toml_str(&content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if file doesn't exist, return defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    /// Parse TOML without touching the environment.
    ///
    /// `[architect]` and `[oracle]` sections only override the fields they
    /// name; the rest keep the role's own defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content).with_context(|| "Failed to parse TOML config")?;
        Ok(Self {
            llm: raw.llm,
            architect: raw.architect.resolve(RoleConfig::architect()),
            oracle: raw.oracle.resolve(RoleConfig::oracle()),
            fusion: raw.fusion,
            runner: raw.runner,
            memory: raw.memory,
        })
    }

    /// Apply environment variable overrides on top of file-based config.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("DUOMIND_PROVIDER") {
            self.llm.provider = v;
        }
        if let Ok(v) = std::env::var("DUOMIND_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("DUOMIND_BASE_URL") {
            self.llm.base_url = Some(v);
        }
        if let Ok(v) = std::env::var("DUOMIND_LOG_PATH") {
            self.memory.log_path = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("DUOMIND_CONFIDENCE") {
            if let Ok(n) = v.parse() {
                self.runner.confidence = n;
            }
        }
        if let Ok(v) = std::env::var("DUOMIND_GENERATION_TIMEOUT") {
            if let Ok(n) = v.parse() {
                self.runner.generation_timeout_secs = n;
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    llm: LlmConfig,
    architect: PartialRoleConfig,
    oracle: PartialRoleConfig,
    fusion: FusionConfig,
    runner: RunnerConfig,
    memory: MemoryConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartialRoleConfig {
    base_temperature: Option<f64>,
    max_tokens: Option<u32>,
    min_temperature: Option<f64>,
    max_temperature: Option<f64>,
}

impl PartialRoleConfig {
    fn resolve(self, defaults: RoleConfig) -> RoleConfig {
        RoleConfig {
            base_temperature: self.base_temperature.unwrap_or(defaults.base_temperature),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            min_temperature: self.min_temperature.unwrap_or(defaults.min_temperature),
            max_temperature: self.max_temperature.unwrap_or(defaults.max_temperature),
        }
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// "mock" or "ollama"
    pub provider: String,
    pub model: String,
    pub base_url: Option<String>,
    /// HTTP client timeout for a single request.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            model: "tinyllama".to_string(),
            base_url: None,
            timeout_secs: 120,
        }
    }
}

/// Per-role generation settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoleConfig {
    /// Starting temperature for the role-local adjustment.
    pub base_temperature: f64,
    /// Token limit passed to the backend.
    pub max_tokens: u32,
    /// Lower bound of the role's temperature range.
    pub min_temperature: f64,
    /// Upper bound of the role's temperature range.
    pub max_temperature: f64,
}

impl RoleConfig {
    /// Cool, deterministic defaults for the logical planner.
    pub fn architect() -> Self {
        Self {
            base_temperature: 0.4,
            max_tokens: 256,
            min_temperature: 0.1,
            max_temperature: 1.0,
        }
    }

    /// Hotter defaults for the creative generator.
    pub fn oracle() -> Self {
        Self {
            base_temperature: 0.8,
            max_tokens: 256,
            min_temperature: 0.1,
            max_temperature: 1.2,
        }
    }

    /// `(min, max)`, repaired so that `min <= max` and both are finite.
    pub fn range(&self) -> (f64, f64) {
        let lo = sanitize(self.min_temperature, 0.0).max(0.0);
        let hi = sanitize(self.max_temperature, lo);
        (lo, hi.max(lo))
    }
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self::architect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionPolicyKind {
    /// Confidence threshold plus the explore-bias override
    #[default]
    ConfidenceExplore,
    PreferArchitect,
    PreferOracle,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    pub policy: FusionPolicyKind,
    pub threshold: f64,
    pub explore_margin: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            policy: FusionPolicyKind::ConfidenceExplore,
            threshold: 0.5,
            explore_margin: 0.25,
        }
    }
}

/// Which temperature layer feeds the generation roles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureSource {
    /// Global chemical → temperature mapping (authoritative)
    #[default]
    Mapper,
    /// Each role recenters its own base temperature around the chemicals
    RoleLocal,
}

impl TemperatureSource {
    /// Label used in event payloads and CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureSource::Mapper => "mapper",
            TemperatureSource::RoleLocal => "role_local",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Confidence handed to the reconciler when the caller gives none.
    pub confidence: f64,
    pub temperature_source: TemperatureSource,
    /// Upper bound on a single role's generation call.
    pub generation_timeout_secs: u64,
    /// Issue both role calls at once instead of one after the other.
    pub concurrent: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            confidence: 0.6,
            temperature_source: TemperatureSource::Mapper,
            generation_timeout_secs: 60,
            concurrent: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub log_path: PathBuf,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("events.jsonl"),
        }
    }
}

impl Default for DuomindConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            architect: RoleConfig::architect(),
            oracle: RoleConfig::oracle(),
            fusion: FusionConfig::default(),
            runner: RunnerConfig::default(),
            memory: MemoryConfig::default(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = DuomindConfig::default();
        assert_eq!(cfg.llm.provider, "mock");
        assert_eq!(cfg.architect.base_temperature, 0.4);
        assert_eq!(cfg.oracle.base_temperature, 0.8);
        assert_eq!(cfg.oracle.max_temperature, 1.2);
        assert_eq!(cfg.fusion.policy, FusionPolicyKind::ConfidenceExplore);
        assert_eq!(cfg.fusion.threshold, 0.5);
        assert_eq!(cfg.runner.temperature_source, TemperatureSource::Mapper);
        assert_eq!(cfg.memory.log_path, PathBuf::from("events.jsonl"));
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
[llm]
provider = "ollama"
model = "llama3"
"#;
        let cfg = DuomindConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(cfg.llm.provider, "ollama");
        assert_eq!(cfg.llm.model, "llama3");
        // Defaults for unspecified fields
        assert_eq!(cfg.llm.timeout_secs, 120);
        assert_eq!(cfg.oracle, RoleConfig::oracle());
        assert!(cfg.runner.concurrent);
    }

    #[test]
    fn test_partial_role_section_keeps_role_defaults() {
        let toml_str = r#"
[oracle]
max_tokens = 512
"#;
        let cfg = DuomindConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(cfg.oracle.max_tokens, 512);
        assert_eq!(cfg.oracle.base_temperature, 0.8);
        assert_eq!(cfg.oracle.max_temperature, 1.2);
        assert_eq!(cfg.architect, RoleConfig::architect());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[llm]
provider = "ollama"
model = "qwen2"
base_url = "http://localhost:11434/v1"
timeout_secs = 30

[architect]
base_temperature = 0.3
max_tokens = 128
min_temperature = 0.05
max_temperature = 0.9

[fusion]
policy = "prefer_oracle"
threshold = 0.7
explore_margin = 0.4

[runner]
confidence = 0.8
temperature_source = "role_local"
generation_timeout_secs = 10
concurrent = false

[memory]
log_path = "data/events.jsonl"
"#;
        let cfg = DuomindConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(cfg.llm.base_url.as_deref(), Some("http://localhost:11434/v1"));
        assert_eq!(cfg.architect.max_tokens, 128);
        assert_eq!(cfg.architect.range(), (0.05, 0.9));
        assert_eq!(cfg.fusion.policy, FusionPolicyKind::PreferOracle);
        assert_eq!(cfg.fusion.explore_margin, 0.4);
        assert_eq!(cfg.runner.temperature_source, TemperatureSource::RoleLocal);
        assert!(!cfg.runner.concurrent);
        assert_eq!(cfg.memory.log_path, PathBuf::from("data/events.jsonl"));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(DuomindConfig::from_toml_str("[runner]\nconfidence = \"high\"").is_err());
    }

    #[test]
    fn test_env_overrides_and_defaults() {
        // Part 1: env overrides
        std::env::set_var("DUOMIND_PROVIDER", "ollama");
        std::env::set_var("DUOMIND_CONFIDENCE", "0.9");

        let mut cfg = DuomindConfig::default();
        cfg.apply_env_overrides();

        assert_eq!(cfg.llm.provider, "ollama");
        assert_eq!(cfg.runner.confidence, 0.9);

        // Clean up env vars before testing defaults
        std::env::remove_var("DUOMIND_PROVIDER");
        std::env::remove_var("DUOMIND_CONFIDENCE");

        // Part 2: nonexistent path returns defaults (no env interference)
        let cfg = DuomindConfig::load_or_default("/nonexistent/path.toml");
        assert_eq!(cfg.llm.provider, "mock");
    }
}
