use rps_bot::policy::{DEFAULT_ACTIVATION, PolicyKind, PolicySpec};
use rps_bot::selector::{DEFAULT_MEMORY_HORIZON, SelectorConfig};
use rps_core::model::Move;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root harness configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    pub run_id: String,
    pub matches: MatchConfig,
    #[serde(default)]
    pub selector: SelectorSettings,
    /// Omitted means the standard roster; an explicit empty list is rejected.
    #[serde(default)]
    pub policies: Option<Vec<PolicyConfig>>,
    pub opponents: Vec<OpponentConfig>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchmarkConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: BenchmarkConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.matches.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        validate_policies(self.policies.as_deref())?;
        validate_opponents(&mut self.opponents)?;
        Ok(())
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
        }
    }

    pub fn roster(&self) -> Vec<PolicySpec> {
        match &self.policies {
            Some(policies) => policies.iter().map(PolicyConfig::to_spec).collect(),
            None => PolicySpec::standard_roster(),
        }
    }

    pub fn selector_config(&self) -> SelectorConfig {
        SelectorConfig::new(self.selector.memory_horizon).with_trace(self.selector.trace)
    }
}

/// Length and pacing of every match.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MatchConfig {
    pub rounds: usize,
    #[serde(default)]
    pub first_to: Option<u32>,
    pub seed: Option<u64>,
}

impl MatchConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.rounds == 0 {
            return Err(ValidationError::InvalidField {
                field: "matches.rounds".to_string(),
                message: "number of rounds must be greater than zero".to_string(),
            });
        }

        if self.first_to == Some(0) {
            return Err(ValidationError::InvalidField {
                field: "matches.first_to".to_string(),
                message: "first_to must be at least 1 when set".to_string(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SelectorSettings {
    #[serde(default = "default_memory_horizon")]
    pub memory_horizon: usize,
    #[serde(default)]
    pub trace: bool,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            memory_horizon: default_memory_horizon(),
            trace: false,
        }
    }
}

fn default_memory_horizon() -> usize {
    DEFAULT_MEMORY_HORIZON
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKindConfig {
    MirrorSwitch,
    CounterSwitch,
    FrequencyExploiter,
}

impl From<PolicyKindConfig> for PolicyKind {
    fn from(kind: PolicyKindConfig) -> Self {
        match kind {
            PolicyKindConfig::MirrorSwitch => PolicyKind::MirrorSwitch,
            PolicyKindConfig::CounterSwitch => PolicyKind::CounterSwitch,
            PolicyKindConfig::FrequencyExploiter => PolicyKind::FrequencyExploiter,
        }
    }
}

/// One roster entry; order is the selector's tie-break order.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PolicyConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub kind: PolicyKindConfig,
    #[serde(default = "default_move")]
    pub default: Move,
    #[serde(default)]
    pub activation: Option<usize>,
}

impl PolicyConfig {
    pub fn to_spec(&self) -> PolicySpec {
        let mut spec = PolicySpec::new(self.kind.into(), self.default);
        spec.activation = self.activation.unwrap_or(DEFAULT_ACTIVATION);
        spec.name = self.name.clone();
        spec
    }
}

fn default_move() -> Move {
    Move::Paper
}

/// Definition of a practice opponent.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OpponentConfig {
    pub name: String,
    pub kind: OpponentKind,
    #[serde(default)]
    pub params: serde_yaml::Value,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OpponentKind {
    Constant,
    Cycle,
    Random,
    MirrorSwitch,
    CounterSwitch,
    Selector,
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path is invalid".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn validate_policies(policies: Option<&[PolicyConfig]>) -> Result<(), ValidationError> {
    let Some(policies) = policies else {
        return Ok(());
    };

    if policies.is_empty() {
        return Err(ValidationError::InvalidField {
            field: "policies".to_string(),
            message: "at least one policy must be specified".to_string(),
        });
    }

    for (index, policy) in policies.iter().enumerate() {
        if policy.activation.is_some() && policy.kind != PolicyKindConfig::FrequencyExploiter {
            return Err(ValidationError::InvalidField {
                field: format!("policies[{index}].activation"),
                message: "activation only applies to frequency_exploiter".to_string(),
            });
        }
    }

    let mut seen = HashSet::new();
    for spec in policies.iter().map(PolicyConfig::to_spec) {
        let name = spec.resolved_name();
        if !seen.insert(name.clone()) {
            return Err(ValidationError::InvalidField {
                field: "policies".to_string(),
                message: format!("policy name '{name}' defined more than once"),
            });
        }
    }

    Ok(())
}

fn validate_opponents(opponents: &mut [OpponentConfig]) -> Result<(), ValidationError> {
    if opponents.is_empty() {
        return Err(ValidationError::InvalidField {
            field: "opponents".to_string(),
            message: "at least one opponent must be specified".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for opponent in opponents.iter_mut() {
        if opponent.name.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "opponents.name".to_string(),
                message: "opponent name must not be empty".to_string(),
            });
        }

        if !opponent.name.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
            return Err(ValidationError::InvalidField {
                field: format!("opponents[{}].name", opponent.name),
                message: "opponent name contains invalid characters".to_string(),
            });
        }

        if !seen.insert(opponent.name.clone()) {
            return Err(ValidationError::InvalidField {
                field: "opponents".to_string(),
                message: format!("opponent name '{}' defined more than once", opponent.name),
            });
        }

        if opponent.params.is_null() {
            opponent.params = serde_yaml::Value::Mapping(Default::default());
        }
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
