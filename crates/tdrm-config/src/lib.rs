use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tdrm_core::PolicyRule;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("task_definitions[{index}]: {field} is required")]
    MissingField { index: usize, field: &'static str },

    #[error("task_definitions[{index}]: keep_count must be non-negative, got {value}")]
    NegativeKeepCount { index: usize, value: i64 },

    #[error("task_definitions[{index}]: {source}")]
    InvalidRule {
        index: usize,
        #[source]
        source: tdrm_core::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Retention policy file (tdrm.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub task_definitions: Vec<TaskDefinitionConfig>,
}

/// One `[[task_definitions]]` entry as written in the file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskDefinitionConfig {
    /// Family name, optionally containing `*` wildcards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_prefix: Option<String>,

    /// Number of most recent active revisions to keep
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_count: Option<i64>,
}

impl Config {
    /// Load and parse a policy file without validating it
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validate every entry and compile its family pattern
    pub fn rules(&self) -> Result<Vec<PolicyRule>> {
        self.task_definitions
            .iter()
            .enumerate()
            .map(|(index, entry)| entry.to_rule(index))
            .collect()
    }
}

impl TaskDefinitionConfig {
    fn to_rule(&self, index: usize) -> Result<PolicyRule> {
        let pattern = self
            .family_prefix
            .as_deref()
            .ok_or(ConfigError::MissingField {
                index,
                field: "family_prefix",
            })?;

        let keep_count = self.keep_count.ok_or(ConfigError::MissingField {
            index,
            field: "keep_count",
        })?;

        let keep_count = usize::try_from(keep_count).map_err(|_| ConfigError::NegativeKeepCount {
            index,
            value: keep_count,
        })?;

        PolicyRule::new(pattern, keep_count).map_err(|source| ConfigError::InvalidRule { index, source })
    }
}

/// Load a policy file and turn it into validated rules, in file order
pub fn load_rules(path: &Path) -> Result<Vec<PolicyRule>> {
    let rules = Config::load(path)?.rules()?;
    tracing::debug!("Loaded {} retention rules from {}", rules.len(), path.display());
    Ok(rules)
}
