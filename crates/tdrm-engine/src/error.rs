use std::fmt;
use tdrm_registry::RegistryError;
use thiserror::Error;

/// Mutation phase of a retention plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Deactivate,
    Delete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Deactivate => f.write_str("inactivate"),
            Phase::Delete => f.write_str("delete"),
        }
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Core(#[from] tdrm_core::Error),

    #[error("Aborted: declined to {phase} {count} revisions on {family}")]
    Aborted {
        family: String,
        phase: Phase,
        count: usize,
    },

    #[error("Cancelled")]
    Cancelled,

    #[error("Confirmation prompt failed: {0}")]
    Prompt(anyhow::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
