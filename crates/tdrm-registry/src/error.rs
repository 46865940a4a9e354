//! Error types for tdrm-registry

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("{operation} failed: {message}")]
    Api {
        operation: &'static str,
        message: String,
    },

    #[error("DeleteTaskDefinitions rejected {} revision(s): {}", .failures.len(), .failures.join("; "))]
    DeleteFailures { failures: Vec<String> },

    #[error("Batch of {0} revisions exceeds the delete limit of {limit}", limit = crate::MAX_DELETE_BATCH)]
    BatchTooLarge(usize),
}
