//! Task definition registry access
//!
//! This crate provides:
//! - The `TaskDefinitionRegistry` trait the engine drives
//! - An AWS ECS implementation
//! - An in-memory implementation for tests (`testing` feature)

pub mod ecs;
pub mod error;
#[cfg(any(test, feature = "testing"))]
pub mod memory;

pub use ecs::{EcsRegistry, EcsRegistryConfig};
pub use error::{RegistryError, Result};
#[cfg(any(test, feature = "testing"))]
pub use memory::{Call, MemoryRegistry, Operation};

use async_trait::async_trait;
use tdrm_core::RevisionStatus;

/// Largest number of revisions a single batch delete may carry
pub const MAX_DELETE_BATCH: usize = 10;

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    /// An empty token is treated as "no more pages"
    pub fn new(items: Vec<T>, next_token: Option<String>) -> Self {
        Self {
            items,
            next_token: next_token.filter(|t| !t.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Operations the retention engine needs from the orchestration platform
#[async_trait]
pub trait TaskDefinitionRegistry: Send + Sync {
    /// List task definition family names, one page at a time
    async fn list_families(&self, next_token: Option<String>) -> Result<Page<String>>;

    /// List revision ARNs of one family with the given status, sorted by revision number
    async fn list_revisions(
        &self,
        family: &str,
        status: RevisionStatus,
        order: SortOrder,
        next_token: Option<String>,
    ) -> Result<Page<String>>;

    /// Move a single revision from ACTIVE to INACTIVE
    async fn deregister(&self, arn: &str) -> Result<()>;

    /// Permanently delete up to `MAX_DELETE_BATCH` inactive revisions
    async fn delete(&self, arns: &[String]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_ends_pagination() {
        let page = Page::new(vec!["a".to_string()], Some(String::new()));
        assert_eq!(page.next_token, None);

        let page: Page<String> = Page::new(Vec::new(), Some("2".to_string()));
        assert_eq!(page.next_token.as_deref(), Some("2"));
    }
}
