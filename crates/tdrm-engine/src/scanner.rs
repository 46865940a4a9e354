//! Revision discovery over the registry's paginated listings

use std::sync::Arc;
use tdrm_core::{Revision, RevisionStatus};
use tdrm_registry::{SortOrder, TaskDefinitionRegistry};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::Result;
use crate::cancel::guarded;

pub struct Scanner {
    registry: Arc<dyn TaskDefinitionRegistry>,
    cancel: CancellationToken,
}

impl Scanner {
    pub fn new(registry: Arc<dyn TaskDefinitionRegistry>, cancel: CancellationToken) -> Self {
        Self { registry, cancel }
    }

    /// All family names, in the order the registry reports them
    pub async fn families(&self) -> Result<Vec<String>> {
        let mut families = Vec::new();
        let mut next_token = None;

        loop {
            let page = guarded(&self.cancel, self.registry.list_families(next_token)).await?;
            debug!("Fetched {} families", page.items.len());
            families.extend(page.items);

            match page.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        Ok(families)
    }

    /// Active revisions (newest first) and inactive revisions of one family.
    ///
    /// Any page failure discards what was fetched so far.
    pub async fn scan(&self, family: &str) -> Result<(Vec<Revision>, Vec<Revision>)> {
        let active = self.revisions(family, RevisionStatus::Active).await?;
        let inactive = self.revisions(family, RevisionStatus::Inactive).await?;
        Ok((active, inactive))
    }

    async fn revisions(&self, family: &str, status: RevisionStatus) -> Result<Vec<Revision>> {
        let mut revisions = Vec::new();
        let mut next_token = None;

        loop {
            let page = guarded(
                &self.cancel,
                self.registry
                    .list_revisions(family, status, SortOrder::Descending, next_token),
            )
            .await?;
            debug!("Fetched {} {} revisions of {}", page.items.len(), status, family);

            for arn in &page.items {
                revisions.push(Revision::from_arn(arn, status)?);
            }

            match page.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        Ok(revisions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineError;
    use tdrm_registry::{Call, MemoryRegistry, Operation};

    fn ordinals(revisions: &[Revision]) -> Vec<u32> {
        revisions.iter().map(|r| r.ordinal).collect()
    }

    #[tokio::test]
    async fn test_scan_concatenates_pages_newest_first() {
        let registry = Arc::new(
            MemoryRegistry::new()
                .with_page_size(2)
                .with_family("web-app", &[1, 2, 3, 4, 5], &[6, 7, 8]),
        );
        let scanner = Scanner::new(registry.clone(), CancellationToken::new());

        let (active, inactive) = scanner.scan("web-app").await.unwrap();

        assert_eq!(ordinals(&active), vec![5, 4, 3, 2, 1]);
        assert_eq!(ordinals(&inactive), vec![8, 7, 6]);
        assert!(active.iter().all(|r| r.status == RevisionStatus::Active));
        assert!(inactive.iter().all(|r| r.status == RevisionStatus::Inactive));

        // 3 pages of active, 2 pages of inactive, all requested newest first
        let listings: Vec<Call> = registry
            .calls()
            .into_iter()
            .filter(|c| c.operation() == Operation::ListRevisions)
            .collect();
        assert_eq!(listings.len(), 5);
        assert!(listings.iter().all(|c| matches!(
            c,
            Call::ListRevisions { order: SortOrder::Descending, .. }
        )));
    }

    #[tokio::test]
    async fn test_families_across_pages() {
        let registry = Arc::new(
            MemoryRegistry::new()
                .with_page_size(2)
                .with_family("a", &[1], &[])
                .with_family("b", &[1], &[])
                .with_family("c", &[], &[1]),
        );
        let scanner = Scanner::new(registry, CancellationToken::new());

        assert_eq!(scanner.families().await.unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_page_failure_aborts_scan() {
        let registry = Arc::new(
            MemoryRegistry::new()
                .with_page_size(1)
                .with_family("web", &[3, 2, 1], &[])
                .fail_after(Operation::ListRevisions, 2),
        );
        let scanner = Scanner::new(registry, CancellationToken::new());

        let err = scanner.scan("web").await.unwrap_err();
        assert!(matches!(err, EngineError::Registry(_)));
    }

    #[tokio::test]
    async fn test_cancelled_before_first_call() {
        let registry = Arc::new(MemoryRegistry::new().with_family("web", &[1], &[]));
        let cancel = CancellationToken::new();
        cancel.cancel();
        let scanner = Scanner::new(registry.clone(), cancel);

        let err = scanner.scan("web").await.unwrap_err();
        assert!(matches!(err, EngineError::Cancelled));
        assert!(registry.calls().is_empty());
    }
}
