//! In-memory registry
//!
//! Mirrors the ECS semantics the engine relies on: exact family filtering,
//! sorted and paginated listings, single-revision deregistration, and batch
//! deletion of inactive revisions only. Every call is recorded so callers can
//! assert on what was issued.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tdrm_core::RevisionStatus;

use crate::{MAX_DELETE_BATCH, Page, RegistryError, Result, SortOrder, TaskDefinitionRegistry};

const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListFamilies,
    ListRevisions,
    Deregister,
    Delete,
}

/// A recorded registry call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListFamilies {
        next_token: Option<String>,
    },
    ListRevisions {
        family: String,
        status: RevisionStatus,
        order: SortOrder,
        next_token: Option<String>,
    },
    Deregister(String),
    Delete(Vec<String>),
}

impl Call {
    pub fn operation(&self) -> Operation {
        match self {
            Call::ListFamilies { .. } => Operation::ListFamilies,
            Call::ListRevisions { .. } => Operation::ListRevisions,
            Call::Deregister(_) => Operation::Deregister,
            Call::Delete(_) => Operation::Delete,
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(self, Call::Deregister(_) | Call::Delete(_))
    }
}

#[derive(Debug, Clone)]
struct StoredRevision {
    arn: String,
    family: String,
    ordinal: u32,
    status: RevisionStatus,
}

#[derive(Debug, Default)]
struct State {
    families: Vec<String>,
    revisions: Vec<StoredRevision>,
    calls: Vec<Call>,
    /// Operation fails once it has succeeded this many times
    fail_after: HashMap<Operation, usize>,
    succeeded: HashMap<Operation, usize>,
}

pub struct MemoryRegistry {
    state: Mutex<State>,
    page_size: usize,
    region: String,
    account: String,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            page_size: DEFAULT_PAGE_SIZE,
            region: "us-east-1".to_string(),
            account: "123456789012".to_string(),
        }
    }

    /// Number of items returned per listing page
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Register a family with the given active and inactive revision numbers
    pub fn with_family(self, family: &str, active: &[u32], inactive: &[u32]) -> Self {
        for ordinal in active {
            self.add_revision(family, *ordinal, RevisionStatus::Active);
        }
        for ordinal in inactive {
            self.add_revision(family, *ordinal, RevisionStatus::Inactive);
        }
        if active.is_empty() && inactive.is_empty() {
            let mut state = self.lock();
            if !state.families.iter().any(|f| f == family) {
                state.families.push(family.to_string());
            }
        }
        self
    }

    /// Make `operation` fail after it has succeeded `successes` times
    pub fn fail_after(self, operation: Operation, successes: usize) -> Self {
        self.lock().fail_after.insert(operation, successes);
        self
    }

    pub fn add_revision(&self, family: &str, ordinal: u32, status: RevisionStatus) -> String {
        let arn = self.arn(family, ordinal);
        let mut state = self.lock();
        if !state.families.iter().any(|f| f == family) {
            state.families.push(family.to_string());
        }
        state.revisions.push(StoredRevision {
            arn: arn.clone(),
            family: family.to_string(),
            ordinal,
            status,
        });
        arn
    }

    pub fn arn(&self, family: &str, ordinal: u32) -> String {
        format!(
            "arn:aws:ecs:{}:{}:task-definition/{}:{}",
            self.region, self.account, family, ordinal
        )
    }

    /// Every call issued so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Deregister and delete calls only, in order
    pub fn mutations(&self) -> Vec<Call> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.is_mutation())
            .cloned()
            .collect()
    }

    /// Current revision numbers of a family with the given status, newest first
    pub fn revisions(&self, family: &str, status: RevisionStatus) -> Vec<u32> {
        let state = self.lock();
        let mut ordinals: Vec<u32> = state
            .revisions
            .iter()
            .filter(|r| r.family == family && r.status == status)
            .map(|r| r.ordinal)
            .collect();
        ordinals.sort_unstable_by(|a, b| b.cmp(a));
        ordinals
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn page<T: Clone>(&self, items: &[T], next_token: Option<&str>) -> Result<Page<T>> {
        let start = match next_token {
            Some(token) => token.parse::<usize>().map_err(|_| RegistryError::Api {
                operation: "List",
                message: format!("invalid next token: {token}"),
            })?,
            None => 0,
        };
        let end = (start + self.page_size).min(items.len());
        let slice = items.get(start..end).unwrap_or_default().to_vec();
        let next = (end < items.len()).then(|| end.to_string());
        Ok(Page::new(slice, next))
    }
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    /// Record the call and apply any injected failure
    fn record(&mut self, call: Call) -> Result<()> {
        let operation = call.operation();
        self.calls.push(call);

        let succeeded = self.succeeded.entry(operation).or_default();
        if let Some(limit) = self.fail_after.get(&operation) {
            if *succeeded >= *limit {
                return Err(RegistryError::Api {
                    operation: operation_name(operation),
                    message: "injected failure".to_string(),
                });
            }
        }
        *succeeded += 1;
        Ok(())
    }
}

fn operation_name(operation: Operation) -> &'static str {
    match operation {
        Operation::ListFamilies => "ListTaskDefinitionFamilies",
        Operation::ListRevisions => "ListTaskDefinitions",
        Operation::Deregister => "DeregisterTaskDefinition",
        Operation::Delete => "DeleteTaskDefinitions",
    }
}

#[async_trait]
impl TaskDefinitionRegistry for MemoryRegistry {
    async fn list_families(&self, next_token: Option<String>) -> Result<Page<String>> {
        let families = {
            let mut state = self.lock();
            state.record(Call::ListFamilies {
                next_token: next_token.clone(),
            })?;
            state.families.clone()
        };
        self.page(&families, next_token.as_deref())
    }

    async fn list_revisions(
        &self,
        family: &str,
        status: RevisionStatus,
        order: SortOrder,
        next_token: Option<String>,
    ) -> Result<Page<String>> {
        let arns = {
            let mut state = self.lock();
            state.record(Call::ListRevisions {
                family: family.to_string(),
                status,
                order,
                next_token: next_token.clone(),
            })?;

            let mut matching: Vec<&StoredRevision> = state
                .revisions
                .iter()
                .filter(|r| r.family == family && r.status == status)
                .collect();
            match order {
                SortOrder::Ascending => matching.sort_by_key(|r| r.ordinal),
                SortOrder::Descending => matching.sort_by(|a, b| b.ordinal.cmp(&a.ordinal)),
            }
            let arns: Vec<String> = matching.into_iter().map(|r| r.arn.clone()).collect();
            arns
        };
        self.page(&arns, next_token.as_deref())
    }

    async fn deregister(&self, arn: &str) -> Result<()> {
        let mut state = self.lock();
        state.record(Call::Deregister(arn.to_string()))?;

        match state.revisions.iter_mut().find(|r| r.arn == arn) {
            Some(revision) if revision.status == RevisionStatus::Active => {
                revision.status = RevisionStatus::Inactive;
                Ok(())
            }
            Some(_) => Err(RegistryError::Api {
                operation: "DeregisterTaskDefinition",
                message: format!("{arn} is already inactive"),
            }),
            None => Err(RegistryError::Api {
                operation: "DeregisterTaskDefinition",
                message: format!("unable to describe task definition {arn}"),
            }),
        }
    }

    async fn delete(&self, arns: &[String]) -> Result<()> {
        let mut state = self.lock();
        state.record(Call::Delete(arns.to_vec()))?;

        if arns.len() > MAX_DELETE_BATCH {
            return Err(RegistryError::BatchTooLarge(arns.len()));
        }

        let mut failures = Vec::new();
        for arn in arns {
            let position = state.revisions.iter().position(|r| &r.arn == arn);
            match position {
                Some(i) if state.revisions[i].status == RevisionStatus::Inactive => {
                    state.revisions.remove(i);
                }
                Some(_) => failures.push(format!("{arn}: task definition is active")),
                None => failures.push(format!("{arn}: task definition not found")),
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::DeleteFailures { failures })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_revision_listing_is_sorted_and_paged() {
        let registry = MemoryRegistry::new()
            .with_page_size(2)
            .with_family("web", &[1, 3, 2], &[]);

        let first = registry
            .list_revisions("web", RevisionStatus::Active, SortOrder::Descending, None)
            .await
            .unwrap();
        assert_eq!(first.items, vec![registry.arn("web", 3), registry.arn("web", 2)]);
        assert_eq!(first.next_token.as_deref(), Some("2"));

        let second = registry
            .list_revisions("web", RevisionStatus::Active, SortOrder::Descending, first.next_token)
            .await
            .unwrap();
        assert_eq!(second.items, vec![registry.arn("web", 1)]);
        assert_eq!(second.next_token, None);
    }

    #[tokio::test]
    async fn test_family_filter_is_exact() {
        let registry = MemoryRegistry::new()
            .with_family("web", &[1], &[])
            .with_family("web-admin", &[1], &[]);

        let page = registry
            .list_revisions("web", RevisionStatus::Active, SortOrder::Descending, None)
            .await
            .unwrap();
        assert_eq!(page.items, vec![registry.arn("web", 1)]);
    }

    #[tokio::test]
    async fn test_deregister_then_delete() {
        let registry = MemoryRegistry::new().with_family("web", &[2, 1], &[]);
        let arn = registry.arn("web", 1);

        registry.deregister(&arn).await.unwrap();
        assert_eq!(registry.revisions("web", RevisionStatus::Inactive), vec![1]);

        registry.delete(std::slice::from_ref(&arn)).await.unwrap();
        assert!(registry.revisions("web", RevisionStatus::Inactive).is_empty());
        assert_eq!(registry.revisions("web", RevisionStatus::Active), vec![2]);
        assert_eq!(
            registry.mutations(),
            vec![Call::Deregister(arn.clone()), Call::Delete(vec![arn])]
        );
    }

    #[tokio::test]
    async fn test_delete_rejects_active_and_oversized_batches() {
        let registry = MemoryRegistry::new().with_family("web", &[1], &[]);

        let err = registry.delete(&[registry.arn("web", 1)]).await.unwrap_err();
        assert!(matches!(err, RegistryError::DeleteFailures { .. }));

        let batch: Vec<String> = (0..11).map(|i| registry.arn("web", i)).collect();
        let err = registry.delete(&batch).await.unwrap_err();
        assert!(matches!(err, RegistryError::BatchTooLarge(11)));
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let registry = MemoryRegistry::new()
            .with_family("web", &[3, 2, 1], &[])
            .fail_after(Operation::Deregister, 1);

        registry.deregister(&registry.arn("web", 1)).await.unwrap();
        let err = registry.deregister(&registry.arn("web", 2)).await.unwrap_err();

        assert_eq!(err.to_string(), "DeregisterTaskDefinition failed: injected failure");
        assert_eq!(registry.revisions("web", RevisionStatus::Active), vec![3, 2]);
    }
}
