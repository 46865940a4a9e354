//! Confirm-then-mutate execution of retention plans
//!
//! Plans run in order. For each plan, revisions past the keep-count are
//! deregistered one by one, then inactive revisions are deleted in batches
//! of at most `MAX_DELETE_BATCH`. The first failure, declined prompt or
//! cancellation ends the run; nothing already mutated is rolled back.

use std::io;
use std::sync::Arc;
use tdrm_core::RetentionPlan;
use tdrm_registry::{MAX_DELETE_BATCH, TaskDefinitionRegistry};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cancel::guarded;
use crate::{Confirm, EngineError, Phase, Result};

pub struct Executor {
    registry: Arc<dyn TaskDefinitionRegistry>,
    cancel: CancellationToken,
}

impl Executor {
    pub fn new(registry: Arc<dyn TaskDefinitionRegistry>, cancel: CancellationToken) -> Self {
        Self { registry, cancel }
    }

    /// Apply every plan in order. `force` skips both confirmation prompts.
    pub async fn execute(
        &self,
        plans: &[RetentionPlan],
        force: bool,
        confirm: &dyn Confirm,
    ) -> Result<()> {
        for plan in plans {
            self.deactivate(plan, force, confirm).await?;
            self.delete(plan, force, confirm).await?;
        }
        Ok(())
    }

    async fn deactivate(&self, plan: &RetentionPlan, force: bool, confirm: &dyn Confirm) -> Result<()> {
        let revisions = plan.to_deactivate();
        if revisions.is_empty() {
            return Ok(());
        }
        if !force {
            self.ask(confirm, plan.family(), Phase::Deactivate, revisions.len())
                .await?;
        }

        for revision in revisions {
            guarded(&self.cancel, self.registry.deregister(&revision.arn)).await?;
            info!("Deregistered {}:{}", revision.family, revision.ordinal);
        }
        Ok(())
    }

    async fn delete(&self, plan: &RetentionPlan, force: bool, confirm: &dyn Confirm) -> Result<()> {
        let revisions = plan.to_delete();
        if revisions.is_empty() {
            return Ok(());
        }
        if !force {
            self.ask(confirm, plan.family(), Phase::Delete, revisions.len())
                .await?;
        }

        for chunk in revisions.chunks(MAX_DELETE_BATCH) {
            let arns: Vec<String> = chunk.iter().map(|r| r.arn.clone()).collect();
            guarded(&self.cancel, self.registry.delete(&arns)).await?;
            info!("Deleted {} revisions of {}", arns.len(), plan.family());
        }
        Ok(())
    }

    async fn ask(&self, confirm: &dyn Confirm, family: &str, phase: Phase, count: usize) -> Result<()> {
        let prompt = format!("Do you {phase} {count} revisions on {family}?");
        let answer = confirm.confirm(&prompt).await;

        if self.cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }
        let answer = match answer {
            Ok(answer) => answer,
            Err(err) if is_interrupt(&err) => {
                warn!("Prompt interrupted on {}", family);
                return Err(EngineError::Cancelled);
            }
            Err(err) => return Err(EngineError::Prompt(err)),
        };
        if answer {
            return Ok(());
        }

        warn!("Declined to {} {} revisions on {}", phase, count, family);
        Err(EngineError::Aborted {
            family: family.to_string(),
            phase,
            count,
        })
    }
}

fn is_interrupt(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|io| io.kind() == io::ErrorKind::Interrupted)
    })
}
