//! Full retention run: match families, scan, plan, then optionally apply

use std::sync::Arc;
use tdrm_core::{FamilyMatcher, PolicyRule, RetentionPlan, SummaryTable, plan};
use tdrm_registry::TaskDefinitionRegistry;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{Confirm, Executor, Result, Scanner};

/// Outcome of the planning pass, one entry per matched family in rule order
#[derive(Debug, Default)]
pub struct Assessment {
    pub summaries: SummaryTable,
    pub plans: Vec<RetentionPlan>,
}

impl Assessment {
    pub fn has_work(&self) -> bool {
        self.plans.iter().any(|p| !p.is_noop())
    }
}

/// Drives one run against a single registry handle
pub struct Reconciler {
    scanner: Scanner,
    executor: Executor,
}

impl Reconciler {
    pub fn new(registry: Arc<dyn TaskDefinitionRegistry>, cancel: CancellationToken) -> Self {
        Self {
            scanner: Scanner::new(registry.clone(), cancel.clone()),
            executor: Executor::new(registry, cancel),
        }
    }

    /// Scan every family governed by `rules` and build its retention plan.
    ///
    /// A family matched by several rules is planned under the first one only.
    pub async fn assess(&self, rules: &[PolicyRule]) -> Result<Assessment> {
        let families = self.scanner.families().await?;
        debug!("Registry reports {} families", families.len());

        let mut matcher = FamilyMatcher::new();
        let mut assessment = Assessment::default();

        for rule in rules {
            let matched = matcher.select(&rule.pattern, &families);
            debug!("Pattern {} matched {} families", rule.pattern, matched.len());

            for family in matched {
                let (active, inactive) = self.scanner.scan(&family).await?;
                let (summary, plan) = plan(&family, active, inactive, rule.keep_count);

                info!(
                    "{}: {} active, {} inactive, {} to inactivate, {} to delete",
                    family,
                    summary.active_revisions,
                    summary.inactive_revisions,
                    summary.to_inactive,
                    summary.to_delete
                );

                assessment.summaries.push(summary);
                assessment.plans.push(plan);
            }
        }

        Ok(assessment)
    }

    /// Execute the plans of an assessment, in order
    pub async fn apply(&self, assessment: &Assessment, force: bool, confirm: &dyn Confirm) -> Result<()> {
        self.executor.execute(&assessment.plans, force, confirm).await
    }
}
