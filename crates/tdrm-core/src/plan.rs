//! Retention planning - keep-count partitioning of a family's revisions

use serde::{Deserialize, Serialize};

use crate::Revision;

/// What to do with one family's revisions. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct RetentionPlan {
    family: String,
    to_deactivate: Vec<Revision>,
    to_delete: Vec<Revision>,
}

impl RetentionPlan {
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Active revisions past the keep-count, oldest last
    pub fn to_deactivate(&self) -> &[Revision] {
        &self.to_deactivate
    }

    /// Every inactive revision of the family
    pub fn to_delete(&self) -> &[Revision] {
        &self.to_delete
    }

    pub fn is_noop(&self) -> bool {
        self.to_deactivate.is_empty() && self.to_delete.is_empty()
    }
}

/// Per-family report row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub task_definition: String,
    pub active_revisions: usize,
    pub inactive_revisions: usize,
    pub to_inactive: usize,
    pub to_delete: usize,
    pub keep: usize,
}

/// Partition a family's revisions.
///
/// `active` must be ordered newest first: the first `keep_count` entries are
/// kept and the rest are marked for deactivation. All `inactive` revisions
/// are marked for deletion.
pub fn plan(
    family: &str,
    mut active: Vec<Revision>,
    inactive: Vec<Revision>,
    keep_count: usize,
) -> (Summary, RetentionPlan) {
    let active_revisions = active.len();
    let to_deactivate = if active.len() > keep_count {
        active.split_off(keep_count)
    } else {
        Vec::new()
    };

    let summary = Summary {
        task_definition: family.to_string(),
        active_revisions,
        inactive_revisions: inactive.len(),
        to_inactive: to_deactivate.len(),
        to_delete: inactive.len(),
        keep: active_revisions - to_deactivate.len(),
    };

    let plan = RetentionPlan {
        family: family.to_string(),
        to_deactivate,
        to_delete: inactive,
    };

    (summary, plan)
}
