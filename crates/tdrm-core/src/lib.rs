//! Core domain models and logic for tdrm
//!
//! This crate contains:
//! - Domain models (Revision, PolicyRule, RetentionPlan, Summary)
//! - Family pattern matching
//! - Retention planning (keep-count partitioning)
//! - Summary reporting (table / JSON)

pub mod error;
pub mod plan;
pub mod policy;
pub mod report;
pub mod revision;

pub use error::{Error, Result};
pub use plan::{RetentionPlan, Summary, plan};
pub use policy::{FamilyMatcher, FamilyPattern, PolicyRule};
pub use report::{OutputFormat, SummaryTable};
pub use revision::{Revision, RevisionStatus};
