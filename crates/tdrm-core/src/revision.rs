//! Task definition revision model

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Registration status of a task definition revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevisionStatus {
    Active,
    Inactive,
}

impl RevisionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevisionStatus::Active => "ACTIVE",
            RevisionStatus::Inactive => "INACTIVE",
        }
    }
}

impl fmt::Display for RevisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One revision of a task definition family, identified by its ARN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub arn: String,
    pub family: String,
    pub ordinal: u32,
    pub status: RevisionStatus,
}

impl Revision {
    /// Parse a revision from an ARN of the form
    /// `arn:aws:ecs:<region>:<account>:task-definition/<family>:<revision>`.
    ///
    /// A bare `<family>:<revision>` is accepted as well.
    pub fn from_arn(arn: &str, status: RevisionStatus) -> Result<Self> {
        let resource = arn.rsplit_once('/').map_or(arn, |(_, resource)| resource);

        let (family, ordinal) = resource
            .rsplit_once(':')
            .ok_or_else(|| Error::InvalidArn(arn.to_string()))?;

        if family.is_empty() {
            return Err(Error::InvalidArn(arn.to_string()));
        }

        let ordinal = ordinal
            .parse::<u32>()
            .map_err(|_| Error::InvalidArn(arn.to_string()))?;

        Ok(Self {
            arn: arn.to_string(),
            family: family.to_string(),
            ordinal,
            status,
        })
    }
}
