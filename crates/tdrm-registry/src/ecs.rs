//! AWS ECS implementation.
//!
//! Uses the AWS SDK for Rust with the standard credential chain
//! (environment, profile, instance role). Throttling and transient failures
//! are retried by the SDK with adaptive backoff up to `max_attempts`.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_config::retry::RetryConfig;
use aws_sdk_ecs::Client;
use aws_sdk_ecs::error::DisplayErrorContext;
use aws_sdk_ecs::types::{SortOrder as EcsSortOrder, TaskDefinitionStatus};
use tdrm_core::RevisionStatus;
use tracing::debug;

use crate::{MAX_DELETE_BATCH, Page, RegistryError, Result, SortOrder, TaskDefinitionRegistry};

/// Configuration for the ECS client.
#[derive(Debug, Clone)]
pub struct EcsRegistryConfig {
    /// AWS region (e.g., "us-east-1"); falls back to the default provider chain
    pub region: Option<String>,
    /// Optional endpoint URL for testing with localstack
    pub endpoint_url: Option<String>,
    /// Total attempts per call, including the first
    pub max_attempts: u32,
}

impl Default for EcsRegistryConfig {
    fn default() -> Self {
        Self {
            region: None,
            endpoint_url: None,
            max_attempts: 10,
        }
    }
}

/// Task definition registry backed by the ECS API.
pub struct EcsRegistry {
    client: Client,
}

impl EcsRegistry {
    pub async fn new(config: EcsRegistryConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .retry_config(RetryConfig::adaptive().with_max_attempts(config.max_attempts.max(1)));

        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }

        let sdk_config = loader.load().await;

        let mut ecs_config = aws_sdk_ecs::config::Builder::from(&sdk_config);
        if let Some(endpoint_url) = &config.endpoint_url {
            ecs_config = ecs_config.endpoint_url(endpoint_url);
        }

        debug!(
            "ECS client configured for region {:?}",
            sdk_config.region().map(|r| r.to_string())
        );

        Self {
            client: Client::from_conf(ecs_config.build()),
        }
    }
}

fn api_error<E>(operation: &'static str, err: E) -> RegistryError
where
    E: std::error::Error,
{
    RegistryError::Api {
        operation,
        message: DisplayErrorContext(&err).to_string(),
    }
}

fn status_filter(status: RevisionStatus) -> TaskDefinitionStatus {
    match status {
        RevisionStatus::Active => TaskDefinitionStatus::Active,
        RevisionStatus::Inactive => TaskDefinitionStatus::Inactive,
    }
}

fn sort_order(order: SortOrder) -> EcsSortOrder {
    match order {
        SortOrder::Ascending => EcsSortOrder::Asc,
        SortOrder::Descending => EcsSortOrder::Desc,
    }
}

#[async_trait]
impl TaskDefinitionRegistry for EcsRegistry {
    async fn list_families(&self, next_token: Option<String>) -> Result<Page<String>> {
        let output = self
            .client
            .list_task_definition_families()
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| api_error("ListTaskDefinitionFamilies", e))?;

        Ok(Page::new(
            output.families().to_vec(),
            output.next_token().map(str::to_string),
        ))
    }

    async fn list_revisions(
        &self,
        family: &str,
        status: RevisionStatus,
        order: SortOrder,
        next_token: Option<String>,
    ) -> Result<Page<String>> {
        let output = self
            .client
            .list_task_definitions()
            .family_prefix(family)
            .status(status_filter(status))
            .sort(sort_order(order))
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| api_error("ListTaskDefinitions", e))?;

        Ok(Page::new(
            output.task_definition_arns().to_vec(),
            output.next_token().map(str::to_string),
        ))
    }

    async fn deregister(&self, arn: &str) -> Result<()> {
        self.client
            .deregister_task_definition()
            .task_definition(arn)
            .send()
            .await
            .map_err(|e| api_error("DeregisterTaskDefinition", e))?;
        Ok(())
    }

    async fn delete(&self, arns: &[String]) -> Result<()> {
        if arns.len() > MAX_DELETE_BATCH {
            return Err(RegistryError::BatchTooLarge(arns.len()));
        }

        let output = self
            .client
            .delete_task_definitions()
            .set_task_definitions(Some(arns.to_vec()))
            .send()
            .await
            .map_err(|e| api_error("DeleteTaskDefinitions", e))?;

        let failures: Vec<String> = output
            .failures()
            .iter()
            .map(|f| {
                format!(
                    "{}: {}",
                    f.arn().unwrap_or("<unknown>"),
                    f.reason().or(f.detail()).unwrap_or("unknown reason")
                )
            })
            .collect();

        if !failures.is_empty() {
            return Err(RegistryError::DeleteFailures { failures });
        }

        Ok(())
    }
}
