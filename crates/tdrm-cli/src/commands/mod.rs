pub mod delete;
pub mod plan;

use anyhow::{Context, Result};
use std::sync::Arc;
use tdrm_core::{OutputFormat, PolicyRule};
use tdrm_registry::{EcsRegistry, EcsRegistryConfig, TaskDefinitionRegistry};

use crate::cli::{AwsArgs, PlanArgs};

/// Validated local inputs of a command
pub struct Inputs {
    pub rules: Vec<PolicyRule>,
    pub format: OutputFormat,
}

/// Parse the output format, then load the policy file.
///
/// Runs before connecting so local mistakes surface before any API call.
pub fn load(args: &PlanArgs) -> Result<Inputs> {
    let format: OutputFormat = args.format.parse()?;

    let rules = tdrm_config::load_rules(&args.config)
        .with_context(|| format!("Invalid policy file {}", args.config.display()))?;

    Ok(Inputs { rules, format })
}

pub async fn connect(aws: &AwsArgs) -> Arc<dyn TaskDefinitionRegistry> {
    let registry = EcsRegistry::new(EcsRegistryConfig {
        region: aws.region.clone(),
        endpoint_url: aws.endpoint_url.clone(),
        max_attempts: aws.max_attempts,
    })
    .await;

    Arc::new(registry)
}
