use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use tdrm_engine::{CancellationToken, Reconciler};
use tdrm_registry::TaskDefinitionRegistry;

use super::Inputs;

pub async fn handle(
    inputs: &Inputs,
    registry: Arc<dyn TaskDefinitionRegistry>,
    cancel: CancellationToken,
    out: &mut impl Write,
) -> Result<()> {
    let reconciler = Reconciler::new(registry, cancel);

    let assessment = reconciler.assess(&inputs.rules).await?;
    assessment.summaries.print(out, inputs.format)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tdrm_core::{OutputFormat, PolicyRule};
    use tdrm_registry::MemoryRegistry;

    #[tokio::test]
    async fn test_plan_reports_without_mutating() {
        let registry = Arc::new(MemoryRegistry::new().with_family("web-app", &[1, 2, 3, 4, 5], &[6, 7]));
        let inputs = Inputs {
            rules: vec![PolicyRule::new("web-*", 3).unwrap()],
            format: OutputFormat::Json,
        };
        let mut out = Vec::new();

        handle(&inputs, registry.clone(), CancellationToken::new(), &mut out)
            .await
            .unwrap();

        assert!(registry.mutations().is_empty());
        let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(report[0]["task_definition"], "web-app");
        assert_eq!(report[0]["to_inactive"], 2);
        assert_eq!(report[0]["to_delete"], 2);
    }
}
