use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use tdrm_engine::{CancellationToken, Confirm, Reconciler};
use tdrm_registry::TaskDefinitionRegistry;
use tracing::info;

use super::Inputs;

pub async fn handle(
    inputs: &Inputs,
    registry: Arc<dyn TaskDefinitionRegistry>,
    force: bool,
    cancel: CancellationToken,
    confirm: &dyn Confirm,
    out: &mut impl Write,
) -> Result<()> {
    let reconciler = Reconciler::new(registry, cancel);

    let assessment = reconciler.assess(&inputs.rules).await?;
    assessment.summaries.print(out, inputs.format)?;
    out.flush()?;

    if !assessment.has_work() {
        info!("Nothing to inactivate or delete");
        return Ok(());
    }

    eprintln!();
    reconciler.apply(&assessment, force, confirm).await?;

    eprintln!("✓ Done");
    Ok(())
}
