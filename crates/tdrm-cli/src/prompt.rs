use async_trait::async_trait;
use dialoguer::Confirm;

/// Terminal yes/no prompt, answering "no" by default
pub struct TerminalConfirm;

#[async_trait]
impl tdrm_engine::Confirm for TerminalConfirm {
    async fn confirm(&self, prompt: &str) -> anyhow::Result<bool> {
        // terminal input blocks, keep it off the runtime workers
        let prompt = prompt.to_string();
        let answer = tokio::task::spawn_blocking(move || {
            Confirm::new().with_prompt(prompt).default(false).interact()
        })
        .await??;
        Ok(answer)
    }
}
