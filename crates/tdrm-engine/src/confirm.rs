use async_trait::async_trait;

/// Interactive yes/no confirmation. Implementations must default to "no".
///
/// An `std::io::ErrorKind::Interrupted` anywhere in the returned error chain
/// (Ctrl-C at the prompt) ends the run as cancelled.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> anyhow::Result<bool>;
}
