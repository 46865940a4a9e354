use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::{EngineError, Result};

/// Issue a registry call only if the run has not been cancelled.
///
/// An in-flight call is allowed to finish; cancellation observed afterwards
/// still ends the run so no further calls are made.
pub(crate) async fn guarded<T, F>(cancel: &CancellationToken, call: F) -> Result<T>
where
    F: Future<Output = tdrm_registry::Result<T>>,
{
    if cancel.is_cancelled() {
        return Err(EngineError::Cancelled);
    }

    let result = call.await;

    if cancel.is_cancelled() {
        if let Err(err) = &result {
            warn!("Discarding failed call after cancellation: {}", err);
        }
        warn!("Cancellation requested, stopping after in-flight call");
        return Err(EngineError::Cancelled);
    }

    Ok(result?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tdrm_registry::RegistryError;

    fn api_error() -> RegistryError {
        RegistryError::Api {
            operation: "DeregisterTaskDefinition",
            message: "throttled".to_string(),
        }
    }

    #[tokio::test]
    async fn test_passes_result_through() {
        let cancel = CancellationToken::new();

        assert_eq!(guarded(&cancel, async { Ok(7) }).await.unwrap(), 7);

        let err = guarded::<(), _>(&cancel, async { Err(api_error()) }).await.unwrap_err();
        assert!(matches!(err, EngineError::Registry(RegistryError::Api { .. })));
    }

    #[tokio::test]
    async fn test_skips_call_when_already_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut issued = false;

        let err = guarded(&cancel, async {
            issued = true;
            Ok(())
        })
        .await
        .unwrap_err();

        assert!(matches!(err, EngineError::Cancelled));
        assert!(!issued);
    }

    #[tokio::test]
    async fn test_cancellation_wins_over_failed_call() {
        let cancel = CancellationToken::new();

        let err = guarded::<(), _>(&cancel, async {
            cancel.cancel();
            Err(api_error())
        })
        .await
        .unwrap_err();

        assert!(matches!(err, EngineError::Cancelled));
    }
}
