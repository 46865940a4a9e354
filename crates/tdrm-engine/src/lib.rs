//! Retention engine: scan families, plan retention, apply the plan
//!
//! Everything runs sequentially on the caller's task. A cancellation token is
//! checked around every registry call.

mod cancel;
pub mod confirm;
pub mod error;
pub mod executor;
pub mod reconciler;
pub mod scanner;

pub use confirm::Confirm;
pub use error::{EngineError, Phase, Result};
pub use executor::Executor;
pub use reconciler::{Assessment, Reconciler};
pub use scanner::Scanner;
pub use tokio_util::sync::CancellationToken;
