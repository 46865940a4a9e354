mod cli;
mod commands;
mod prompt;

use clap::Parser;
use prompt::TerminalConfirm;
use std::process::ExitCode;
use tdrm_engine::{CancellationToken, EngineError};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli::Cli { aws, command } = cli::Cli::parse();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight call");
            on_interrupt.cancel();
        }
    });

    match run(aws, command, cancel).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_status(&err))
        }
    }
}

async fn run(aws: cli::AwsArgs, command: cli::Commands, cancel: CancellationToken) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();

    match command {
        cli::Commands::Plan(args) => {
            let inputs = commands::load(&args)?;
            let registry = commands::connect(&aws).await;
            commands::plan::handle(&inputs, registry, cancel, &mut stdout).await
        }
        cli::Commands::Delete { plan, force } => {
            let inputs = commands::load(&plan)?;
            let registry = commands::connect(&aws).await;
            commands::delete::handle(&inputs, registry, force, cancel, &TerminalConfirm, &mut stdout).await
        }
    }
}

/// 2 when the user declined a prompt, 130 when interrupted, 1 otherwise
fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<EngineError>() {
        Some(EngineError::Aborted { .. }) => 2,
        Some(EngineError::Cancelled) => 130,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tdrm_engine::Phase;

    #[test]
    fn test_exit_codes() {
        let aborted = anyhow::Error::new(EngineError::Aborted {
            family: "web".to_string(),
            phase: Phase::Delete,
            count: 1,
        });
        assert_eq!(exit_status(&aborted), 2);

        let cancelled = anyhow::Error::new(EngineError::Cancelled).context("delete failed");
        assert_eq!(exit_status(&cancelled), 130);

        assert_eq!(exit_status(&anyhow::anyhow!("boom")), 1);
    }
}
