use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tdrm")]
#[command(about = "A command line tool to manage AWS ECS task definitions", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub aws: AwsArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct AwsArgs {
    /// AWS region (defaults to the standard AWS configuration chain)
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Custom ECS endpoint (e.g., localstack)
    #[arg(long, global = true)]
    pub endpoint_url: Option<String>,

    /// Maximum attempts per API call, including retries
    #[arg(long, global = true, default_value = "10")]
    pub max_attempts: u32,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List task definitions to delete
    Plan(PlanArgs),

    /// Delete task definitions
    Delete {
        #[command(flatten)]
        plan: PlanArgs,

        /// Skip confirmation prompts
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
pub struct PlanArgs {
    /// Path to the retention policy file (TOML with [[task_definitions]] entries; YAML is not supported)
    #[arg(long, short, default_value = "tdrm.toml")]
    pub config: PathBuf,

    /// Output format (table or json)
    #[arg(long, default_value = "table")]
    pub format: String,
}
