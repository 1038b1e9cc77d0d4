use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "okra")]
#[command(about = "OKRA - OKR aggregation across planning sessions", long_about = None)]
struct Cli {
    /// Log at debug level (ignored when RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate objectives and key results for the target sessions
    Aggregate(AggregateArgs),
    /// List the sessions visible to the configured account
    Sessions {
        /// Config file (defaults to ~/.config/okra/config.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct AggregateArgs {
    /// Config file (defaults to ~/.config/okra/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Session name or ID; repeat to target several (replaces configured sessions)
    #[arg(short, long = "session")]
    pub sessions: Vec<String>,

    /// Window for the recent-activity count
    #[arg(long)]
    pub lookback_days: Option<u32>,

    /// Do not fetch progress history
    #[arg(long)]
    pub skip_history: bool,

    /// Do not render sparklines
    #[arg(long)]
    pub skip_sparklines: bool,

    /// Look owners up one by one instead of in bulk
    #[arg(long)]
    pub no_bulk_users: bool,

    /// Write the JSON report to this file ("-" for stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "okra=debug" } else { "okra=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Aggregate(args) => commands::aggregate::run(args).await?,
        Commands::Sessions { config } => commands::sessions::run(config).await?,
    }

    Ok(())
}
