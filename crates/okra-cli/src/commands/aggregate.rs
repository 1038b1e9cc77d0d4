use super::{load_config, remote_client, render};
use crate::AggregateArgs;
use anyhow::{Context, Result};
use okra_application::AggregationPipeline;
use okra_core::RunConfig;
use okra_core::model::AggregationReport;
use std::path::Path;

pub async fn run(args: AggregateArgs) -> Result<()> {
    let mut config = load_config(args.config.clone())?;
    apply_overrides(&mut config, &args);
    config.validate().context("Invalid configuration")?;
    tracing::debug!(
        "[CLI] Aggregating sessions {:?} (lookback {} days)",
        config.sessions,
        config.lookback_days
    );

    let client = remote_client(&config)?;
    let report = AggregationPipeline::new(client, config)
        .run()
        .await
        .context("Aggregation failed")?;

    match args.output.as_deref() {
        Some(path) if path == Path::new("-") => {
            println!("{}", to_json(&report, args.pretty)?);
        }
        Some(path) => {
            std::fs::write(path, to_json(&report, args.pretty)?)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            print!("{}", render::summary(&report));
            println!("Report written to {}", path.display());
        }
        None => print!("{}", render::summary(&report)),
    }
    Ok(())
}

/// Applies command-line flags on top of the loaded configuration.
fn apply_overrides(config: &mut RunConfig, args: &AggregateArgs) {
    if !args.sessions.is_empty() {
        config.sessions = args.sessions.clone();
    }
    if let Some(days) = args.lookback_days {
        config.lookback_days = days;
    }
    if args.skip_history {
        config.performance.skip_history = true;
    }
    if args.skip_sparklines {
        config.performance.skip_sparklines = true;
    }
    if args.no_bulk_users {
        config.performance.bulk_user_fetch = false;
    }
}

fn to_json(report: &AggregationReport, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    };
    json.context("Failed to serialize report")
}
