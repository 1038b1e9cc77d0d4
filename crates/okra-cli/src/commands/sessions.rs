use super::{load_config, remote_client};
use anyhow::{Context, Result};
use colored::Colorize;
use okra_application::AggregationPipeline;
use std::path::PathBuf;

pub async fn run(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let client = remote_client(&config)?;
    let sessions = AggregationPipeline::new(client, config)
        .list_sessions()
        .await
        .context("Failed to list sessions")?;

    if sessions.is_empty() {
        println!("{}", "No sessions found.".yellow());
        return Ok(());
    }

    for session in sessions {
        let range = match (session.start_date, session.end_date) {
            (Some(start), Some(end)) => format!("{} .. {}", start, end),
            (Some(start), None) => format!("from {}", start),
            _ => String::new(),
        };
        println!(
            "{}  {}  {}  {}",
            session.name.bold(),
            session.id.dimmed(),
            range,
            session.status.cyan()
        );
    }
    Ok(())
}
