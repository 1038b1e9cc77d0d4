//! Console rendering of an aggregation report.

use colored::{ColoredString, Colorize};
use okra_core::model::{AggregationReport, KeyResult, Objective, StatusCategory};
use std::fmt::Write;

/// Renders the report as an indented, colored outline plus totals.
pub fn summary(report: &AggregationReport) -> String {
    let mut out = String::new();
    let summary = &report.summary;

    let sessions: Vec<&str> = report.sessions.iter().map(|s| s.name.as_str()).collect();
    let _ = writeln!(out, "{} {}", "OKR summary:".bold(), sessions.join(", "));
    let _ = writeln!(
        out,
        "{}",
        format!(
            "run {} via {} path, {} request(s) in {}ms",
            report.run_id, report.path, report.stats.requests_issued, report.stats.elapsed_ms
        )
        .dimmed()
    );
    out.push('\n');

    for objective in &report.objectives {
        write_objective(&mut out, objective);
    }
    if !report.unassociated_key_result_ids.is_empty() {
        let _ = writeln!(
            out,
            "{} {}",
            "Unattached key results:".yellow(),
            report.unassociated_key_result_ids.join(", ")
        );
    }

    out.push('\n');
    let _ = writeln!(
        out,
        "{} {}  {} {}  {} {}",
        "Overall progress:".bold(),
        progress(summary.overall_progress),
        "Objectives:".bold(),
        summary.total_objectives,
        "Key results:".bold(),
        summary.total_key_results
    );

    let counts: Vec<String> = summary
        .status_counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(status, count)| format!("{} {}", status_label(*status), count))
        .collect();
    if !counts.is_empty() {
        let _ = writeln!(out, "{} {}", "Status:".bold(), counts.join("  "));
    }
    let _ = writeln!(
        out,
        "{} {}",
        "Updated recently:".bold(),
        summary.recent_updates_count
    );
    if let Some(stats) = &summary.hierarchy_stats {
        let _ = writeln!(
            out,
            "{} {} root(s), {} leaf(s), {} orphan(s), depth {}",
            "Hierarchy:".bold(),
            stats.root_count,
            stats.leaf_count,
            stats.orphan_count,
            stats.max_depth
        );
    }
    if report.stats.failed_items > 0 {
        let _ = writeln!(
            out,
            "{}",
            format!("{} item(s) skipped; see log", report.stats.failed_items).yellow()
        );
    }
    out
}

fn write_objective(out: &mut String, objective: &Objective) {
    let indent = "  ".repeat(objective.level);
    let mut marker = String::new();
    if objective.is_orphan {
        marker.push_str(" (orphan)");
    }
    if objective.cycle_break {
        marker.push_str(" (cycle)");
    }
    let _ = writeln!(
        out,
        "{}{} {} {} {} {}{}",
        indent,
        objective.hierarchical_index.bold(),
        objective.name,
        objective.sparkline,
        progress(objective.progress),
        objective.owner_name.dimmed(),
        marker.yellow()
    );
    for kr in &objective.key_results {
        write_key_result(out, &indent, kr);
    }
}

fn write_key_result(out: &mut String, indent: &str, kr: &KeyResult) {
    let _ = writeln!(
        out,
        "{}    - {} {} {} {} {}",
        indent,
        kr.name,
        kr.sparkline,
        progress(kr.progress),
        status_label(StatusCategory::normalize(&kr.status)),
        kr.owner_name.dimmed()
    );
}

fn progress(value: f64) -> ColoredString {
    let text = format!("{:.0}%", value);
    match value {
        v if v >= 70.0 => text.green(),
        v if v >= 40.0 => text.yellow(),
        _ => text.red(),
    }
}

fn status_label(status: StatusCategory) -> ColoredString {
    let label = status.to_string();
    match status {
        StatusCategory::OnTrack | StatusCategory::Completed => label.green(),
        StatusCategory::AtRisk => label.yellow(),
        StatusCategory::OffTrack => label.red(),
        StatusCategory::NotStarted | StatusCategory::Unknown => label.dimmed(),
    }
}
