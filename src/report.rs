use std::fmt::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::warn;

use crate::models::{AttendanceStatus, HistoryEntry, WeightedResult};

#[derive(Debug, Clone, PartialEq)]
pub struct StatusSummary {
    pub status: AttendanceStatus,
    pub count: usize,
    pub avg_percentage: f64,
}

/// Default file name for a subject report.
pub fn report_file_name(subject: &str) -> PathBuf {
    let subject = subject.trim();
    let stem = if subject.is_empty() { "attendance" } else { subject };
    PathBuf::from(format!("{stem}-report.md"))
}

pub fn build_report(subject: &str, result: &WeightedResult) -> String {
    let mut output = String::new();
    let subject = subject.trim();
    let subject_label = if subject.is_empty() { "N/A" } else { subject };

    let _ = writeln!(output, "# Attendance Report");
    let _ = writeln!(output);
    let _ = writeln!(output, "Subject: {subject_label}");
    let _ = writeln!(output, "Overall Attendance: {}%", result.percentage);
    let _ = writeln!(output, "Status: {}", result.status);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Component Analysis");

    if result.breakdown.is_empty() {
        let _ = writeln!(output, "No components above 0%.");
    } else {
        for line in result.breakdown.iter() {
            let _ = writeln!(output, "- {line}");
        }
    }

    output
}

pub fn summarize_by_status(entries: &[HistoryEntry]) -> Vec<StatusSummary> {
    let mut summaries: Vec<StatusSummary> = Vec::new();

    for entry in entries {
        let percentage = match entry.percentage.parse::<f64>() {
            Ok(percentage) => percentage,
            Err(err) => {
                warn!(
                    subject = %entry.subject_label,
                    percentage = %entry.percentage,
                    error = %err,
                    "skipping history entry with unreadable percentage"
                );
                continue;
            }
        };
        match summaries.iter_mut().find(|s| s.status == entry.status) {
            Some(summary) => {
                summary.avg_percentage += percentage;
                summary.count += 1;
            }
            None => summaries.push(StatusSummary {
                status: entry.status,
                count: 1,
                avg_percentage: percentage,
            }),
        }
    }

    for summary in summaries.iter_mut() {
        summary.avg_percentage /= summary.count as f64;
    }

    summaries.sort_by(|a, b| b.count.cmp(&a.count));
    summaries
}

pub fn build_history_report(entries: &[HistoryEntry], limit: usize) -> String {
    let summaries = summarize_by_status(entries);
    let mut output = String::new();

    let _ = writeln!(output, "# L-T-P-S History Report");
    let _ = writeln!(output, "{} saved calculations", entries.len());
    let _ = writeln!(output);
    let _ = writeln!(output, "## Status Mix");

    if summaries.is_empty() {
        let _ = writeln!(output, "No calculations saved yet.");
    } else {
        for summary in summaries.iter() {
            let _ = writeln!(
                output,
                "- {}: {} calculations (avg {:.2}%)",
                summary.status, summary.count, summary.avg_percentage
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Calculations");

    if entries.is_empty() {
        let _ = writeln!(output, "No calculations saved yet.");
    } else {
        for entry in entries.iter().take(limit) {
            let _ = writeln!(
                output,
                "- {} on {}: {}% ({})",
                entry.subject_label, entry.timestamp_display, entry.percentage, entry.status
            );
        }
    }

    output
}

pub fn write_history_csv<W: std::io::Write>(
    writer: W,
    entries: &[HistoryEntry],
) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record([
        "subject",
        "percentage",
        "status",
        "timestamp",
        "lecture",
        "tutorial",
        "practical",
        "skilling",
    ])?;

    for entry in entries {
        csv.write_record([
            entry.subject_label.clone(),
            entry.percentage.clone(),
            entry.status.to_string(),
            entry.timestamp_display.clone(),
            entry.components.lecture.to_string(),
            entry.components.tutorial.to_string(),
            entry.components.practical.to_string(),
            entry.components.skilling.to_string(),
        ])?;
    }

    csv.flush().context("failed to flush CSV output")?;
    Ok(())
}

pub fn export_history_csv(path: &Path, entries: &[HistoryEntry]) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_history_csv(file, entries)
}
