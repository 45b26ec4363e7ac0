//! Plain-text renderings of mistake logs and practice history

use crate::document::{Document, MistakeLog, StatsField, DEFAULT_AVERAGE_WINDOW};
use crate::error::Result;
use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::Serialize;
use std::io;
use time_humanize::HumanTime;

/// Timestamp layout used in history listings
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render wrong attempts grouped by line, lines in ascending order.
///
/// `lines` supplies the correct text for each 1-based line number; numbers
/// outside it are listed without one.
pub fn format_mistakes(mistakes: &MistakeLog, lines: &[String]) -> String {
    if mistakes.is_empty() {
        return "No mistakes recorded.".to_string();
    }

    mistakes
        .iter()
        .map(|(line, attempts)| {
            let header = match line.checked_sub(1).and_then(|idx| lines.get(idx)) {
                Some(expected) => format!("Line {line}: {expected}"),
                None => format!("Line {line}"),
            };
            std::iter::once(header)
                .chain(
                    attempts
                        .iter()
                        .enumerate()
                        .map(|(n, attempt)| format!("  Attempt {}: {attempt}", n + 1)),
                )
                .join("\n")
        })
        .join("\n\n")
}

/// Render a document's stats history, newest round first.
pub fn format_history(document: &Document) -> String {
    if document.stats_history.is_empty() {
        return format!("{}\nNo practice history yet.", document.name);
    }

    let rounds = document
        .stats_history
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let header = format!(
                "Round {} - {}\n  Mistakes: {}, hints: {}",
                idx + 1,
                record.timestamp.format(TIMESTAMP_FORMAT),
                record.mistake_count,
                record.hint_count
            );
            std::iter::once(header)
                .chain(
                    record
                        .session_mistakes
                        .iter()
                        .map(|(line, attempts)| format!("  Line {line}: {} wrong", attempts.len())),
                )
                .join("\n")
        })
        .join("\n\n");

    format!("{}\n\n{rounds}", document.name)
}

#[derive(Debug, Serialize)]
struct HistoryRow<'a> {
    round: usize,
    timestamp: String,
    mistakes: u32,
    hints: u32,
    lines_with_mistakes: String,
    wrong_attempts: &'a str,
}

/// Write a document's history as CSV, one row per round, newest first.
/// Wrong attempts of a round are joined with " | ".
pub fn write_history_csv<W: io::Write>(document: &Document, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for (idx, record) in document.stats_history.iter().enumerate() {
        let attempts = record
            .session_mistakes
            .iter()
            .flat_map(|(_, attempts)| attempts.iter())
            .join(" | ");
        writer.serialize(HistoryRow {
            round: idx + 1,
            timestamp: record.timestamp.to_rfc3339(),
            mistakes: record.mistake_count,
            hints: record.hint_count,
            lines_with_mistakes: record.session_mistakes.iter().map(|(line, _)| line).join(" "),
            wrong_attempts: &attempts,
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// One line per saved document: name, age and recent averages
pub fn format_document_list(documents: &[Document], now: DateTime<Utc>) -> String {
    if documents.is_empty() {
        return "No saved documents.".to_string();
    }

    documents
        .iter()
        .enumerate()
        .map(|(idx, doc)| {
            let age_secs = (now - doc.created_at).num_seconds().max(0);
            format!(
                "{:>2}. {} (created {}) - recent avg {}: {:.2}, {}: {:.2}",
                idx + 1,
                doc.name,
                HumanTime::from_seconds(-age_secs),
                StatsField::MistakeCount,
                doc.recent_average(StatsField::MistakeCount, DEFAULT_AVERAGE_WINDOW),
                StatsField::HintCount,
                doc.recent_average(StatsField::HintCount, DEFAULT_AVERAGE_WINDOW),
            )
        })
        .join("\n")
}
