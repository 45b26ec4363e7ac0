use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Wrong attempts kept per line before further ones are dropped
pub const MAX_ATTEMPTS_PER_LINE: usize = 3;

/// Records used by [`Document::recent_average`] unless told otherwise
pub const DEFAULT_AVERAGE_WINDOW: usize = 3;

/// Wrong attempts keyed by 1-based line number.
///
/// Serialized as a JSON object with stringified line numbers as keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MistakeLog(BTreeMap<usize, Vec<String>>);

impl MistakeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log a wrong attempt for `line`. Returns false once the line holds
    /// [`MAX_ATTEMPTS_PER_LINE`] attempts; the attempt is dropped then.
    pub fn record(&mut self, line: usize, attempt: &str) -> bool {
        let attempts = self.0.entry(line).or_default();
        if attempts.len() < MAX_ATTEMPTS_PER_LINE {
            attempts.push(attempt.to_string());
            true
        } else {
            false
        }
    }

    pub fn clear_line(&mut self, line: usize) {
        self.0.remove(&line);
    }

    pub fn attempts(&self, line: usize) -> &[String] {
        self.0.get(&line).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_line(&self, line: usize) -> bool {
        self.0.contains_key(&line)
    }

    /// Line numbers in ascending order with their attempts
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.0.iter().map(|(line, attempts)| (*line, attempts.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of lines with at least one logged attempt
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Snapshot of one completed practice pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRecord {
    pub timestamp: DateTime<Utc>,
    pub mistake_count: u32,
    pub hint_count: u32,
    pub session_mistakes: MistakeLog,
}

impl StatsRecord {
    pub fn new(mistake_count: u32, hint_count: u32, session_mistakes: MistakeLog) -> Self {
        Self {
            timestamp: Utc::now(),
            mistake_count,
            hint_count,
            session_mistakes,
        }
    }

    pub fn value(&self, field: StatsField) -> u32 {
        match field {
            StatsField::MistakeCount => self.mistake_count,
            StatsField::HintCount => self.hint_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum StatsField {
    #[strum(serialize = "mistakes")]
    MistakeCount,
    #[strum(serialize = "hints")]
    HintCount,
}

/// A saved reference text with its practice history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Newest first
    #[serde(rename = "stats", default)]
    pub stats_history: Vec<StatsRecord>,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            created_at: Utc::now(),
            stats_history: Vec::new(),
        }
    }

    /// Mean of `field` over the `n` newest records, rounded to two decimals.
    /// Zero when there is no history.
    pub fn recent_average(&self, field: StatsField, n: usize) -> f64 {
        let values: Vec<f64> = self
            .stats_history
            .iter()
            .take(n)
            .map(|record| f64::from(record.value(field)))
            .collect();
        crate::util::mean(&values)
            .map(crate::util::round2)
            .unwrap_or(0.0)
    }

    /// How many past sessions logged a wrong attempt on `line` (1-based)
    pub fn mistake_frequency(&self, line: usize) -> usize {
        self.stats_history
            .iter()
            .filter(|record| record.session_mistakes.contains_line(line))
            .count()
    }
}
