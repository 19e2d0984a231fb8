use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// One decoded line of a session transcript.
///
/// Logs are append-only and may be truncated mid-write, so decoding is
/// best-effort: lines with an unknown `type` or invalid JSON simply fail to
/// decode and are skipped by callers.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum LogRecord {
    #[serde(rename = "config")]
    Config(ConfigRecord),
    #[serde(rename = "message")]
    Message(MessageRecord),
}

impl LogRecord {
    /// Decode a single transcript line. Empty and malformed lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        serde_json::from_str(line).ok()
    }
}

/// Session-level configuration entry, optionally carrying a summary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigRecord {
    #[serde(default)]
    pub config: Option<ConfigPayload>,
}

impl ConfigRecord {
    pub fn summary(&self) -> Option<&str> {
        self.config.as_ref()?.summary.as_deref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigPayload {
    #[serde(default)]
    pub summary: Option<String>,
}

/// A single conversation message entry.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageRecord {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: serde_json::Value,
    /// ISO-8601 timestamp; fixed-width fields make lexicographic order
    /// chronological, so it is kept as a string.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

impl MessageRecord {
    /// A record counts toward usage statistics only when it was produced by
    /// the assistant with a known model and carries usage counters.
    pub fn contributes(&self) -> bool {
        self.role == "assistant" && self.model.is_some() && self.usage.is_some()
    }
}

/// Token counters attached to an assistant message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default)]
    pub cache_read_input_tokens: u64,
    #[serde(default)]
    pub cache_creation_input_tokens: u64,
}

/// Lightweight descriptor for one session log file.
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub session_id: String,
    /// File modification time; used only to order session listings.
    pub modified: DateTime<Utc>,
    /// Raw count of non-empty lines, valid or not.
    pub message_count: usize,
    pub summary: String,
}

/// Token usage aggregated per (date, model).
#[derive(Debug, Clone, Serialize)]
pub struct DailyStats {
    pub date: String,
    pub model: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_read_tokens: u64,
    pub cache_creation_tokens: u64,
    /// Input + output only; cache tokens are excluded.
    pub total_tokens: u64,
    pub messages: usize,
}

/// Token usage aggregated per (month, model).
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyStats {
    /// YYYY-MM
    pub month: String,
    pub model: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_read_tokens: u64,
    pub cache_creation_tokens: u64,
    pub total_tokens: u64,
    pub messages: usize,
    /// Distinct dates this model was used within the month.
    pub days: usize,
}

/// Monthly stats plus the distinct-day count per month across all models.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    pub stats: Vec<MonthlyStats>,
    pub month_total_days: HashMap<String, usize>,
}

/// Token usage aggregated per (session, model).
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub session_id: String,
    pub summary: String,
    pub model: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_read_tokens: u64,
    pub cache_creation_tokens: u64,
    pub total_tokens: u64,
    pub messages: usize,
    /// Date portion of the most recent contributing timestamp.
    pub last_used: String,
}
