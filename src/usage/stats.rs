use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use indexmap::IndexMap;

use super::locator::SessionLocator;
use super::sessions::load_session;
use super::types::{
    DailyStats, MessageRecord, MonthlyReport, MonthlyStats, SessionInfo, SessionStats, TokenUsage,
};

/// Fallback shown when a session has no extractable summary.
const NO_SUMMARY: &str = "No summary available";

/// Runs the three aggregation passes over the session logs under `root`.
///
/// Owns the path cache so every pass resolves sessions through the same
/// single directory walk.
pub struct UsageAnalyzer {
    root: PathBuf,
    locator: SessionLocator,
}

impl UsageAnalyzer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let locator = SessionLocator::new(root.clone());
        Self { root, locator }
    }

    fn load(&mut self, session_id: &str) -> Vec<MessageRecord> {
        let relative = self.locator.resolve(session_id);
        load_session(&self.root.join(relative))
    }

    /// Token usage per (date, model), newest date first.
    pub fn daily(&mut self, sessions: &[SessionInfo]) -> Vec<DailyStats> {
        let mut groups: IndexMap<(String, String), Accum> = IndexMap::new();

        for session in sessions {
            let records = self.load(&session.session_id);
            for c in contributing(&records) {
                let key = (date_of(c.timestamp).to_string(), c.model.to_string());
                groups.entry(key).or_default().add(c.usage);
            }
        }

        let mut stats: Vec<DailyStats> = groups
            .into_iter()
            .map(|((date, model), acc)| DailyStats {
                date,
                model,
                input_tokens: acc.input_tokens,
                output_tokens: acc.output_tokens,
                cache_read_tokens: acc.cache_read_tokens,
                cache_creation_tokens: acc.cache_creation_tokens,
                total_tokens: acc.total_tokens,
                messages: acc.messages,
            })
            .collect();

        // Stable sort keeps first-encounter order for equal dates
        stats.sort_by(|a, b| b.date.cmp(&a.date));
        stats
    }

    /// Token usage per (month, model), newest month first, plus the
    /// distinct-day count per month across all models.
    pub fn monthly(&mut self, sessions: &[SessionInfo]) -> MonthlyReport {
        let mut groups: IndexMap<(String, String), (Accum, HashSet<String>)> = IndexMap::new();
        let mut month_days: HashMap<String, HashSet<String>> = HashMap::new();

        for session in sessions {
            let records = self.load(&session.session_id);
            for c in contributing(&records) {
                let date = date_of(c.timestamp).to_string();
                let month = month_of(&date).to_string();

                let key = (month.clone(), c.model.to_string());
                let entry = groups.entry(key).or_default();
                entry.0.add(c.usage);
                entry.1.insert(date.clone());

                month_days.entry(month).or_default().insert(date);
            }
        }

        let mut stats: Vec<MonthlyStats> = groups
            .into_iter()
            .map(|((month, model), (acc, days))| MonthlyStats {
                month,
                model,
                input_tokens: acc.input_tokens,
                output_tokens: acc.output_tokens,
                cache_read_tokens: acc.cache_read_tokens,
                cache_creation_tokens: acc.cache_creation_tokens,
                total_tokens: acc.total_tokens,
                messages: acc.messages,
                days: days.len(),
            })
            .collect();

        stats.sort_by(|a, b| b.month.cmp(&a.month));

        let month_total_days = month_days
            .into_iter()
            .map(|(month, days)| (month, days.len()))
            .collect();

        MonthlyReport {
            stats,
            month_total_days,
        }
    }

    /// Token usage per (session, model), most recently used first. Sessions
    /// without contributing records emit no rows.
    pub fn by_session(&mut self, sessions: &[SessionInfo]) -> Vec<SessionStats> {
        let mut stats = Vec::new();

        for session in sessions {
            let records = self.load(&session.session_id);

            let mut models: IndexMap<String, (Accum, String)> = IndexMap::new();
            for c in contributing(&records) {
                let entry = models
                    .entry(c.model.to_string())
                    .or_insert_with(|| (Accum::default(), c.timestamp.to_string()));
                entry.0.add(c.usage);
                if c.timestamp > entry.1.as_str() {
                    entry.1 = c.timestamp.to_string();
                }
            }

            for (model, (acc, last_timestamp)) in models {
                stats.push(SessionStats {
                    session_id: session.session_id.clone(),
                    summary: if session.summary.is_empty() {
                        NO_SUMMARY.to_string()
                    } else {
                        session.summary.clone()
                    },
                    model,
                    input_tokens: acc.input_tokens,
                    output_tokens: acc.output_tokens,
                    cache_read_tokens: acc.cache_read_tokens,
                    cache_creation_tokens: acc.cache_creation_tokens,
                    total_tokens: acc.total_tokens,
                    messages: acc.messages,
                    last_used: date_of(&last_timestamp).to_string(),
                });
            }
        }

        stats.sort_by(|a, b| b.last_used.cmp(&a.last_used));
        stats
    }
}

/// One contributing record, as seen by every aggregation pass.
struct Contribution<'a> {
    model: &'a str,
    timestamp: &'a str,
    usage: &'a TokenUsage,
}

/// The single filter shared by all three passes, so every statistic family
/// counts exactly the same records.
fn contributing(records: &[MessageRecord]) -> impl Iterator<Item = Contribution<'_>> {
    records.iter().filter_map(|msg| {
        if !msg.contributes() {
            return None;
        }
        Some(Contribution {
            model: msg.model.as_deref()?,
            timestamp: &msg.timestamp,
            usage: msg.usage.as_ref()?,
        })
    })
}

#[derive(Default)]
struct Accum {
    input_tokens: u64,
    output_tokens: u64,
    cache_read_tokens: u64,
    cache_creation_tokens: u64,
    total_tokens: u64,
    messages: usize,
}

impl Accum {
    fn add(&mut self, usage: &TokenUsage) {
        self.input_tokens += usage.input_tokens;
        self.output_tokens += usage.output_tokens;
        self.cache_read_tokens += usage.cache_read_input_tokens;
        self.cache_creation_tokens += usage.cache_creation_input_tokens;
        self.total_tokens += usage.input_tokens + usage.output_tokens;
        self.messages += 1;
    }
}

/// YYYY-MM-DD prefix of an ISO-8601 timestamp.
fn date_of(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}

/// YYYY-MM prefix of a date.
fn month_of(date: &str) -> &str {
    if date.len() >= 7 && date.is_char_boundary(7) {
        &date[..7]
    } else {
        date
    }
}
