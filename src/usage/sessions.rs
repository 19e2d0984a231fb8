use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::{Result, UsageError};

use super::types::{LogRecord, MessageRecord, SessionInfo};

/// Session summaries are clipped to this many characters.
pub const SUMMARY_MAX_LEN: usize = 50;

/// Enumerate all session logs under `root`, most recently modified first.
///
/// A missing root is "no data", not an error. A root that exists but cannot
/// be read as a directory is a setup problem and surfaces as a hard failure.
/// Problems with individual files never abort the listing.
pub fn list_sessions(root: &Path) -> Result<Vec<SessionInfo>> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(root).map_err(|source| UsageError::DirectoryAccess {
        path: root.to_path_buf(),
        source,
    })?;

    let mut sessions = Vec::new();
    collect_entries(entries, &mut sessions);

    // Stable sort: sessions modified at the same instant keep traversal order
    sessions.sort_by(|a, b| b.modified.cmp(&a.modified));
    Ok(sessions)
}

fn collect_entries(entries: fs::ReadDir, sessions: &mut Vec<SessionInfo>) {
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if let Ok(sub) = fs::read_dir(&path) {
                collect_entries(sub, sessions);
            }
        } else if path.extension().and_then(|e| e.to_str()) == Some("jsonl") {
            if let Some(info) = read_session_info(&path) {
                sessions.push(info);
            }
        }
    }
}

fn read_session_info(path: &Path) -> Option<SessionInfo> {
    let session_id = path.file_stem()?.to_str()?.to_string();

    let modified = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_default();

    // An unreadable file still gets a descriptor, just an empty one
    let (message_count, summary) = match fs::read_to_string(path) {
        Ok(content) => {
            let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
            (lines.len(), extract_summary(&lines))
        }
        Err(_) => (0, String::new()),
    };

    Some(SessionInfo {
        session_id,
        modified,
        message_count,
        summary,
    })
}

/// Summary policy: a leading config record's summary wins; otherwise the
/// first user message with string content; otherwise empty.
fn extract_summary(lines: &[&str]) -> String {
    let Some(first) = lines.first() else {
        return String::new();
    };

    if let Some(LogRecord::Config(config)) = LogRecord::parse(first) {
        if let Some(summary) = config.summary() {
            return truncate_summary(summary);
        }
    }

    for line in lines {
        if let Some(LogRecord::Message(msg)) = LogRecord::parse(line) {
            if msg.role == "user" {
                if let Some(text) = msg.content.as_str() {
                    return truncate_summary(text);
                }
            }
        }
    }

    String::new()
}

fn truncate_summary(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(SUMMARY_MAX_LEN).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Load every `message` record from a session file.
///
/// A missing file yields an empty list so that stale descriptors and locator
/// misses degrade gracefully. Malformed lines are skipped.
pub fn load_session(path: &Path) -> Vec<MessageRecord> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };

    content
        .lines()
        .filter_map(LogRecord::parse)
        .filter_map(|record| match record {
            LogRecord::Message(msg) => Some(msg),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    fn write_session(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(format!("{}.jsonl", name));
        fs::write(&path, lines.join("\n")).unwrap();
        path
    }

    #[test]
    fn test_missing_root_is_empty() {
        let sessions = list_sessions(Path::new("/nonexistent/neousage-test-root")).unwrap();
        assert!(sessions.is_empty());
    }

    #[test]
    fn test_root_not_a_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, "x").unwrap();
        assert!(list_sessions(&file).is_err());
    }

    #[test]
    fn test_summary_from_config_record() {
        let dir = tempfile::tempdir().unwrap();
        write_session(
            dir.path(),
            "s1",
            &[r#"{"type":"config","config":{"summary":"Fix the bug"}}"#],
        );

        let sessions = list_sessions(dir.path()).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].session_id, "s1");
        assert_eq!(sessions[0].summary, "Fix the bug");
        assert_eq!(sessions[0].message_count, 1);
    }

    #[test]
    fn test_summary_falls_back_to_first_user_message() {
        let dir = tempfile::tempdir().unwrap();
        write_session(
            dir.path(),
            "s1",
            &[
                r#"{"type":"message","role":"assistant","content":"hi","timestamp":"2024-01-01T10:00:00Z"}"#,
                r#"{"type":"message","role":"user","content":"Hello there","timestamp":"2024-01-01T10:00:01Z"}"#,
            ],
        );

        let sessions = list_sessions(dir.path()).unwrap();
        assert_eq!(sessions[0].summary, "Hello there");
    }

    #[test]
    fn test_summary_truncated_with_ellipsis() {
        let dir = tempfile::tempdir().unwrap();
        let long = "x".repeat(80);
        let line = format!(
            r#"{{"type":"message","role":"user","content":"{}","timestamp":"2024-01-01T10:00:00Z"}}"#,
            long
        );
        write_session(dir.path(), "s1", &[&line]);

        let sessions = list_sessions(dir.path()).unwrap();
        assert_eq!(sessions[0].summary, format!("{}...", "x".repeat(50)));
    }

    #[test]
    fn test_message_count_includes_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        write_session(
            dir.path(),
            "s1",
            &[
                r#"{"type":"message","role":"user","content":"one","timestamp":"2024-01-01T10:00:00Z"}"#,
                "this is not json",
                r#"{"type":"message","role":"assistant","content":"two","timestamp":"2024-01-01T10:00:02Z"}"#,
                "",
            ],
        );

        let sessions = list_sessions(dir.path()).unwrap();
        // Raw line count, excluding the trailing blank
        assert_eq!(sessions[0].message_count, 3);
    }

    #[test]
    fn test_sessions_sorted_by_mtime_descending() {
        let dir = tempfile::tempdir().unwrap();
        let older = write_session(dir.path(), "older", &["{}"]);
        let newer = write_session(dir.path(), "newer", &["{}"]);

        let base = SystemTime::now();
        File::options()
            .write(true)
            .open(&older)
            .unwrap()
            .set_modified(base - Duration::from_secs(3600))
            .unwrap();
        File::options()
            .write(true)
            .open(&newer)
            .unwrap()
            .set_modified(base)
            .unwrap();

        let sessions = list_sessions(dir.path()).unwrap();
        let ids: Vec<&str> = sessions.iter().map(|s| s.session_id.as_str()).collect();
        assert_eq!(ids, vec!["newer", "older"]);
    }

    #[test]
    fn test_load_session_skips_non_message_and_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_session(
            dir.path(),
            "s1",
            &[
                r#"{"type":"config","config":{"summary":"s"}}"#,
                r#"{"type":"message","role":"user","content":"q","timestamp":"2024-01-01T10:00:00Z"}"#,
                "garbage",
                r#"{"type":"message","role":"assistant","content":"a","timestamp":"2024-01-01T10:00:01Z","model":"m","usage":{"input_tokens":1,"output_tokens":1}}"#,
            ],
        );

        let records = load_session(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].role, "user");
        assert_eq!(records[1].role, "assistant");
    }

    #[test]
    fn test_load_session_missing_file_is_empty() {
        assert!(load_session(Path::new("/nonexistent/nope.jsonl")).is_empty());
    }
}
