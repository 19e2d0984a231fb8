pub mod daily;
pub mod monthly;
pub mod session;

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::usage::{list_sessions, SessionInfo};

/// Shared preamble: enumerate sessions and handle the empty state.
/// Returns `None` when there is nothing to report.
fn load_sessions(root: &Path) -> Result<Option<Vec<SessionInfo>>> {
    println!("{}", "Loading Neovate usage data...".cyan().bold());

    let sessions = list_sessions(root)?;
    if sessions.is_empty() {
        println!("\n{}", "No Neovate sessions found.".yellow());
        println!(
            "{}\n",
            "Make sure you have used Neovate Code before.".dimmed()
        );
        return Ok(None);
    }

    println!("{}\n", format!("Found {} session(s)", sessions.len()).dimmed());
    Ok(Some(sessions))
}

fn print_no_usage_data() {
    println!("\n{}", "No usage data found in sessions.".yellow());
    println!(
        "{}\n",
        "Sessions may not contain any assistant messages with usage data.".dimmed()
    );
}

/// Split a sorted slice into runs of equal keys, preserving order.
/// Stats arrive sorted on their primary key, so each run is one report group.
fn runs_by<T, K>(items: &[T], key: impl Fn(&T) -> &K) -> Vec<&[T]>
where
    K: PartialEq + ?Sized,
{
    let mut groups = Vec::new();
    let mut start = 0;
    for end in 1..=items.len() {
        if end == items.len() || key(&items[end]) != key(&items[start]) {
            groups.push(&items[start..end]);
            start = end;
        }
    }
    groups
}
