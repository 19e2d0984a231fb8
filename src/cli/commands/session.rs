use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use comfy_table::Cell;

use crate::cli::format::{clip, format_tokens, new_table};
use crate::usage::{SessionStats, UsageAnalyzer};

/// Render the per-session usage report: one row per (session, model),
/// most recently used first.
pub fn run(root: &Path) -> Result<()> {
    let Some(sessions) = super::load_sessions(root)? else {
        return Ok(());
    };

    let mut analyzer = UsageAnalyzer::new(root);
    let stats = analyzer.by_session(&sessions);
    if stats.is_empty() {
        super::print_no_usage_data();
        return Ok(());
    }

    render(&stats);
    println!();
    Ok(())
}

fn render(stats: &[SessionStats]) {
    println!("{}\n", "Session Usage Statistics".cyan().bold());

    let mut table = new_table(&[
        "Last Used",
        "Session",
        "Model",
        "Input",
        "Output",
        "Total",
        "Messages",
    ]);

    for stat in stats {
        table.add_row(vec![
            Cell::new(&stat.last_used),
            Cell::new(clip(&stat.summary, 33)),
            Cell::new(clip(&stat.model, 28)),
            Cell::new(format_tokens(stat.input_tokens)),
            Cell::new(format_tokens(stat.output_tokens)),
            Cell::new(format_tokens(stat.total_tokens)),
            Cell::new(stat.messages.to_string()),
        ]);
    }

    println!("{table}");

    let unique_sessions: HashSet<&str> = stats.iter().map(|s| s.session_id.as_str()).collect();
    let total_messages: usize = stats.iter().map(|s| s.messages).sum();
    let total_tokens: u64 = stats.iter().map(|s| s.total_tokens).sum();

    println!(
        "\n{}",
        format!(
            "Total: {} sessions, {} messages, {} tokens",
            unique_sessions.len(),
            total_messages,
            format_tokens(total_tokens)
        )
        .dimmed()
    );
}
