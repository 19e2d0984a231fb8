use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use comfy_table::{Cell, Color};

use crate::cli::format::{clip, format_tokens, new_table};
use crate::usage::{DailyStats, UsageAnalyzer};

/// Render the daily usage report: one table per date, newest first.
pub fn run(root: &Path) -> Result<()> {
    let Some(sessions) = super::load_sessions(root)? else {
        return Ok(());
    };

    let mut analyzer = UsageAnalyzer::new(root);
    let stats = analyzer.daily(&sessions);
    if stats.is_empty() {
        super::print_no_usage_data();
        return Ok(());
    }

    render(&stats);
    println!();
    Ok(())
}

fn render(stats: &[DailyStats]) {
    println!("{}", "Daily Usage Statistics".cyan().bold());

    for day in super::runs_by(stats, |s| s.date.as_str()) {
        println!("\n{}", day[0].date.yellow().bold());

        let mut table = new_table(&["Model", "Input", "Output", "Total", "Messages"]);

        let mut input = 0u64;
        let mut output = 0u64;
        let mut total = 0u64;
        let mut messages = 0usize;

        for stat in day {
            input += stat.input_tokens;
            output += stat.output_tokens;
            total += stat.total_tokens;
            messages += stat.messages;

            table.add_row(vec![
                Cell::new(clip(&stat.model, 43)),
                Cell::new(format_tokens(stat.input_tokens)),
                Cell::new(format_tokens(stat.output_tokens)),
                Cell::new(format_tokens(stat.total_tokens)),
                Cell::new(stat.messages.to_string()),
            ]);
        }

        if day.len() > 1 {
            table.add_row(vec![
                Cell::new("Total").fg(Color::Yellow),
                Cell::new(format_tokens(input)).fg(Color::Yellow),
                Cell::new(format_tokens(output)).fg(Color::Yellow),
                Cell::new(format_tokens(total)).fg(Color::Yellow),
                Cell::new(messages.to_string()).fg(Color::Yellow),
            ]);
        }

        println!("{table}");
    }
}
