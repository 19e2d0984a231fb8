use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use comfy_table::{Cell, Color};

use crate::cli::format::{clip, format_tokens, new_table};
use crate::usage::{MonthlyReport, UsageAnalyzer};

/// Render the monthly usage report: one table per month, newest first, with
/// the month's distinct-day count in the headline.
pub fn run(root: &Path) -> Result<()> {
    let Some(sessions) = super::load_sessions(root)? else {
        return Ok(());
    };

    let mut analyzer = UsageAnalyzer::new(root);
    let report = analyzer.monthly(&sessions);
    if report.stats.is_empty() {
        super::print_no_usage_data();
        return Ok(());
    }

    render(&report);
    println!();
    Ok(())
}

fn render(report: &MonthlyReport) {
    println!("{}", "Monthly Usage Statistics".cyan().bold());

    for month in super::runs_by(&report.stats, |s| s.month.as_str()) {
        let total_days = report
            .month_total_days
            .get(&month[0].month)
            .copied()
            .unwrap_or(0);
        println!(
            "\n{}",
            format!("{} ({} days)", month[0].month, total_days)
                .yellow()
                .bold()
        );

        let mut table = new_table(&["Model", "Input", "Output", "Total", "Messages", "Days"]);

        let mut input = 0u64;
        let mut output = 0u64;
        let mut total = 0u64;
        let mut messages = 0usize;

        for stat in month {
            input += stat.input_tokens;
            output += stat.output_tokens;
            total += stat.total_tokens;
            messages += stat.messages;

            table.add_row(vec![
                Cell::new(clip(&stat.model, 38)),
                Cell::new(format_tokens(stat.input_tokens)),
                Cell::new(format_tokens(stat.output_tokens)),
                Cell::new(format_tokens(stat.total_tokens)),
                Cell::new(stat.messages.to_string()),
                Cell::new(stat.days.to_string()),
            ]);
        }

        if month.len() > 1 {
            table.add_row(vec![
                Cell::new("Total").fg(Color::Yellow),
                Cell::new(format_tokens(input)).fg(Color::Yellow),
                Cell::new(format_tokens(output)).fg(Color::Yellow),
                Cell::new(format_tokens(total)).fg(Color::Yellow),
                Cell::new(messages.to_string()).fg(Color::Yellow),
                Cell::new(total_days.to_string()).fg(Color::Yellow),
            ]);
        }

        println!("{table}");
    }
}
