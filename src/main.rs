mod cli;
mod error;
mod usage;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

#[derive(Parser)]
#[command(name = "neousage")]
#[command(version)]
#[command(about = "Analyze Neovate Code usage statistics")]
struct Cli {
    /// Session log directory (default: ~/.neovate/projects)
    #[arg(short = 'd', long = "dir", env = "NEOUSAGE_DIR", global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show daily token usage (default)
    Daily,
    /// Show monthly aggregated report
    Monthly,
    /// Show usage by conversation session
    Session,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("\n{} {}", "Error:".red().bold(), err);
        eprintln!("{}\n", "Use --help for usage information.".dimmed());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let root = match cli.dir {
        Some(dir) => dir,
        None => usage::default_log_root().context("Could not determine home directory")?,
    };

    match cli.command.unwrap_or(Commands::Daily) {
        Commands::Daily => cli::commands::daily::run(&root),
        Commands::Monthly => cli::commands::monthly::run(&root),
        Commands::Session => cli::commands::session::run(&root),
    }
}
