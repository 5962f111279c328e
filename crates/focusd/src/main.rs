//! focusd - time-boxed focus sessions that suspend distracting processes
//!
//! "Protect the sacred space of deep work."
//!
//! Usage:
//!   focusd start [MINS]         Run a focus session (default: 25 mins)
//!   focusd processes            List running blacklist matches
//!   focusd stats                Show lifetime statistics
//!   focusd blacklist            Show the active blacklist

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use focusd::blacklist::Blacklist;
use focusd::engine::FocusEngine;
use focusd::stats::{StatsOrigin, StatsStore};
use focusd_core::{Paths, ProcessSnapshot, SystemProcesses};

/// focusd - suspend distracting processes for the length of a focus session
#[derive(Parser)]
#[command(name = "focusd")]
#[command(about = "Time-boxed focus sessions that suspend distracting processes")]
#[command(version)]
#[command(after_help = r#"HOW IT WORKS:
    'focusd start' scans the process table, suspends (SIGSTOP) every process
    whose name matches the blacklist, and keeps rescanning every few seconds
    to catch newly launched distractions. When the timer runs out or you
    press Ctrl-C, everything is resumed (SIGCONT) and statistics are saved.

CONFIGURATION:
    Blacklist: ~/.config/focusd/blacklist.txt, one lowercase pattern per
    line (substring match). Without the file a built-in list of common
    distraction apps is used.

EXAMPLES:
    focusd start                # 25-minute session
    focusd start 90             # 90-minute deep work session
    focusd processes            # See what would be blocked right now
    focusd stats                # Lifetime totals

ALIASES:
    focusd s      # start
    focusd ps     # processes
    focusd bl     # blacklist
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a focus session in the foreground
    #[command(alias = "s")]
    Start {
        /// Duration in minutes (1-240)
        #[arg(value_name = "MINS", default_value = "25")]
        duration: u64,
    },

    /// List currently running processes that match the blacklist
    #[command(alias = "ps")]
    Processes,

    /// Show lifetime focus statistics
    #[command(alias = "statistics")]
    Stats,

    /// Show the active blacklist
    #[command(alias = "bl")]
    Blacklist,
}

// ANSI color codes
const GREEN: &str = "\x1b[0;32m";
const CYAN: &str = "\x1b[0;36m";
const MAGENTA: &str = "\x1b[0;35m";
const BOLD: &str = "\x1b[1m";
const NC: &str = "\x1b[0m";

/// Check if stdout is a TTY and colors should be used
fn use_colors() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stdout())
}

/// Conditionally apply color
fn color(code: &str, text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", code, text, NC)
    } else {
        text.to_string()
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let paths = Paths::new();

    // Run the async runtime for commands that need it
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        match cli.command {
            Commands::Start { duration } => cmd_start(&paths, duration).await,
            Commands::Processes => cmd_processes(&paths),
            Commands::Stats => cmd_stats(&paths),
            Commands::Blacklist => cmd_blacklist(&paths),
        }
    })
}

/// Run a focus session until it times out or Ctrl-C stops it
async fn cmd_start(paths: &Paths, duration: u64) -> Result<()> {
    let blacklist = Blacklist::load(&paths.blacklist_file());
    let store = StatsStore::new(paths.stats_file());
    let engine = Arc::new(FocusEngine::new(
        blacklist,
        store,
        Box::new(SystemProcesses::new()),
    ));

    let end_time: DateTime<Local> =
        (Utc::now() + chrono::Duration::minutes(duration as i64)).into();

    println!("{}", color(&format!("{}{}", BOLD, MAGENTA), "FOCUS MODE"));
    println!();
    println!("  {}  {} minutes", color(CYAN, "Duration:"), duration);
    println!("  {}   {}", color(CYAN, "Ends at:"), end_time.format("%H:%M"));
    println!();
    println!("Press Ctrl-C to end the session early");

    // Ctrl-C requests a cooperative stop; the engine resumes every suspended
    // process before start_session returns.
    let watcher = tokio::spawn({
        let engine = engine.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = engine.stop_session();
            }
        }
    });

    let summary = engine.start_session(duration).await?;
    watcher.abort();

    let stats = engine.stats();
    println!();
    if summary.cancelled {
        println!("{} Focus session stopped early", color(CYAN, "[info]"));
    } else {
        println!("{} Focus session completed", color(GREEN, "[ok]"));
    }
    println!();
    println!(
        "  {}        {:.1} minutes",
        color(CYAN, "Duration:"),
        summary.elapsed_minutes
    );
    println!("  {} {}", color(CYAN, "Blocked this run:"), summary.blocked);
    println!("  {}  {}", color(CYAN, "Total sessions:"), stats.total_sessions);
    println!(
        "  {}     {}h {}m",
        color(CYAN, "Total focus:"),
        stats.total_minutes / 60,
        stats.total_minutes % 60
    );

    Ok(())
}

/// List running processes the blacklist would match right now
fn cmd_processes(paths: &Paths) -> Result<()> {
    let blacklist = Blacklist::load(&paths.blacklist_file());
    let host = SystemProcesses::new();

    let mut matches: Vec<_> = host
        .processes()
        .into_iter()
        .filter(|p| blacklist.is_blacklisted(&p.name))
        .collect();
    matches.sort_by_key(|p| p.pid);

    if matches.is_empty() {
        println!("No distracting processes running");
        return Ok(());
    }

    println!(
        "{}",
        color(BOLD, &format!("{:<10} {:<30} {:<10}", "PID", "NAME", "STATUS"))
    );
    for proc in matches {
        println!(
            "{:<10} {:<30} {:<10}",
            proc.pid,
            proc.name,
            proc.status.as_str()
        );
    }

    Ok(())
}

/// Show lifetime statistics
fn cmd_stats(paths: &Paths) -> Result<()> {
    let mut store = StatsStore::new(paths.stats_file());
    let stats = store.load();

    println!("{}", color(BOLD, "Focus Statistics"));
    println!();
    println!(
        "  {}     {}",
        color(CYAN, "Total Sessions:"),
        stats.total_sessions
    );
    println!(
        "  {}   {}h {}m",
        color(CYAN, "Total Focus Time:"),
        stats.total_minutes / 60,
        stats.total_minutes % 60
    );
    println!(
        "  {}  {}",
        color(CYAN, "Processes Blocked:"),
        stats.processes_blocked
    );

    if store.origin() == StatsOrigin::Corrupt {
        println!();
        println!(
            "{} stats file was unreadable; counters restart from zero",
            color(CYAN, "[warn]")
        );
    }

    Ok(())
}

/// Show the active blacklist
fn cmd_blacklist(paths: &Paths) -> Result<()> {
    let path = paths.blacklist_file();
    let blacklist = Blacklist::load(&path);

    if path.exists() {
        println!("Blacklist from {}", path.display());
    } else {
        println!("Built-in default blacklist (create {} to override)", path.display());
    }
    println!();
    for entry in blacklist.entries() {
        println!("  {}", entry);
    }

    Ok(())
}
