//! branch-compare - list the branches the compare sidebar would offer

use anyhow::{Context, Result};
use branch_compare::compare::{branch_candidates, placeholder_text};
use branch_compare::config::Config;
use branch_compare::model::{
    Branch, BranchesState, CompareState, Repository, RepositoryState, TipState,
};
use branch_compare::tui::Session;
use clap::{CommandFactory, Parser};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Show which branches a repository can be compared against
#[derive(Parser)]
#[command(name = "branch-compare")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Repository to inspect (defaults to the current directory)
    #[arg(long, short = 'C')]
    repo: Option<PathBuf>,

    /// Only list branches whose name contains this text
    #[arg(long, short)]
    filter: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Open the sidebar in the terminal and log the commands it issues
    #[arg(long, short, conflicts_with_all = ["json", "filter"])]
    interactive: bool,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    repository: String,
    tip: String,
    current_branch: Option<&'a str>,
    default_branch: Option<&'a str>,
    placeholder: &'a str,
    recent: Vec<&'a Branch>,
    branches: Vec<&'a Branch>,
}

fn main() -> Result<()> {
    // Log to the temp dir - tail with: tail -f /tmp/branch-compare.log
    // Set DEBUG=0-3 to control verbosity (0=off, 1=warn, 2=info, 3=debug)
    let debug_level = std::env::var("DEBUG")
        .ok()
        .and_then(|v| v.parse::<u8>().ok())
        .unwrap_or(0);

    if debug_level > 0 {
        let level = match debug_level {
            1 => tracing::Level::WARN,
            2 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        };

        let log_path = branch_compare::paths::log_path();
        let log_dir = log_path
            .parent()
            .map_or_else(std::env::temp_dir, std::path::Path::to_path_buf);
        let file_appender = tracing_appender::rolling::never(log_dir, "branch-compare.log");
        tracing_subscriber::fmt()
            .with_writer(file_appender)
            .with_max_level(level)
            .with_ansi(false)
            .init();
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Let --help and --version exit normally
            if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion
            {
                e.exit();
            }
            eprintln!("error: {}\n", e.kind());
            Cli::command().print_help()?;
            std::process::exit(1);
        }
    };

    let config = cli
        .config
        .as_deref()
        .map_or_else(Config::load, Config::load_from)?;

    let repo_path = cli.repo.map_or_else(
        || std::env::current_dir().context("Failed to read current directory"),
        Ok,
    )?;
    let repo = branch_compare::git::open_repository(&repo_path)?;
    let branches = branch_compare::git::load_branches_state(&repo, config.recent_branches_limit)?;
    let repository = repo
        .workdir()
        .map_or_else(|| repo_path.clone(), std::path::Path::to_path_buf);

    let repository = Repository::new(repository);

    if cli.interactive {
        let repo_state = RepositoryState {
            branches,
            compare: CompareState::default(),
        };
        let session = Session::new(repository, repo_state, config);
        let log = branch_compare::tui::run(
            session,
            Duration::from_millis(config.tick_rate_ms),
            || branch_compare::git::load_branches_state(&repo, config.recent_branches_limit),
        )?;
        println!("{} commands issued", log.len());
        return Ok(());
    }

    let report = build_report(
        &repository.name(),
        &branches,
        cli.filter.as_deref().unwrap_or(""),
    );

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        print_report(&report);
    }
    Ok(())
}

fn describe_tip(tip: &TipState) -> String {
    match tip {
        TipState::Unknown => "unknown".to_string(),
        TipState::Unborn { ref_name } => format!("unborn ({ref_name})"),
        TipState::Detached { sha } => format!("detached at {}", sha.get(..7).unwrap_or(sha.as_str())),
        TipState::Valid { branch } => format!("on {}", branch.name),
    }
}

fn build_report<'a>(repository: &str, branches: &'a BranchesState, filter: &str) -> Report<'a> {
    let candidates = branch_candidates(branches).matching(filter);
    Report {
        repository: repository.to_string(),
        tip: describe_tip(&branches.tip),
        current_branch: branches.current_branch().map(|b| b.name.as_str()),
        default_branch: branches.default_branch.as_ref().map(|b| b.name.as_str()),
        placeholder: placeholder_text(None, branches.default_branch.as_ref()),
        recent: candidates.recent,
        branches: candidates.all,
    }
}

fn print_report(report: &Report<'_>) {
    println!("Repository: {}", report.repository);
    println!("HEAD: {}", report.tip);
    println!("Default branch: {}", report.default_branch.unwrap_or("(none)"));

    if report.recent.is_empty() && report.branches.is_empty() {
        println!("\nNo branches to compare against.");
        return;
    }
    if !report.recent.is_empty() {
        println!("\nRecent:");
        for branch in &report.recent {
            println!("  {}", branch.name);
        }
    }
    if !report.branches.is_empty() {
        println!("\nBranches:");
        for branch in &report.branches {
            println!("  {:<40} {}", branch.name, branch.short_sha());
        }
    }
}
