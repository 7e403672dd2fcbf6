// src/main.rs

mod cli;

use chrono::TimeZone;
use clap::Parser;
use cli::{Args, Command, ExportArgs, FilterCommand, HistoryCommand, ViewSource};
use commit_ledger::config::CONFIG_FILE;
use commit_ledger::{
    Artifact, CaptureStage, Config, GitRepository, Handoff, HistoryEntry, Ledger, LedgerError, Report, Result,
    VersionControl,
};
use indicatif::ProgressBar;
use std::time::{Duration, Instant};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_writer(std::io::stderr).with_env_filter(filter).init();
}

fn run(args: Args) -> Result<()> {
    let repo = GitRepository::discover(&args.repo)?;
    let workdir = repo.workdir().map(|p| p.to_path_buf());

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load(&Config::default().storage_dir(workdir.as_deref())?.join(CONFIG_FILE))?,
    };
    let storage_dir = config.storage_dir(workdir.as_deref())?;

    let mut ledger = Ledger::new(repo, config, &storage_dir);
    ledger.on_view_changed(|view| {
        debug!(reference = %view.reference, artifacts = view.artifact_count, "view refreshed")
    });
    ledger.on_filters_changed(|filters| {
        debug!(task = %filters.task, author = %filters.author, "filters changed")
    });
    let json = args.json;

    match args.command {
        Command::Capture(capture) => {
            let start_time = Instant::now();
            let spinner = attach_spinner(&mut ledger);
            let result = if capture.staged {
                ledger.capture_staged(capture.label.as_deref())
            } else {
                ledger.capture(&capture.reference)
            };
            spinner.finish_and_clear();
            let report = result?;
            println!(
                "Captured {} artifacts for {} in {:.2?}.",
                report.artifacts.len(),
                report.commit_hash,
                start_time.elapsed()
            );
            if capture.filtered {
                ledger.apply_saved_filters();
            }
            print_view(&ledger, capture.links, json)?;
        }
        Command::Commits => {
            let commits = ledger.recent_commits()?;
            let short_len = ledger.config().short_id_len;
            for summary in &commits {
                let commit = &summary.commit;
                let when = chrono::Local
                    .timestamp_opt(commit.time, 0)
                    .single()
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                let title = match &summary.task_id {
                    Some(task) => format!("[{}] {}", task, commit.summary()),
                    None => commit.summary().to_string(),
                };
                println!("{}  {}  {}  {}", commit.short_id(short_len), when, commit.author, title);
            }
            if commits.is_empty() {
                println!("No commits match the current filters.");
            }
        }
        Command::Filter(command) => {
            match command {
                FilterCommand::Show => {}
                FilterCommand::Set { author, task } => {
                    if let Some(author) = author {
                        ledger.set_author_filter(&author)?;
                    }
                    if let Some(task) = task {
                        ledger.set_task_filter(&task)?;
                    }
                }
                FilterCommand::Clear => ledger.clear_filters()?,
            }
            let filters = ledger.filters();
            if json {
                println!("{}", serde_json::to_string_pretty(filters)?);
            } else {
                println!("author: {}", display_or_none(&filters.author));
                println!("task:   {}", display_or_none(&filters.task));
            }
        }
        Command::History(HistoryCommand::List { filtered }) => {
            let entries: Vec<&HistoryEntry> = if filtered {
                ledger.filtered_history()
            } else {
                ledger.history().iter().collect()
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for (index, entry) in entries.iter().enumerate() {
                    println!(
                        "{:>2}  {}  {}  {} artifacts  ({})",
                        index, entry.name, entry.report.commit_hash, entry.artifact_count, entry.id
                    );
                }
            }
        }
        Command::History(HistoryCommand::Show { entry, links }) => {
            open_entry(&mut ledger, &entry)?;
            print_view(&ledger, links, json)?;
        }
        Command::Export(export) => run_export(&mut ledger, export)?,
        Command::Import { file, links } => {
            ledger.import_report(&file)?;
            print_view(&ledger, links, json)?;
        }
        Command::Send { path, source } => {
            load_source(&mut ledger, &source)?;
            match ledger.hand_off(&path)? {
                Handoff::Copy { link } => println!("{}", link),
                Handoff::Pending { endpoint, link } => {
                    println!("{}", link);
                    eprintln!("Sending to {} is not available; copy the link above instead.", endpoint);
                }
            }
        }
    }

    Ok(())
}

fn run_export<V: VersionControl>(ledger: &mut Ledger<V>, export: ExportArgs) -> Result<()> {
    load_source(ledger, &export.source)?;
    if export.filtered {
        ledger.apply_saved_filters();
    }
    for path in &export.exclude {
        ledger.remove_artifact(path)?;
    }
    for (path, complexity) in &export.complexity {
        ledger.set_complexity(path, *complexity)?;
    }
    let report = ledger.export_report(&export.file)?;
    println!("Saved {} artifacts to {}.", report.artifacts.len(), export.file.display());
    Ok(())
}

fn load_source<V: VersionControl>(ledger: &mut Ledger<V>, source: &ViewSource) -> Result<()> {
    match &source.entry {
        Some(entry) => open_entry(ledger, entry),
        None => ledger.load_commit(&source.reference).map(|_| ()),
    }
}

/// Reopens a history entry given either its id or its list index
fn open_entry<V: VersionControl>(ledger: &mut Ledger<V>, entry: &str) -> Result<()> {
    let id = match entry.parse::<usize>() {
        Ok(index) => ledger
            .history()
            .get(index)
            .map(|e| e.id.clone())
            .ok_or_else(|| LedgerError::HistoryEntryNotFound(entry.to_string()))?,
        Err(_) => entry.to_string(),
    };
    ledger.open_history_entry(&id)?;
    Ok(())
}

fn attach_spinner<V: VersionControl>(ledger: &mut Ledger<V>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.enable_steady_tick(Duration::from_millis(100));
    let bar = spinner.clone();
    ledger.on_progress(move |stage| match stage {
        CaptureStage::Resolving => bar.set_message("Capturing changes..."),
        CaptureStage::Analyzing => bar.set_message("Analyzing changed files..."),
        CaptureStage::Found(count) => bar.set_message(format!("Found {} artifacts", count)),
    });
    spinner
}

fn print_view<V: VersionControl>(ledger: &Ledger<V>, links: bool, json: bool) -> Result<()> {
    let store = ledger.store();
    if json {
        let report = Report::new(store.reference(), store.artifacts().to_vec());
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if links {
        for link in ledger.copy_all_links()? {
            println!("{}", link);
        }
    } else if store.is_empty() {
        println!("No artifacts.");
    } else {
        for artifact in store.artifacts() {
            println!("{}", artifact_row(artifact, store.reference()));
        }
    }
    Ok(())
}

fn artifact_row(artifact: &Artifact, reference: &str) -> String {
    let mut row = format!(
        "{:<50}  {:<10}  {:<8}  {:<4}",
        artifact.link(reference),
        artifact.file_type,
        artifact.change_type,
        artifact.complexity
    );
    if let Some(task) = &artifact.task_id {
        row.push_str(&format!("  task {}", task));
    }
    if let Some(author) = &artifact.author {
        row.push_str(&format!("  {}", author));
    }
    row
}

fn display_or_none(value: &str) -> &str {
    if value.is_empty() {
        "(none)"
    } else {
        value
    }
}
