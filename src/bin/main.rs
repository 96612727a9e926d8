use clap::{Parser, Subcommand};
use repo_bears::{self, Archiver, CommitClassification, Config, Finding};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// VCS binary used to inspect the repository (falls back to $REPO_BEARS_VCS, then git)
    #[arg(global = true, long)]
    vcs: Option<String>,

    /// Archive service links are submitted to: archive.org or archive.is
    /// (falls back to $REPO_BEARS_ARCHIVER, then archive.org)
    #[arg(global = true, long)]
    archiver: Option<Archiver>,

    /// Override the archive endpoint; `%s` is replaced by the link for archive.org
    /// (falls back to $REPO_BEARS_ARCHIVE_URL_TEMPLATE)
    #[arg(global = true, long)]
    archive_url_template: Option<String>,

    /// Print machine readable JSON instead of a summary
    #[arg(global = true, long)]
    json: bool,

    /// Log level
    #[arg(global = true, short, long, default_value = "error")]
    log: LevelFilter,
}

#[derive(Subcommand)]
enum Command {
    /// Classify the head commit of a repository
    Commit {
        /// Repository working directory
        #[arg(short, long, default_value = ".")]
        repo: PathBuf,
    },
    /// Submit unarchived links to a web archive
    Archive {
        /// JSON file with `[{"url": ..., "line": ..., "archived": ...}]` entries
        #[arg(short, long)]
        candidates: PathBuf,

        /// File name the links were found in, used in findings
        #[arg(short, long, default_value = "default")]
        filename: String,
    },
}

fn print_commit_summary(classification: &CommitClassification) {
    println!("\n📌 {}", CommitClassification::MESSAGE);
    println!("==================");
    println!("SHA:      {}", classification.sha);
    println!("Message:  {}", classification.raw_message.trim_end());
    println!("CI skip:  {}", classification.is_ci_skip());
    println!("Merge:    {}", classification.is_merge());
    println!("  Added:    {}", classification.added.len());
    println!("  Modified: {}", classification.modified.len());
    println!("  Deleted:  {}", classification.deleted.len());

    for path in &classification.added {
        println!("  + {path}");
    }
    for path in &classification.modified {
        println!("  ~ {path}");
    }
    for path in &classification.deleted {
        println!("  - {path}");
    }
}

fn print_findings(findings: &[Finding]) {
    for finding in findings {
        println!(
            "{}:{}: [{:?}] {}",
            finding.file, finding.line, finding.severity, finding.message
        );
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> repo_bears::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn main() -> repo_bears::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let env_filter = EnvFilter::from_default_env().add_directive(cli.log.into());

    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(true)
        .pretty()
        .init();

    let config =
        Config::from_env()?.with_overrides(cli.vcs, cli.archiver, cli.archive_url_template);
    debug!(config = ?config, "Configuration resolved");

    match cli.command {
        Command::Commit { repo } => {
            if let Err(message) = repo_bears::check_prerequisites(&config.vcs_binary) {
                eprintln!("{message}");
                return Ok(ExitCode::FAILURE);
            }

            let Some(classification) = repo_bears::classify_head(&repo, &config) else {
                eprintln!("Could not read the head commit of {}", repo.display());
                return Ok(ExitCode::FAILURE);
            };

            if cli.json {
                println!("{}", to_json(&classification)?);
            } else {
                print_commit_summary(&classification);
            }
        }
        Command::Archive {
            candidates,
            filename,
        } => {
            let content = std::fs::read_to_string(&candidates)?;
            let candidates = repo_bears::archive::parse_candidates(&content)?;

            let backup = repo_bears::link_backup(&config)?;
            let findings = backup.run(&filename, &candidates);

            if cli.json {
                println!("{}", to_json(&findings)?);
            } else {
                print_findings(&findings);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
