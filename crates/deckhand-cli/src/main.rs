//! Deckhand CLI - keep local Magic deck files in sync with Moxfield
//!
//! Deck files live as markdown under a decks directory; `deckhand sync`
//! reconciles them against the configured Moxfield account.

use std::collections::HashSet;
use std::env;
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use deckhand_core::client::{ClientError, DeckHost, MoxfieldClient};
use deckhand_core::parser::{self, MalformedDeckError};
use deckhand_core::sync::{plan_deck, sync_deck, SyncPlan, SyncReport};
use deckhand_core::{DeckRecord, SyncOutcome};
use serde::Serialize;
use thiserror::Error;

#[derive(Parser)]
#[command(name = "deckhand")]
#[command(about = "Sync local markdown deck files with Moxfield")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile local deck files against the remote account
    Sync {
        /// Specific deck files to sync
        files: Vec<PathBuf>,
        /// Sync every deck file in the decks directory
        #[arg(long)]
        all: bool,
        /// Report what would happen without writing anything
        #[arg(long)]
        dry_run: bool,
        /// Directory holding deck files
        #[arg(long, value_name = "DIR", default_value = "decks")]
        decks_dir: PathBuf,
    },
    /// List decks owned by the configured account
    ListRemote {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Download remote decks into local deck files
    Pull {
        /// Public deck ids to pull (all unlinked decks when omitted)
        ids: Vec<String>,
        /// Directory to write deck files into
        #[arg(long, value_name = "DIR", default_value = "decks")]
        decks_dir: PathBuf,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Deck(#[from] MalformedDeckError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(
        "Not configured. Set MOXFIELD_USERNAME and MOXFIELD_BEARER_TOKEN (copy the \
         Authorization header from an authenticated moxfield.com browser session, \
         DevTools network tab, without the `Bearer ` prefix)."
    )]
    NotConfigured,
    #[error("No deck files to sync. Pass file paths or use --all.")]
    NoDeckFiles,
    #[error("No remote deck with public id: {0}")]
    UnknownRemoteDeck(String),
    #[error(
        "Authentication failed: {0}. Extract a fresh bearer token from the browser \
         and update MOXFIELD_BEARER_TOKEN, then re-run; already-recorded deck ids \
         were saved."
    )]
    AuthExpired(String),
    #[error("{0} deck(s) did not reach a clean state")]
    SyncIncomplete(usize),
}

/// Credentials and endpoint for the remote account, read from the
/// environment (a `.env` file is honored).
struct MoxfieldConfig {
    username: String,
    bearer_token: String,
    api_base: Option<String>,
}

impl fmt::Debug for MoxfieldConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoxfieldConfig")
            .field("username", &self.username)
            .field("bearer_token", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("deckhand=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sync {
            files,
            all,
            dry_run,
            decks_dir,
        } => run_sync(&files, all, dry_run, &decks_dir).await?,
        Commands::ListRemote { json } => run_list_remote(json).await?,
        Commands::Pull { ids, decks_dir } => run_pull(&ids, &decks_dir).await?,
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}

async fn run_sync(
    files: &[PathBuf],
    all: bool,
    dry_run: bool,
    decks_dir: &Path,
) -> Result<(), CliError> {
    let client = build_client(&config_from_env()?)?;
    let deck_files = collect_deck_files(files, all, decks_dir)?;

    if dry_run {
        return run_sync_dry(&client, &deck_files).await;
    }

    let mut report = SyncReport::default();
    for path in &deck_files {
        let label = deck_label(path);
        let (document, mut record) = match load_deck_record(path) {
            Ok(loaded) => loaded,
            Err(error) => {
                report.record(label, SyncOutcome::Failed {
                    detail: error.to_string(),
                });
                continue;
            }
        };
        let linked_before = record.metadata.remote_id.clone();

        let result = sync_deck(&client, &mut record).await;

        // The remote deck may exist even when the attempt failed; never
        // lose a freshly recorded id.
        if record.metadata.remote_id != linked_before {
            persist_metadata(path, &document, &record)?;
        }

        match result {
            Ok(outcome) => report.record(label, outcome),
            Err(ClientError::Auth(detail)) => {
                print_summary(&report);
                return Err(CliError::AuthExpired(detail));
            }
            Err(error) => return Err(error.into()),
        }
    }

    print_summary(&report);
    if report.all_clean() {
        Ok(())
    } else {
        let dirty = report
            .entries()
            .iter()
            .filter(|entry| !entry.outcome.is_success())
            .count();
        Err(CliError::SyncIncomplete(dirty))
    }
}

async fn run_sync_dry(client: &MoxfieldClient, deck_files: &[PathBuf]) -> Result<(), CliError> {
    for path in deck_files {
        let label = deck_label(path);
        let record = match load_deck_record(path) {
            Ok((_, record)) => record,
            Err(error) => {
                println!("{label:<28} failed: {error}");
                continue;
            }
        };

        match plan_deck(client, &record).await {
            Ok(SyncPlan::Create) => println!("{label:<28} would create"),
            Ok(SyncPlan::Unchanged) => println!("{label:<28} up to date"),
            Ok(SyncPlan::Supersede { orphaned_id }) => {
                println!("{label:<28} would supersede {orphaned_id}");
            }
            Err(ClientError::Auth(detail)) => return Err(CliError::AuthExpired(detail)),
            Err(error) => println!("{label:<28} failed: {error}"),
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct RemoteDeckItem {
    public_id: String,
    format: String,
    name: String,
}

async fn run_list_remote(as_json: bool) -> Result<(), CliError> {
    let client = build_client(&config_from_env()?)?;
    let mut summaries = client.list_owned_decks().await?;
    summaries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    if as_json {
        let items = summaries
            .iter()
            .map(|deck| RemoteDeckItem {
                public_id: deck.public_id.clone(),
                format: deck.format.clone(),
                name: deck.name.clone(),
            })
            .collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for deck in &summaries {
            println!("{:<12}  {:<10}  {}", deck.public_id, deck.format, deck.name);
        }
    }

    Ok(())
}

async fn run_pull(ids: &[String], decks_dir: &Path) -> Result<(), CliError> {
    let client = build_client(&config_from_env()?)?;
    let summaries = client.list_owned_decks().await?;
    let linked = local_linked_ids(decks_dir);

    let selected: Vec<_> = if ids.is_empty() {
        summaries
            .iter()
            .filter(|deck| !linked.contains(&deck.public_id))
            .collect()
    } else {
        let mut picked = Vec::with_capacity(ids.len());
        for id in ids {
            let deck = summaries
                .iter()
                .find(|deck| &deck.public_id == id)
                .ok_or_else(|| CliError::UnknownRemoteDeck(id.clone()))?;
            picked.push(deck);
        }
        picked
    };

    std::fs::create_dir_all(decks_dir)?;
    let date = Utc::now().format("%Y-%m-%d").to_string();
    for deck in selected {
        if linked.contains(&deck.public_id) {
            tracing::info!(deck = %deck.public_id, "Already linked locally, skipping");
            continue;
        }
        let snapshot = client.fetch_deck(&deck.public_id).await?;
        let document = parser::render_document(&deck.name, &snapshot, &date);
        let target = available_path(decks_dir, &parser::slugify(&deck.name));
        std::fs::write(&target, document)?;
        println!("{}", target.display());
    }

    Ok(())
}

fn run_completions(shell: Shell, output_path: Option<&Path>) -> Result<(), CliError> {
    let mut command = Cli::command();
    let mut buffer = Vec::new();
    generate(shell, &mut command, "deckhand", &mut buffer);

    if let Some(path) = output_path {
        std::fs::write(path, &buffer)?;
        println!("{}", path.display());
    } else {
        io::stdout().write_all(&buffer)?;
    }

    Ok(())
}

fn config_from_env() -> Result<MoxfieldConfig, CliError> {
    let username = env::var("MOXFIELD_USERNAME").unwrap_or_default();
    let bearer_token = env::var("MOXFIELD_BEARER_TOKEN").unwrap_or_default();
    if username.trim().is_empty() || bearer_token.trim().is_empty() {
        return Err(CliError::NotConfigured);
    }

    Ok(MoxfieldConfig {
        username,
        bearer_token,
        api_base: env::var("MOXFIELD_API_BASE")
            .ok()
            .filter(|base| !base.trim().is_empty()),
    })
}

fn build_client(config: &MoxfieldConfig) -> Result<MoxfieldClient, CliError> {
    let client = MoxfieldClient::new(&config.username, &config.bearer_token)?;
    Ok(match &config.api_base {
        Some(base) => client.with_api_base(base.clone()),
        None => client,
    })
}

fn collect_deck_files(
    files: &[PathBuf],
    all: bool,
    decks_dir: &Path,
) -> Result<Vec<PathBuf>, CliError> {
    if !files.is_empty() {
        return Ok(files.to_vec());
    }
    if !all {
        return Err(CliError::NoDeckFiles);
    }

    let mut found = Vec::new();
    for entry in std::fs::read_dir(decks_dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "md") {
            found.push(path);
        }
    }
    found.sort();

    if found.is_empty() {
        Err(CliError::NoDeckFiles)
    } else {
        Ok(found)
    }
}

/// Read and parse one deck file, returning the raw document alongside the
/// record so metadata edits can be written back in place.
fn load_deck_record(path: &Path) -> Result<(String, DeckRecord), CliError> {
    let document = std::fs::read_to_string(path)?;
    let mut record = parser::parse(&document)?;
    if record.metadata.display_name.is_empty() {
        record.metadata.display_name = deck_label(path);
    }
    Ok((document, record))
}

/// Rewrite a deck file's metadata table in place, leaving prose and the
/// card block untouched.
fn persist_metadata(path: &Path, document: &str, record: &DeckRecord) -> Result<(), CliError> {
    let updated = parser::update_metadata(document, &record.metadata);
    std::fs::write(path, updated)?;
    Ok(())
}

fn deck_label(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Remote ids already referenced by deck files in the directory. Files that
/// fail to parse are skipped; pull must not be blocked by one bad file.
fn local_linked_ids(decks_dir: &Path) -> HashSet<String> {
    let mut linked = HashSet::new();
    let Ok(entries) = std::fs::read_dir(decks_dir) else {
        return linked;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "md") {
            continue;
        }
        let Ok(document) = std::fs::read_to_string(&path) else {
            continue;
        };
        if let Ok(record) = parser::parse(&document) {
            if let Some(id) = record.metadata.remote_id {
                linked.insert(id);
            }
        }
    }
    linked
}

/// First filename under `dir` for `slug` that does not already exist
fn available_path(dir: &Path, slug: &str) -> PathBuf {
    let base = dir.join(format!("{slug}.md"));
    if !base.exists() {
        return base;
    }
    for counter in 2.. {
        let candidate = dir.join(format!("{slug}-{counter}.md"));
        if !candidate.exists() {
            return candidate;
        }
    }
    unreachable!("counter space exhausted")
}

fn print_summary(report: &SyncReport) {
    for entry in report.entries() {
        let remote = entry.outcome.recorded_remote_id().unwrap_or("-");
        println!("{:<28} {:<11} {remote}", entry.deck, entry.outcome.label());
    }
    for entry in report.entries() {
        if let Some(action) = entry.outcome.next_action() {
            println!("  {}: {action}", entry.deck);
        }
    }
    let orphans = report.orphaned_ids();
    if !orphans.is_empty() {
        println!(
            "Superseded decks left on Moxfield (delete by hand if unwanted): {}",
            orphans.join(", ")
        );
    }
}
