//! # Moodmap CLI
//!
//! Runs one command against a mood session backed by the local cache.
//!
//! ## Usage
//! ```bash
//! # Show sync status and a summary of local data
//! moodmap status
//!
//! # List logged moods, newest first
//! moodmap list --limit 10
//!
//! # Log a mood
//! moodmap add happy 4 --note "sunny walk" --lat 51.5 --lon -0.12
//!
//! # Change the theme
//! moodmap settings theme dark
//!
//! # Push queued writes and reload
//! moodmap resync
//!
//! # Use a specific database / config file
//! moodmap --db ./data/moodmap.db --config ./moodmap.toml status
//! ```
//!
//! ## Logging
//! - `RUST_LOG=debug` - Show debug messages
//! - `RUST_LOG=moodmap_sync=trace` - Trace store dispatches
//! - Default: `info,moodmap=debug,sqlx=warn`, written to stderr

use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use moodmap_cache::{CacheConfig, Database};
use moodmap_core::settings::Theme;
use moodmap_core::{Intensity, Location, MoodDraft, MoodName, SettingsPatch};
use moodmap_sync::{
    MoodSession, MutationOutcome, OfflineGateway, ResyncOutcome, SyncConfig,
};

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Status { json: bool },
    List { limit: Option<usize>, json: bool },
    Add(MoodDraft),
    SetTheme(Theme),
    Resync,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
struct Cli {
    db_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    command: Command,
}

const HELP: &str = "\
Moodmap - mood log with offline-first sync

Usage: moodmap [OPTIONS] <COMMAND>

Commands:
  status [--json]                          Show sync status and data summary
  list [--limit N] [--json]                List moods, newest first
  add <mood> <intensity> [OPTIONS]         Log a mood (intensity 1-5)
      --note <TEXT>                        Free-text note
      --lat <DEG> --lon <DEG>              Where it happened
      --public | --private                 Override the privacy default
  settings theme <light|dark|system>       Change the display theme
  resync                                   Push queued writes, then reload

Options:
  -d, --db <PATH>        Cache database path (overrides config)
  -c, --config <PATH>    Config file path
  -h, --help             Show this help message

Moods: happy, sad, angry, anxious, calm, excited, tired, grateful";

fn parse_args(args: &[String]) -> Result<Cli, String> {
    let mut db_path = None;
    let mut config_path = None;
    let mut rest = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                db_path = Some(PathBuf::from(value_after(args, i)?));
                i += 1;
            }
            "--config" | "-c" => {
                config_path = Some(PathBuf::from(value_after(args, i)?));
                i += 1;
            }
            "--help" | "-h" => {
                rest.clear();
                rest.push("help".to_string());
                break;
            }
            other => rest.push(other.to_string()),
        }
        i += 1;
    }

    Ok(Cli {
        db_path,
        config_path,
        command: parse_command(&rest)?,
    })
}

fn value_after(args: &[String], i: usize) -> Result<&str, String> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{} needs a value", args[i]))
}

fn parse_command(args: &[String]) -> Result<Command, String> {
    let Some(name) = args.first() else {
        return Ok(Command::Help);
    };
    let flags = &args[1..];

    match name.as_str() {
        "help" => Ok(Command::Help),
        "status" => Ok(Command::Status {
            json: flags.iter().any(|f| f == "--json"),
        }),
        "list" => {
            let mut limit = None;
            let mut json = false;
            let mut i = 0;
            while i < flags.len() {
                match flags[i].as_str() {
                    "--limit" | "-n" => {
                        let raw = value_after(flags, i)?;
                        limit = Some(raw.parse().map_err(|_| format!("invalid limit: {raw}"))?);
                        i += 1;
                    }
                    "--json" => json = true,
                    other => return Err(format!("unexpected argument: {other}")),
                }
                i += 1;
            }
            Ok(Command::List { limit, json })
        }
        "add" => parse_add(flags).map(Command::Add),
        "settings" => match flags {
            [key, value] if key == "theme" => value
                .parse::<Theme>()
                .map(Command::SetTheme)
                .map_err(|e| e.to_string()),
            _ => Err("usage: settings theme <light|dark|system>".to_string()),
        },
        "resync" => Ok(Command::Resync),
        other => Err(format!("unknown command: {other}")),
    }
}

fn parse_add(args: &[String]) -> Result<MoodDraft, String> {
    let [mood, intensity, options @ ..] = args else {
        return Err("usage: add <mood> <intensity> [OPTIONS]".to_string());
    };

    let name: MoodName = mood.parse().map_err(|e: moodmap_core::CoreError| e.to_string())?;
    let level: u8 = intensity
        .parse()
        .map_err(|_| format!("intensity must be a number: {intensity}"))?;
    let intensity = Intensity::new(level).map_err(|e| e.to_string())?;
    let mut draft = MoodDraft::new(name, intensity);

    let mut lat = None;
    let mut lon = None;
    let mut i = 0;
    while i < options.len() {
        match options[i].as_str() {
            "--note" => {
                draft = draft.with_note(value_after(options, i)?);
                i += 1;
            }
            "--lat" => {
                lat = Some(parse_degrees(value_after(options, i)?)?);
                i += 1;
            }
            "--lon" => {
                lon = Some(parse_degrees(value_after(options, i)?)?);
                i += 1;
            }
            "--public" => draft = draft.with_visibility(true),
            "--private" => draft = draft.with_visibility(false),
            other => return Err(format!("unexpected argument: {other}")),
        }
        i += 1;
    }

    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok(draft.with_location(Location::new(lat, lon))),
        (None, None) => Ok(draft),
        _ => Err("--lat and --lon must be given together".to_string()),
    }
}

fn parse_degrees(raw: &str) -> Result<f64, String> {
    raw.parse().map_err(|_| format!("invalid coordinate: {raw}"))
}

// =============================================================================
// Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!();
            eprintln!("{HELP}");
            std::process::exit(2);
        }
    };
    if cli.command == Command::Help {
        println!("{HELP}");
        return Ok(());
    }

    let mut config = SyncConfig::load(cli.config_path.clone())?;
    if let Some(path) = cli.db_path.clone() {
        config.cache.path = Some(path);
    }

    let db = Database::new(
        CacheConfig::new(config.cache_path()).max_connections(config.cache.max_connections),
    )
    .await?;

    if config.mode().is_remote_enabled() {
        warn!("No remote transport is linked into this build, running offline");
    }
    let gateway = Arc::new(OfflineGateway::new(db.clone()));
    let session = MoodSession::start(&config, gateway, Arc::new(db.clone())).await?;

    run(&session, &db, cli.command).await?;

    session.shutdown().await?;
    db.close().await;
    Ok(())
}

async fn run(
    session: &MoodSession,
    db: &Database,
    command: Command,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Status { json } => {
            session.refresh_status().await;
            let state = session.snapshot();
            if json {
                println!("{}", serde_json::to_string_pretty(&state.sync_status)?);
                return Ok(());
            }
            let status = &state.sync_status;
            println!("Device:        {}", session.device_id());
            println!("Moods:         {}", state.moods.len());
            println!(
                "Local only:    {}",
                state.moods.iter().filter(|m| m.is_local()).count()
            );
            println!("Offline:       {}", status.is_offline);
            println!("Pending sync:  {}", status.pending_sync_count);
            match status.last_sync_time {
                Some(at) => println!("Last sync:     {}", at.to_rfc3339()),
                None => println!("Last sync:     never"),
            }
            println!("Theme:         {:?}", state.settings.display.theme);
            println!("Queued writes: {}", db.pending_writes().count_pending().await?);
            if let Some(warning) = session.bootstrap_report().warning {
                println!();
                println!("⚠ {warning}");
            }
        }

        Command::List { limit, json } => {
            let state = session.snapshot();
            let moods: Vec<_> = state
                .moods
                .iter()
                .take(limit.unwrap_or(usize::MAX))
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&moods)?);
                return Ok(());
            }
            if moods.is_empty() {
                println!("No moods logged yet.");
            }
            for mood in moods {
                let marker = if mood.is_local() { "*" } else { " " };
                println!(
                    "{marker} {}  {} {:<9} {}/5  {}",
                    mood.timestamp.format("%Y-%m-%d %H:%M"),
                    mood.emoji,
                    mood.name,
                    mood.intensity,
                    mood.note.as_deref().unwrap_or("")
                );
            }
        }

        Command::Add(draft) => match session.add_mood(draft).await {
            MutationOutcome::RemoteConfirmed(entry) => {
                println!("✓ Logged {} {} ({})", entry.emoji, entry.name, entry.id);
            }
            MutationOutcome::LocalFallback(entry) => {
                println!("✓ Logged {} {} ({})", entry.emoji, entry.name, entry.id);
                println!("  Saved locally - will sync when online");
            }
            MutationOutcome::HardFailure(e) => {
                eprintln!("✗ Not logged: {e}");
            }
        },

        Command::SetTheme(theme) => {
            let mut display = session.snapshot().settings.display;
            display.theme = theme;
            let outcome = session
                .update_settings(SettingsPatch::default().with_display(display))
                .await;
            match outcome {
                MutationOutcome::RemoteConfirmed(_) => println!("✓ Theme set to {theme:?}"),
                MutationOutcome::LocalFallback(_) => {
                    println!("✓ Theme set to {theme:?}");
                    println!("  Saved locally - will sync when online");
                }
                MutationOutcome::HardFailure(e) => eprintln!("✗ Not saved: {e}"),
            }
        }

        Command::Resync => match session.resync().await {
            ResyncOutcome::Synced { moods } => println!("✓ Synced, {moods} moods"),
            ResyncOutcome::Failed => {
                let message = session.snapshot().error.unwrap_or_default();
                eprintln!("✗ {message}");
            }
        },

        Command::Help => println!("{HELP}"),
    }
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,moodmap=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// =============================================================================
// Unit Tests
// =============================================================================
