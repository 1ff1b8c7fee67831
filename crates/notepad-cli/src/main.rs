//! notepad command-line front end.
//!
//! ## Usage
//!
//! ```bash
//! # Share-link codec
//! notepad encode "hello"            # or pipe text on stdin
//! notepad decode SGVsbG8%3D
//! notepad stats --json < note.txt
//!
//! # Share-link notepad (local cache under the data dir)
//! notepad link save "grocery list"  # prints the share link
//! notepad link open "http://localhost:8080/#Z3JvY2VyeSBsaXN0"
//!
//! # Account-synced notepad (SQLite store under the data dir)
//! notepad sync save --user amy1 --password secret1 "my note"
//! notepad sync load --user amy1 --password secret1
//!
//! # Effective configuration
//! notepad config
//! ```
//!
//! Logging goes to stderr; set `RUST_LOG=debug` for more.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use notepad_core::{
    FileCache, LinkNotepad, LinkStateStore, LoadSource, NotepadConfig, SqliteStore, SyncedNotepad,
    codec, stats, system_clock,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Plain-text notepad with share links and account sync.
#[derive(Parser, Debug)]
#[command(name = "notepad", version)]
struct Cli {
    /// Config file (default: ~/.config/notepad/config.ron)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode text into a share-link token
    Encode {
        /// Text to encode (stdin if omitted)
        text: Option<String>,
    },
    /// Decode a share-link token back into text
    Decode { token: String },
    /// Character, word, and line counts
    Stats {
        /// Text to count (stdin if omitted)
        text: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Notes kept in share links
    #[command(subcommand)]
    Link(LinkCommand),
    /// Notes kept under an account
    #[command(subcommand)]
    Sync(SyncCommand),
    /// Print the effective configuration as RON
    Config,
}

#[derive(Subcommand, Debug)]
enum LinkCommand {
    /// Save text into a share link and the local cache
    Save {
        /// Text to save (stdin if omitted)
        text: Option<String>,
        /// Base URL for the link (default from config)
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Open a share link, falling back to the local cache
    Open {
        /// Link to open (default: base URL without a fragment)
        url: Option<String>,
    },
}

#[derive(Args, Debug)]
struct Credentials {
    #[arg(long)]
    user: String,
    #[arg(long)]
    password: String,
}

#[derive(Subcommand, Debug)]
enum SyncCommand {
    /// Log in and save text as the account's note
    Save {
        #[command(flatten)]
        credentials: Credentials,
        /// Text to save (stdin if omitted)
        text: Option<String>,
    },
    /// Log in and print the account's note
    Load {
        #[command(flatten)]
        credentials: Credentials,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = NotepadConfig::load_or_default(cli.config.as_deref())
        .context("failed to load config")?;

    match cli.command {
        Command::Encode { text } => {
            println!("{}", codec::encode(&text_or_stdin(text)?));
        }
        Command::Decode { token } => {
            let text = codec::decode(token.trim()).context("not a valid share-link token")?;
            println!("{text}");
        }
        Command::Stats { text, json } => {
            let counts = stats::recompute(&text_or_stdin(text)?);
            if json {
                println!("{}", serde_json::to_string(&counts)?);
            } else {
                println!("{} chars, {} words, {} lines", counts.chars, counts.words, counts.lines);
            }
        }
        Command::Link(cmd) => run_link(&config, cmd)?,
        Command::Sync(cmd) => run_sync(&config, cmd).await?,
        Command::Config => print!("{}", config.to_ron()?),
    }
    Ok(())
}

fn run_link(config: &NotepadConfig, cmd: LinkCommand) -> Result<()> {
    let cache_dir = config.cache_dir();
    let cache = Arc::new(
        FileCache::open(&cache_dir)
            .with_context(|| format!("failed to open cache at {}", cache_dir.display()))?,
    );

    match cmd {
        LinkCommand::Save { text, base_url } => {
            let base = base_url.unwrap_or_else(|| config.base_url.clone());
            let location = LinkStateStore::new(base);
            let mut pad = LinkNotepad::new(config, location, cache, system_clock());
            pad.editor().lock().set_content(text_or_stdin(text)?);
            let href = pad.save()?;
            println!("{href}");
        }
        LinkCommand::Open { url } => {
            let location = match url {
                Some(url) => LinkStateStore::from_url(&url),
                None => LinkStateStore::new(config.base_url.clone()),
            };
            let mut pad = LinkNotepad::new(config, location, cache, system_clock());
            match pad.open() {
                Ok(LoadSource::Empty) => bail!("no note in the link or the local cache"),
                Ok(source) => {
                    tracing::debug!(?source, "opened");
                    println!("{}", pad.content());
                }
                // Cache fallback already happened; show it if there was one.
                Err(e) if !pad.content().is_empty() => {
                    tracing::warn!(error = %e, "link unreadable, showing cached note");
                    println!("{}", pad.content());
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(())
}

async fn run_sync(config: &NotepadConfig, cmd: SyncCommand) -> Result<()> {
    let db_path = config.db_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let store = Arc::new(
        SqliteStore::open(&db_path)
            .with_context(|| format!("failed to open store at {}", db_path.display()))?,
    );
    let mut pad = SyncedNotepad::new(config, store, system_clock());

    match cmd {
        SyncCommand::Save { credentials, text } => {
            let text = text_or_stdin(text)?;
            pad.login(&credentials.user, &credentials.password).await?;
            pad.input(text);
            let outcome = pad.save().await?;
            println!("saved note {}", outcome.record.id.short());
        }
        SyncCommand::Load { credentials } => {
            pad.login(&credentials.user, &credentials.password).await?;
            println!("{}", saved_note(&pad, &credentials.user).await?);
        }
    }
    pad.logout();
    Ok(())
}

/// The account's note after login. Login only reports a failed pull as a
/// notification, so pull again to turn it into an error.
async fn saved_note(pad: &SyncedNotepad, user: &str) -> Result<String> {
    match pad.load().await.context("failed to load note")? {
        Some(note) => Ok(note.content),
        None => bail!("no saved note for {user}"),
    }
}

/// The given text, or all of stdin when none was given.
fn text_or_stdin(text: Option<String>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        bail!("no text given and stdin is a terminal");
    }
    let mut buf = String::new();
    stdin.read_to_string(&mut buf).context("failed to read stdin")?;
    Ok(buf)
}
