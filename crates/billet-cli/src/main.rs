//! billet: seal letters behind a password, and open them again
//!
//! Authoring:
//!   seal                     - encrypt every draft in the raw directory into the store
//!   link <letter> <pw>       - print the share link for a sealed letter
//!   list                     - list stored letter identifiers
//!
//! Reading:
//!   open <letter> <pw>       - fetch, decrypt, and display a letter
//!   open --link <url>        - same, from a share link
//!   parse <file>             - segment a plaintext letter without any crypto
//!
//!   config show              - display current configuration

mod messages;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use billet_core::config::BilletConfig;
use billet_core::{BilletError, LetterId, LinkRequest, Passphrase, ShareLink};
use billet_letter::ParsedLetter;
use billet_store::{LetterStore, SealStatus};

use messages::ReadFailure;

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "billet",
    version,
    about = "Password-sealed personal letters",
    long_about = "billet: encrypt letters into a static store and open them with a share link"
)]
struct Cli {
    /// Path to billet.toml configuration file
    #[arg(long, short = 'c', env = "BILLET_CONFIG", default_value = "billet.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error) [default: logging.level]
    #[arg(long, env = "BILLET_LOG")]
    log: Option<String>,

    /// Log format [default: logging.format]
    #[arg(long, env = "BILLET_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum OutputFormat {
    /// Laid out like a letter
    #[default]
    Text,
    /// The parsed sections as JSON
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt every `{id}.txt` draft into the letter store
    ///
    /// A draft's first line is its password; the rest is the letter.
    /// Drafts that fail validation are reported and skipped.
    Seal {
        /// Draft directory (overrides authoring.raw_dir)
        #[arg(long)]
        raw_dir: Option<PathBuf>,
    },

    /// Open a sealed letter
    Open {
        /// Letter identifier
        letter: Option<String>,
        /// Letter password
        password: Option<String>,
        /// Share link (or its query string) instead of LETTER and PASSWORD
        #[arg(long, conflicts_with_all = ["letter", "password"])]
        link: Option<String>,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Segment a plaintext letter file and display it
    Parse {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Print the share link for a letter
    Link {
        letter: String,
        password: String,
        /// Reader page URL (overrides share.base_url)
        #[arg(long)]
        base_url: Option<String>,
    },

    /// List stored letter identifiers
    List,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (merged defaults + config file)
    Show,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = BilletConfig::load(&cli.config)
        .with_context(|| format!("loading config: {}", cli.config.display()))?;

    let level = cli.log.as_deref().unwrap_or(&config.logging.level);
    let format = cli.log_format.unwrap_or(match config.logging.format.as_str() {
        "json" => LogFormat::Json,
        _ => LogFormat::Text,
    });
    init_logging(level, format);

    if !cli.config.exists() {
        tracing::warn!(
            "config file not found: {}  (using defaults)",
            cli.config.display()
        );
    }

    match cli.command {
        Commands::Seal { raw_dir } => cmd_seal(&config, raw_dir.as_deref()).await,
        Commands::Open { letter, password, link, format } => {
            cmd_open(&config, letter, password, link.as_deref(), format).await
        }
        Commands::Parse { file, format } => cmd_parse(&file, format).await,
        Commands::Link { letter, password, base_url } => {
            cmd_link(&config, &letter, &password, base_url.as_deref())
        }
        Commands::List => cmd_list(&config).await,
        Commands::Config { action: ConfigAction::Show } => cmd_config_show(&config, &cli.config),
    }
}

fn init_logging(level: &str, format: LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn open_store(config: &BilletConfig) -> Result<LetterStore> {
    LetterStore::from_config(&config.storage).context("opening letter store")
}

// ── Progress helpers ──────────────────────────────────────────────────────────

fn make_progress_bar(total: u64, prefix: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::with_template("{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .map(|s| s.progress_chars("=>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_prefix(prefix.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn make_spinner(prefix: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{prefix:.bold} {spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_prefix(prefix.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

// ── `billet seal` ─────────────────────────────────────────────────────────────

async fn cmd_seal(config: &BilletConfig, raw_dir: Option<&Path>) -> Result<ExitCode> {
    let raw_dir = raw_dir.unwrap_or(&config.authoring.raw_dir);
    let store = open_store(config)?;

    let files = billet_store::draft_files(raw_dir)
        .await
        .with_context(|| format!("scanning drafts in {}", raw_dir.display()))?;
    if files.is_empty() {
        println!("no drafts in {}", raw_dir.display());
        return Ok(ExitCode::SUCCESS);
    }

    let base_url = config.share.base_url.as_deref();
    let pb = make_progress_bar(files.len() as u64, "seal");
    let reports = billet_store::seal_drafts(&store, &files, |report| {
        let name = report.file.display();
        match &report.status {
            SealStatus::Sealed { link, bytes } => {
                pb.println(format!("  sealed   {name}  ({bytes} bytes)"));
                if let Some(base) = base_url {
                    pb.println(format!("           {}", link.to_url(base)));
                }
            }
            SealStatus::Skipped(reason) => pb.println(format!("  skipped  {name}: {reason}")),
        }
        pb.inc(1);
    })
    .await
    .with_context(|| format!("sealing drafts from {}", raw_dir.display()))?;
    pb.finish_and_clear();

    let sealed = reports.iter().filter(|r| r.is_sealed()).count();
    println!(
        "{sealed} sealed, {} skipped  → {}",
        reports.len() - sealed,
        store.payload_dir()
    );
    Ok(ExitCode::SUCCESS)
}

// ── `billet open` ─────────────────────────────────────────────────────────────

async fn cmd_open(
    config: &BilletConfig,
    letter: Option<String>,
    password: Option<String>,
    link: Option<&str>,
    format: OutputFormat,
) -> Result<ExitCode> {
    let request = match link {
        Some(url) => LinkRequest::from_url(url),
        None => request_from_args(letter, password),
    };

    let link = match request {
        Ok(LinkRequest::Open(link)) => link,
        Ok(LinkRequest::Landing) => {
            print!("{}", messages::LANDING);
            return Ok(ExitCode::SUCCESS);
        }
        Ok(LinkRequest::MissingParams) => return Ok(report_failure(ReadFailure::IncompleteLink)),
        Err(e) => return Ok(report_failure(ReadFailure::classify(&e))),
    };

    let store = open_store(config)?;
    let spinner = make_spinner("open");
    spinner.set_message(link.letter.to_string());
    let result = billet_store::open_letter(&store, &link.letter, &link.password).await;
    spinner.finish_and_clear();

    match result {
        Ok(letter) => {
            print_letter(&letter, format)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::debug!(error = %e, "open failed");
            Ok(report_failure(ReadFailure::classify(&e)))
        }
    }
}

/// Positional arguments follow the same rules as link query parameters.
fn request_from_args(
    letter: Option<String>,
    password: Option<String>,
) -> Result<LinkRequest, BilletError> {
    match (letter, password) {
        (None, None) => Ok(LinkRequest::Landing),
        (Some(letter), Some(password)) => Ok(LinkRequest::Open(ShareLink::new(
            LetterId::new(letter)?,
            Passphrase::new(&password)?,
        ))),
        _ => Ok(LinkRequest::MissingParams),
    }
}

fn report_failure(failure: ReadFailure) -> ExitCode {
    eprintln!("{}", failure.title());
    eprintln!("{}", failure.hint());
    failure.exit_code()
}

fn print_letter(letter: &ParsedLetter, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{letter}"),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(letter).context("serializing letter")?;
            println!("{json}");
        }
    }
    Ok(())
}

// ── `billet parse` ────────────────────────────────────────────────────────────

async fn cmd_parse(file: &Path, format: OutputFormat) -> Result<ExitCode> {
    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("reading letter: {}", file.display()))?;
    print_letter(&billet_letter::parse(&content), format)?;
    Ok(ExitCode::SUCCESS)
}

// ── `billet link` ─────────────────────────────────────────────────────────────

fn cmd_link(
    config: &BilletConfig,
    letter: &str,
    password: &str,
    base_url: Option<&str>,
) -> Result<ExitCode> {
    let base_url = base_url
        .or(config.share.base_url.as_deref())
        .context("no reader URL: use --base-url or set share.base_url in config")?;
    let link = ShareLink::new(
        LetterId::new(letter).context("invalid letter identifier")?,
        Passphrase::new(password).context("invalid password")?,
    );
    println!("{}", link.to_url(base_url));
    Ok(ExitCode::SUCCESS)
}

// ── `billet list` ─────────────────────────────────────────────────────────────

async fn cmd_list(config: &BilletConfig) -> Result<ExitCode> {
    let store = open_store(config)?;
    let letters = store.list().await.context("listing letters")?;
    if letters.is_empty() {
        println!("no letters under {}", store.payload_dir());
    }
    for letter in letters {
        println!("{letter}");
    }
    Ok(ExitCode::SUCCESS)
}

// ── `billet config show` ──────────────────────────────────────────────────────

fn cmd_config_show(config: &BilletConfig, config_path: &Path) -> Result<ExitCode> {
    if config_path.exists() {
        println!("# Configuration from: {}", config_path.display());
    } else {
        println!("# Configuration: defaults (no file at {})", config_path.display());
    }
    println!();
    let rendered = toml::to_string_pretty(config).context("serializing config to TOML")?;
    print!("{rendered}");
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn open_accepts_link_or_positionals() {
        let cli = Cli::try_parse_from(["billet", "open", "--link", "https://x/?letter=a&password=b"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Open { link: Some(_), .. }));

        let cli = Cli::try_parse_from(["billet", "open", "a", "b", "--format", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Open { letter: Some(_), password: Some(_), format: OutputFormat::Json, .. }
        ));

        assert!(Cli::try_parse_from(["billet", "open", "a", "--link", "x"]).is_err());
    }

    #[test]
    fn positional_request_mirrors_link_rules() {
        assert!(matches!(request_from_args(None, None), Ok(LinkRequest::Landing)));
        assert!(matches!(
            request_from_args(Some("a".into()), None),
            Ok(LinkRequest::MissingParams)
        ));
        assert!(matches!(
            request_from_args(None, Some("pw".into())),
            Ok(LinkRequest::MissingParams)
        ));
        assert!(matches!(
            request_from_args(Some("My_Letter".into()), Some("pw".into())),
            Err(BilletError::ValidationFailed(_))
        ));
        assert!(matches!(
            request_from_args(Some("a".into()), Some("pw1".into())),
            Ok(LinkRequest::Open(_))
        ));
    }

    #[test]
    fn link_requires_a_base_url() {
        let config = BilletConfig::default();
        assert!(cmd_link(&config, "a", "b", None).is_err());
        assert!(cmd_link(&config, "a", "b", Some("https://example.com/")).is_ok());
        assert!(cmd_link(&config, "A", "b", Some("https://example.com/")).is_err());
    }

    #[tokio::test]
    async fn seal_command_succeeds_with_skipped_drafts() {
        let drafts = tempfile::tempdir().unwrap();
        std::fs::write(drafts.path().join("a.txt"), "abc123\nhello").unwrap();
        std::fs::write(drafts.path().join("b.txt"), "nope").unwrap();

        let mut config = BilletConfig::default();
        config.storage.backend = billet_core::config::StorageBackend::Memory;
        assert!(cmd_seal(&config, Some(drafts.path())).await.is_ok());
    }
}
