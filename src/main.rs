//! Lecturas main entry point
//!
//! Command-line interface for the daily readings scraper.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use lecturas::config::{load_config_or_default, Config, FetchMode};
use lecturas::readings::ReadingsService;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Lecturas: daily liturgical readings from Vatican News
///
/// Fetches the first reading and the gospel for a date and prints them as
/// JSON, or serves them over HTTP.
#[derive(Parser, Debug)]
#[command(name = "lecturas")]
#[command(version = "1.0.0")]
#[command(about = "Daily liturgical readings scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override the fetch transport from the configuration
    #[arg(long, value_enum, global = true)]
    mode: Option<ModeArg>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the readings for a date and print the result as JSON
    Fetch {
        /// Date in YYYY-MM-DD format (today when omitted)
        #[arg(long)]
        fecha: Option<String>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Validate the date and show the URL that would be fetched
        #[arg(long)]
        dry_run: bool,
    },

    /// Serve the readings over HTTP
    Serve {
        /// Address to listen on (overrides the configuration)
        #[arg(long)]
        bind: Option<String>,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ModeArg {
    Direct,
    Rendered,
}

impl From<ModeArg> for FetchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Direct => FetchMode::Direct,
            ModeArg::Rendered => FetchMode::Rendered,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = load_config_or_default(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Invalid default configuration".to_string(),
    })?;

    if let Some(mode) = cli.mode {
        config.fetch.mode = mode.into();
    }

    match cli.command.unwrap_or(Command::Fetch {
        fecha: None,
        pretty: false,
        dry_run: false,
    }) {
        Command::Fetch {
            fecha,
            pretty,
            dry_run,
        } => handle_fetch(&config, fecha, pretty, dry_run).await,
        Command::Serve { bind } => handle_serve(config, bind).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("lecturas=info,warn"),
            1 => EnvFilter::new("lecturas=debug,info"),
            2 => EnvFilter::new("lecturas=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles `fetch`: prints the envelope, exit code 1 on a failure envelope
async fn handle_fetch(
    config: &Config,
    fecha: Option<String>,
    pretty: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let fecha = fecha.unwrap_or_else(lecturas::date::today);
    let service = ReadingsService::from_config(config)?;

    if dry_run {
        let url = service.resolve_url(&fecha)?;
        println!("Date:      {}", fecha);
        println!("URL:       {}", url);
        println!("Transport: {}", service.mode());
        if service.mode() == FetchMode::Rendered {
            let token = config.browser.token();
            println!(
                "Browser:   {}",
                match token {
                    Some(_) => format!("remote ({}), local fallback: {}", config.browser.endpoint, config.browser.local_fallback),
                    None => "local (no token configured)".to_string(),
                }
            );
        }
        return Ok(());
    }

    let envelope = service.get_readings(&fecha).await;
    let output = if pretty {
        serde_json::to_string_pretty(&envelope)?
    } else {
        serde_json::to_string(&envelope)?
    };
    println!("{}", output);

    if !envelope.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

/// Handles `serve`: runs the HTTP API
async fn handle_serve(config: Config, bind: Option<String>) -> anyhow::Result<()> {
    let bind = bind.unwrap_or_else(|| config.server.bind.clone());
    let service = ReadingsService::from_config(&config)?;

    lecturas::server::serve(service, &bind)
        .await
        .with_context(|| format!("HTTP server on {} failed", bind))
}
