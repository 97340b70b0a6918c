//! tglog - send log notifications to Telegram from the command line

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use telegram_logger::cli::{
    handle_card, handle_check, handle_send, resolve_options, CardArgs, CheckArgs, SendArgs,
};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "tglog")]
#[command(about = "Send formatted log notifications to a Telegram chat")]
#[command(version)]
struct Cli {
    /// JSON config file (default: ~/.config/tglog.json; TELEGRAM_* env vars override it)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a log message
    Send(SendArgs),
    /// Send a card with title, message and extra fields
    Card(CardArgs),
    /// Validate the configuration and print it (token masked)
    Check(CheckArgs),
}

fn main() -> Result<()> {
    // RUST_LOG controls verbosity, e.g. RUST_LOG=debug tglog send "hi"
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("telegram_logger=info,tglog=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();
    let options = resolve_options(cli.config.as_deref())?;

    match cli.command {
        Commands::Send(args) => handle_send(options, args)?,
        Commands::Card(args) => handle_card(options, args)?,
        Commands::Check(args) => handle_check(options, args)?,
    }

    Ok(())
}
