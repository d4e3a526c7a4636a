mod commands;
mod error;
mod session;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{completions, contacts, Context};
use crate::error::{exit_code_for, invalid_input, report_error};
use dialbook_config::{self as config, SourceConfig};

#[derive(Debug, Parser)]
#[command(name = "dialbook", version, about = "dialbook CLI")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Contact source: vcf:PATH, json:PATH, macos or macos:GROUP
    #[arg(long, global = true, value_name = "SOURCE")]
    source: Option<SourceConfig>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
    /// List contacts, optionally filtered by name or phone digits
    List(contacts::ListArgs),
    /// Show the phone numbers and emails of one contact
    Show(contacts::ShowArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        source,
        json,
        verbose,
        command,
    } = cli;

    if let Command::Completions(args) = command {
        return completions::emit(args);
    }

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) => {
                if path.exists() {
                    debug!(path = %path.display(), "config resolved");
                } else {
                    debug!(path = %path.display(), "config missing, using defaults");
                }
            }
            Err(err) => {
                debug!(error = %err, "config unavailable");
            }
        }
    }

    let source = source.or_else(|| app_config.source.clone()).ok_or_else(|| {
        invalid_input("no contact source configured: pass --source or set [source] in config")
    })?;
    debug!(%source, "contact source resolved");

    let mut session = session::load_session(&source)?;
    session.ensure_granted()?;

    let mut ctx = Context {
        session: &mut session,
        json,
        config: &app_config,
    };

    match command {
        Command::List(args) => contacts::list_contacts(&mut ctx, args),
        Command::Show(args) => contacts::show_contact(&mut ctx, args),
        Command::Completions(_) => {
            unreachable!("completions command handled before loading contacts")
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
