//! housekeep - watch a projects folder for heavy build and dependency directories.
//!
//! Usage:
//!   housekeep status          Show the saved folder and whether it is still usable
//!   housekeep check <PATH>    Check whether a folder may be watched
//!   housekeep forget          Clear the saved folder
//!   housekeep --help          Show help

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, bail};

use housekeep_core::{JsonSettingsStore, SafetyValidator, SessionConfig, SettingsStore};

#[derive(Parser)]
#[command(
    name = "housekeep",
    version,
    about = "Find the heavy build and dependency folders in your projects",
    long_about = "housekeep remembers one projects folder and reports the node_modules, \
                  target, and similar directories inside it.\n\n\
                  These subcommands inspect and manage the saved folder."
)]
struct Cli {
    /// Use this settings file instead of the per-user default
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the saved folder and whether it can still be scanned
    Status,

    /// Check whether a folder is safe to watch
    Check {
        /// Folder to check
        path: PathBuf,
    },

    /// Clear the saved folder
    Forget,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let config = SessionConfig::default();

    match cli.command {
        Command::Status => {
            let store = open_store(cli.settings)?;
            run_status(&store, &config).await?;
        }
        Command::Check { path } => {
            run_check(&path)?;
        }
        Command::Forget => {
            let store = open_store(cli.settings)?;
            store
                .delete(&config.settings_key)
                .await
                .wrap_err("Failed to clear saved folder")?;
            println!("Saved folder cleared.");
        }
    }

    Ok(())
}

fn open_store(path: Option<PathBuf>) -> Result<JsonSettingsStore> {
    let store = match path {
        Some(path) => JsonSettingsStore::open(path),
        None => JsonSettingsStore::open_default(),
    };
    store.wrap_err("Failed to open settings")
}

async fn run_status(store: &JsonSettingsStore, config: &SessionConfig) -> Result<()> {
    let saved = store
        .get(&config.settings_key)
        .await
        .wrap_err("Failed to read settings")?;

    println!(" Settings:  {}", store.path().display());
    println!(" Timeout:   {}s", config.scan_timeout().as_secs());

    let Some(saved) = saved else {
        println!(" Folder:    (none)");
        return Ok(());
    };

    println!(" Folder:    {saved}");
    let validation = SafetyValidator::new().check(Path::new(&saved));
    match validation.reason {
        None => println!(" Status:    ok"),
        Some(reason) => {
            println!(" Status:    unusable: {reason}");
            println!();
            println!(" Run `housekeep forget` to clear it.");
        }
    }

    Ok(())
}

fn run_check(path: &Path) -> Result<()> {
    let validation = SafetyValidator::new().check(path);
    tracing::debug!(path = %path.display(), valid = validation.valid, "checked folder");

    if !validation.valid {
        bail!(
            "{} cannot be watched: {}",
            path.display(),
            validation.reason.as_deref().unwrap_or("unknown reason")
        );
    }

    println!("{} can be watched.", path.display());
    Ok(())
}
