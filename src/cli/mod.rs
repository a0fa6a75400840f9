//! CLI module: Clap argument parser, terminal prompts, output helpers, and
//! command implementations.

pub mod commands;
pub mod output;
pub mod prompt;

use std::path::PathBuf;

use clap::Parser;

use crate::config::Settings;
use crate::errors::{Result, SitepassError};

/// sitepass CLI: stateless site password generator.
#[derive(Parser)]
#[command(
    name = "sitepass",
    about = "Stateless site password generator",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the parameter store (default: sites.csv, or as set in .sitepass.toml)
    #[arg(long, env = "SITEPASS_STORE", global = true)]
    pub store: Option<PathBuf>,

    /// Print diagnostic logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Derive a password for a new site and record its parameters
    New {
        /// Copy the accepted password to the clipboard
        #[arg(long)]
        copy: bool,
    },

    /// Derive the password of a stored site again
    Show {
        /// Site name as stored
        site: String,
        /// Also print the full base-85 alphabet
        #[arg(long)]
        alphabet: bool,
        /// Copy the password to the clipboard instead of printing it
        #[arg(long)]
        copy: bool,
    },

    /// List stored sites (no master secrets needed)
    List {
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the self-check canary for your master secrets
    Check,

    /// View the history of operations
    #[cfg(feature = "audit-log")]
    History {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings from the working directory and resolve the store path.
pub fn resolve_store(cli: &Cli) -> Result<(Settings, PathBuf)> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    let path = settings.store_path(&cwd, cli.store.as_deref());
    tracing::debug!(path = %path.display(), "resolved parameter store");
    Ok((settings, path))
}

/// Put `text` on the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| SitepassError::CommandFailed(format!("clipboard unavailable: {e}")))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| SitepassError::CommandFailed(format!("clipboard write: {e}")))
}

/// Record an operation in the history next to the store.
#[cfg(feature = "audit-log")]
pub fn record_history(store: &std::path::Path, op: &str, site: Option<&str>, details: Option<&str>) {
    crate::audit::log_audit(store, op, site, details);
}

#[cfg(not(feature = "audit-log"))]
pub fn record_history(
    _store: &std::path::Path,
    _op: &str,
    _site: Option<&str>,
    _details: Option<&str>,
) {
}
