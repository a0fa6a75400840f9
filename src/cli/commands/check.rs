//! `sitepass check`: confirm the master secrets against the canary.

use crate::cli::output;
use crate::cli::prompt::TerminalOperator;
use crate::cli::{record_history, resolve_store, Cli};
use crate::errors::Result;
use crate::session;

/// Execute the `check` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (_, path) = resolve_store(cli)?;
    session::unlock(&mut TerminalOperator)?;
    record_history(&path, "check", None, None);
    output::success("Master secrets confirmed.");
    Ok(())
}
