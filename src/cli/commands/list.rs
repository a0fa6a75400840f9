//! `sitepass list`: display stored sites in a table.

use crate::cli::output;
use crate::cli::{resolve_store, Cli};
use crate::errors::{Result, SitepassError};
use crate::store::{ParameterStore, SiteRecord};

/// Execute the `list` command.
pub fn execute(cli: &Cli, json: bool) -> Result<()> {
    let (_, path) = resolve_store(cli)?;
    let store = ParameterStore::load(&path)?;

    let mut sites: Vec<SiteRecord> = Vec::new();
    for record in store.latest() {
        match record {
            Ok(r) => sites.push(r),
            Err(e) => output::warning(&format!("Skipping unreadable row: {e}")),
        }
    }

    if json {
        let rendered = serde_json::to_string_pretty(&sites)
            .map_err(|e| SitepassError::CommandFailed(format!("json: {e}")))?;
        println!("{rendered}");
        return Ok(());
    }

    output::info(&format!("{}: {} site(s)", path.display(), sites.len()));
    output::print_sites_table(&sites);

    Ok(())
}
