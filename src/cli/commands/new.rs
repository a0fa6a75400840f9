//! `sitepass new`: derive a password for a new site and record its
//! parameters.

use chrono::Local;

use crate::cli::output;
use crate::cli::prompt::{prompt_site, TerminalOperator};
use crate::cli::{copy_to_clipboard, record_history, resolve_store, Cli};
use crate::errors::{Result, SitepassError};
use crate::session;
use crate::store::ParameterStore;

/// Execute the `new` command.
pub fn execute(cli: &Cli, copy: bool) -> Result<()> {
    let (settings, path) = resolve_store(cli)?;

    // 1. Load the store first so a broken file fails before any prompt.
    let mut store = ParameterStore::load(&path)?;

    // 2. Master secrets, confirmed against the canary.
    let mut operator = TerminalOperator;
    let secrets = session::unlock(&mut operator)?;

    // 3. Site parameters.
    let record = prompt_site(&settings)?;
    if let Some(notice) = existing_row_notice(&store, &record.site_name) {
        output::warning(&notice);
    }

    // 4. Derive and refine until the operator accepts the password.
    let (record, derivation) = session::refine_until_accepted(&mut operator, &secrets, record)?;

    // 5. Persist the parameters (never the password).
    let record = session::commit(
        &mut operator,
        &mut store,
        record,
        Local::now().date_naive(),
    )?;

    if copy {
        copy_to_clipboard(derivation.password())?;
        output::success("Password copied to clipboard.");
    }

    record_history(
        &path,
        "new",
        Some(&record.site_name),
        Some(&format!("mode {}, {} chars", record.mode, record.length)),
    );

    output::success(&format!(
        "Saved parameters for '{}' to {} ({} rows)",
        record.site_name,
        path.display(),
        store.len()
    ));
    output::tip(&format!(
        "Run `sitepass show {}` to derive it again.",
        record.site_name
    ));

    Ok(())
}

/// Warning to show when `site` already has a row in `store`.
fn existing_row_notice(store: &ParameterStore, site: &str) -> Option<String> {
    match store.find(site) {
        Ok(_) => Some(format!(
            "'{site}' already has stored parameters; the new row will supersede them."
        )),
        Err(SitepassError::SiteNotFound(_)) => None,
        Err(e) => Some(format!(
            "'{site}' has an unreadable stored row ({e}); the new row will supersede it."
        )),
    }
}
