//! `sitepass show`: derive the password of a stored site again.

use crate::cli::output;
use crate::cli::prompt::TerminalOperator;
use crate::cli::{copy_to_clipboard, record_history, resolve_store, Cli};
use crate::derive::derive;
use crate::errors::Result;
use crate::session;
use crate::store::ParameterStore;

/// Execute the `show` command.
pub fn execute(cli: &Cli, site: &str, show_alphabet: bool, copy: bool) -> Result<()> {
    let (_, path) = resolve_store(cli)?;

    // Look up and validate the stored parameters before asking for secrets.
    let store = ParameterStore::load(&path)?;
    let record = store.find(site)?;
    let params = record.params();
    params.validate()?;

    let secrets = session::unlock(&mut TerminalOperator)?;
    let derivation = derive(&secrets, &params)?;

    if !record.account_id.is_empty() {
        output::info(&format!("Account: {}", record.account_id));
    }
    if let Some(truncation) = derivation.truncation() {
        output::warning(&truncation.to_string());
    }

    if copy {
        copy_to_clipboard(derivation.password())?;
        output::success(&format!("Password for '{site}' copied to clipboard."));
    } else {
        println!("{}", derivation.password());
    }

    if show_alphabet {
        println!("{}", derivation.alphabet());
    }

    record_history(&path, "show", Some(site), None);

    Ok(())
}
