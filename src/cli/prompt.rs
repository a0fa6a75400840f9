//! Terminal prompts: the interactive `Operator` and site parameter entry.

use std::path::Path;

use console::style;
use dialoguer::{Confirm, Input, Password, Select};

use crate::cli::output;
use crate::config::Settings;
use crate::derive::{CaseMode, Derivation, MasterSecrets, Mode};
use crate::errors::{Result, SitepassError};
use crate::session::Operator;
use crate::store::SiteRecord;

fn prompt_error(e: dialoguer::Error) -> SitepassError {
    SitepassError::CommandFailed(format!("prompt: {e}"))
}

/// `Operator` backed by the controlling terminal.
pub struct TerminalOperator;

impl Operator for TerminalOperator {
    fn master_secrets(&mut self) -> Result<MasterSecrets> {
        let first = Password::new()
            .with_prompt("Master secret 1")
            .interact()
            .map_err(prompt_error)?;
        let second = Password::new()
            .with_prompt("Master secret 2")
            .interact()
            .map_err(prompt_error)?;
        Ok(MasterSecrets::new(first, second))
    }

    fn confirm_canary(&mut self, canary: &str) -> Result<bool> {
        println!("Canary: {}", style(canary).bold());
        let matches = Confirm::new()
            .with_prompt("Does the canary match the one you remember?")
            .default(false)
            .interact()
            .map_err(prompt_error)?;
        if !matches {
            output::warning("Canary mismatch, enter the master secrets again.");
        }
        Ok(matches)
    }

    fn accept_password(&mut self, derivation: &Derivation) -> Result<bool> {
        println!("Password: {}", style(derivation.password()).bold());
        if let Some(truncation) = derivation.truncation() {
            output::warning(&truncation.to_string());
        }
        Confirm::new()
            .with_prompt("Does this password satisfy the site's rules?")
            .default(true)
            .interact()
            .map_err(prompt_error)
    }

    fn refine(&mut self, record: &mut SiteRecord, alphabet: &str) -> Result<()> {
        println!("All characters: {alphabet}");

        record.length = Input::<usize>::new()
            .with_prompt("Length")
            .default(record.length)
            .validate_with(positive)
            .interact_text()
            .map_err(prompt_error)?;

        record.start = Input::<usize>::new()
            .with_prompt("Start offset")
            .default(record.start)
            .interact_text()
            .map_err(prompt_error)?;

        // Pre-filled rather than defaulted: clearing the line clears the set.
        let removed = Input::<String>::new()
            .with_prompt("Characters to remove")
            .allow_empty(true)
            .with_initial_text(record.removed.clone())
            .interact_text()
            .map_err(prompt_error)?;
        record.removed = removal_set(&removed);

        let current = CaseMode::ALL
            .iter()
            .position(|c| *c == record.case)
            .unwrap_or(0);
        let picked = Select::new()
            .with_prompt("Case lock")
            .items(&CaseMode::ALL.map(CaseMode::as_str))
            .default(current)
            .interact()
            .map_err(prompt_error)?;
        record.case = CaseMode::ALL[picked];

        Ok(())
    }

    fn release_lock(&mut self, path: &Path) -> Result<()> {
        output::warning(&format!(
            "{} is locked by another program. Close it to continue.",
            path.display()
        ));
        let retry = Confirm::new()
            .with_prompt("Retry saving?")
            .default(true)
            .interact()
            .map_err(prompt_error)?;
        if retry {
            Ok(())
        } else {
            Err(SitepassError::UserCancelled)
        }
    }
}

/// Ask for the parameters of a new site.
pub fn prompt_site(settings: &Settings) -> Result<SiteRecord> {
    let site_name: String = Input::new()
        .with_prompt("Site name")
        .validate_with(non_empty)
        .interact_text()
        .map_err(prompt_error)?;

    let account_id: String = Input::new()
        .with_prompt("Account id (optional)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_error)?;

    let seed: String = Input::new()
        .with_prompt("Seed")
        .validate_with(non_empty)
        .interact_text()
        .map_err(prompt_error)?;

    let length = Input::<usize>::new()
        .with_prompt("Length")
        .default(settings.default_length)
        .validate_with(positive)
        .interact_text()
        .map_err(prompt_error)?;

    let default_mode = Mode::ALL
        .iter()
        .position(|m| *m == settings.default_mode)
        .unwrap_or(0);
    let picked = Select::new()
        .with_prompt("Characters (ans = letters, digits, symbols)")
        .items(&Mode::ALL.map(Mode::as_str))
        .default(default_mode)
        .interact()
        .map_err(prompt_error)?;

    let mut record = SiteRecord::new(site_name.trim(), seed);
    record.account_id = account_id;
    record.length = length;
    record.mode = Mode::ALL[picked];
    record.start = settings.default_start;
    Ok(record)
}

/// Characters to remove, in first-seen order, without repeats or whitespace.
fn removal_set(input: &str) -> String {
    let mut set = String::new();
    for c in input.chars().filter(|c| !c.is_whitespace()) {
        if !set.contains(c) {
            set.push(c);
        }
    }
    set
}

#[allow(clippy::ptr_arg)]
fn non_empty(input: &String) -> std::result::Result<(), &'static str> {
    if input.trim().is_empty() {
        Err("value cannot be empty")
    } else {
        Ok(())
    }
}

fn positive(n: &usize) -> std::result::Result<(), &'static str> {
    if *n == 0 {
        Err("length must be at least 1")
    } else {
        Ok(())
    }
}
