//! Operator-facing session flow around the derivation engine.
//!
//! The engine never talks to a terminal. Everything interactive goes
//! through the [`Operator`] trait: the CLI plugs in a terminal
//! implementation, tests plug in scripted ones.

use std::path::Path;

use chrono::NaiveDate;

use crate::derive::{canary, derive, Derivation, MasterSecrets};
use crate::errors::Result;
use crate::store::{ParameterStore, SiteRecord};

/// Source of master secrets and decisions during a session.
pub trait Operator {
    /// Ask for both master secrets.
    fn master_secrets(&mut self) -> Result<MasterSecrets>;

    /// Show the canary; `true` if it matches the memorised value.
    fn confirm_canary(&mut self, canary: &str) -> Result<bool>;

    /// Show a candidate password; `true` if it satisfies the site's policy.
    fn accept_password(&mut self, derivation: &Derivation) -> Result<bool>;

    /// Tighten the record after a rejected candidate. `alphabet` is the
    /// full base-85 string, shown so the operator can pick a new window.
    fn refine(&mut self, record: &mut SiteRecord, alphabet: &str) -> Result<()>;

    /// The store at `path` is locked. Return `Ok` to retry the save.
    fn release_lock(&mut self, path: &Path) -> Result<()>;
}

/// Acquire master secrets, repeating entry until the canary is confirmed.
pub fn unlock<O: Operator + ?Sized>(operator: &mut O) -> Result<MasterSecrets> {
    let mut attempt = 1u32;
    loop {
        let secrets = operator.master_secrets()?;
        let check = canary(&secrets)?;
        if operator.confirm_canary(check.password())? {
            tracing::debug!(attempt, "master secrets confirmed");
            return Ok(secrets);
        }
        tracing::debug!(attempt, "canary rejected, asking again");
        attempt += 1;
    }
}

/// Derive for `record` until the operator accepts the candidate.
///
/// Each rejection lets the operator adjust the record, then derives again
/// with the same secrets. Nothing is persisted here.
pub fn refine_until_accepted<O: Operator + ?Sized>(
    operator: &mut O,
    secrets: &MasterSecrets,
    mut record: SiteRecord,
) -> Result<(SiteRecord, Derivation)> {
    loop {
        let derivation = derive(secrets, &record.params())?;
        if operator.accept_password(&derivation)? {
            return Ok((record, derivation));
        }
        operator.refine(&mut record, derivation.alphabet())?;
    }
}

/// Stamp `record` with `today` and append it to `store`, asking the
/// operator to release the file whenever it is locked.
pub fn commit<O: Operator + ?Sized>(
    operator: &mut O,
    store: &mut ParameterStore,
    mut record: SiteRecord,
    today: NaiveDate,
) -> Result<SiteRecord> {
    record.updated = Some(today);
    store.commit(&record, |path| operator.release_lock(path))?;
    tracing::debug!(site = %record.site_name, "committed site parameters");
    Ok(record)
}
