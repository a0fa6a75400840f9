//! Self-check canary.
//!
//! There is no way to tell a mistyped master secret from a correct one: any
//! pair of secrets derives *some* password for every site. The only guard is
//! a fixed canary the operator memorises and compares on every unlock. Its
//! parameters are frozen so remembered canaries stay valid forever.

use super::engine::{derive, Derivation, MasterSecrets};
use super::params::{CaseMode, DerivationParams, Mode};
use crate::errors::Result;

pub const CANARY_SEED: &str = "1234";
pub const CANARY_LENGTH: usize = 20;
pub const CANARY_START: usize = 1;

/// Parameters of the canary derivation.
pub fn canary_params() -> DerivationParams {
    DerivationParams {
        seed: CANARY_SEED.to_string(),
        length: CANARY_LENGTH,
        mode: Mode::Ans,
        removed: String::new(),
        start: CANARY_START,
        case: CaseMode::Mixed,
    }
}

/// Derive the canary for `secrets`.
pub fn canary(secrets: &MasterSecrets) -> Result<Derivation> {
    derive(secrets, &canary_params())
}
