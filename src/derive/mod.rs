//! Password derivation.
//!
//! This module provides:
//! - Base-85 and base-64 digest encodings (`encoding`)
//! - Mode, case lock and per-site parameter types (`params`)
//! - The SHA-512 derivation engine (`engine`)
//! - The fixed self-check canary (`canary`)

pub mod canary;
pub mod encoding;
pub mod engine;
pub mod params;

// Re-export the most commonly used items.
pub use canary::{canary, canary_params};
pub use engine::{derive, Derivation, MasterSecrets, Truncation};
pub use params::{CaseMode, DerivationParams, Mode, DEFAULT_LENGTH, DEFAULT_START};
