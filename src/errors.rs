use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in sitepass.
#[derive(Debug, Error)]
pub enum SitepassError {
    // --- Derivation errors ---
    #[error("Unsupported mode '{0}' (expected one of: ans, an, a, n)")]
    UnsupportedMode(String),

    #[error("Invalid case lock '{0}' (expected one of: both, upper, lower)")]
    InvalidCaseMode(String),

    #[error("Conflicting case lock: upper and lower cannot both be set")]
    ConflictingCaseLock,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    // --- Store errors ---
    #[error("Parameter store {0} is locked by another process")]
    StoreLocked(PathBuf),

    #[error("Invalid parameter store: {0}")]
    InvalidStore(String),

    #[error("Site '{0}' not found in the parameter store")]
    SiteNotFound(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,

    #[error("Audit error: {0}")]
    AuditError(String),
}

/// Convenience type alias for sitepass results.
pub type Result<T> = std::result::Result<T, SitepassError>;
