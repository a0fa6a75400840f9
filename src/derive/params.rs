//! Derivation inputs: alphabet mode, case lock, and the per-site parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SitepassError};

/// Default output length.
pub const DEFAULT_LENGTH: usize = 20;

/// Default window offset. Historical records start one character in.
pub const DEFAULT_START: usize = 1;

/// Which character classes survive filtering of the encoded digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Full base-85 output: letters, digits and punctuation.
    #[default]
    Ans,
    /// Base-85 restricted to ASCII letters and digits.
    An,
    /// Base-85 restricted to ASCII letters.
    A,
    /// Digits taken from the base-64 encoding of the same digest.
    N,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Ans, Mode::An, Mode::A, Mode::N];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Ans => "ans",
            Mode::An => "an",
            Mode::A => "a",
            Mode::N => "n",
        }
    }

    /// Whether `c` is kept by this mode's filter.
    pub fn keeps(self, c: char) -> bool {
        match self {
            Mode::Ans => true,
            Mode::An => c.is_ascii_alphanumeric(),
            Mode::A => c.is_ascii_alphabetic(),
            Mode::N => c.is_ascii_digit(),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = SitepassError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ans" => Ok(Mode::Ans),
            "an" => Ok(Mode::An),
            "a" => Ok(Mode::A),
            "n" => Ok(Mode::N),
            other => Err(SitepassError::UnsupportedMode(other.to_string())),
        }
    }
}

/// Case lock applied to the filtered alphabet.
///
/// Stored as the tri-state token `both` / `upper` / `lower`. Older stores
/// carry two independent `upper` / `lower` booleans instead; see
/// [`CaseMode::from_flags`] for how those map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    #[default]
    #[serde(rename = "both")]
    Mixed,
    Upper,
    Lower,
}

impl CaseMode {
    pub const ALL: [CaseMode; 3] = [CaseMode::Mixed, CaseMode::Upper, CaseMode::Lower];

    pub fn as_str(self) -> &'static str {
        match self {
            CaseMode::Mixed => "both",
            CaseMode::Upper => "upper",
            CaseMode::Lower => "lower",
        }
    }

    /// Map the legacy boolean pair onto a case lock.
    ///
    /// Neither set is `Mixed`. Both set is rejected rather than resolved.
    pub fn from_flags(upper: bool, lower: bool) -> Result<Self> {
        match (upper, lower) {
            (false, false) => Ok(CaseMode::Mixed),
            (true, false) => Ok(CaseMode::Upper),
            (false, true) => Ok(CaseMode::Lower),
            (true, true) => Err(SitepassError::ConflictingCaseLock),
        }
    }

    pub(crate) fn apply(self, text: &mut String) {
        match self {
            CaseMode::Mixed => {}
            CaseMode::Upper => text.make_ascii_uppercase(),
            CaseMode::Lower => text.make_ascii_lowercase(),
        }
    }
}

impl fmt::Display for CaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseMode {
    type Err = SitepassError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "both" | "mixed" => Ok(CaseMode::Mixed),
            "upper" => Ok(CaseMode::Upper),
            "lower" => Ok(CaseMode::Lower),
            other => Err(SitepassError::InvalidCaseMode(other.to_string())),
        }
    }
}

/// Everything besides the master secrets that shapes a derived password.
///
/// Only `seed` enters the hash; the rest is post-processing and carries no
/// secrecy requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationParams {
    pub seed: String,
    /// Output length (`plen`).
    pub length: usize,
    /// Alphabet mode (`char`).
    pub mode: Mode,
    /// Characters stripped before windowing (`rm_cha`).
    pub removed: String,
    /// Window offset into the filtered alphabet.
    pub start: usize,
    pub case: CaseMode,
}

impl DerivationParams {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            length: DEFAULT_LENGTH,
            mode: Mode::default(),
            removed: String::new(),
            start: DEFAULT_START,
            case: CaseMode::default(),
        }
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_removed(mut self, removed: impl Into<String>) -> Self {
        self.removed = removed.into();
        self
    }

    pub fn with_start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    pub fn with_case(mut self, case: CaseMode) -> Self {
        self.case = case;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.length == 0 {
            return Err(SitepassError::InvalidParameter(
                "password length must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
