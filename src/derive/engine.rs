//! The derivation engine: two master secrets plus a site seed in, a site
//! password and the full base-85 alphabet out.
//!
//! ```text
//! digest   = SHA-512(master1 || seed || master2)
//! alphabet = b85(digest)
//! filtered = mode(n ? b64(digest) : alphabet) -> case lock -> remove rm_cha
//! password = filtered[start .. start + plen]
//! ```
//!
//! No state, no I/O. Secret material lives in `Zeroizing` buffers and never
//! reaches a `Debug` or `Display` impl.

use std::fmt;

use sha2::{Digest, Sha512};
use zeroize::Zeroizing;

use super::encoding::{b64encode, b85encode};
use super::params::{DerivationParams, Mode};
use crate::errors::Result;

/// Size of the SHA-512 digest in bytes.
const DIGEST_LEN: usize = 64;

/// The two master secrets. Held in memory for one session, never persisted.
pub struct MasterSecrets {
    first: Zeroizing<String>,
    second: Zeroizing<String>,
}

impl MasterSecrets {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: Zeroizing::new(first.into()),
            second: Zeroizing::new(second.into()),
        }
    }
}

impl fmt::Debug for MasterSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterSecrets")
            .field("first", &"<redacted>")
            .field("second", &"<redacted>")
            .finish()
    }
}

/// The filtered alphabet was shorter than `start + plen`, so the password
/// came out shorter than configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    pub requested: usize,
    pub produced: usize,
}

impl fmt::Display for Truncation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "password truncated to {} of {} requested characters; lower the start offset or remove fewer characters",
            self.produced, self.requested
        )
    }
}

/// Output of one derivation.
pub struct Derivation {
    password: Zeroizing<String>,
    alphabet: Zeroizing<String>,
    requested: usize,
}

impl Derivation {
    /// The windowed site password.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// The full base-85 encoding of the digest, whatever mode was requested.
    pub fn alphabet(&self) -> &str {
        &self.alphabet
    }

    /// `Some` when fewer than `plen` characters were produced.
    pub fn truncation(&self) -> Option<Truncation> {
        let produced = self.password.chars().count();
        (produced < self.requested).then_some(Truncation {
            requested: self.requested,
            produced,
        })
    }
}

impl fmt::Debug for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Derivation")
            .field("password", &"<redacted>")
            .field("alphabet", &"<redacted>")
            .field("requested", &self.requested)
            .finish()
    }
}

/// Derive the site password for `params` under `secrets`.
///
/// Deterministic: the same inputs give byte-identical output on every
/// platform. Fails only on invalid parameters, before any hashing.
pub fn derive(secrets: &MasterSecrets, params: &DerivationParams) -> Result<Derivation> {
    params.validate()?;

    let digest = digest(secrets, &params.seed);
    let alphabet = Zeroizing::new(b85encode(&digest[..]));

    let source = match params.mode {
        Mode::N => Zeroizing::new(b64encode(&digest[..])),
        _ => alphabet.clone(),
    };
    let mut filtered: Zeroizing<String> =
        Zeroizing::new(source.chars().filter(|&c| params.mode.keeps(c)).collect());

    params.case.apply(&mut filtered);

    if !params.removed.is_empty() {
        filtered.retain(|c| !params.removed.contains(c));
    }

    let password: Zeroizing<String> = Zeroizing::new(
        filtered
            .chars()
            .skip(params.start)
            .take(params.length)
            .collect(),
    );

    tracing::debug!(
        mode = %params.mode,
        case = %params.case,
        start = params.start,
        length = params.length,
        removed = params.removed.chars().count(),
        filtered = filtered.chars().count(),
        "derived site password"
    );

    Ok(Derivation {
        password,
        alphabet,
        requested: params.length,
    })
}

/// SHA-512 over the UTF-8 bytes of `first || seed || second`.
///
/// The order is fixed: swapping the two masters gives a different digest.
fn digest(secrets: &MasterSecrets, seed: &str) -> Zeroizing<[u8; DIGEST_LEN]> {
    let hash = Sha512::new()
        .chain_update(secrets.first.as_bytes())
        .chain_update(seed.as_bytes())
        .chain_update(secrets.second.as_bytes())
        .finalize();

    let mut out = Zeroizing::new([0u8; DIGEST_LEN]);
    out.copy_from_slice(&hash);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::params::CaseMode;

    fn secrets() -> MasterSecrets {
        MasterSecrets::new("alpha", "beta")
    }

    const EXAMPLE_ALPHABET: &str =
        "<12MjwVdA4Vy@F~EI&2#o1G0je>Hoh5~u(+iIDWZhB)I2MAfj2LXI_G95`~Hz%Am}pOecsHeZcw4-b45";

    #[test]
    fn digest_is_sha512_of_concatenation() {
        let d = digest(&secrets(), "1234");
        let hex: String = d.iter().map(|b| format!("{b:02x}")).collect();
        assert_eq!(
            hex,
            "5cd1aa59dfaf2cb033767b8ced8316a79f08c62aac97989b0e885ab6bab6055c\
             04d3c3f8fdd23a02a8a8335ea22542863329bf0381bd25334128dd2ce8b1d084"
        );
    }

    #[test]
    fn test_regression_canary_vector() {
        let out = derive(&secrets(), &DerivationParams::new("1234")).unwrap();
        assert_eq!(out.password(), "+ymo->)pNGj@B7?SmGlp");
        assert_eq!(
            out.alphabet(),
            "T+ymo->)pNGj@B7?SmGlp9sb(te2RZ4v1Q|y0!&e1k=O#{n9!DsHihuq9sCxGbz6VfxRU&K`7lU=&{g*"
        );
        assert!(out.truncation().is_none());
    }

    #[test]
    fn test_regression_alphanumeric() {
        let params = DerivationParams::new("example.com").with_mode(Mode::An);
        let out = derive(&secrets(), &params).unwrap();
        assert_eq!(out.password(), "2MjwVdA4VyFEI2o1G0je");
        assert_eq!(out.alphabet(), EXAMPLE_ALPHABET);
    }

    #[test]
    fn test_regression_letters() {
        let params = DerivationParams::new("example.com").with_mode(Mode::A);
        let out = derive(&secrets(), &params).unwrap();
        assert_eq!(out.password(), "jwVdAVyFEIoGjeHohuiI");
    }

    #[test]
    fn test_regression_digits_come_from_base64() {
        let params = DerivationParams::new("example.com").with_mode(Mode::N);
        let out = derive(&secrets(), &params).unwrap();
        assert_eq!(out.password(), "173818596831524198");
        // 19 digits in total, start = 1 leaves 18.
        assert_eq!(
            out.truncation(),
            Some(Truncation {
                requested: 20,
                produced: 18
            })
        );
        assert_eq!(out.alphabet(), EXAMPLE_ALPHABET);
    }

    #[test]
    fn case_lock_runs_before_removal() {
        let params = DerivationParams::new("example.com")
            .with_start(0)
            .with_length(16)
            .with_case(CaseMode::Upper)
            .with_removed("!#$%&");
        let out = derive(&secrets(), &params).unwrap();
        assert_eq!(out.password(), "<12MJWVDA4VY@F~E");
    }

    #[test]
    fn lower_lock_on_alphanumeric() {
        let params = DerivationParams::new("example.com")
            .with_mode(Mode::An)
            .with_start(0)
            .with_length(12)
            .with_case(CaseMode::Lower);
        let out = derive(&secrets(), &params).unwrap();
        assert_eq!(out.password(), "12mjwvda4vyf");
    }

    #[test]
    fn window_past_end_is_empty_and_truncated() {
        let params = DerivationParams::new("example.com").with_start(500);
        let out = derive(&secrets(), &params).unwrap();
        assert_eq!(out.password(), "");
        assert_eq!(out.truncation().unwrap().produced, 0);
    }

    #[test]
    fn zero_length_fails_before_hashing() {
        let params = DerivationParams::new("example.com").with_length(0);
        assert!(derive(&secrets(), &params).is_err());
    }

    #[test]
    fn debug_output_is_redacted() {
        let s = secrets();
        let dbg = format!("{s:?}");
        assert!(!dbg.contains("alpha") && !dbg.contains("beta"));

        let out = derive(&s, &DerivationParams::new("1234")).unwrap();
        let dbg = format!("{out:?}");
        assert!(!dbg.contains(out.password()));
        assert!(dbg.contains("redacted"));
    }

    #[test]
    fn truncation_message_names_both_counts() {
        let t = Truncation {
            requested: 20,
            produced: 7,
        };
        let msg = t.to_string();
        assert!(msg.contains("7") && msg.contains("20"));
    }
}
