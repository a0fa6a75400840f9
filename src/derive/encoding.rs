//! Text encodings applied to the raw digest.
//!
//! Base-85 follows RFC 1924 (the alphabet Python's `base64.b85encode` and
//! git use). Base-64 is the standard alphabet with `=` padding. Both must
//! stay byte-for-byte stable: any change here silently changes every
//! derived password.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// RFC 1924 base-85 alphabet.
pub const B85_ALPHABET: &[u8; 85] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!#$%&()*+-;<=>?@^_`{|}~";

/// Encode `data` as base-85.
///
/// Each big-endian 4-byte group becomes 5 characters, most significant
/// first. A trailing partial group is padded with zero bytes and the
/// characters standing for the padding are dropped, so the output has
/// `ceil(len * 5 / 4)` characters.
pub fn b85encode(data: &[u8]) -> String {
    let padding = (4 - data.len() % 4) % 4;
    let mut out = String::with_capacity((data.len() + padding) / 4 * 5);

    for chunk in data.chunks(4) {
        let mut group = [0u8; 4];
        group[..chunk.len()].copy_from_slice(chunk);
        let mut value = u32::from_be_bytes(group);

        let mut block = [0u8; 5];
        for slot in block.iter_mut().rev() {
            *slot = B85_ALPHABET[(value % 85) as usize];
            value /= 85;
        }
        out.extend(block.iter().map(|&b| char::from(b)));
    }

    out.truncate(out.len() - padding);
    out
}

/// Encode `data` as padded standard base-64.
pub fn b64encode(data: &[u8]) -> String {
    BASE64.encode(data)
}
