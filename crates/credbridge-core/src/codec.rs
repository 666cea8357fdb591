//! UTF-16 payload codec
//!
//! Secrets are stored as little-endian UTF-16 without a terminator. The
//! payload size is always derived from the encoded code units, never from
//! the character count: characters outside the BMP take two units.

use crate::error::DecodeError;
use crate::identity::StoreKey;
use crate::secure_string::SecureString;
use zeroize::Zeroizing;

/// Maximum number of UTF-16 code units read back from a payload
pub const MAX_READ_LEN: usize = 2048;

/// Bytes per UTF-16 code unit
pub const CODE_UNIT_BYTES: usize = 2;

/// Encode a secret as a little-endian UTF-16 payload
///
/// The returned buffer is exactly `code_units * 2` bytes and is wiped on drop.
#[must_use]
pub fn encode_secret(secret: &SecureString) -> Zeroizing<Vec<u8>> {
    let mut payload = Zeroizing::new(Vec::with_capacity(secret.utf16_len() * CODE_UNIT_BYTES));
    for unit in secret.expose().encode_utf16() {
        payload.extend_from_slice(&unit.to_le_bytes());
    }
    payload
}

/// Decode a stored payload back into text
///
/// At most [`MAX_READ_LEN`] code units are read; the payload carries no
/// terminator. A surrogate pair split by the read bound is dropped; any other
/// unpaired surrogate is an error.
pub fn decode_payload(payload: &[u8]) -> Result<SecureString, DecodeError> {
    if payload.len() % CODE_UNIT_BYTES != 0 {
        return Err(DecodeError::OddLength {
            bytes: payload.len(),
        });
    }

    let cut_at_bound = payload.len() / CODE_UNIT_BYTES > MAX_READ_LEN;
    let units: Zeroizing<Vec<u16>> = Zeroizing::new(
        payload
            .chunks_exact(CODE_UNIT_BYTES)
            .take(MAX_READ_LEN)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect(),
    );

    // Sized up front so the buffer never reallocates and leaves copies behind
    let mut text = String::with_capacity(units.len() * 3);
    let mut offset = 0;
    for decoded in char::decode_utf16(units.iter().copied()) {
        match decoded {
            Ok(c) => {
                text.push(c);
                offset += c.len_utf16();
            }
            Err(e) if cut_at_bound
                && offset + 1 == units.len()
                && is_high_surrogate(e.unpaired_surrogate()) =>
            {
                break
            }
            Err(_) => {
                drop(Zeroizing::new(text));
                return Err(DecodeError::InvalidUtf16 { offset });
            }
        }
    }

    Ok(SecureString::new(text))
}

fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

/// Strip store key text that some stores append to the secret
///
/// Truncates at the first occurrence of the key. Returns the secret and
/// whether anything was removed.
#[must_use]
pub fn repair_contamination(decoded: SecureString, key: &StoreKey) -> (SecureString, bool) {
    match decoded.expose().find(key.as_str()) {
        Some(index) => (SecureString::new(&decoded.expose()[..index]), true),
        None => (decoded, false),
    }
}
