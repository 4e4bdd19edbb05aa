//! Display encodings for the two identities bound under a claimed alias.
//!
//! Every function here is pure and total: malformed or empty input yields an
//! empty string rather than an error, because keys arrive incrementally while
//! the caller is still completing earlier onboarding steps.

use bech32::{Bech32, Hrp};
use nomen_types::{account_id_from_public_key, encode_address};

/// Human readable part of the social-identity encoding.
const SOCIAL_HRP: &str = "npub";

/// Canonical ledger address for a hex-encoded account public key.
///
/// Returns an empty string when the key is absent or not valid hex.
pub fn ledger_address(public_key_hex: &str) -> String {
    if public_key_hex.is_empty() {
        return String::new();
    }
    match hex::decode(public_key_hex) {
        Ok(bytes) => encode_address(&account_id_from_public_key(&bytes)),
        Err(_) => String::new(),
    }
}

/// Canonical bech32 (`npub…`) encoding of a hex-encoded social public key.
///
/// Returns an empty string when the key is absent or not valid hex.
pub fn social_encoding(public_key_hex: &str) -> String {
    if public_key_hex.is_empty() {
        return String::new();
    }
    let bytes = match hex::decode(public_key_hex) {
        Ok(bytes) => bytes,
        Err(_) => return String::new(),
    };
    let hrp = match Hrp::parse(SOCIAL_HRP) {
        Ok(hrp) => hrp,
        Err(_) => return String::new(),
    };
    bech32::encode::<Bech32>(hrp, &bytes).unwrap_or_default()
}

/// Shorten a string for display, keeping the first and last `target_len / 2`
/// characters joined by `delimiter`. Strings already within `target_len` are
/// returned unchanged. Presentation only, never an identity comparison.
pub fn shorten(s: &str, target_len: usize, delimiter: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= target_len {
        return s.to_string();
    }
    let half = target_len / 2;
    let mut out = String::with_capacity(target_len + delimiter.len());
    out.extend(&chars[..half]);
    out.push_str(delimiter);
    out.extend(&chars[chars.len() - half..]);
    out
}
