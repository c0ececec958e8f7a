//! Deterministic password derivation.
//!
//! A password is recomputed on demand from `(service, username, master)`
//! instead of being stored. The algorithm is frozen: any change would alter
//! passwords users have already set on their accounts.

use sha2::{Digest, Sha256};

const UPPERCASE: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijkmnopqrstuvwxyz";
const DIGITS: &[u8] = b"23456789";
const SYMBOLS: &[u8] = b"!@#$%^&*";

/// Character classes in output order, with how many of each are drawn.
const POLICY: [(&[u8], usize); 4] = [(UPPERCASE, 4), (LOWERCASE, 4), (DIGITS, 3), (SYMBOLS, 2)];

/// Upper bound on output length. The policy yields 13 characters, so this
/// never truncates.
const MAX_LENGTH: usize = 16;

/// Derive the password for `service` and `username` from `master_password`.
///
/// Service and username are trimmed and lowercased; the master password is
/// used as given. The result always holds 4 uppercase, 4 lowercase, 3 digit,
/// and 2 symbol characters, never `I`, `O`, `l`, `0`, or `1`.
///
/// # Examples
///
/// ```
/// use vaultx_core::derive_password;
///
/// let a = derive_password("GitHub", "bob", "hunter2");
/// let b = derive_password(" github ", "BOB", "hunter2");
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 13);
/// ```
pub fn derive_password(service: &str, username: &str, master_password: &str) -> String {
    let seed = format!(
        "{}:{}:{}",
        service.trim().to_lowercase(),
        username.trim().to_lowercase(),
        master_password
    );
    let hash = hex::encode(Sha256::digest(seed.as_bytes()));

    let mut chars = Vec::with_capacity(13);
    let mut window = 0;
    for (alphabet, count) in POLICY {
        for _ in 0..count {
            let byte = hex_window(&hash, window * 2, 2);
            chars.push(alphabet[byte % alphabet.len()]);
            window += 1;
        }
    }

    shuffle(&mut chars, &hash);
    chars.truncate(MAX_LENGTH);

    // Every alphabet is ASCII.
    chars.into_iter().map(char::from).collect()
}

/// Fisher-Yates driven by overlapping 4-digit windows of the hex digest.
fn shuffle(chars: &mut [u8], hash: &str) {
    for i in (1..chars.len()).rev() {
        let value = hex_window(hash, (i * 3) % hash.len(), 4);
        let j = value % (i + 1);
        chars.swap(i, j);
    }
}

/// Parse up to `width` hex digits starting at `offset`, clamped to the end
/// of the digest.
fn hex_window(hash: &str, offset: usize, width: usize) -> usize {
    let end = (offset + width).min(hash.len());
    hash.get(offset..end)
        .and_then(|digits| usize::from_str_radix(digits, 16).ok())
        .unwrap_or(0)
}
