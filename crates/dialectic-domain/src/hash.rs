//! Digest helpers shared by claim content hashing and the history ledger.

use sha2::{Digest, Sha256};

/// Length in hex characters of a SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Sentinel digest used where no predecessor exists (ledger genesis).
pub const GENESIS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Compute the lowercase-hex SHA-256 digest of a byte string.
///
/// # Examples
///
/// ```
/// use dialectic_domain::hash::sha256_hex;
///
/// let digest = sha256_hex(b"kvm_detected");
/// assert_eq!(digest.len(), 64);
/// assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = String::with_capacity(DIGEST_HEX_LEN);
    for byte in digest {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}
