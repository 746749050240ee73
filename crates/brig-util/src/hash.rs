use sha2::{Digest, Sha256};

/// Lowercase-hex SHA-256 of `data`, truncated to at most `len`
/// characters.
///
/// Binary package fingerprints are short prefixes of a full digest,
/// so callers pass the suffix length they need; `len >= 64` keeps the
/// whole digest.
pub fn hex_digest(data: &[u8], len: usize) -> String {
    let mut digest = format!("{:x}", Sha256::digest(data));
    digest.truncate(len);
    digest
}
