//! Deterministic identifiers and hashing utilities.
//!
//! - UUID v5 (namespace/name-based) corpus fingerprint under `Uuid::nil()`;
//! - FNV-1a 64-bit hash (dependency-free) used to seed hashed embeddings.

use uuid::Uuid;

/// Compute a deterministic UUID v5 from a logical key.
#[inline]
pub fn uuid_v5_from_key(key: &str) -> String {
    Uuid::new_v5(&Uuid::nil(), key.as_bytes()).to_string()
}

/// Stable corpus fingerprint: ordered document texts joined by a record separator.
pub fn corpus_fingerprint<'a>(texts: impl IntoIterator<Item = &'a str>) -> String {
    let mut key = String::from("corpus");
    for t in texts {
        key.push('\u{1e}');
        key.push_str(t);
    }
    uuid_v5_from_key(&key)
}

/// FNV-1a 64-bit hash.
pub fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash ^= *b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
