//! BLAKE3 helpers for content keys and deterministic seeds.

use blake3::Hasher;

/// Full 32-byte BLAKE3 digest of a segment text.
#[inline]
pub fn hash_text(text: &str) -> [u8; 32] {
    *blake3::hash(text.as_bytes()).as_bytes()
}

/// First 8 bytes of the BLAKE3 digest of `data`, little-endian.
///
/// Used for seeds and fingerprints where a rare collision only costs accuracy of
/// a stub, never correctness of matching.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    prefix_u64(&blake3::hash(data))
}

/// Seed for deterministic stub embeddings of `text` under `language`.
#[inline]
pub fn embedding_seed(text: &str, language: &str) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(&(language.len() as u64).to_le_bytes());
    hasher.update(language.as_bytes());
    hasher.update(text.as_bytes());

    prefix_u64(&hasher.finalize())
}

#[inline]
fn prefix_u64(hash: &blake3::Hash) -> u64 {
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}
