//! Short id and owner key generation.

use rand::rngs::OsRng;
use rand::{Rng, RngCore};

/// Characters a short id is drawn from.
pub const SHORT_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

const OWNER_KEY_BYTES: usize = 16;

/// Generate a short id of `length` characters, each drawn uniformly from
/// [`SHORT_ID_ALPHABET`]. Uniqueness is the store's job.
pub fn generate_short_id(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| SHORT_ID_ALPHABET[rng.gen_range(0..SHORT_ID_ALPHABET.len())] as char)
        .collect()
}

/// Generate a 128-bit owner key from the OS random source, hex-encoded.
pub fn generate_owner_key() -> String {
    let mut bytes = [0u8; OWNER_KEY_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Whether `candidate` has the shape of a generated short id.
pub fn is_valid_short_id(candidate: &str, length: usize) -> bool {
    candidate.len() == length && candidate.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Compare two owner keys without short-circuiting on the first mismatch.
pub fn keys_match(expected: &str, provided: &str) -> bool {
    let (a, b) = (expected.as_bytes(), provided.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_short_id_shape() {
        for _ in 0..200 {
            let id = generate_short_id(6);
            assert!(is_valid_short_id(&id, 6), "bad id {id}");
        }
        assert_eq!(generate_short_id(10).len(), 10);
    }

    #[test]
    fn test_short_ids_are_spread_out() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_short_id(6)).collect();
        assert!(ids.len() > 990);
    }

    #[test]
    fn test_owner_key_is_32_hex_chars() {
        let key = generate_owner_key();
        assert_eq!(key.len(), 32);
        assert!(key.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
        assert_ne!(key, generate_owner_key());
    }

    #[test]
    fn test_is_valid_short_id() {
        assert!(is_valid_short_id("aB3xY9", 6));
        assert!(!is_valid_short_id("aB3xY", 6));
        assert!(!is_valid_short_id("aB3-Y9", 6));
        assert!(!is_valid_short_id("aB3xYé", 6));
    }

    #[test]
    fn test_keys_match() {
        assert!(keys_match("abcdef", "abcdef"));
        assert!(!keys_match("abcdef", "abcdeg"));
        assert!(!keys_match("abcdef", "abcde"));
        assert!(!keys_match("abcdef", ""));
    }
}
