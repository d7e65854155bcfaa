//! Cryptographic Utilities

use rand::{Rng, distributions::Alphanumeric, rngs::OsRng};

/// Generate a random `[A-Za-z0-9]` token from the OS RNG
///
/// Used for one-time keys that travel inside e-mail links, so the alphabet
/// stays URL-safe without encoding.
pub fn random_alphanumeric(len: usize) -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_alphanumeric_shape() {
        let token = random_alphanumeric(20);
        assert_eq!(token.len(), 20);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_random_alphanumeric_differs() {
        assert_ne!(random_alphanumeric(20), random_alphanumeric(20));
        assert!(random_alphanumeric(0).is_empty());
    }
}
