//! Deterministic addresses for paper wallets, positions and transactions.

use sha2::{Digest, Sha256};

/// `0x` followed by the last 20 bytes of `SHA-256(namespace ‖ seed)`,
/// lowercase hex.
pub fn derive_address(namespace: &str, seed: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(namespace.as_bytes());
    hasher.update(seed.as_bytes());
    let digest = hasher.finalize();
    format!("0x{}", hex::encode(&digest[digest.len() - 20..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_shape() {
        let address = derive_address("paper", "secret");
        assert_eq!(address.len(), 42);
        assert!(address.starts_with("0x"));
        assert!(address[2..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_address_depends_on_both_inputs() {
        let a = derive_address("paper", "secret");
        assert_eq!(a, derive_address("paper", "secret"));
        assert_ne!(a, derive_address("mainnet", "secret"));
        assert_ne!(a, derive_address("paper", "other"));
    }

    #[test]
    fn test_known_digest_suffix() {
        // SHA-256("abc") ends with ...b00361a396177a9cb410ff61f20015ad.
        let address = derive_address("ab", "c");
        assert!(address.ends_with("b00361a396177a9cb410ff61f20015ad"));
    }
}
