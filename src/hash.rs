//! Registry lookup key derivation.
//!
//! A lookup key is the SHA-256 digest of the normalized identifier concatenated
//! with a wallet tag salt, rendered as lowercase hex. The same derivation runs
//! on-chain when identifiers are registered, so it must stay byte-stable.
//!
//! Password-salted claim hashes are deliberately *not* derived here: the escrow
//! contract exposes its own hashing method and the client calls it, so the two
//! sides can never drift apart.

use sha2::{Digest, Sha256};

/// Derive the registry lookup key for a normalized identifier and tag salt.
pub fn derive_lookup_key(identifier: &str, tag_address: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(identifier.as_bytes());
    hasher.update(tag_address.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vector() {
        assert_eq!(
            derive_lookup_key("abc", ""),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_salted_vector() {
        // hello@idriss.xyz under the "Metamask ETH" salt
        assert_eq!(
            derive_lookup_key(
                "hello@idriss.xyz",
                "5d181abc9dcb7e79ce50e93db97addc1caf9f369257f61585889870555f8c321"
            ),
            "10fb485a39578fdfa208f19d8815eeba89be745ee590654b6f3cd10f6bd44791"
        );
    }

    #[test]
    fn test_deterministic() {
        let first = derive_lookup_key("+16471234567", "salt");
        for _ in 0..10 {
            assert_eq!(derive_lookup_key("+16471234567", "salt"), first);
        }
    }

    #[test]
    fn test_salt_diversifies() {
        assert_ne!(
            derive_lookup_key("hello@idriss.xyz", "salt-a"),
            derive_lookup_key("hello@idriss.xyz", "salt-b")
        );
    }
}
