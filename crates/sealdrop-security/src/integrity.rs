// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Request fingerprints: SHA-512 over the generation timestamp.

use sha2::{Digest, Sha512};

/// Compute the SHA-512 hash of `data` and return it as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha512::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Fingerprint for a request generated at `timestamp`.
///
/// This identifies the request, not the key: two requests with the same key
/// get different fingerprints.
pub fn fingerprint(timestamp: &str) -> String {
    hash_bytes(timestamp.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// SHA-512 of the empty byte slice (well-known constant).
    const EMPTY_SHA512: &str = "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce\
                                47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e";

    #[test]
    fn hash_empty_input() {
        assert_eq!(hash_bytes(b""), EMPTY_SHA512);
    }

    #[test]
    fn hash_known_value() {
        // SHA-512("abc"), FIPS 180-2 appendix C.1.
        let expected = "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
                        2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f";
        assert_eq!(hash_bytes(b"abc"), expected);
    }

    #[test]
    fn fingerprint_is_128_lowercase_hex_chars() {
        let h = fingerprint("2026-10-16T09:12:44.118302Z");
        assert_eq!(h.len(), 128);
        assert!(h.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn distinct_timestamps_give_distinct_fingerprints() {
        assert_ne!(
            fingerprint("2026-10-16T09:12:44.118302Z"),
            fingerprint("2026-10-16T09:12:44.118303Z")
        );
    }
}
