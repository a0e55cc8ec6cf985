use crate::Generator;
use rand::Rng;
use sha2::{Digest, Sha256};
use zipline_core::shortcode::CODE_LENGTH;
use zipline_core::{GeneratorError, ShortCode};

/// Alphabet the salts are drawn from: upper and lower case letters.
const SALT_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of each of the two salts.
const SALT_LENGTH: usize = 4;

/// Generates codes by hashing the URL between two random salts.
///
/// The code is the first 8 base62 characters of
/// `sha256(salt1 || url || salt2)`, with each 4-letter salt drawn
/// independently per call from a thread-local CSPRNG. The salts make
/// repeated submissions of the same URL yield distinct codes, which
/// keeps dedup policy out of the generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaltedHashGenerator;

impl SaltedHashGenerator {
    pub fn new() -> Self {
        Self
    }

    fn salt() -> [u8; SALT_LENGTH] {
        let mut rng = rand::rng();
        let mut salt = [0u8; SALT_LENGTH];
        for byte in &mut salt {
            *byte = SALT_ALPHABET[rng.random_range(0..SALT_ALPHABET.len())];
        }
        salt
    }
}

impl Generator for SaltedHashGenerator {
    fn generate(&self, original_url: &str) -> Result<ShortCode, GeneratorError> {
        let head = Self::salt();
        let tail = Self::salt();

        let mut hasher = Sha256::new();
        hasher.update(head);
        hasher.update(original_url.as_bytes());
        hasher.update(tail);
        let digest = hasher.finalize();

        // Base62-encode the leading 128 bits of the digest. The
        // encoding drops leading zeros, so a pathologically small
        // value could come out shorter than a full code; that is a
        // fatal condition, never padded over.
        let mut prefix = [0u8; 16];
        prefix.copy_from_slice(&digest[..16]);
        let encoded = base62::encode(u128::from_be_bytes(prefix));

        if encoded.len() < CODE_LENGTH {
            return Err(GeneratorError::DigestTooShort {
                expected: CODE_LENGTH,
                actual: encoded.len(),
            });
        }

        Ok(ShortCode::new_unchecked(&encoded[..CODE_LENGTH]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_exactly_eight_base62_chars() {
        let generator = SaltedHashGenerator::new();

        for _ in 0..100 {
            let code = generator.generate("https://example.com/a").unwrap();
            assert_eq!(code.as_str().len(), 8);
            assert!(code.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn same_url_yields_different_codes() {
        let generator = SaltedHashGenerator::new();

        let first = generator.generate("https://example.com/a").unwrap();
        let second = generator.generate("https://example.com/a").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn generated_codes_pass_validation() {
        let generator = SaltedHashGenerator::new();

        let code = generator.generate("https://example.com").unwrap();
        assert!(ShortCode::new(code.as_str()).is_ok());
    }

    #[test]
    fn codes_are_spread_across_the_space() {
        let generator = SaltedHashGenerator::new();

        // 1000 draws from a 62^8 space should essentially never collide;
        // a repeat here points at a broken salt or digest step.
        let codes: HashSet<String> = (0..1000)
            .map(|_| {
                generator
                    .generate("https://example.com/hot-path")
                    .unwrap()
                    .as_str()
                    .to_string()
            })
            .collect();
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn salts_use_letter_alphabet_only() {
        for _ in 0..100 {
            let salt = SaltedHashGenerator::salt();
            assert!(salt.iter().all(|b| b.is_ascii_alphabetic()));
        }
    }

    #[test]
    fn concurrent_generation_is_unserialized() {
        let generator = SaltedHashGenerator::new();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(move || {
                    (0..100)
                        .map(|_| {
                            generator
                                .generate("https://example.com")
                                .unwrap()
                                .as_str()
                                .to_string()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            all.extend(handle.join().unwrap());
        }
        assert_eq!(all.len(), 800);
    }
}
