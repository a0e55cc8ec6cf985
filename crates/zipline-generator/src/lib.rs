//! Short code generation for the Zipline URL shortener.
//!
//! The generator is a pure function of its input plus fresh randomness;
//! it never talks to storage. Whether a URL should reuse an existing
//! code is the shortening service's decision, made against the durable
//! store, not a property of the generator.

pub mod salted;

use zipline_core::{GeneratorError, ShortCode};

pub use salted::SaltedHashGenerator;

/// Trait for generating short codes.
///
/// Implementations must be safe for concurrent use without serializing
/// callers on a shared lock; randomness, if any, is drawn per call or
/// per thread.
pub trait Generator: Send + Sync + 'static {
    /// Derives a fresh short code for the given URL.
    ///
    /// Two calls with the same URL produce different codes with
    /// overwhelming probability; collisions across the whole code
    /// space are handled by the caller via the store's uniqueness
    /// check.
    fn generate(&self, original_url: &str) -> Result<ShortCode, GeneratorError>;
}
