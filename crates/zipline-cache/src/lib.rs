//! Volatile cache implementations for the Zipline URL shortener.
//!
//! The cache sits in front of the durable store on the resolve hot
//! path. It is best-effort: every entry carries a TTL bounded by the
//! backing record's remaining lifetime, and a backend failure is
//! reported distinctly from a miss so callers can degrade to the store.

pub mod memory;
pub mod redis;

pub use self::memory::InMemoryUrlCache;
pub use self::redis::RedisUrlCache;
