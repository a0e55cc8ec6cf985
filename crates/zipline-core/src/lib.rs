//! Core types and traits for the Zipline URL shortener.
//!
//! This crate provides the shared vocabulary used by the shortening
//! and resolution services: the validated short code type, the URL
//! record owned by the durable store, the repository/cache contracts,
//! and the error taxonomy.

pub mod cache;
pub mod clock;
pub mod error;
pub mod record;
pub mod repository;
pub mod service;
pub mod shortcode;

pub use cache::UrlCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CacheError, CoreError, GeneratorError, ResolveError, ShortenError, StorageError};
pub use record::{CustomTtl, UrlRecord, DEFAULT_TTL};
pub use repository::UrlRepository;
pub use service::{Resolver, ShortenRequest, Shortener};
pub use shortcode::ShortCode;
