//! The shortening service: orchestrates generator, durable store, and
//! volatile cache on the write path.

pub mod service;

pub use service::ShortenerService;
