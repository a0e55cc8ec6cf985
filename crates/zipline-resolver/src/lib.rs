//! The resolution service: cache-first lookup with store fallback and
//! cache repopulation.

pub mod service;

pub use service::ResolverService;
