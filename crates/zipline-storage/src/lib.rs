//! Durable store implementations for the Zipline URL shortener.
//!
//! The MySQL repository is the production backend; the in-memory
//! repository backs unit and scenario tests. Both enforce the same
//! contract: lookups only return live records, and inserting a code
//! that is already live is a conflict.

pub mod memory;
pub mod mysql;

pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;
