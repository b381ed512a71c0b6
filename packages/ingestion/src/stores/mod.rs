//! Storage implementations.
//!
//! - [`MemoryStore`]: in-memory maps + brute-force vector scan, for tests
//!   and development.
//! - [`PostgresStore`] (feature `postgres`): pgvector-backed production
//!   store with per-document transactional sessions.

pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::MemoryStore;

#[cfg(feature = "postgres")]
pub use postgres::{PostgresSession, PostgresStore};
