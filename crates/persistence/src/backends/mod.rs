//! Database backend implementations.
//!
//! Each backend is gated behind a feature flag. SQLite (`sqlite`, enabled by
//! default) is the only backend.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "sqlite")]
//! use medrec_persistence::backends::sqlite::SqliteBackend;
//!
//! # #[cfg(feature = "sqlite")]
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create an in-memory SQLite backend
//! let backend = SqliteBackend::in_memory()?;
//!
//! // Or use a file-based database
//! let backend = SqliteBackend::open("./data/medrec.db")?;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "sqlite")]
pub mod sqlite;
