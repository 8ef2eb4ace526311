//! SQLite backend implementation.
//!
//! Supports in-memory databases (used by the tests) and file-based
//! databases. Every write runs inside one SQLite transaction.
//!
//! # Example
//!
//! ```no_run
//! use medrec_persistence::backends::sqlite::SqliteBackend;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SqliteBackend::open("medrec.db")?;
//! backend.init_schema()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE patients (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     last_name TEXT NOT NULL,
//!     first_name TEXT NOT NULL,
//!     birth_date TEXT
//! );
//!
//! CREATE TABLE medications (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     code TEXT NOT NULL UNIQUE,
//!     label TEXT NOT NULL,
//!     status TEXT NOT NULL DEFAULT 'actif'
//! );
//!
//! CREATE TABLE prescriptions (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     patient_id INTEGER NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
//!     medication_id INTEGER NOT NULL REFERENCES medications(id) ON DELETE RESTRICT,
//!     start_date TEXT NOT NULL,
//!     end_date TEXT NOT NULL,
//!     status TEXT NOT NULL,
//!     comment TEXT NOT NULL DEFAULT '',
//!     created_at TEXT NOT NULL,
//!     updated_at TEXT NOT NULL,
//!     CHECK (end_date >= start_date)
//! );
//! ```

mod backend;
mod query_builder;
mod schema;
mod storage;

pub use backend::{SqliteBackend, SqliteBackendConfig};
pub use schema::SCHEMA_VERSION;
