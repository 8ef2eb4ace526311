//! Common test utilities for REST API testing.
//!
//! - [`harness`] - Test server over an in-memory SQLite backend
//! - [`fixtures`] - Sample patients, medications and prescriptions
//! - [`assertions`] - HTTP response assertions

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
pub mod harness;
