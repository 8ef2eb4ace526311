//! Application state for the MedRec REST API.
//!
//! This module defines the shared application state that is available to all
//! request handlers: the storage backend and the server configuration.

use std::sync::Arc;

use medrec_persistence::core::RecordStorage;

use crate::config::ServerConfig;

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The storage backend type (must implement [`RecordStorage`])
///
/// # Example
///
/// ```rust,ignore
/// use medrec_rest::{AppState, ServerConfig};
/// use medrec_persistence::backends::sqlite::SqliteBackend;
/// use std::sync::Arc;
///
/// let backend = SqliteBackend::in_memory()?;
/// let config = ServerConfig::default();
/// let state = AppState::new(Arc::new(backend), config);
/// ```
pub struct AppState<S> {
    /// The storage backend.
    storage: Arc<S>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: RecordStorage> AppState<S> {
    /// Creates a new AppState with the given storage and configuration.
    pub fn new(storage: Arc<S>, config: ServerConfig) -> Self {
        Self {
            storage,
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the base URL used in `Location` headers, without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.config.full_base_url()
    }

    /// Returns the absolute URL of a record.
    pub fn record_url(&self, collection: &str, id: i64) -> String {
        format!("{}/{}/{}", self.base_url(), collection, id)
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use medrec_persistence::backends::sqlite::SqliteBackend;

    fn create_state(config: ServerConfig) -> AppState<SqliteBackend> {
        let backend = SqliteBackend::in_memory().unwrap();
        AppState::new(Arc::new(backend), config)
    }

    #[test]
    fn test_app_state_creation() {
        let state = create_state(ServerConfig::default());
        assert_eq!(state.storage().backend_name(), "sqlite");
        assert_eq!(state.config().port, 8000);
    }

    #[test]
    fn test_record_url() {
        let state = create_state(ServerConfig {
            base_url: "https://records.example.org/".to_string(),
            ..Default::default()
        });
        assert_eq!(state.base_url(), "https://records.example.org");
        assert_eq!(
            state.record_url("prescriptions", 12),
            "https://records.example.org/prescriptions/12"
        );
    }

    #[test]
    fn test_clone_shares_storage() {
        let state = create_state(ServerConfig::default());
        let cloned = state.clone();
        assert!(Arc::ptr_eq(&state.storage, &cloned.storage));
    }
}
