//! Server configuration for the MedRec REST API.
//!
//! This module provides configuration types for the REST server, supporting
//! both programmatic configuration and environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MEDREC_SERVER_PORT` | 8000 | Server port |
//! | `MEDREC_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `MEDREC_LOG_LEVEL` | info | Log level |
//! | `MEDREC_MAX_BODY_SIZE` | 1048576 | Max request body (bytes) |
//! | `MEDREC_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `MEDREC_ENABLE_CORS` | true | Enable CORS |
//! | `MEDREC_CORS_ORIGINS` | * | Allowed origins |
//! | `MEDREC_CORS_METHODS` | GET,POST,PUT,PATCH,DELETE,OPTIONS | Allowed methods |
//! | `MEDREC_CORS_HEADERS` | Content-Type,Authorization,Accept,X-Request-Id | Allowed headers |
//! | `MEDREC_BASE_URL` | http://localhost:8000 | Server base URL |
//! | `MEDREC_DATABASE_URL` | medrec.db | SQLite database path, or `:memory:` |
//! | `MEDREC_ENABLE_REQUEST_ID` | true | Generate and propagate `x-request-id` |
//!
//! # Example
//!
//! ```rust
//! use medrec_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     enable_cors: true,
//!     ..Default::default()
//! };
//! ```

use clap::Args;

/// Server configuration for the MedRec REST API.
///
/// Flattened into the `medrec serve` command line parser, where every option
/// falls back to its environment variable, or built programmatically.
#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "MEDREC_SERVER_PORT", default_value = "8000")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "MEDREC_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "MEDREC_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Maximum request body size in bytes.
    #[arg(long, env = "MEDREC_MAX_BODY_SIZE", default_value = "1048576")]
    pub max_body_size: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "MEDREC_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "MEDREC_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "MEDREC_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(
        long,
        env = "MEDREC_CORS_METHODS",
        default_value = "GET,POST,PUT,PATCH,DELETE,OPTIONS"
    )]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "MEDREC_CORS_HEADERS",
        default_value = "Content-Type,Authorization,Accept,X-Request-Id"
    )]
    pub cors_headers: String,

    /// Base URL for the server (used in Location headers).
    #[arg(long, env = "MEDREC_BASE_URL", default_value = "http://localhost:8000")]
    pub base_url: String,

    /// SQLite database path, or `:memory:`.
    #[arg(long, env = "MEDREC_DATABASE_URL", default_value = "medrec.db")]
    pub database_url: String,

    /// Enable request ID tracking.
    #[arg(long, env = "MEDREC_ENABLE_REQUEST_ID", default_value = "true")]
    pub enable_request_id: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            max_body_size: 1024 * 1024, // 1MB
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,PUT,PATCH,DELETE,OPTIONS".to_string(),
            cors_headers: "Content-Type,Authorization,Accept,X-Request-Id".to_string(),
            base_url: "http://localhost:8000".to_string(),
            database_url: "medrec.db".to_string(),
            enable_request_id: true,
        }
    }
}

impl ServerConfig {
    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the base URL without a trailing slash.
    pub fn full_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.max_body_size == 0 {
            errors.push("Max body size cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.database_url.trim().is_empty() {
            errors.push("Database URL cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0, an in-memory database, and disables
    /// features that might interfere with tests.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            host: "127.0.0.1".to_string(),
            log_level: "debug".to_string(),
            max_body_size: 1024 * 1024,
            request_timeout: 5, // Shorter timeout for tests
            enable_cors: false,
            cors_origins: "*".to_string(),
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            base_url: "http://localhost:0".to_string(),
            database_url: ":memory:".to_string(),
            enable_request_id: false,
        }
    }
}
