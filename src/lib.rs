//! Tideguard - HTTPS redirection and security headers for Axum
//!
//! Tideguard is a single Tower layer that sits in front of an Axum router.
//! Before a request is handled it can redirect plain HTTP to HTTPS (or trust
//! a TLS-terminating proxy's header instead); after it is handled it fills in
//! the standard security headers.
//!
//! # Features
//!
//! - **HTTPS redirect**: permanent redirects to `https://`, with an optional
//!   canonical host
//! - **Proxy trust**: treat requests as secure when a configured header such
//!   as `X-Forwarded-Proto: https` is present
//! - **Exempt paths**: regular expressions that opt paths out of redirects
//!   and headers
//! - **Security headers**: HSTS, X-Frame-Options, X-Content-Type-Options,
//!   X-XSS-Protection, never overwriting values the handler already set
//! - **Testing**: Alba-style HTTP testing utilities
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use tideguard::{ConfigBuilder, build_security_layer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     tideguard::init_tracing();
//!
//!     let config = ConfigBuilder::new().from_env().build()?;
//!
//!     let mut app = Router::new().route("/", get(|| async { "Hello" }));
//!     if let Some(layer) = build_security_layer(&config.security)? {
//!         app = app.layer(layer);
//!     }
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

mod config;
mod error;
pub mod security;
pub mod testing;
mod utils;

// Re-exports for public API
pub use config::{Config, ConfigBuilder, LoggingConfig};
pub use error::{ConfigError, Result};
pub use security::{
    FrameDenyExempt, ProxySslHeader, RequestInfo, RequestSecurity, SecurityConfig,
    SecurityConfigBuilder, SecurityLayer, SecurityPolicy, SecurityService, SecurityWarning,
    build_security_layer,
};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging with sensible defaults
///
/// This should be called early in your application, typically in main()
/// before building the security layer so configuration warnings are shown.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "debug", "tideguard=debug")
/// - `TIDEGUARD_LOG_JSON`: Set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = std::env::var("TIDEGUARD_LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Initialize tracing with a custom configuration
pub fn init_tracing_with_config(config: &Config) {
    let env_filter = EnvFilter::new(&config.logging.level);

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
