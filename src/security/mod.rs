//! HTTPS redirection and security headers middleware.
//!
//! Redirects plain HTTP requests to HTTPS, trusts a TLS-terminating proxy's
//! header when configured, and fills in HSTS, X-Frame-Options,
//! X-Content-Type-Options and X-XSS-Protection on responses. Paths matching
//! a redirect exempt pattern are left untouched in both directions.

mod audit;
mod config;
mod layer;
mod policy;
mod request;

pub use audit::SecurityWarning;
pub use config::{ProxySslHeader, SecurityConfig, SecurityConfigBuilder};
pub use layer::{SecurityLayer, SecurityService, build_security_layer};
pub use policy::SecurityPolicy;
pub use request::{FrameDenyExempt, RequestInfo, RequestSecurity};
