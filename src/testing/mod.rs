//! Testing utilities for Tideguard
//!
//! Alba-style HTTP endpoint testing without running a server, with fluent
//! assertions for redirects and security headers.
//!
//! # Example
//!
//! ```rust,ignore
//! use tideguard::testing;
//!
//! testing::get(app, "/login")
//!     .host("example.com")
//!     .header("x-forwarded-proto", "https")
//!     .execute()
//!     .await
//!     .assert_ok()
//!     .assert_header("strict-transport-security", "max-age=3600");
//! ```

mod scenario;

pub use scenario::{Scenario, ScenarioAssert, get, post};
