//! Utility functions and helpers.
//!
//! Environment variable lookup and list parsing shared by the config loaders.

pub mod env;

pub use env::{get_env_with_prefix, parse_list};
