/// Get environment variable with TIDEGUARD_ prefix, falling back to unprefixed version
///
/// This helper function checks for `TIDEGUARD_{key}` first, then falls back to `{key}`
/// so the conventional `SECURE_*` setting names work unchanged.
///
/// # Examples
///
/// ```rust,ignore
/// // Checks TIDEGUARD_SECURE_SSL_REDIRECT first, then SECURE_SSL_REDIRECT
/// let redirect = get_env_with_prefix("SECURE_SSL_REDIRECT");
/// ```
pub fn get_env_with_prefix(key: &str) -> Option<String> {
    std::env::var(format!("TIDEGUARD_{}", key))
        .or_else(|_| std::env::var(key))
        .ok()
}

/// Parse a list-valued environment setting.
///
/// Values starting with `[` are read as a JSON array of strings, which lets
/// entries contain commas (regex quantifiers like `{1,3}`). Anything else is
/// split on commas, trimmed, with empty entries dropped.
pub fn parse_list(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        if let Ok(items) = serde_json::from_str::<Vec<String>>(trimmed) {
            return items;
        }
        tracing::warn!(value = %trimmed, "Could not parse list setting as JSON, splitting on commas");
    }

    trimmed
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_get_env_with_prefix() {
        // Test with TIDEGUARD_ prefix
        unsafe {
            std::env::set_var("TIDEGUARD_TEST_VAR", "prefixed_value");
        }
        assert_eq!(get_env_with_prefix("TEST_VAR"), Some("prefixed_value".to_string()));
        unsafe {
            std::env::remove_var("TIDEGUARD_TEST_VAR");
        }

        // Test with unprefixed fallback
        unsafe {
            std::env::set_var("FALLBACK_VAR", "unprefixed_value");
        }
        assert_eq!(get_env_with_prefix("FALLBACK_VAR"), Some("unprefixed_value".to_string()));
        unsafe {
            std::env::remove_var("FALLBACK_VAR");
        }

        // Test non-existent variable
        assert_eq!(get_env_with_prefix("NON_EXISTENT_VAR"), None);
    }

    #[test]
    fn test_parse_list_comma_separated() {
        assert_eq!(
            parse_list(" ^health$ , ^static/ ,,"),
            vec!["^health$".to_string(), "^static/".to_string()]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_parse_list_json_array() {
        assert_eq!(
            parse_list(r#"["^a{1,3}$", "^b/"]"#),
            vec!["^a{1,3}$".to_string(), "^b/".to_string()]
        );
    }
}
