use serial_test::serial;
use tideguard::{ConfigBuilder, ConfigError, ProxySslHeader, SecurityConfig};

const KEYS: [&str; 11] = [
    "SECURITY_ENABLED",
    "SECURE_HSTS_SECONDS",
    "SECURE_HSTS_INCLUDE_SUBDOMAINS",
    "SECURE_HSTS_PRELOAD",
    "SECURE_FRAME_DENY",
    "SECURE_CONTENT_TYPE_NOSNIFF",
    "SECURE_BROWSER_XSS_FILTER",
    "SECURE_SSL_REDIRECT",
    "SECURE_SSL_HOST",
    "SECURE_PROXY_SSL_HEADER",
    "SECURE_REDIRECT_EXEMPT",
];

fn clear_env() {
    for key in KEYS {
        unsafe {
            std::env::remove_var(key);
            std::env::remove_var(format!("TIDEGUARD_{}", key));
        }
    }
}

fn set(key: &str, value: &str) {
    unsafe {
        std::env::set_var(key, value);
    }
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_env();

    let config = SecurityConfig::from_env();
    assert!(config.enabled);
    assert_eq!(config.hsts_seconds, 0);
    assert!(!config.ssl_redirect);
    assert!(config.redirect_exempt.is_empty());
}

#[test]
#[serial]
fn test_from_env_reads_all_settings() {
    clear_env();
    set("SECURE_HSTS_SECONDS", "3600");
    set("SECURE_HSTS_INCLUDE_SUBDOMAINS", "true");
    set("SECURE_HSTS_PRELOAD", "true");
    set("SECURE_FRAME_DENY", "true");
    set("SECURE_CONTENT_TYPE_NOSNIFF", "true");
    set("SECURE_BROWSER_XSS_FILTER", "true");
    set("SECURE_SSL_REDIRECT", "true");
    set("SECURE_SSL_HOST", "secure.example.com");
    set("SECURE_PROXY_SSL_HEADER", "HTTP_X_FORWARDED_PROTO,https");
    set("SECURE_REDIRECT_EXEMPT", "^health$,^static/");

    let config = SecurityConfig::from_env();
    clear_env();

    assert_eq!(config.hsts_seconds, 3600);
    assert!(config.hsts_include_subdomains);
    assert!(config.hsts_preload);
    assert!(config.frame_deny);
    assert!(config.content_type_nosniff);
    assert!(config.xss_filter);
    assert!(config.ssl_redirect);
    assert_eq!(config.ssl_host.as_deref(), Some("secure.example.com"));
    assert_eq!(
        config.proxy_ssl_header,
        Some(ProxySslHeader::new("HTTP_X_FORWARDED_PROTO", "https"))
    );
    assert_eq!(config.redirect_exempt, vec!["^health$", "^static/"]);
}

#[test]
#[serial]
fn test_prefixed_variable_wins() {
    clear_env();
    set("SECURE_HSTS_SECONDS", "60");
    set("TIDEGUARD_SECURE_HSTS_SECONDS", "120");

    let config = SecurityConfig::from_env();
    clear_env();

    assert_eq!(config.hsts_seconds, 120);
}

#[test]
#[serial]
fn test_json_exempt_list_allows_commas() {
    clear_env();
    set("SECURE_REDIRECT_EXEMPT", r#"["^v[0-9]{1,2}/hooks/", "^health$"]"#);

    let config = SecurityConfig::from_env();
    clear_env();

    assert_eq!(config.redirect_exempt, vec!["^v[0-9]{1,2}/hooks/", "^health$"]);
}

#[test]
#[serial]
fn test_malformed_values_fall_back() {
    clear_env();
    set("SECURE_HSTS_SECONDS", "forever");
    set("SECURE_SSL_REDIRECT", "yes please");
    set("SECURE_PROXY_SSL_HEADER", "X-Forwarded-Proto");

    let config = SecurityConfig::from_env();
    clear_env();

    assert_eq!(config.hsts_seconds, 0);
    assert!(!config.ssl_redirect);
    assert!(config.proxy_ssl_header.is_none());
}

#[test]
#[serial]
fn test_builder_from_env_rejects_bad_pattern() {
    clear_env();
    set("SECURE_REDIRECT_EXEMPT", "(unclosed");

    let result = ConfigBuilder::new().from_env().build();
    clear_env();

    assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
}
