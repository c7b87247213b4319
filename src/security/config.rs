use serde::{Deserialize, Serialize};
use crate::utils::{get_env_with_prefix, parse_list};

/// Header set by a TLS-terminating proxy, and the value that marks the
/// original connection as secure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProxySslHeader {
    /// Header name, e.g. `X-Forwarded-Proto`.
    /// CGI-style names such as `HTTP_X_FORWARDED_PROTO` are also accepted.
    pub name: String,
    /// Expected value, compared exactly (e.g. `https`)
    pub value: String,
}

impl ProxySslHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parse the `name,value` form used by `SECURE_PROXY_SSL_HEADER`
    fn parse(raw: &str) -> Option<Self> {
        let (name, value) = raw.split_once(',')?;
        let (name, value) = (name.trim(), value.trim());
        if name.is_empty() || value.is_empty() {
            return None;
        }
        Some(Self::new(name, value))
    }
}

/// HTTPS redirect and security header configuration
///
/// Everything except `enabled` is off by default, so adding the layer with a
/// default config changes nothing until individual protections are switched
/// on. Use [`SecurityConfig::strict`] for a production preset.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SecurityConfig {
    /// Whether the security layer is installed at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Strict-Transport-Security max-age in seconds.
    /// Set to 0 to disable HSTS
    #[serde(default)]
    pub hsts_seconds: u64,

    /// Append `includeSubDomains` to the HSTS header
    #[serde(default)]
    pub hsts_include_subdomains: bool,

    /// Append `preload` to the HSTS header
    #[serde(default)]
    pub hsts_preload: bool,

    /// Send `X-Frame-Options: DENY`
    #[serde(default)]
    pub frame_deny: bool,

    /// Send `X-Content-Type-Options: nosniff`
    #[serde(default)]
    pub content_type_nosniff: bool,

    /// Send `X-XSS-Protection: 1; mode=block`
    #[serde(default)]
    pub xss_filter: bool,

    /// Redirect plain HTTP requests to HTTPS
    #[serde(default)]
    pub ssl_redirect: bool,

    /// Host to redirect to instead of the request's own host
    #[serde(default)]
    pub ssl_host: Option<String>,

    /// Trust this proxy header as proof the original request was HTTPS
    #[serde(default)]
    pub proxy_ssl_header: Option<ProxySslHeader>,

    /// Regular expressions matched against the request path (without the
    /// leading `/`). Matching paths are neither redirected nor given
    /// security headers.
    #[serde(default)]
    pub redirect_exempt: Vec<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            hsts_seconds: 0,
            hsts_include_subdomains: false,
            hsts_preload: false,
            frame_deny: false,
            content_type_nosniff: false,
            xss_filter: false,
            ssl_redirect: false,
            ssl_host: None,
            proxy_ssl_header: None,
            redirect_exempt: Vec::new(),
        }
    }
}

impl SecurityConfig {
    /// Create a new SecurityConfig builder
    pub fn builder() -> SecurityConfigBuilder {
        SecurityConfigBuilder::new()
    }

    /// Production preset: one year of HSTS including subdomains, HTTPS
    /// redirect, and every response header switched on.
    pub fn strict() -> Self {
        Self {
            enabled: true,
            hsts_seconds: ONE_YEAR_SECONDS,
            hsts_include_subdomains: true,
            hsts_preload: false,
            frame_deny: true,
            content_type_nosniff: true,
            xss_filter: true,
            ssl_redirect: true,
            ssl_host: None,
            proxy_ssl_header: None,
            redirect_exempt: Vec::new(),
        }
    }

    /// Load security configuration from environment variables
    ///
    /// Reads the `SECURE_*` settings (each may be prefixed with `TIDEGUARD_`).
    /// Unparseable values fall back to the default for that setting.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(enabled) = get_env_with_prefix("SECURITY_ENABLED") {
            config.enabled = enabled.parse().unwrap_or(true);
        }

        if let Some(seconds) = get_env_with_prefix("SECURE_HSTS_SECONDS") {
            if let Ok(s) = seconds.trim().parse() {
                config.hsts_seconds = s;
            }
        }

        if let Some(include) = get_env_with_prefix("SECURE_HSTS_INCLUDE_SUBDOMAINS") {
            config.hsts_include_subdomains = include.parse().unwrap_or(false);
        }

        if let Some(preload) = get_env_with_prefix("SECURE_HSTS_PRELOAD") {
            config.hsts_preload = preload.parse().unwrap_or(false);
        }

        if let Some(deny) = get_env_with_prefix("SECURE_FRAME_DENY") {
            config.frame_deny = deny.parse().unwrap_or(false);
        }

        if let Some(nosniff) = get_env_with_prefix("SECURE_CONTENT_TYPE_NOSNIFF") {
            config.content_type_nosniff = nosniff.parse().unwrap_or(false);
        }

        if let Some(xss) = get_env_with_prefix("SECURE_BROWSER_XSS_FILTER") {
            config.xss_filter = xss.parse().unwrap_or(false);
        }

        if let Some(redirect) = get_env_with_prefix("SECURE_SSL_REDIRECT") {
            config.ssl_redirect = redirect.parse().unwrap_or(false);
        }

        if let Some(host) = get_env_with_prefix("SECURE_SSL_HOST") {
            let host = host.trim();
            if !host.is_empty() {
                config.ssl_host = Some(host.to_string());
            }
        }

        if let Some(header) = get_env_with_prefix("SECURE_PROXY_SSL_HEADER") {
            config.proxy_ssl_header = ProxySslHeader::parse(&header);
            if config.proxy_ssl_header.is_none() {
                tracing::warn!(
                    value = %header,
                    "Ignoring SECURE_PROXY_SSL_HEADER, expected 'name,value'"
                );
            }
        }

        if let Some(exempt) = get_env_with_prefix("SECURE_REDIRECT_EXEMPT") {
            config.redirect_exempt = parse_list(&exempt);
        }

        config
    }
}

/// Builder for SecurityConfig
#[must_use = "builder does nothing until you call build()"]
pub struct SecurityConfigBuilder {
    config: SecurityConfig,
}

impl SecurityConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SecurityConfig::default(),
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    pub fn hsts_seconds(mut self, seconds: u64) -> Self {
        self.config.hsts_seconds = seconds;
        self
    }

    pub fn hsts_include_subdomains(mut self, include: bool) -> Self {
        self.config.hsts_include_subdomains = include;
        self
    }

    pub fn hsts_preload(mut self, preload: bool) -> Self {
        self.config.hsts_preload = preload;
        self
    }

    pub fn frame_deny(mut self, deny: bool) -> Self {
        self.config.frame_deny = deny;
        self
    }

    pub fn content_type_nosniff(mut self, enabled: bool) -> Self {
        self.config.content_type_nosniff = enabled;
        self
    }

    pub fn xss_filter(mut self, enabled: bool) -> Self {
        self.config.xss_filter = enabled;
        self
    }

    pub fn ssl_redirect(mut self, redirect: bool) -> Self {
        self.config.ssl_redirect = redirect;
        self
    }

    pub fn ssl_host(mut self, host: impl Into<String>) -> Self {
        self.config.ssl_host = Some(host.into());
        self
    }

    pub fn proxy_ssl_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.proxy_ssl_header = Some(ProxySslHeader::new(name, value));
        self
    }

    pub fn redirect_exempt(mut self, pattern: impl Into<String>) -> Self {
        self.config.redirect_exempt.push(pattern.into());
        self
    }

    pub fn redirect_exempts(mut self, patterns: Vec<String>) -> Self {
        self.config.redirect_exempt = patterns;
        self
    }

    pub fn build(self) -> SecurityConfig {
        self.config
    }
}

impl Default for SecurityConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

const ONE_YEAR_SECONDS: u64 = 31536000;

fn default_enabled() -> bool {
    true
}
