use super::config::SecurityConfig;
use std::fmt;

/// A setting that leaves a deployment less protected than it could be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityWarning {
    /// Stable identifier, e.g. `security.W001`
    pub id: &'static str,
    pub message: &'static str,
}

impl fmt::Display for SecurityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.id, self.message)
    }
}

pub const LAYER_DISABLED: SecurityWarning = SecurityWarning {
    id: "security.W001",
    message: "The security layer is disabled; no redirects or security headers will be applied.",
};

pub const HSTS_DISABLED: SecurityWarning = SecurityWarning {
    id: "security.W002",
    message: "SECURE_HSTS_SECONDS is 0. If the site is served only over HTTPS, \
              set it so browsers refuse insecure connections.",
};

pub const HSTS_SUBDOMAINS: SecurityWarning = SecurityWarning {
    id: "security.W003",
    message: "SECURE_HSTS_INCLUDE_SUBDOMAINS is off. Subdomains served only over HTTPS \
              should be covered by HSTS too.",
};

pub const FRAME_DENY_DISABLED: SecurityWarning = SecurityWarning {
    id: "security.W004",
    message: "SECURE_FRAME_DENY is off, so pages can be framed by other sites (clickjacking).",
};

pub const NOSNIFF_DISABLED: SecurityWarning = SecurityWarning {
    id: "security.W005",
    message: "SECURE_CONTENT_TYPE_NOSNIFF is off, so browsers may guess content types.",
};

pub const XSS_FILTER_DISABLED: SecurityWarning = SecurityWarning {
    id: "security.W006",
    message: "SECURE_BROWSER_XSS_FILTER is off, so X-XSS-Protection is not sent.",
};

pub const SSL_REDIRECT_DISABLED: SecurityWarning = SecurityWarning {
    id: "security.W007",
    message: "SECURE_SSL_REDIRECT is off. Unless HTTPS is enforced elsewhere, \
              plain HTTP requests will be served.",
};

pub const EXEMPT_MATCHES_EVERYTHING: SecurityWarning = SecurityWarning {
    id: "security.W008",
    message: "A SECURE_REDIRECT_EXEMPT pattern matches every path, which disables \
              SECURE_SSL_REDIRECT and all security headers.",
};

/// Paths a catch-all pattern would match
const PROBE_PATHS: [&str; 3] = ["", "index", "account/login"];

impl SecurityConfig {
    /// Report settings that weaken the deployment.
    ///
    /// Invalid patterns are skipped here; policy construction reports them.
    pub fn audit(&self) -> Vec<SecurityWarning> {
        if !self.enabled {
            return vec![LAYER_DISABLED];
        }

        let mut warnings = Vec::new();

        if self.hsts_seconds == 0 {
            warnings.push(HSTS_DISABLED);
        } else if !self.hsts_include_subdomains {
            warnings.push(HSTS_SUBDOMAINS);
        }

        if !self.frame_deny {
            warnings.push(FRAME_DENY_DISABLED);
        }

        if !self.content_type_nosniff {
            warnings.push(NOSNIFF_DISABLED);
        }

        if !self.xss_filter {
            warnings.push(XSS_FILTER_DISABLED);
        }

        if !self.ssl_redirect {
            warnings.push(SSL_REDIRECT_DISABLED);
        }

        let catch_all = self
            .redirect_exempt
            .iter()
            .filter_map(|pattern| regex::Regex::new(pattern).ok())
            .any(|re| PROBE_PATHS.iter().all(|path| re.is_match(path)));
        if catch_all {
            warnings.push(EXEMPT_MATCHES_EVERYTHING);
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_warnings() {
        let warnings = SecurityConfig::default().audit();
        assert_eq!(
            warnings,
            vec![
                HSTS_DISABLED,
                FRAME_DENY_DISABLED,
                NOSNIFF_DISABLED,
                XSS_FILTER_DISABLED,
                SSL_REDIRECT_DISABLED,
            ]
        );
    }

    #[test]
    fn test_strict_config_is_clean() {
        assert!(SecurityConfig::strict().audit().is_empty());
    }

    #[test]
    fn test_disabled_layer() {
        let config = SecurityConfig::builder().enabled(false).build();
        assert_eq!(config.audit(), vec![LAYER_DISABLED]);
    }

    #[test]
    fn test_hsts_without_subdomains() {
        let mut config = SecurityConfig::strict();
        config.hsts_include_subdomains = false;
        assert_eq!(config.audit(), vec![HSTS_SUBDOMAINS]);
    }

    #[test]
    fn test_catch_all_exempt_pattern() {
        let mut config = SecurityConfig::strict();
        config.redirect_exempt = vec!["^api/".to_string(), ".*".to_string()];
        assert_eq!(config.audit(), vec![EXEMPT_MATCHES_EVERYTHING]);

        config.redirect_exempt = vec!["^$".to_string(), "^api/".to_string()];
        assert!(config.audit().is_empty());
    }

    #[test]
    fn test_display() {
        assert!(HSTS_DISABLED.to_string().starts_with("(security.W002) "));
    }
}
