/// Errors raised while turning configuration into a running security policy.
///
/// Every variant is produced at construction time. Once a
/// [`SecurityPolicy`](crate::security::SecurityPolicy) exists, the request
/// path cannot fail.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid redirect exempt pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid proxy SSL header: {0}")]
    InvalidProxyHeader(String),

    #[error("Invalid SSL host: {0}")]
    InvalidSslHost(String),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}

impl ConfigError {
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }

    pub fn invalid_proxy_header(msg: impl Into<String>) -> Self {
        Self::InvalidProxyHeader(msg.into())
    }

    pub fn invalid_ssl_host(msg: impl Into<String>) -> Self {
        Self::InvalidSslHost(msg.into())
    }
}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_invalid_pattern_keeps_source() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = ConfigError::invalid_pattern("(unclosed", source);

        assert!(err.to_string().contains("'(unclosed'"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ConfigError::invalid_ssl_host("empty").to_string(),
            "Invalid SSL host: empty"
        );
        assert_eq!(
            ConfigError::invalid_proxy_header("bad name").to_string(),
            "Invalid proxy SSL header: bad name"
        );
    }
}
