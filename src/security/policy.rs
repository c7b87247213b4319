use super::config::{ProxySslHeader, SecurityConfig};
use super::request::{FrameDenyExempt, RequestInfo, RequestSecurity, relative_path};
use crate::error::{ConfigError, Result};
use axum::body::Body;
use axum::http::{
    HeaderName, HeaderValue, Request, Response, StatusCode,
    header::{
        HOST, LOCATION, STRICT_TRANSPORT_SECURITY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
        X_XSS_PROTECTION,
    },
    uri::Authority,
};
use regex::Regex;
use tracing::{debug, warn};

/// Compiled HTTPS redirect and security header policy.
///
/// Built once at startup and shared read-only between requests. All
/// per-request state lives on the request and response passed to each hook.
#[derive(Debug)]
pub struct SecurityPolicy {
    hsts_header: Option<HeaderValue>,
    frame_deny: bool,
    content_type_nosniff: bool,
    xss_filter: bool,
    ssl_redirect: bool,
    ssl_host: Option<String>,
    proxy_ssl_header: Option<(HeaderName, HeaderValue)>,
    redirect_exempt: Vec<Regex>,
}

impl SecurityPolicy {
    /// Compile a policy from configuration.
    ///
    /// # Errors
    ///
    /// Fails if an exempt pattern is not a valid regular expression, the
    /// proxy header cannot be represented as an HTTP header, or the SSL host
    /// is not a valid authority.
    pub fn new(config: &SecurityConfig) -> Result<Self> {
        let redirect_exempt = config
            .redirect_exempt
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::invalid_pattern(pattern.as_str(), e))
            })
            .collect::<Result<Vec<_>>>()?;

        let proxy_ssl_header = config
            .proxy_ssl_header
            .as_ref()
            .map(parse_proxy_header)
            .transpose()?;

        let ssl_host = config.ssl_host.as_deref().map(validate_ssl_host).transpose()?;

        let hsts_header = if config.hsts_seconds > 0 {
            let mut value = format!("max-age={}", config.hsts_seconds);
            if config.hsts_include_subdomains {
                value.push_str("; includeSubDomains");
            }
            if config.hsts_preload {
                value.push_str("; preload");
            }
            HeaderValue::from_str(&value).ok()
        } else {
            None
        };

        Ok(Self {
            hsts_header,
            frame_deny: config.frame_deny,
            content_type_nosniff: config.content_type_nosniff,
            xss_filter: config.xss_filter,
            ssl_redirect: config.ssl_redirect,
            ssl_host,
            proxy_ssl_header,
            redirect_exempt,
        })
    }

    /// Whether a relative path (no leading `/`) matches any exempt pattern
    pub fn is_exempt(&self, path: &str) -> bool {
        self.redirect_exempt.iter().any(|pattern| pattern.is_match(path))
    }

    /// Pre-hook: decide whether the request should be redirected.
    ///
    /// Returns `Some` with a 301 response to short-circuit the request, or
    /// `None` to hand it on. May mark the request secure when the configured
    /// proxy header vouches for it.
    pub fn before_handle<B>(&self, req: &mut Request<B>) -> Option<Response<Body>> {
        if let Some((name, expected)) = &self.proxy_ssl_header {
            if !RequestSecurity::of(req).is_secure() && req.headers().get(name) == Some(expected) {
                debug!(header = %name, "Trusting proxy SSL header, treating request as secure");
                req.extensions_mut().insert(RequestSecurity::Secure);
            }
        }

        let path = relative_path(req.uri().path());
        if self.is_exempt(path) {
            debug!(path = %path, "Path is redirect exempt");
            return None;
        }

        let secure = RequestSecurity::of(req).is_secure();
        let scheme = self.redirect_scheme(secure, false)?;
        self.redirect(req, scheme)
    }

    /// Post-hook: fill in the configured security headers.
    ///
    /// Headers already present on the response are left alone, so running
    /// this twice yields the same header set as running it once.
    pub fn after_handle<B>(&self, info: &RequestInfo, mut response: Response<B>) -> Response<B> {
        if self.is_exempt(&info.path) {
            return response;
        }

        let frame_exempt = FrameDenyExempt::is_marked(&response);
        let headers = response.headers_mut();

        if self.frame_deny && !frame_exempt && !headers.contains_key(X_FRAME_OPTIONS) {
            headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
        }

        if let Some(hsts) = &self.hsts_header {
            if info.secure && !headers.contains_key(STRICT_TRANSPORT_SECURITY) {
                headers.insert(STRICT_TRANSPORT_SECURITY, hsts.clone());
            }
        }

        if self.content_type_nosniff && !headers.contains_key(X_CONTENT_TYPE_OPTIONS) {
            headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        }

        if self.xss_filter && !headers.contains_key(X_XSS_PROTECTION) {
            headers.insert(X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block"));
        }

        response
    }

    /// Redirect decision table.
    ///
    /// Insecure non-exempt requests go to https. Secure exempt requests go
    /// back to http. Relative and redirect exemption share one pattern list,
    /// and the pre-hook returns early for exempt paths, so it only ever
    /// reaches the first row.
    fn redirect_scheme(&self, secure: bool, exempt: bool) -> Option<&'static str> {
        if !self.ssl_redirect {
            return None;
        }

        match (secure, exempt) {
            (false, false) => Some("https"),
            (true, true) => Some("http"),
            _ => None,
        }
    }

    fn redirect<B>(&self, req: &Request<B>, scheme: &str) -> Option<Response<Body>> {
        let host = match self.ssl_host.clone().or_else(|| request_host(req)) {
            Some(host) => host,
            None => {
                warn!(path = %req.uri().path(), "Cannot redirect request without a host");
                return None;
            }
        };

        let full_path = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let location = format!("{}://{}{}", scheme, host, full_path);

        match HeaderValue::try_from(location.as_str()) {
            Ok(value) => {
                debug!(location = %location, "Redirecting request");
                Some(permanent_redirect(value))
            }
            Err(_) => {
                warn!(location = %location, "Redirect location is not a valid header value");
                None
            }
        }
    }
}

/// Host the client asked for: the `Host` header, then the URI authority.
///
/// Values that are not a bare `host[:port]` authority are ignored, so a
/// crafted header cannot smuggle a path, query or userinfo into `Location`.
fn request_host<B>(req: &Request<B>) -> Option<String> {
    let header_host = req
        .headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_host);

    header_host.or_else(|| req.uri().authority().and_then(|a| parse_host(a.as_str())))
}

fn parse_host(raw: &str) -> Option<String> {
    if raw.is_empty() || raw.contains('@') {
        return None;
    }
    raw.parse::<Authority>().ok().map(|a| a.as_str().to_string())
}

fn permanent_redirect(location: HeaderValue) -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::MOVED_PERMANENTLY;
    response.headers_mut().insert(LOCATION, location);
    response
}

fn parse_proxy_header(header: &ProxySslHeader) -> Result<(HeaderName, HeaderValue)> {
    let normalized = normalize_header_name(&header.name);
    let name = HeaderName::from_bytes(normalized.as_bytes()).map_err(|e| {
        ConfigError::invalid_proxy_header(format!("name '{}': {}", header.name, e))
    })?;
    let value = HeaderValue::from_str(&header.value).map_err(|e| {
        ConfigError::invalid_proxy_header(format!("value '{}': {}", header.value, e))
    })?;
    Ok((name, value))
}

/// Accept CGI-style names (`HTTP_X_FORWARDED_PROTO`) as well as plain ones.
fn normalize_header_name(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.strip_prefix("HTTP_") {
        Some(rest) => rest.replace('_', "-").to_ascii_lowercase(),
        None => trimmed.to_ascii_lowercase(),
    }
}

fn validate_ssl_host(host: &str) -> Result<String> {
    let host = host.trim();
    if host.is_empty() {
        return Err(ConfigError::invalid_ssl_host("host is empty"));
    }
    if host.contains('@') {
        return Err(ConfigError::invalid_ssl_host(format!("'{}': userinfo is not allowed", host)));
    }
    host.parse::<Authority>()
        .map_err(|e| ConfigError::invalid_ssl_host(format!("'{}': {}", host, e)))?;
    Ok(host.to_string())
}
