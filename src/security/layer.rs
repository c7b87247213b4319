use super::config::SecurityConfig;
use super::policy::SecurityPolicy;
use super::request::RequestInfo;
use crate::error::Result;
use axum::{body::Body, extract::Request, http::Response};
use futures::future::BoxFuture;
use std::sync::Arc;
use tower::Service;

/// Build a Tower layer that redirects insecure requests and adds security
/// headers to responses
///
/// Returns `Ok(None)` when the config is disabled. Configuration warnings
/// from [`SecurityConfig::audit`] are logged once here.
///
/// # Errors
///
/// Returns a [`ConfigError`](crate::ConfigError) if the policy cannot be
/// compiled.
pub fn build_security_layer(config: &SecurityConfig) -> Result<Option<SecurityLayer>> {
    for warning in config.audit() {
        tracing::warn!(id = warning.id, "{}", warning.message);
    }

    if !config.enabled {
        return Ok(None);
    }

    let policy = SecurityPolicy::new(config)?;
    tracing::info!(
        ssl_redirect = config.ssl_redirect,
        hsts_seconds = config.hsts_seconds,
        exempt_patterns = config.redirect_exempt.len(),
        "Security layer enabled"
    );

    Ok(Some(SecurityLayer::new(policy)))
}

/// Tower layer that applies a [`SecurityPolicy`]
#[derive(Clone, Debug)]
pub struct SecurityLayer {
    policy: Arc<SecurityPolicy>,
}

impl SecurityLayer {
    pub fn new(policy: SecurityPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }
}

impl<S> tower::Layer<S> for SecurityLayer {
    type Service = SecurityService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SecurityService {
            inner,
            policy: self.policy.clone(),
        }
    }
}

/// Tower service that applies a [`SecurityPolicy`] around an inner service
#[derive(Clone, Debug)]
pub struct SecurityService<S> {
    inner: S,
    policy: Arc<SecurityPolicy>,
}

impl<S> Service<Request> for SecurityService<S>
where
    S: Service<Request, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = BoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let policy = self.policy.clone();

        // Take the service that was driven to readiness; a redirect drops it
        // so any capacity it reserved is released.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        if let Some(redirect) = policy.before_handle(&mut req) {
            return Box::pin(async move { Ok(redirect) });
        }

        let info = RequestInfo::from_request(&req);
        let fut = inner.call(req);

        Box::pin(async move {
            let response = fut.await?;
            Ok(policy.after_handle(&info, response))
        })
    }
}
