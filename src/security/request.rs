use axum::{
    http::{Request, Response, uri::Scheme},
    response::{IntoResponseParts, ResponseParts},
};
use std::convert::Infallible;

/// Whether a request arrived over a secure transport.
///
/// Stored in the request extensions. A TLS acceptor can insert it up front;
/// the security layer inserts [`RequestSecurity::Secure`] when a trusted
/// proxy header vouches for the original connection. The value lives only
/// as long as the request it is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSecurity {
    Secure,
    Insecure,
}

impl RequestSecurity {
    /// Resolve the security of a request.
    ///
    /// An explicit extension wins; otherwise an absolute-form URI with the
    /// `https` scheme counts as secure.
    pub fn of<B>(req: &Request<B>) -> Self {
        if let Some(security) = req.extensions().get::<RequestSecurity>() {
            return *security;
        }

        if req.uri().scheme() == Some(&Scheme::HTTPS) {
            Self::Secure
        } else {
            Self::Insecure
        }
    }

    pub fn is_secure(self) -> bool {
        matches!(self, Self::Secure)
    }
}

/// The parts of a request the post-hook needs after the request itself has
/// been handed to the inner service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInfo {
    /// Request path with leading slashes removed
    pub path: String,
    pub secure: bool,
}

impl RequestInfo {
    pub fn from_request<B>(req: &Request<B>) -> Self {
        Self {
            path: relative_path(req.uri().path()).to_string(),
            secure: RequestSecurity::of(req).is_secure(),
        }
    }
}

/// Strip every leading `/` so patterns are written relative to the root.
pub(crate) fn relative_path(path: &str) -> &str {
    path.trim_start_matches('/')
}

/// Response marker that opts a single response out of `X-Frame-Options`.
///
/// Return it alongside a body from any handler:
///
/// ```rust,ignore
/// async fn embeddable_widget() -> impl IntoResponse {
///     (FrameDenyExempt, "<html>...</html>")
/// }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameDenyExempt;

impl FrameDenyExempt {
    pub fn is_marked<B>(response: &Response<B>) -> bool {
        response.extensions().get::<FrameDenyExempt>().is_some()
    }
}

impl IntoResponseParts for FrameDenyExempt {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        res.extensions_mut().insert(self);
        Ok(res)
    }
}
