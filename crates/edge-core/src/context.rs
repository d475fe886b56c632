//! Intercepted request context.

use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};

use http::{HeaderMap, Method};

use crate::headers::HeaderLookup;

/// Unique request identifier for log correlation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(pub String);

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

impl RequestId {
    /// Generate a new request ID.
    pub fn generate() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let seq = NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("{:x}-{:x}", nanos, seq))
    }

    /// Create from an existing ID string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An inbound request about to be forwarded to the upstream provider.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique request identifier.
    pub request_id: RequestId,
    /// HTTP method.
    pub method: Method,
    /// Full upstream URL.
    pub url: String,
    /// Request headers.
    pub headers: HeaderMap,
    /// Raw request body.
    pub body: String,
}

impl RequestContext {
    /// Create a new request context with empty headers and body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::generate(),
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: String::new(),
        }
    }

    /// Set the request headers.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Set the request body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<Cow<'_, str>> {
        self.headers.get_header(name)
    }
}
