//! Cache interception in front of an upstream call.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use edge_core::RequestContext;
use tracing::Instrument;

use crate::directive::format_cache_control;
use crate::headers::{apply_cache_headers, apply_cache_status, header_names, CacheStatus};
use crate::key::RequestFingerprint;
use crate::policy::{CachePolicyResolver, ResolvedCachePolicy};
use crate::store::{CachedResponse, ResponseStore};

/// Response returned by the upstream provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: String,
}

impl UpstreamResponse {
    /// Create a response with no headers.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<CachedResponse> for UpstreamResponse {
    fn from(entry: CachedResponse) -> Self {
        Self {
            status: entry.status,
            headers: entry.headers,
            body: entry.body,
        }
    }
}

/// What the interceptor hands back to the request pipeline.
#[derive(Debug, Clone)]
pub struct InterceptOutcome {
    /// Response to serve, with `Cache-Control` and `Helicone-Cache` set.
    pub response: UpstreamResponse,
    /// How the response was produced.
    pub cache_status: CacheStatus,
    /// Policy resolved for the request.
    pub policy: ResolvedCachePolicy,
}

/// Gates store reads and writes around an upstream call using the request's
/// resolved cache policy.
///
/// Requests that opt out of caching are passed through with only a
/// `Helicone-Cache: BYPASS` marker; the upstream `Cache-Control` is kept.
///
/// Store failures never fail the request: a failed read counts as a miss and
/// a failed write is logged and dropped.
pub struct CacheInterceptor<S: ResponseStore> {
    store: Arc<S>,
    resolver: CachePolicyResolver,
}

impl<S: ResponseStore> CacheInterceptor<S> {
    /// Create an interceptor with the default resolver.
    pub fn new(store: S) -> Self {
        Self::from_arc(Arc::new(store))
    }

    /// Create an interceptor over a shared store.
    pub fn from_arc(store: Arc<S>) -> Self {
        Self {
            store,
            resolver: CachePolicyResolver::default(),
        }
    }

    /// Use a resolver with custom bounds.
    pub fn with_resolver(mut self, resolver: CachePolicyResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Serve `request` from the store when allowed, otherwise call `upstream`
    /// and store its response when allowed.
    ///
    /// Only the upstream error is propagated.
    pub async fn handle<F, Fut, E>(
        &self,
        request: &RequestContext,
        upstream: F,
    ) -> Result<InterceptOutcome, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<UpstreamResponse, E>>,
    {
        let span = tracing::debug_span!("cache_intercept", request_id = %request.request_id);
        self.handle_inner(request, upstream).instrument(span).await
    }

    async fn handle_inner<F, Fut, E>(
        &self,
        request: &RequestContext,
        upstream: F,
    ) -> Result<InterceptOutcome, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<UpstreamResponse, E>>,
    {
        let policy = self.resolver.resolve(&request.headers);

        if policy.is_bypass() {
            tracing::debug!("cache bypass");
            let mut response = upstream().await?;
            apply_cache_status(&mut response.headers, CacheStatus::Bypass);
            return Ok(InterceptOutcome {
                response,
                cache_status: CacheStatus::Bypass,
                policy,
            });
        }

        let fingerprint = RequestFingerprint::for_request(request);

        if policy.should_read_from_cache() {
            if let Some(entry) = self.lookup(&fingerprint).await {
                tracing::debug!(%fingerprint, age = entry.age(), "cache hit");
                // A hit never advertises more freshness than the entry has left.
                let cache_control = format_cache_control(policy.max_age().min(entry.remaining_ttl()));
                let mut response = UpstreamResponse::from(entry);
                apply_cache_headers(&mut response.headers, &cache_control, CacheStatus::Hit);
                return Ok(InterceptOutcome {
                    response,
                    cache_status: CacheStatus::Hit,
                    policy,
                });
            }
            tracing::debug!(%fingerprint, "cache miss");
        }

        let mut response = upstream().await?;
        apply_cache_headers(&mut response.headers, policy.cache_control(), CacheStatus::Miss);

        if policy.should_save_to_cache() {
            self.save(&fingerprint, &response, &policy).await;
        }

        Ok(InterceptOutcome {
            response,
            cache_status: CacheStatus::Miss,
            policy,
        })
    }

    async fn lookup(&self, fingerprint: &RequestFingerprint) -> Option<CachedResponse> {
        match self.store.get(fingerprint.as_str()).await {
            Ok(Some(entry)) if !entry.is_expired() => Some(entry),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(%fingerprint, error = %e, "cache read failed");
                None
            }
        }
    }

    async fn save(
        &self,
        fingerprint: &RequestFingerprint,
        response: &UpstreamResponse,
        policy: &ResolvedCachePolicy,
    ) {
        if !response.is_success() {
            tracing::debug!(%fingerprint, status = response.status, "not caching non-success response");
            return;
        }
        if policy.max_age() == 0 {
            return;
        }

        let mut headers = response.headers.clone();
        headers.retain(|(name, _)| !name.eq_ignore_ascii_case(header_names::CACHE_STATUS));

        let entry = CachedResponse::new(
            response.status,
            headers,
            response.body.clone(),
            Duration::from_secs(policy.max_age()),
        );

        if let Err(e) = self.store.put(fingerprint.as_str(), entry).await {
            tracing::warn!(%fingerprint, error = %e, "cache write failed");
        }
    }
}
