//! Request-level cache policy resolution.

use edge_core::{CacheBounds, HeaderLookup};
use serde::Serialize;

use crate::directive::{compute_effective_max_age, format_cache_control};
use crate::flags::CacheDirectiveFlags;
use crate::headers::header_names;

/// Cache decision for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedCachePolicy {
    should_read_from_cache: bool,
    should_save_to_cache: bool,
    cache_control: String,
    #[serde(skip)]
    max_age_secs: u64,
}

impl ResolvedCachePolicy {
    fn new(flags: CacheDirectiveFlags, max_age_secs: u64) -> Self {
        Self {
            should_read_from_cache: flags.allows_read(),
            should_save_to_cache: flags.allows_save(),
            cache_control: format_cache_control(max_age_secs),
            max_age_secs,
        }
    }

    /// Whether the store may be probed for this request.
    pub fn should_read_from_cache(&self) -> bool {
        self.should_read_from_cache
    }

    /// Whether a fresh upstream response may be stored.
    pub fn should_save_to_cache(&self) -> bool {
        self.should_save_to_cache
    }

    /// Directive attached to stored and served responses.
    pub fn cache_control(&self) -> &str {
        &self.cache_control
    }

    /// Effective TTL in seconds carried by `cache_control`.
    pub fn max_age(&self) -> u64 {
        self.max_age_secs
    }

    /// Whether the cache takes any part in this request.
    pub fn is_bypass(&self) -> bool {
        !self.should_read_from_cache && !self.should_save_to_cache
    }
}

/// Maps caller headers to a `ResolvedCachePolicy` within fixed TTL bounds.
///
/// Resolution never fails: anything unparseable degrades to flags off and
/// the default or zero TTL.
///
/// # Example
///
/// ```ignore
/// let resolver = CachePolicyResolver::default();
/// let policy = resolver.resolve(&request.headers);
/// if policy.should_read_from_cache() {
///     // probe the store
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CachePolicyResolver {
    bounds: CacheBounds,
}

impl CachePolicyResolver {
    /// Create a resolver with custom bounds.
    pub fn new(bounds: CacheBounds) -> Self {
        Self { bounds }
    }

    /// The bounds this resolver clamps to.
    pub fn bounds(&self) -> &CacheBounds {
        &self.bounds
    }

    /// Effective `max-age` for a raw directive string.
    pub fn effective_max_age(&self, directive: &str) -> u64 {
        compute_effective_max_age(directive, &self.bounds)
    }

    /// Normalized `public, max-age=<N>` for a raw directive string.
    pub fn cache_control_for(&self, directive: &str) -> String {
        format_cache_control(self.effective_max_age(directive))
    }

    /// Resolve the policy for an inbound request.
    pub fn resolve<H: HeaderLookup + ?Sized>(&self, headers: &H) -> ResolvedCachePolicy {
        let flags = CacheDirectiveFlags::from_headers(headers);
        let directive = headers
            .get_header(header_names::CACHE_CONTROL)
            .unwrap_or_default();
        let policy = ResolvedCachePolicy::new(flags, self.effective_max_age(&directive));

        tracing::debug!(
            read = policy.should_read_from_cache,
            save = policy.should_save_to_cache,
            cache_control = %policy.cache_control,
            "resolved cache policy"
        );

        policy
    }

    /// Normalized directive for an upstream response's own headers.
    ///
    /// A response without `Cache-Control` gets the default TTL.
    pub fn response_cache_control<H: HeaderLookup + ?Sized>(&self, headers: &H) -> String {
        let directive = headers
            .get_header(header_names::CACHE_CONTROL)
            .unwrap_or_default();
        self.cache_control_for(&directive)
    }
}

/// Resolve a request policy with the default bounds.
pub fn resolve<H: HeaderLookup + ?Sized>(headers: &H) -> ResolvedCachePolicy {
    CachePolicyResolver::default().resolve(headers)
}
