//! Cache header names and the served-response cache status.

use serde::{Deserialize, Serialize};

/// Header names read and written by the cache layer.
pub mod header_names {
    /// Enables both cache read and cache save.
    pub const CACHE_ENABLED: &str = "Helicone-Cache-Enabled";
    /// Enables cache save only.
    pub const CACHE_SAVE: &str = "Helicone-Cache-Save";
    /// Enables cache read only.
    pub const CACHE_READ: &str = "Helicone-Cache-Read";
    /// Standard HTTP cache directive.
    pub const CACHE_CONTROL: &str = "Cache-Control";
    /// Cache status of a served response (HIT, MISS, BYPASS).
    pub const CACHE_STATUS: &str = "Helicone-Cache";
}

/// How a response was produced with respect to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// Served from the store.
    Hit,
    /// Fetched from upstream while caching was in play.
    Miss,
    /// Caching disabled for this request.
    Bypass,
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hit => write!(f, "HIT"),
            Self::Miss => write!(f, "MISS"),
            Self::Bypass => write!(f, "BYPASS"),
        }
    }
}

/// Set only the `Helicone-Cache` status, leaving `Cache-Control` untouched.
pub fn apply_cache_status(headers: &mut Vec<(String, String)>, status: CacheStatus) {
    headers.retain(|(name, _)| !name.eq_ignore_ascii_case(header_names::CACHE_STATUS));
    headers.push((header_names::CACHE_STATUS.to_string(), status.to_string()));
}

/// Replace or append the cache headers on an outgoing header list.
///
/// Any existing `Cache-Control` or `Helicone-Cache` entries are dropped first,
/// so upstream directives never leak past the normalized one.
pub fn apply_cache_headers(
    headers: &mut Vec<(String, String)>,
    cache_control: &str,
    status: CacheStatus,
) {
    headers.retain(|(name, _)| {
        !name.eq_ignore_ascii_case(header_names::CACHE_CONTROL)
            && !name.eq_ignore_ascii_case(header_names::CACHE_STATUS)
    });
    headers.push((
        header_names::CACHE_CONTROL.to_string(),
        cache_control.to_string(),
    ));
    headers.push((header_names::CACHE_STATUS.to_string(), status.to_string()));
}
