//! Caller-supplied cache switches.

use edge_core::HeaderLookup;

use crate::headers::header_names;

/// The three cache switches a caller can set on a request.
///
/// Each flag is true only when its header value is `"true"` in any case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheDirectiveFlags {
    /// `Helicone-Cache-Enabled`: read and save.
    pub cache_enabled: bool,
    /// `Helicone-Cache-Save`: save only.
    pub cache_save: bool,
    /// `Helicone-Cache-Read`: read only.
    pub cache_read: bool,
}

impl CacheDirectiveFlags {
    /// Read the flags from request headers.
    pub fn from_headers<H: HeaderLookup + ?Sized>(headers: &H) -> Self {
        Self {
            cache_enabled: flag(headers, header_names::CACHE_ENABLED),
            cache_save: flag(headers, header_names::CACHE_SAVE),
            cache_read: flag(headers, header_names::CACHE_READ),
        }
    }

    /// Whether a cached response may be served.
    pub fn allows_read(&self) -> bool {
        self.cache_enabled || self.cache_read
    }

    /// Whether a fresh response may be stored.
    pub fn allows_save(&self) -> bool {
        self.cache_enabled || self.cache_save
    }
}

fn flag<H: HeaderLookup + ?Sized>(headers: &H, name: &str) -> bool {
    headers
        .get_header(name)
        .is_some_and(|v| v.to_lowercase() == "true")
}

/// Read the cache flags from request headers.
pub fn resolve_flags<H: HeaderLookup + ?Sized>(headers: &H) -> CacheDirectiveFlags {
    CacheDirectiveFlags::from_headers(headers)
}
