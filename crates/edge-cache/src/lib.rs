//! Cache policy resolution for the edge interception layer.
//!
//! This crate provides:
//! - `CachePolicyResolver` - Maps request headers to a `ResolvedCachePolicy`
//! - `CacheDirectiveFlags` - The `Helicone-Cache-*` switches
//! - `compute_effective_max_age` / `build_cache_control_string` - Bounded TTL normalization
//! - `RequestFingerprint` - Store keys for upstream requests
//! - `ResponseStore` - Opaque get/put store capability
//! - `CacheInterceptor` - Store read/write gating around an upstream call
//!
//! # Example
//!
//! ```ignore
//! use edge_cache::{CacheInterceptor, InMemoryStore, UpstreamResponse};
//!
//! let interceptor = CacheInterceptor::new(InMemoryStore::new());
//! let outcome = interceptor
//!     .handle(&request, || async { forward_to_provider(&request).await })
//!     .await?;
//! ```

mod directive;
mod flags;
mod headers;
mod intercept;
mod key;
mod policy;
mod store;

pub use directive::{build_cache_control_string, compute_effective_max_age, format_cache_control};
pub use edge_core::{CacheBounds, DEFAULT_CACHE_AGE_SECONDS, MAX_CACHE_AGE_SECONDS};
pub use flags::*;
pub use headers::*;
pub use intercept::*;
pub use key::*;
pub use policy::*;
pub use store::*;
