//! Core abstractions for the edge cache interception layer.
//!
//! This crate provides the fundamental types shared by the caching crates:
//! - `HeaderLookup` - Case-insensitive header access over several header containers
//! - `RequestContext` - The intercepted upstream request
//! - `CacheBounds` - Read-only TTL bounds injected into the policy resolver
//! - `ConfigError` - Configuration validation errors

mod config;
mod context;
mod error;
mod headers;

pub use config::*;
pub use context::*;
pub use error::*;
pub use headers::*;
