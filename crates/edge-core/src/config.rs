//! Cache TTL bounds.

use serde::Deserialize;

use crate::error::ConfigError;

/// Upper bound for any emitted `max-age`, in seconds (365 days).
pub const MAX_CACHE_AGE_SECONDS: u64 = 60 * 60 * 24 * 365;

/// TTL used when the caller states no `max-age` or `s-maxage`, in seconds (7 days).
pub const DEFAULT_CACHE_AGE_SECONDS: u64 = 60 * 60 * 24 * 7;

/// Read-only TTL bounds injected into the cache policy resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawCacheBounds")]
pub struct CacheBounds {
    max_age_secs: u64,
    default_age_secs: u64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCacheBounds {
    #[serde(default = "default_max_age")]
    max_age_secs: u64,
    #[serde(default = "default_default_age")]
    default_age_secs: u64,
}

fn default_max_age() -> u64 {
    MAX_CACHE_AGE_SECONDS
}

fn default_default_age() -> u64 {
    DEFAULT_CACHE_AGE_SECONDS
}

impl TryFrom<RawCacheBounds> for CacheBounds {
    type Error = ConfigError;

    fn try_from(raw: RawCacheBounds) -> Result<Self, Self::Error> {
        Self::new(raw.max_age_secs, raw.default_age_secs)
    }
}

impl Default for CacheBounds {
    fn default() -> Self {
        Self {
            max_age_secs: MAX_CACHE_AGE_SECONDS,
            default_age_secs: DEFAULT_CACHE_AGE_SECONDS,
        }
    }
}

impl CacheBounds {
    /// Create bounds, rejecting a default TTL above the maximum.
    pub fn new(max_age_secs: u64, default_age_secs: u64) -> Result<Self, ConfigError> {
        if default_age_secs > max_age_secs {
            return Err(ConfigError::DefaultExceedsMax {
                default_secs: default_age_secs,
                max_secs: max_age_secs,
            });
        }

        Ok(Self {
            max_age_secs,
            default_age_secs,
        })
    }

    /// Parse bounds from a flat TOML table.
    ///
    /// Missing keys fall back to the compile-time constants.
    ///
    /// ```ignore
    /// let bounds = CacheBounds::from_toml_str("max_age_secs = 86400")?;
    /// ```
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Largest `max-age` the resolver will ever emit.
    pub fn max_age_secs(&self) -> u64 {
        self.max_age_secs
    }

    /// `max-age` emitted when the caller states none.
    pub fn default_age_secs(&self) -> u64 {
        self.default_age_secs
    }
}
