//! Configuration error types.

use thiserror::Error;

/// Errors raised while building or loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The default TTL is larger than the maximum TTL.
    #[error("default cache age {default_secs}s exceeds maximum cache age {max_secs}s")]
    DefaultExceedsMax {
        /// Configured default age.
        default_secs: u64,
        /// Configured maximum age.
        max_secs: u64,
    },

    /// The TOML document could not be parsed.
    #[error("invalid cache configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
