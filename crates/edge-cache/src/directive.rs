//! `Cache-Control` max-age extraction and normalization.

use edge_core::CacheBounds;

/// Shared-cache TTL token, preferred when present.
const S_MAXAGE: &str = "s-maxage";
/// General TTL token.
const MAX_AGE: &str = "max-age";

/// Outcome of reading one TTL token from a directive string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MaxAgeToken {
    /// The token does not appear.
    Absent,
    /// The token appears with a usable non-negative value.
    Parsed(u64),
    /// The token appears but its value is not a non-negative integer.
    Malformed,
}

impl MaxAgeToken {
    /// Read `name=<value>` from a comma-separated directive list.
    ///
    /// Only the first occurrence of `name` counts. The value's leading digit
    /// run is used, so `max-age=60abc` reads as 60. Digit runs too large for
    /// `u64` saturate and are clamped by the caller.
    pub(crate) fn read(directive: &str, name: &str) -> Self {
        let Some(raw) = find_value(directive, name) else {
            return Self::Absent;
        };

        let unquoted = raw.trim_matches('"');
        let digits_len = unquoted
            .bytes()
            .take_while(|b| b.is_ascii_digit())
            .count();

        if digits_len == 0 {
            tracing::warn!(token = name, value = raw, "unparseable cache max-age, using 0");
            return Self::Malformed;
        }

        let value = unquoted[..digits_len].parse::<u64>().unwrap_or(u64::MAX);
        Self::Parsed(value)
    }
}

fn find_value<'a>(directive: &'a str, name: &str) -> Option<&'a str> {
    directive
        .split(',')
        .filter_map(|part| part.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
        .map(|(_, value)| value.trim())
}

/// Compute the effective `max-age` in seconds for a raw directive string.
///
/// `s-maxage` wins over `max-age`. With neither present the default TTL is
/// returned; a present but malformed value yields 0. The result never
/// exceeds `bounds.max_age_secs()`.
pub fn compute_effective_max_age(directive: &str, bounds: &CacheBounds) -> u64 {
    let token = match MaxAgeToken::read(directive, S_MAXAGE) {
        MaxAgeToken::Absent => MaxAgeToken::read(directive, MAX_AGE),
        found => found,
    };

    match token {
        MaxAgeToken::Absent => bounds.default_age_secs(),
        MaxAgeToken::Malformed => 0,
        MaxAgeToken::Parsed(secs) => secs.min(bounds.max_age_secs()),
    }
}

/// Format a TTL as the only directive shape this layer emits.
pub fn format_cache_control(max_age_secs: u64) -> String {
    format!("public, max-age={}", max_age_secs)
}

/// Normalize any directive string to `public, max-age=<N>`.
///
/// Other directives such as `private` or `no-store` are not carried over.
pub fn build_cache_control_string(directive: &str, bounds: &CacheBounds) -> String {
    format_cache_control(compute_effective_max_age(directive, bounds))
}
