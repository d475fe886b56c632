//! Case-insensitive header access.

use std::borrow::Cow;
use std::collections::HashMap;

use http::HeaderMap;

/// Read-only, case-insensitive access to request or response headers.
///
/// The cache resolver only ever reads headers by name, so any container that
/// can answer a lookup works as its input.
pub trait HeaderLookup {
    /// Get a header value by name, ignoring ASCII case.
    ///
    /// A header sent on several lines comes back as one value, joined with
    /// `", "` in arrival order.
    fn get_header(&self, name: &str) -> Option<Cow<'_, str>>;
}

fn join_values<'a>(mut values: impl Iterator<Item = &'a str>) -> Option<Cow<'a, str>> {
    let first = values.next()?;
    match values.next() {
        None => Some(Cow::Borrowed(first)),
        Some(second) => {
            let mut joined = format!("{}, {}", first, second);
            for value in values {
                joined.push_str(", ");
                joined.push_str(value);
            }
            Some(Cow::Owned(joined))
        }
    }
}

impl HeaderLookup for HeaderMap {
    fn get_header(&self, name: &str) -> Option<Cow<'_, str>> {
        // Values that are not visible ASCII are skipped.
        join_values(self.get_all(name).iter().filter_map(|v| v.to_str().ok()))
    }
}

impl HeaderLookup for HashMap<String, String> {
    fn get_header(&self, name: &str) -> Option<Cow<'_, str>> {
        join_values(
            self.iter()
                .filter(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str()),
        )
    }
}

impl HeaderLookup for [(String, String)] {
    fn get_header(&self, name: &str) -> Option<Cow<'_, str>> {
        join_values(
            self.iter()
                .filter(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str()),
        )
    }
}

impl HeaderLookup for Vec<(String, String)> {
    fn get_header(&self, name: &str) -> Option<Cow<'_, str>> {
        self.as_slice().get_header(name)
    }
}

impl<T: HeaderLookup + ?Sized> HeaderLookup for &T {
    fn get_header(&self, name: &str) -> Option<Cow<'_, str>> {
        (**self).get_header(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_header_map_lookup_ignores_case() {
        let mut headers = HeaderMap::new();
        headers.insert("helicone-cache-enabled", HeaderValue::from_static("true"));

        assert_eq!(headers.get_header("Helicone-Cache-Enabled").as_deref(), Some("true"));
        assert_eq!(headers.get_header("HELICONE-CACHE-ENABLED").as_deref(), Some("true"));
        assert_eq!(headers.get_header("Helicone-Cache-Read"), None);
    }

    #[test]
    fn test_header_map_joins_repeated_lines() {
        let mut headers = HeaderMap::new();
        headers.append("cache-control", HeaderValue::from_static("no-cache"));
        headers.append("cache-control", HeaderValue::from_static("max-age=60"));

        assert_eq!(
            headers.get_header("Cache-Control").as_deref(),
            Some("no-cache, max-age=60")
        );
    }

    #[test]
    fn test_single_value_is_borrowed() {
        let mut headers = HeaderMap::new();
        headers.insert("cache-control", HeaderValue::from_static("max-age=5"));

        assert!(matches!(headers.get_header("cache-control"), Some(Cow::Borrowed("max-age=5"))));
    }

    #[test]
    fn test_hash_map_lookup_ignores_case() {
        let mut headers = HashMap::new();
        headers.insert("Cache-Control".to_string(), "max-age=60".to_string());

        assert_eq!(headers.get_header("cache-control").as_deref(), Some("max-age=60"));
        assert_eq!(headers.get_header("pragma"), None);
    }

    #[test]
    fn test_pair_list_joins_matches_in_order() {
        let headers = vec![
            ("cache-control".to_string(), "max-age=1".to_string()),
            ("content-type".to_string(), "text/plain".to_string()),
            ("Cache-Control".to_string(), "max-age=2".to_string()),
        ];

        assert_eq!(
            headers.get_header("CACHE-CONTROL").as_deref(),
            Some("max-age=1, max-age=2")
        );
    }

    #[test]
    fn test_invalid_header_map_value_is_skipped() {
        let mut headers = HeaderMap::new();
        headers.append(
            "cache-control",
            HeaderValue::from_bytes(b"max-age=\xff").unwrap(),
        );

        assert_eq!(headers.get_header("cache-control"), None);

        headers.append("cache-control", HeaderValue::from_static("max-age=30"));
        assert_eq!(headers.get_header("cache-control").as_deref(), Some("max-age=30"));
    }
}
