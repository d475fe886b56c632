//! Request fingerprints used as store keys.

use edge_core::RequestContext;
use http::Method;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Header identifying the caller to the upstream provider.
const AUTHORIZATION: &str = "Authorization";

/// Stable store key for an upstream request.
///
/// Two requests share a fingerprint only when method, URL, body and caller
/// identity all match, so one caller's saved response is never served to
/// another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestFingerprint(String);

impl RequestFingerprint {
    /// Hex SHA-256 over length-prefixed method, URL, body and caller identity.
    pub fn compute(method: &Method, url: &str, body: &str, identity: Option<&str>) -> Self {
        let mut hasher = Sha256::new();
        update_component(&mut hasher, method.as_str());
        update_component(&mut hasher, url);
        update_component(&mut hasher, body);
        match identity {
            Some(identity) => {
                hasher.update([1u8]);
                update_component(&mut hasher, identity);
            }
            None => hasher.update([0u8]),
        }
        Self(hex::encode(hasher.finalize()))
    }

    /// Fingerprint an intercepted request, keyed to its `Authorization` value.
    pub fn for_request(request: &RequestContext) -> Self {
        let identity = request.header(AUTHORIZATION);
        Self::compute(&request.method, &request.url, &request.body, identity.as_deref())
    }

    /// Get the key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn update_component(hasher: &mut Sha256, component: &str) {
    hasher.update((component.len() as u64).to_be_bytes());
    hasher.update(component.as_bytes());
}

impl std::fmt::Display for RequestFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, HeaderValue};

    const URL: &str = "https://api.openai.com/v1/chat/completions";

    #[test]
    fn test_fingerprint_is_hex_sha256() {
        let fp = RequestFingerprint::compute(&Method::POST, URL, "{}", None);
        assert_eq!(fp.as_str().len(), 64);
        assert!(fp.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_known_value() {
        let fp = RequestFingerprint::compute(&Method::GET, "", "", None);

        let mut expected = Sha256::new();
        expected.update(3u64.to_be_bytes());
        expected.update(b"GET");
        expected.update(0u64.to_be_bytes());
        expected.update(0u64.to_be_bytes());
        expected.update([0u8]);
        assert_eq!(fp.as_str(), hex::encode(expected.finalize()));
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let a = RequestFingerprint::compute(&Method::POST, URL, r#"{"model":"gpt-4"}"#, Some("Bearer sk-a"));
        let b = RequestFingerprint::compute(&Method::POST, URL, r#"{"model":"gpt-4"}"#, Some("Bearer sk-a"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_varies_by_input() {
        let base = RequestFingerprint::compute(&Method::POST, URL, "a", None);
        assert_ne!(base, RequestFingerprint::compute(&Method::POST, URL, "b", None));
        assert_ne!(base, RequestFingerprint::compute(&Method::PUT, URL, "a", None));
        assert_ne!(
            base,
            RequestFingerprint::compute(&Method::POST, "https://api.openai.com/v1/embeddings", "a", None)
        );
    }

    #[test]
    fn test_fingerprint_varies_by_caller() {
        let alice = RequestFingerprint::compute(&Method::POST, URL, "{}", Some("Bearer sk-alice"));
        let bob = RequestFingerprint::compute(&Method::POST, URL, "{}", Some("Bearer sk-bob"));
        let anonymous = RequestFingerprint::compute(&Method::POST, URL, "{}", None);
        let empty = RequestFingerprint::compute(&Method::POST, URL, "{}", Some(""));

        assert_ne!(alice, bob);
        assert_ne!(alice, anonymous);
        assert_ne!(anonymous, empty);
    }

    #[test]
    fn test_component_boundaries_are_unambiguous() {
        let a = RequestFingerprint::compute(&Method::POST, "https://x/a\nb", "c", None);
        let b = RequestFingerprint::compute(&Method::POST, "https://x/a", "b\nc", None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_for_request_uses_authorization() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer sk-alice"));
        let request = RequestContext::new(Method::POST, URL)
            .with_headers(headers)
            .with_body("{}");

        assert_eq!(
            RequestFingerprint::for_request(&request),
            RequestFingerprint::compute(&Method::POST, URL, "{}", Some("Bearer sk-alice"))
        );
    }
}
