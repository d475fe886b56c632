//! Response store capability and an in-memory implementation.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result type for store operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Store operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Failed to serialize/deserialize a stored response.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend storage error.
    #[error("storage error: {0}")]
    Storage(String),
}

/// An upstream response as kept in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: String,
    /// Unix timestamp (seconds) when the entry was stored.
    pub created_at: u64,
    /// Time-to-live in seconds.
    pub ttl_secs: u64,
}

impl CachedResponse {
    /// Create a new entry stamped with the current time.
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<String>, ttl: Duration) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
            created_at: current_timestamp(),
            ttl_secs: ttl.as_secs(),
        }
    }

    /// Check if the entry has expired.
    pub fn is_expired(&self) -> bool {
        current_timestamp() >= self.created_at.saturating_add(self.ttl_secs)
    }

    /// Get remaining TTL in seconds.
    pub fn remaining_ttl(&self) -> u64 {
        self.created_at
            .saturating_add(self.ttl_secs)
            .saturating_sub(current_timestamp())
    }

    /// Get age in seconds.
    pub fn age(&self) -> u64 {
        current_timestamp().saturating_sub(self.created_at)
    }

    /// Encode for a byte-oriented key-value backend.
    pub fn to_bytes(&self) -> CacheResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode from a byte-oriented key-value backend.
    pub fn from_bytes(bytes: &[u8]) -> CacheResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Opaque get/put capability over a response store keyed by request fingerprint.
///
/// Implementations own eviction. Reads and writes need not be atomic with
/// respect to each other.
#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// Get a stored response. Expired entries may be returned; callers check.
    async fn get(&self, key: &str) -> CacheResult<Option<CachedResponse>>;

    /// Store a response under a key.
    async fn put(&self, key: &str, response: CachedResponse) -> CacheResult<()>;
}

/// In-memory response store (for development/testing).
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, CachedResponse>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ResponseStore for InMemoryStore {
    async fn get(&self, key: &str) -> CacheResult<Option<CachedResponse>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| CacheError::Storage(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, response: CachedResponse) -> CacheResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| CacheError::Storage(e.to_string()))?;
        entries.insert(key.to_string(), response);
        Ok(())
    }
}

/// Get current Unix timestamp in seconds.
fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_entry_not_expired() {
        let entry = CachedResponse::new(200, Vec::new(), "ok", Duration::from_secs(60));
        assert!(!entry.is_expired());
        assert!(entry.age() <= 1);
    }

    #[test]
    fn test_zero_ttl_is_expired() {
        let entry = CachedResponse::new(200, Vec::new(), "ok", Duration::ZERO);
        assert!(entry.is_expired());
    }

    #[test]
    fn test_old_entry_is_expired() {
        let mut entry = CachedResponse::new(200, Vec::new(), "ok", Duration::from_secs(60));
        entry.created_at -= 120;
        assert!(entry.is_expired());
        assert!(entry.age() >= 120);
    }

    #[test]
    fn test_remaining_ttl() {
        let mut entry = CachedResponse::new(200, Vec::new(), "ok", Duration::from_secs(100));
        assert!(entry.remaining_ttl() >= 99);

        entry.created_at -= 70;
        let remaining = entry.remaining_ttl();
        assert!((29..=30).contains(&remaining));

        entry.created_at -= 100;
        assert_eq!(entry.remaining_ttl(), 0);
    }

    #[test]
    fn test_bytes_encoding() {
        let entry = CachedResponse::new(
            200,
            vec![("content-type".to_string(), "application/json".to_string())],
            r#"{"id":"chatcmpl-1"}"#,
            Duration::from_secs(60),
        );
        let decoded = CachedResponse::from_bytes(&entry.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let err = CachedResponse::from_bytes(b"not json").unwrap_err();
        assert!(matches!(err, CacheError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_in_memory_store_put_get() {
        let store = InMemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get("k").await.unwrap(), None);

        let entry = CachedResponse::new(200, Vec::new(), "body", Duration::from_secs(60));
        store.put("k", entry.clone()).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("k").await.unwrap(), Some(entry));
    }

    #[tokio::test]
    async fn test_in_memory_store_overwrites() {
        let store = InMemoryStore::new();
        store
            .put("k", CachedResponse::new(200, Vec::new(), "a", Duration::from_secs(60)))
            .await
            .unwrap();
        store
            .put("k", CachedResponse::new(200, Vec::new(), "b", Duration::from_secs(60)))
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("k").await.unwrap().unwrap().body, "b");
    }
}
