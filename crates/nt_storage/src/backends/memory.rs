use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use nt_core::{Error, ObjectStore, PutOutcome, Result};
use tokio::sync::RwLock;

/// Failure injected into a bucket of a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The next `n` puts fail with a transient error
    Transient(u32),
    /// Every put fails with a transient error
    AlwaysTransient,
    /// Every put fails with a permanent error
    Permanent,
    /// Puts succeed but report a warning
    Warning(String),
}

#[derive(Default)]
struct Inner {
    buckets: HashMap<String, BTreeMap<String, Vec<u8>>>,
    failures: HashMap<String, Failure>,
    attempts: HashMap<String, u32>,
}

/// Process-local object store, used for dry runs and tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn inject_failure(&self, bucket: &str, failure: Failure) {
        self.inner.write().await.failures.insert(bucket.to_string(), failure);
    }

    pub async fn get(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        let inner = self.inner.read().await;
        inner.buckets.get(bucket).and_then(|b| b.get(key)).cloned()
    }

    /// Number of `put` calls seen by `bucket`, failed ones included.
    pub async fn attempts(&self, bucket: &str) -> u32 {
        self.inner.read().await.attempts.get(bucket).copied().unwrap_or(0)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<PutOutcome> {
        let mut inner = self.inner.write().await;
        *inner.attempts.entry(bucket.to_string()).or_default() += 1;

        let mut outcome = PutOutcome::Stored;
        match inner.failures.get_mut(bucket) {
            Some(Failure::Transient(remaining)) if *remaining > 0 => {
                *remaining -= 1;
                return Err(Error::StorageTransient(format!("{} unavailable", bucket)));
            }
            Some(Failure::AlwaysTransient) => {
                return Err(Error::StorageTransient(format!("{} unavailable", bucket)));
            }
            Some(Failure::Permanent) => {
                return Err(Error::Storage(format!("access denied to {}", bucket)));
            }
            Some(Failure::Warning(message)) => outcome = PutOutcome::StoredWithWarning(message.clone()),
            _ => {}
        }

        inner
            .buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), bytes);
        Ok(outcome)
    }

    async fn list(&self, bucket: &str) -> Result<Vec<String>> {
        let inner = self.inner.read().await;
        Ok(inner
            .buckets
            .get(bucket)
            .map(|b| b.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn read(&self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.get(bucket, key).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_overwrites_and_lists() {
        let store = MemoryStore::new();
        store.put("news", "b.json", b"1".to_vec()).await.unwrap();
        store.put("news", "a.json", b"2".to_vec()).await.unwrap();
        store.put("news", "b.json", b"3".to_vec()).await.unwrap();

        assert_eq!(store.list("news").await.unwrap(), vec!["a.json", "b.json"]);
        assert_eq!(store.get("news", "b.json").await.unwrap(), b"3");
        assert!(store.list("missing").await.unwrap().is_empty());
        assert_eq!(store.read("news", "a.json").await.unwrap(), Some(b"2".to_vec()));
        assert_eq!(store.read("news", "c.json").await.unwrap(), None);
        assert_eq!(store.read("missing", "a.json").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = MemoryStore::new();
        store.inject_failure("flaky", Failure::Transient(1)).await;
        store.inject_failure("locked", Failure::Permanent).await;

        let first = store.put("flaky", "k", vec![]).await;
        assert!(matches!(first, Err(ref e) if e.is_transient()));
        assert_eq!(store.put("flaky", "k", vec![]).await.unwrap(), PutOutcome::Stored);
        assert_eq!(store.attempts("flaky").await, 2);

        let denied = store.put("locked", "k", vec![]).await;
        assert!(matches!(denied, Err(ref e) if !e.is_transient()));
        assert!(store.get("locked", "k").await.is_none());
    }

    #[tokio::test]
    async fn test_warning_still_stores() {
        let store = MemoryStore::new();
        store.inject_failure("public", Failure::Warning("acl ignored".into())).await;
        let outcome = store.put("public", "k", b"x".to_vec()).await.unwrap();
        assert_eq!(outcome, PutOutcome::StoredWithWarning("acl ignored".into()));
        assert_eq!(store.get("public", "k").await.unwrap(), b"x");
    }
}
