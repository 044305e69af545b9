use async_trait::async_trait;
use crate::Result;

/// Result of a successful `put`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome {
    Stored,
    /// The object is stored but the provider reported a side issue (e.g. ACL).
    StoredWithWarning(String),
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key`, overwriting any previous object
    async fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<PutOutcome>;

    /// List all keys of a bucket
    async fn list(&self, bucket: &str) -> Result<Vec<String>>;

    /// Object bytes, `None` when the key does not exist
    async fn read(&self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>>;
}
