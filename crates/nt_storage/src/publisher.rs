use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use nt_core::config::PublishConfig;
use nt_core::{Error, Metadata, ObjectStore, PutOutcome, Result};
use tracing::{error, info, warn};

/// Upper bound for a single retry delay.
pub const MAX_BACKOFF: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Private,
    Public,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Private => write!(f, "private"),
            Destination::Public => write!(f, "public"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishStatus {
    Published,
    /// One destination failed, the other holds the fresh document
    Partial { failed: Destination, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub status: PublishStatus,
    /// Storage warnings that did not prevent the write
    pub warnings: Vec<String>,
}

/// Writes a document and its metadata to the private and public buckets.
pub struct Publisher {
    store: Arc<dyn ObjectStore>,
    config: PublishConfig,
}

impl Publisher {
    pub fn new(store: Arc<dyn ObjectStore>, config: PublishConfig) -> Self {
        Self { store, config }
    }

    /// Private destination first, then public. Each destination gets the data
    /// object followed by the metadata object.
    pub async fn publish(&self, document: &[u8], metadata: &Metadata) -> Result<PublishReport> {
        let metadata_bytes = serde_json::to_vec(metadata)?;
        let mut warnings = Vec::new();
        let mut failures = Vec::new();

        for destination in [Destination::Private, Destination::Public] {
            match self
                .publish_to(destination, document, &metadata_bytes, &mut warnings)
                .await
            {
                Ok(()) => info!(
                    "📤 Published {} bytes to {} bucket {}",
                    document.len(),
                    destination,
                    self.bucket(destination)
                ),
                Err(e) => {
                    error!("❌ Publishing to {} bucket {} failed: {}", destination, self.bucket(destination), e);
                    failures.push((destination, e));
                }
            }
        }

        let status = match failures.len() {
            0 => PublishStatus::Published,
            1 => {
                let (failed, e) = failures.remove(0);
                PublishStatus::Partial {
                    failed,
                    reason: e.to_string(),
                }
            }
            _ => {
                let reasons = failures
                    .iter()
                    .map(|(d, e)| format!("{}: {}", d, e))
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(Error::Publish(reasons));
            }
        };
        Ok(PublishReport { status, warnings })
    }

    fn bucket(&self, destination: Destination) -> &str {
        match destination {
            Destination::Private => &self.config.private_bucket,
            Destination::Public => &self.config.public_bucket,
        }
    }

    async fn publish_to(
        &self,
        destination: Destination,
        document: &[u8],
        metadata: &[u8],
        warnings: &mut Vec<String>,
    ) -> Result<()> {
        let bucket = self.bucket(destination);
        for (key, bytes) in [(&self.config.data_key, document), (&self.config.metadata_key, metadata)] {
            if let PutOutcome::StoredWithWarning(message) = self.put_with_retry(bucket, key, bytes).await? {
                warn!("⚠️ {}/{} stored with warning: {}", bucket, key, message);
                warnings.push(format!("{}/{}: {}", bucket, key, message));
            }
        }
        Ok(())
    }

    /// Retries transient failures with exponential backoff.
    async fn put_with_retry(&self, bucket: &str, key: &str, bytes: &[u8]) -> Result<PutOutcome> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut backoff = self.config.initial_backoff().min(MAX_BACKOFF);
        let mut attempt = 1;

        loop {
            match self.store.put(bucket, key, bytes.to_vec()).await {
                Ok(outcome) => return Ok(outcome),
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    info!(
                        "Write of {}/{} failed, retrying {}/{} in {:?}: {}",
                        bucket, key, attempt, max_attempts, backoff, e
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = next_backoff(backoff);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn next_backoff(backoff: Duration) -> Duration {
    backoff.saturating_mul(2).min(MAX_BACKOFF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::memory::{Failure, MemoryStore};
    use chrono::{TimeZone, Utc};

    fn config() -> PublishConfig {
        PublishConfig {
            initial_backoff_ms: 1,
            ..PublishConfig::new("private-news", "public-news")
        }
    }

    fn metadata() -> Metadata {
        Metadata::for_run(Utc.with_ymd_and_hms(2025, 8, 20, 12, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_publishes_both_destinations() {
        let store = Arc::new(MemoryStore::new());
        let publisher = Publisher::new(store.clone(), config());

        let report = publisher.publish(b"{}", &metadata()).await.unwrap();
        assert_eq!(report.status, PublishStatus::Published);
        for bucket in ["private-news", "public-news"] {
            assert_eq!(store.get(bucket, "latest_news.json").await.unwrap(), b"{}");
            let stored = store.get(bucket, "latest_news_metadata.json").await.unwrap();
            let parsed: Metadata = serde_json::from_slice(&stored).unwrap();
            assert_eq!(parsed, metadata());
        }
    }

    #[tokio::test]
    async fn test_transient_errors_are_retried() {
        let store = Arc::new(MemoryStore::new());
        store.inject_failure("public-news", Failure::Transient(2)).await;
        let publisher = Publisher::new(store.clone(), config());

        let report = publisher.publish(b"{}", &metadata()).await.unwrap();
        assert_eq!(report.status, PublishStatus::Published);
        // two failures, then data and metadata
        assert_eq!(store.attempts("public-news").await, 4);
    }

    #[tokio::test]
    async fn test_private_failure_is_partial() {
        let store = Arc::new(MemoryStore::new());
        store.inject_failure("private-news", Failure::AlwaysTransient).await;
        let publisher = Publisher::new(store.clone(), config());

        let report = publisher.publish(b"{\"fresh\":{}}", &metadata()).await.unwrap();
        assert!(matches!(
            report.status,
            PublishStatus::Partial { failed: Destination::Private, .. }
        ));
        // retried up to max_attempts, metadata skipped
        assert_eq!(store.attempts("private-news").await, 3);
        assert_eq!(
            store.get("public-news", "latest_news.json").await.unwrap(),
            b"{\"fresh\":{}}"
        );
        assert!(store.list("private-news").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_permanent_errors_are_not_retried() {
        let store = Arc::new(MemoryStore::new());
        store.inject_failure("public-news", Failure::Permanent).await;
        let publisher = Publisher::new(store.clone(), config());

        let report = publisher.publish(b"{}", &metadata()).await.unwrap();
        assert!(matches!(
            report.status,
            PublishStatus::Partial { failed: Destination::Public, .. }
        ));
        assert_eq!(store.attempts("public-news").await, 1);
    }

    #[tokio::test]
    async fn test_both_failing_is_an_error() {
        let store = Arc::new(MemoryStore::new());
        store.inject_failure("private-news", Failure::Permanent).await;
        store.inject_failure("public-news", Failure::Permanent).await;
        let publisher = Publisher::new(store, config());

        let result = publisher.publish(b"{}", &metadata()).await;
        assert!(matches!(result, Err(Error::Publish(_))));
    }

    #[tokio::test]
    async fn test_warnings_count_as_success() {
        let store = Arc::new(MemoryStore::new());
        store
            .inject_failure("public-news", Failure::Warning("acl ignored".into()))
            .await;
        let publisher = Publisher::new(store, config());

        let report = publisher.publish(b"{}", &metadata()).await.unwrap();
        assert_eq!(report.status, PublishStatus::Published);
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_backoff_is_capped() {
        assert_eq!(next_backoff(Duration::from_millis(500)), Duration::from_secs(1));
        assert_eq!(next_backoff(Duration::from_secs(45)), MAX_BACKOFF);
        assert_eq!(next_backoff(Duration::MAX), MAX_BACKOFF);

        let mut backoff = Duration::from_millis(1);
        for _ in 0..200 {
            backoff = next_backoff(backoff);
        }
        assert_eq!(backoff, MAX_BACKOFF);
    }
}
