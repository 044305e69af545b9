use nt_core::config::PublishConfig;
use nt_core::{Error, Metadata, ObjectStore, Result};
use nt_grouping::{validate_document, validate_metadata, VisualizationDocument};
use tracing::{info, warn};

/// Shape of a valid visualization document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentSummary {
    pub groups: usize,
    pub subgroups: usize,
    pub articles: usize,
}

pub fn check_document(bytes: &[u8]) -> Result<DocumentSummary> {
    let document = VisualizationDocument::from_json_slice(bytes)?;
    validate_document(&document)?;
    Ok(DocumentSummary {
        groups: document.group_count(),
        subgroups: document.subgroup_count(),
        articles: document.article_count(),
    })
}

pub fn check_metadata(bytes: &[u8]) -> Result<Metadata> {
    let metadata: Metadata = serde_json::from_slice(bytes)?;
    validate_metadata(&metadata)?;
    Ok(metadata)
}

/// Outcome of validating the published objects of one bucket.
#[derive(Debug, Default)]
pub struct BucketCheck {
    pub document: Option<DocumentSummary>,
    pub metadata: Option<Metadata>,
    /// Keys that are neither the document nor its metadata
    pub skipped: Vec<String>,
    pub problems: Vec<String>,
}

impl BucketCheck {
    pub fn is_valid(&self) -> bool {
        self.problems.is_empty() && self.document.is_some() && self.metadata.is_some()
    }
}

/// Reads back the document and metadata objects of `bucket` and validates
/// both. Missing or invalid objects are reported in `problems`; only store
/// failures are errors.
pub async fn check_bucket(store: &dyn ObjectStore, bucket: &str, publish: &PublishConfig) -> Result<BucketCheck> {
    let keys = store.list(bucket).await?;
    info!("🔍 Checking {} objects in {}", keys.len(), bucket);

    let mut check = BucketCheck::default();
    for key in &keys {
        if key != &publish.data_key && key != &publish.metadata_key {
            info!("Skipping {}/{}", bucket, key);
            check.skipped.push(key.clone());
        }
    }

    match read_key(store, bucket, &publish.data_key).await? {
        Some(bytes) => match check_document(&bytes) {
            Ok(summary) => check.document = Some(summary),
            Err(e) => check.problems.push(format!("{}: {}", publish.data_key, e)),
        },
        None => check.problems.push(format!("{}: missing", publish.data_key)),
    }

    match read_key(store, bucket, &publish.metadata_key).await? {
        Some(bytes) => match check_metadata(&bytes) {
            Ok(metadata) => check.metadata = Some(metadata),
            Err(e) => check.problems.push(format!("{}: {}", publish.metadata_key, e)),
        },
        None => check.problems.push(format!("{}: missing", publish.metadata_key)),
    }

    for problem in &check.problems {
        warn!("❌ {}/{}", bucket, problem);
    }
    Ok(check)
}

async fn read_key(store: &dyn ObjectStore, bucket: &str, key: &str) -> Result<Option<Vec<u8>>> {
    store
        .read(bucket, key)
        .await
        .map_err(|e| Error::Storage(format!("reading {}/{}: {}", bucket, key, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use nt_storage::{MemoryStore, Publisher};
    use std::sync::Arc;

    const DOCUMENT: &str = r#"{
        "Markets": {
            "Stocks rally": {
                "Stocks rally on rate cut hopes": {
                    "title": "Stocks rally on rate cut hopes",
                    "link": "https://news.example.com/stocks",
                    "timestamp": "2025-08-20T10:00:00Z",
                    "source": "https://news.example.com/rss"
                }
            }
        }
    }"#;

    fn metadata() -> Metadata {
        Metadata::for_run(Utc.with_ymd_and_hms(2025, 8, 20, 12, 0, 0).unwrap())
    }

    fn publish_config() -> PublishConfig {
        PublishConfig {
            initial_backoff_ms: 1,
            ..PublishConfig::new("private-news", "public-news")
        }
    }

    #[test]
    fn test_check_local_files() {
        let summary = check_document(DOCUMENT.as_bytes()).unwrap();
        assert_eq!(
            summary,
            DocumentSummary {
                groups: 1,
                subgroups: 1,
                articles: 1
            }
        );

        let raw = serde_json::to_vec(&metadata()).unwrap();
        assert_eq!(check_metadata(&raw).unwrap(), metadata());

        assert!(check_metadata(br#"{"datetime": "2025-08-20 12:00", "version": "0.2.1"}"#).is_err());
        assert!(check_metadata(br#"{"version": "0.2.1"}"#).is_err());
        assert!(check_document(b"[1, 2]").is_err());
    }

    #[tokio::test]
    async fn test_published_bucket_is_valid() {
        let store = Arc::new(MemoryStore::new());
        let config = publish_config();
        Publisher::new(store.clone(), config.clone())
            .publish(DOCUMENT.as_bytes(), &metadata())
            .await
            .unwrap();
        store.put("public-news", "archive/old.json", b"not json".to_vec()).await.unwrap();

        let check = check_bucket(store.as_ref(), "public-news", &config).await.unwrap();
        assert!(check.is_valid(), "{:?}", check.problems);
        assert_eq!(check.document.map(|d| d.articles), Some(1));
        assert_eq!(check.metadata, Some(metadata()));
        assert_eq!(check.skipped, vec!["archive/old.json"]);
    }

    #[tokio::test]
    async fn test_bad_metadata_is_reported() {
        let store = MemoryStore::new();
        let config = publish_config();
        store
            .put("public-news", "latest_news.json", DOCUMENT.as_bytes().to_vec())
            .await
            .unwrap();
        store
            .put(
                "public-news",
                "latest_news_metadata.json",
                br#"{"datetime": "yesterday", "version": "0.2.1"}"#.to_vec(),
            )
            .await
            .unwrap();

        let check = check_bucket(&store, "public-news", &config).await.unwrap();
        assert!(!check.is_valid());
        assert!(check.document.is_some());
        assert!(check.metadata.is_none());
        assert_eq!(check.problems.len(), 1);
        assert!(check.problems[0].starts_with("latest_news_metadata.json"));
    }

    #[tokio::test]
    async fn test_empty_bucket_reports_missing_objects() {
        let store = MemoryStore::new();
        let check = check_bucket(&store, "private-news", &publish_config()).await.unwrap();
        assert!(!check.is_valid());
        assert_eq!(check.problems.len(), 2);
        assert!(check.problems.iter().all(|p| p.ends_with("missing")));
    }
}
