use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{Error, Result};

pub const DEFAULT_DATA_KEY: &str = "latest_news.json";
pub const DEFAULT_METADATA_KEY: &str = "latest_news_metadata.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Feeds fetched concurrently
    pub concurrency: usize,
    /// Articles older than this are dropped
    pub max_age_days: i64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            max_age_days: 14,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// Similarity needed to share a subgroup (same story)
    pub subgroup_threshold: f32,
    /// Centroid similarity needed to share a group (same topic)
    pub group_threshold: f32,
    /// Fallback labels are cut to this many characters
    pub max_label_len: usize,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            subgroup_threshold: 0.75,
            group_threshold: 0.45,
            max_label_len: 80,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub private_bucket: String,
    pub public_bucket: String,
    pub data_key: String,
    pub metadata_key: String,
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
}

impl PublishConfig {
    pub fn new(private_bucket: impl Into<String>, public_bucket: impl Into<String>) -> Self {
        Self {
            private_bucket: private_bucket.into(),
            public_bucket: public_bucket.into(),
            ..Default::default()
        }
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            private_bucket: String::new(),
            public_bucket: String::new(),
            data_key: DEFAULT_DATA_KEY.to_string(),
            metadata_key: DEFAULT_METADATA_KEY.to_string(),
            max_attempts: 3,
            initial_backoff_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub feed_urls: Vec<String>,
    pub feeds: FeedConfig,
    pub grouping: GroupingConfig,
    pub publish: PublishConfig,
    /// Wall-clock budget for each network-bound stage
    pub stage_timeout_secs: u64,
}

impl PipelineConfig {
    pub fn stage_timeout(&self) -> Duration {
        if self.stage_timeout_secs == 0 {
            Duration::from_secs(300)
        } else {
            Duration::from_secs(self.stage_timeout_secs)
        }
    }

    pub fn validate(&self) -> Result<()> {
        let grouping = &self.grouping;
        if !(grouping.subgroup_threshold > 0.0 && grouping.subgroup_threshold <= 1.0) {
            return Err(Error::Config(format!(
                "subgroup threshold must be in (0, 1], got {}",
                grouping.subgroup_threshold
            )));
        }
        if !(grouping.group_threshold > 0.0 && grouping.group_threshold < grouping.subgroup_threshold) {
            return Err(Error::Config(format!(
                "group threshold must be in (0, {}), got {}",
                grouping.subgroup_threshold, grouping.group_threshold
            )));
        }
        if grouping.max_label_len == 0 {
            return Err(Error::Config("max label length must be positive".to_string()));
        }
        if self.feeds.concurrency == 0 {
            return Err(Error::Config("feed concurrency must be positive".to_string()));
        }
        if self.feeds.max_age_days < 0 {
            return Err(Error::Config("max article age cannot be negative".to_string()));
        }

        let publish = &self.publish;
        if publish.private_bucket.trim().is_empty() || publish.public_bucket.trim().is_empty() {
            return Err(Error::Config("both private and public buckets are required".to_string()));
        }
        if publish.data_key.trim().is_empty() || publish.metadata_key.trim().is_empty() {
            return Err(Error::Config("object keys cannot be empty".to_string()));
        }
        if publish.data_key == publish.metadata_key {
            return Err(Error::Config("data and metadata keys must differ".to_string()));
        }
        if publish.max_attempts == 0 {
            return Err(Error::Config("at least one publish attempt is required".to_string()));
        }
        Ok(())
    }
}
