use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::text::normalize_title;

/// Version stamped on every published document.
pub const VISUALIZATION_VERSION: &str = "0.2.1";

/// `datetime` layout used by [`Metadata`].
pub const METADATA_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A headline as handed over by a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    /// Raw feed timestamp, kept verbatim for the published document.
    pub published: String,
    /// URL of the feed the article came from.
    pub source: String,
}

impl Article {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        published: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            published: published.into(),
            source: source.into(),
        }
    }

    /// Normalized `(title, link)` identity.
    pub fn identity(&self) -> (String, String) {
        (normalize_title(&self.title), self.link.trim().to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedArticle {
    pub article: Article,
    pub vector: Vec<f32>,
}

impl EmbeddedArticle {
    pub fn new(article: Article, vector: Vec<f32>) -> Self {
        Self { article, vector }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub datetime: String,
    pub version: String,
}

impl Metadata {
    /// Stamp for a run completed at `completed_at`.
    pub fn for_run(completed_at: DateTime<Utc>) -> Self {
        Self {
            datetime: completed_at.format(METADATA_DATETIME_FORMAT).to_string(),
            version: VISUALIZATION_VERSION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_metadata_format() {
        let at = Utc.with_ymd_and_hms(2025, 1, 16, 10, 30, 45).unwrap();
        let metadata = Metadata::for_run(at);
        assert_eq!(metadata.datetime, "2025-01-16T10:30:45");
        assert_eq!(metadata.version, VISUALIZATION_VERSION);
    }

    #[test]
    fn test_identity_normalizes_title() {
        let a = Article::new("Markets Rally!", "https://a.com/1", "", "https://a.com/rss");
        let b = Article::new("markets rally", "https://a.com/1 ", "", "https://b.com/rss");
        assert_eq!(a.identity(), b.identity());
    }
}
