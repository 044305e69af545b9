use std::time::Duration;

use async_trait::async_trait;
use nt_core::{Article, Error, FeedSource, Result};
use tracing::{debug, info};

const USER_AGENT: &str = "nt-feeds/0.1";

/// Fetches RSS/Atom feeds over HTTP.
#[derive(Debug, Clone)]
pub struct RssFeedSource {
    client: reqwest::Client,
}

impl RssFeedSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedSource for RssFeedSource {
    async fn fetch(&self, feed_url: &str) -> Result<Vec<Article>> {
        let response = self
            .client
            .get(feed_url)
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;
        let articles = parse_feed(&bytes, feed_url)?;
        info!(feed_url, entries = articles.len(), "📡 Feed parsed");
        Ok(articles)
    }
}

/// Maps a raw RSS/Atom/JSON feed body to articles.
///
/// Entries without a title or a link are skipped. The publication date falls
/// back to the update date and is rendered as RFC 2822; entries with neither
/// keep an empty timestamp and are dropped later as stale.
pub fn parse_feed(body: &[u8], feed_url: &str) -> Result<Vec<Article>> {
    let feed = feed_rs::parser::parse(body)
        .map_err(|e| Error::Feed(format!("Failed to parse feed {}: {}", feed_url, e)))?;

    let articles = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let title = entry
                .title
                .map(|t| t.content.trim().to_string())
                .filter(|t| !t.is_empty())?;
            let link = entry
                .links
                .first()
                .map(|l| l.href.trim().to_string())
                .or_else(|| entry.id.starts_with("http").then(|| entry.id.clone()));
            let Some(link) = link else {
                debug!(feed_url, title = %title, "Skipping entry without link");
                return None;
            };
            let published = entry
                .published
                .or(entry.updated)
                .map(|dt| dt.to_rfc2822())
                .unwrap_or_default();
            Some(Article::new(title, link, published, feed_url))
        })
        .collect();

    Ok(articles)
}
