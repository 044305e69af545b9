use std::sync::Arc;

use futures::future::join_all;
use nt_core::{Article, Error, FeedSource, Result};
use tokio::sync::Semaphore;
use tracing::{error, info};

/// Per-feed result of a fetch round.
#[derive(Debug)]
pub struct FeedOutcome {
    pub url: String,
    /// Number of entries on success, the error message otherwise
    pub result: std::result::Result<usize, String>,
}

#[derive(Debug, Default)]
pub struct FetchReport {
    /// Articles of all healthy feeds, in feed-list order
    pub articles: Vec<Article>,
    pub outcomes: Vec<FeedOutcome>,
}

impl FetchReport {
    pub fn failed_feeds(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_err())
            .map(|o| o.url.as_str())
            .collect()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Feeds sorted by number of entries, largest first.
    pub fn top_feeds(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut counts: Vec<(&str, usize)> = self
            .outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|n| (o.url.as_str(), *n)))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.truncate(limit);
        counts
    }
}

/// Fans feed retrieval out over a bounded pool of tasks.
pub struct FeedManager {
    source: Arc<dyn FeedSource>,
    semaphore: Arc<Semaphore>,
}

impl FeedManager {
    pub fn new(source: Arc<dyn FeedSource>, concurrency: usize) -> Self {
        Self {
            source,
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// Fetches every feed; a failing feed is logged and skipped.
    pub async fn fetch_all(&self, feed_urls: &[String]) -> FetchReport {
        info!("🦗 Fetching {} feeds", feed_urls.len());

        let handles: Vec<_> = feed_urls
            .iter()
            .cloned()
            .map(|url| {
                let source = self.source.clone();
                let semaphore = self.semaphore.clone();
                tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|e| Error::External(e.into()))?;
                    source.fetch(&url).await
                })
            })
            .collect();

        let results = join_all(handles).await;

        let mut report = FetchReport::default();
        for (url, joined) in feed_urls.iter().zip(results) {
            let result: Result<Vec<Article>> = match joined {
                Ok(result) => result,
                Err(e) => Err(Error::Feed(format!("fetch task aborted: {}", e))),
            };
            match result {
                Ok(mut articles) => {
                    report.outcomes.push(FeedOutcome {
                        url: url.clone(),
                        result: Ok(articles.len()),
                    });
                    report.articles.append(&mut articles);
                }
                Err(e) => {
                    error!(feed = %url, "❌ Feed failed: {}", e);
                    report.outcomes.push(FeedOutcome {
                        url: url.clone(),
                        result: Err(e.to_string()),
                    });
                }
            }
        }

        let top = report
            .top_feeds(5)
            .iter()
            .map(|(url, n)| format!("{}({})", url, n))
            .collect::<Vec<_>>()
            .join(", ");
        info!(
            "📊 Fetched {} entries from {}/{} feeds. Top feeds: {}",
            report.articles.len(),
            report.succeeded(),
            feed_urls.len(),
            top
        );
        report
    }
}
