use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use nt_core::text::normalize_title;
use nt_core::timestamp::parse_timestamp;
use nt_core::Article;
use tracing::{debug, info};
use url::Url;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub received: usize,
    pub kept: usize,
    pub stale: usize,
    pub duplicates: usize,
    /// Missing title or unusable link
    pub invalid: usize,
}

/// Drops stale, duplicate and unusable articles ahead of clustering.
#[derive(Debug, Clone)]
pub struct ArticleFilter {
    max_age: Duration,
}

impl ArticleFilter {
    pub fn new(max_age_days: i64) -> Self {
        Self {
            max_age: Duration::days(max_age_days),
        }
    }

    /// Keeps the first occurrence of every story published within the window.
    ///
    /// Two articles are the same story when their normalized titles match or
    /// when they share a link. Output order follows input order.
    pub fn apply(&self, articles: Vec<Article>, now: DateTime<Utc>) -> (Vec<Article>, FilterStats) {
        let mut stats = FilterStats {
            received: articles.len(),
            ..Default::default()
        };
        let mut seen_titles: HashSet<String> = HashSet::new();
        let mut seen_links: HashSet<String> = HashSet::new();
        let mut kept = Vec::with_capacity(articles.len());

        for article in articles {
            if !is_usable(&article) {
                debug!(title = %article.title, link = %article.link, "Dropping unusable article");
                stats.invalid += 1;
                continue;
            }
            if self.is_stale(&article, now) {
                debug!(title = %article.title, published = %article.published, "Dropping stale article");
                stats.stale += 1;
                continue;
            }

            let (title_key, link_key) = article.identity();
            let duplicate_title = !title_key.is_empty() && seen_titles.contains(&title_key);
            if duplicate_title || seen_links.contains(&link_key) {
                stats.duplicates += 1;
                continue;
            }
            if !title_key.is_empty() {
                seen_titles.insert(title_key);
            }
            seen_links.insert(link_key);
            kept.push(article);
        }

        stats.kept = kept.len();
        info!(
            "🧹 Filtered articles: {} kept, {} stale, {} duplicates, {} invalid (of {})",
            stats.kept, stats.stale, stats.duplicates, stats.invalid, stats.received
        );
        (kept, stats)
    }

    /// Unparseable timestamps count as stale.
    fn is_stale(&self, article: &Article, now: DateTime<Utc>) -> bool {
        match parse_timestamp(&article.published) {
            Some(published) => now.signed_duration_since(published) > self.max_age,
            None => true,
        }
    }
}

fn is_usable(article: &Article) -> bool {
    !article.title.trim().is_empty()
        && Url::parse(article.link.trim()).is_ok()
        && Url::parse(article.source.trim()).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 20, 12, 0, 0).unwrap()
    }

    fn article(title: &str, link: &str, published: DateTime<Utc>) -> Article {
        Article::new(title, link, published.to_rfc2822(), "https://feed.example.com/rss")
    }

    #[test]
    fn test_stale_articles_are_dropped() {
        let filter = ArticleFilter::new(14);
        let articles = vec![
            article("Fresh news", "https://a.com/1", now() - Duration::days(2)),
            article("Old news", "https://a.com/2", now() - Duration::days(20)),
            article("Edge news", "https://a.com/3", now() - Duration::days(14)),
        ];

        let (kept, stats) = filter.apply(articles, now());
        let titles: Vec<_> = kept.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Fresh news", "Edge news"]);
        assert_eq!(stats.stale, 1);
    }

    #[test]
    fn test_unparseable_timestamp_is_stale() {
        let filter = ArticleFilter::new(14);
        let mut broken = article("Broken date", "https://a.com/1", now());
        broken.published = "sometime last week".to_string();

        let (kept, stats) = filter.apply(vec![broken], now());
        assert!(kept.is_empty());
        assert_eq!(stats.stale, 1);
    }

    #[test]
    fn test_duplicates_keep_first() {
        let filter = ArticleFilter::new(14);
        let at = now() - Duration::hours(1);
        let articles = vec![
            article("Storm hits coast", "https://a.com/storm", at),
            article("STORM hits coast!", "https://b.com/storm", at),
            article("Another title", "https://a.com/storm", at),
            article("Unrelated", "https://c.com/x", at),
        ];

        let (kept, stats) = filter.apply(articles, now());
        let links: Vec<_> = kept.iter().map(|a| a.link.as_str()).collect();
        assert_eq!(links, vec!["https://a.com/storm", "https://c.com/x"]);
        assert_eq!(stats.duplicates, 2);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let filter = ArticleFilter::new(14);
        let at = now() - Duration::days(1);
        let articles = vec![
            article("One", "https://a.com/1", at),
            article("one", "https://a.com/2", at),
            article("Two", "https://a.com/3", now() - Duration::days(30)),
            article("Three", "https://a.com/4", at),
        ];

        let (once, _) = filter.apply(articles, now());
        let (twice, stats) = filter.apply(once.clone(), now());
        assert_eq!(once, twice);
        assert_eq!(stats.duplicates + stats.stale + stats.invalid, 0);
    }

    #[test]
    fn test_unusable_articles_are_dropped() {
        let filter = ArticleFilter::new(14);
        let at = now();
        let articles = vec![
            article("  ", "https://a.com/1", at),
            article("No link", "not a link", at),
            article("Good", "https://a.com/2", at),
        ];

        let (kept, stats) = filter.apply(articles, now());
        assert_eq!(kept.len(), 1);
        assert_eq!(stats.invalid, 2);
    }

    #[test]
    fn test_future_articles_are_kept() {
        let filter = ArticleFilter::new(14);
        let articles = vec![article("Tomorrow", "https://a.com/1", now() + Duration::days(1))];
        let (kept, _) = filter.apply(articles, now());
        assert_eq!(kept.len(), 1);
    }
}
