use async_trait::async_trait;
use crate::types::Article;
use crate::Result;

#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch every entry currently published by `feed_url`
    async fn fetch(&self, feed_url: &str) -> Result<Vec<Article>>;
}
