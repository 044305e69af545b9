pub mod filter;
pub mod manager;
pub mod rss;
pub mod sources;

pub use filter::{ArticleFilter, FilterStats};
pub use manager::{FeedManager, FeedOutcome, FetchReport};
pub use rss::RssFeedSource;
pub use sources::load_feed_list;

pub mod prelude {
    pub use super::{ArticleFilter, FeedManager, RssFeedSource};
    pub use nt_core::{Article, Error, FeedSource, Result};
}
