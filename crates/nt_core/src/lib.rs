pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod storage;
pub mod text;
pub mod timestamp;
pub mod types;

pub use error::{Error, Result};
pub use feed::FeedSource;
pub use models::{EmbeddingModel, LabelModel};
pub use storage::{ObjectStore, PutOutcome};
pub use text::cosine_similarity;
pub use types::{Article, EmbeddedArticle, Metadata, VISUALIZATION_VERSION};
