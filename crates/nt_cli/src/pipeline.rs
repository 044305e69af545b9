use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use nt_core::config::PipelineConfig;
use nt_core::{EmbeddingModel, Error, FeedSource, LabelModel, Metadata, ObjectStore, Result};
use nt_feeds::{ArticleFilter, FeedManager, FilterStats};
use nt_grouping::{validate_document, validate_metadata, Clusterer, LabelSynthesizer, VisualizationDocument};
use nt_inference::EmbeddingGenerator;
use nt_storage::{PublishReport, PublishStatus, Publisher};
use tracing::{error, info};

/// What a run did.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub feeds_ok: usize,
    pub feeds_failed: Vec<String>,
    pub articles_fetched: usize,
    pub filter: FilterStats,
    pub groups: usize,
    pub subgroups: usize,
    pub articles_published: usize,
    pub metadata: Metadata,
    pub publish: PublishReport,
}

impl RunReport {
    pub fn is_partial(&self) -> bool {
        matches!(self.publish.status, PublishStatus::Partial { .. })
    }
}

/// One aggregation run: fetch, filter, embed, cluster, label, assemble,
/// validate and publish.
pub struct Pipeline {
    config: PipelineConfig,
    feeds: Arc<dyn FeedSource>,
    embedder: Arc<dyn EmbeddingModel>,
    labeler: Arc<dyn LabelModel>,
    store: Arc<dyn ObjectStore>,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        feeds: Arc<dyn FeedSource>,
        embedder: Arc<dyn EmbeddingModel>,
        labeler: Arc<dyn LabelModel>,
        store: Arc<dyn ObjectStore>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            feeds,
            embedder,
            labeler,
            store,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Nothing is written unless the document and its metadata validate.
    pub async fn run(&self) -> Result<RunReport> {
        let started = Utc::now();
        let budget = self.config.stage_timeout();

        let manager = FeedManager::new(self.feeds.clone(), self.config.feeds.concurrency);
        let fetched = with_timeout("fetch", budget, manager.fetch_all(&self.config.feed_urls)).await?;
        let feeds_failed: Vec<String> = fetched.failed_feeds().into_iter().map(String::from).collect();
        let feeds_ok = fetched.succeeded();
        let articles_fetched = fetched.articles.len();

        let filter = ArticleFilter::new(self.config.feeds.max_age_days);
        let (articles, filter_stats) = filter.apply(fetched.articles, started);

        let generator = EmbeddingGenerator::new(self.embedder.clone());
        info!("🧠 Embedding {} articles with {}", articles.len(), self.embedder.name());
        let embedded = with_timeout("embed", budget, generator.embed_articles(articles)).await??;

        let tree = Clusterer::from_config(&self.config.grouping).cluster(&embedded)?;
        let synthesizer = LabelSynthesizer::new(self.labeler.clone(), self.config.grouping.max_label_len);
        let labeled = with_timeout("label", budget, synthesizer.label_tree(&embedded, &tree)).await?;

        let document = VisualizationDocument::assemble(&labeled);
        validate_document(&document)?;
        let bytes = document.to_json_bytes()?;

        let metadata = Metadata::for_run(Utc::now());
        validate_metadata(&metadata)?;

        let publisher = Publisher::new(self.store.clone(), self.config.publish.clone());
        let publish = with_timeout("publish", budget, publisher.publish(&bytes, &metadata)).await??;

        let report = RunReport {
            feeds_ok,
            feeds_failed,
            articles_fetched,
            filter: filter_stats,
            groups: document.group_count(),
            subgroups: document.subgroup_count(),
            articles_published: document.article_count(),
            metadata,
            publish,
        };
        info!(
            "✅ Run finished: {} articles in {} groups / {} subgroups, {} feeds failed, status {:?}",
            report.articles_published,
            report.groups,
            report.subgroups,
            report.feeds_failed.len(),
            report.publish.status
        );
        Ok(report)
    }
}

async fn with_timeout<T>(stage: &'static str, budget: Duration, future: impl Future<Output = T>) -> Result<T> {
    tokio::time::timeout(budget, future).await.map_err(|_| {
        error!("⏱️ Stage {} exceeded {:?}", stage, budget);
        Error::Timeout(stage)
    })
}
