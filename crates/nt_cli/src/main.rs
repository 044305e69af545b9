use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use nt_cli::{check_bucket, check_document, check_metadata, init_logging, Pipeline, RunReport};
use nt_core::config::PipelineConfig;
use nt_feeds::{load_feed_list, RssFeedSource};
use nt_inference::{create_model, InferenceConfig, KeywordLabeler};
use nt_storage::{create_store, StoreOptions};
use tracing::{error, info};

const FEED_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_unit = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if !current_number.is_empty() {
                let num = current_number
                    .parse::<u64>()
                    .map_err(|_| format!("Number too large in duration: {}", current_number))?;
                let unit = match c {
                    's' => 1,
                    'm' => 60,
                    'h' => 3600,
                    'd' => 86400,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                };
                total_seconds = num
                    .checked_mul(unit)
                    .and_then(|secs| total_seconds.checked_add(secs))
                    .ok_or_else(|| format!("Duration too large: {}", s))?;
                current_number.clear();
                has_unit = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // A trailing bare number is seconds
        if !current_number.is_empty() {
            let num = current_number
                .parse::<u64>()
                .map_err(|_| "Invalid number in duration".to_string())?;
            total_seconds = total_seconds
                .checked_add(num)
                .ok_or_else(|| format!("Duration too large: {}", s))?;
            has_unit = true;
        }

        if !has_unit || total_seconds == 0 {
            return Err("Duration must include a positive number".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Clusters RSS headlines into a topic map and publishes it", long_about = None)]
struct Cli {
    /// JSON file with a pipeline configuration; flags override it
    #[arg(long, env = "NT_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "NT_STORE", default_value = "memory", help = "Object store: memory (default), s3")]
    store: String,
    #[arg(long, env = "NT_S3_ENDPOINT")]
    s3_endpoint: Option<String>,
    #[arg(long, env = "NT_S3_REGION")]
    s3_region: Option<String>,
    #[arg(long, env = "NT_S3_ACCESS_KEY", hide_env_values = true)]
    s3_access_key: Option<String>,
    #[arg(long, env = "NT_S3_SECRET_KEY", hide_env_values = true)]
    s3_secret_key: Option<String>,
    #[arg(long, env = "NT_MODEL", default_value = "dummy", help = "Embedding model: dummy (default), http")]
    model: String,
    #[arg(long, env = "NT_MODEL_URL")]
    model_url: Option<String>,
    #[arg(long, env = "NT_MODEL_NAME")]
    model_name: Option<String>,
    #[arg(long, env = "NT_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the pipeline once, or periodically with --interval
    Run {
        /// File with one feed URL per line
        #[arg(long, env = "NT_FEEDS")]
        feeds: Option<PathBuf>,
        /// Extra feed URL, may be repeated
        #[arg(long = "feed")]
        feed_urls: Vec<String>,
        #[arg(long, env = "NT_PRIVATE_BUCKET")]
        private_bucket: Option<String>,
        #[arg(long, env = "NT_PUBLIC_BUCKET")]
        public_bucket: Option<String>,
        #[arg(long, env = "NT_SUBGROUP_THRESHOLD")]
        subgroup_threshold: Option<f32>,
        #[arg(long, env = "NT_GROUP_THRESHOLD")]
        group_threshold: Option<f32>,
        #[arg(long, env = "NT_MAX_AGE_DAYS")]
        max_age_days: Option<i64>,
        #[arg(long, env = "NT_CONCURRENCY")]
        concurrency: Option<usize>,
        #[arg(long, help = "Repeat every interval, e.g. 30m or 1h30m")]
        interval: Option<HumanDuration>,
    },
    /// List the objects of a bucket
    List {
        #[arg(long)]
        bucket: String,
    },
    /// Validate a local document and metadata, or the objects published to a bucket
    Check {
        /// Visualization document to validate
        file: Option<PathBuf>,
        /// Metadata record to validate
        #[arg(long)]
        metadata: Option<PathBuf>,
        /// Read both published objects back from this bucket
        #[arg(long)]
        bucket: Option<String>,
    },
}

struct RunArgs {
    feeds: Option<PathBuf>,
    feed_urls: Vec<String>,
    private_bucket: Option<String>,
    public_bucket: Option<String>,
    subgroup_threshold: Option<f32>,
    group_threshold: Option<f32>,
    max_age_days: Option<i64>,
    concurrency: Option<usize>,
}

fn resolve_config(path: Option<&PathBuf>, args: RunArgs) -> anyhow::Result<PipelineConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_slice(&raw).with_context(|| format!("parsing {}", path.display()))?
        }
        None => PipelineConfig::default(),
    };

    if let Some(feeds) = args.feeds {
        config.feed_urls = load_feed_list(&feeds)?;
    }
    for url in args.feed_urls {
        if !config.feed_urls.contains(&url) {
            config.feed_urls.push(url);
        }
    }
    if let Some(bucket) = args.private_bucket {
        config.publish.private_bucket = bucket;
    }
    if let Some(bucket) = args.public_bucket {
        config.publish.public_bucket = bucket;
    }
    if let Some(threshold) = args.subgroup_threshold {
        config.grouping.subgroup_threshold = threshold;
    }
    if let Some(threshold) = args.group_threshold {
        config.grouping.group_threshold = threshold;
    }
    if let Some(days) = args.max_age_days {
        config.feeds.max_age_days = days;
    }
    if let Some(concurrency) = args.concurrency {
        config.feeds.concurrency = concurrency;
    }

    config.validate()?;
    if config.feed_urls.is_empty() {
        anyhow::bail!("no feeds configured, pass --feeds <file> or --feed <url>");
    }
    Ok(config)
}

fn log_report(report: &RunReport) {
    info!(
        "📰 {} feeds ok, {} failed; {} fetched, {} kept ({} stale, {} duplicates, {} invalid)",
        report.feeds_ok,
        report.feeds_failed.len(),
        report.articles_fetched,
        report.filter.kept,
        report.filter.stale,
        report.filter.duplicates,
        report.filter.invalid
    );
    for feed in &report.feeds_failed {
        info!("   failed feed: {}", feed);
    }
    info!("🕒 Published version {} at {}", report.metadata.version, report.metadata.datetime);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let store_options = StoreOptions {
        kind: cli.store.clone(),
        endpoint: cli.s3_endpoint.clone(),
        region: cli.s3_region.clone(),
        access_key: cli.s3_access_key.clone(),
        secret_key: cli.s3_secret_key.clone(),
    };

    match cli.command {
        Commands::Run {
            feeds,
            feed_urls,
            private_bucket,
            public_bucket,
            subgroup_threshold,
            group_threshold,
            max_age_days,
            concurrency,
            interval,
        } => {
            let config = resolve_config(
                cli.config.as_ref(),
                RunArgs {
                    feeds,
                    feed_urls,
                    private_bucket,
                    public_bucket,
                    subgroup_threshold,
                    group_threshold,
                    max_age_days,
                    concurrency,
                },
            )?;
            info!("🦗 {} feeds configured", config.feed_urls.len());

            let store = create_store(&store_options, &config.publish)?;
            let embedder = create_model(&InferenceConfig {
                model: cli.model.clone(),
                model_url: cli.model_url.clone(),
                model_name: cli.model_name.clone(),
                api_key: cli.api_key.clone(),
                dimension: None,
            })?;
            let pipeline = Pipeline::new(
                config,
                Arc::new(RssFeedSource::new(FEED_TIMEOUT)?),
                embedder,
                Arc::new(KeywordLabeler::default()),
                store,
            )?;

            if let Some(interval) = interval {
                info!("Running in periodic mode with {}s interval", interval.0.as_secs());
                loop {
                    info!("Starting aggregation cycle");
                    match pipeline.run().await {
                        Ok(report) => log_report(&report),
                        Err(e) => error!("❌ Run failed: {}", e),
                    }
                    info!("Waiting {}s before next run", interval.0.as_secs());
                    tokio::time::sleep(interval.0).await;
                }
            }

            let report = pipeline.run().await?;
            log_report(&report);
            if report.is_partial() {
                error!("⚠️ Partial publish: {:?}", report.publish.status);
                std::process::exit(2);
            }
        }
        Commands::List { bucket } => {
            let publish = nt_core::config::PublishConfig::new("", "");
            let store = create_store(&store_options, &publish)?;
            for key in store.list(&bucket).await? {
                println!("{}", key);
            }
        }
        Commands::Check { file, metadata, bucket } => {
            if file.is_none() && metadata.is_none() && bucket.is_none() {
                anyhow::bail!("nothing to check: pass a document, --metadata or --bucket");
            }
            if let Some(file) = file {
                let raw = std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
                let summary = check_document(&raw).with_context(|| format!("checking {}", file.display()))?;
                println!(
                    "{} is valid: {} groups, {} subgroups, {} articles",
                    file.display(),
                    summary.groups,
                    summary.subgroups,
                    summary.articles
                );
            }
            if let Some(path) = metadata {
                let raw = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
                let metadata = check_metadata(&raw).with_context(|| format!("checking {}", path.display()))?;
                println!(
                    "{} is valid: version {} at {}",
                    path.display(),
                    metadata.version,
                    metadata.datetime
                );
            }
            if let Some(bucket) = bucket {
                let publish = match cli.config.as_ref() {
                    Some(path) => {
                        let raw = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
                        serde_json::from_slice::<PipelineConfig>(&raw)
                            .with_context(|| format!("parsing {}", path.display()))?
                            .publish
                    }
                    None => nt_core::config::PublishConfig::default(),
                };
                let store = create_store(&store_options, &publish)?;
                let check = check_bucket(store.as_ref(), &bucket, &publish).await?;
                for key in &check.skipped {
                    println!("skipped {}/{}", bucket, key);
                }
                for problem in &check.problems {
                    println!("invalid {}/{}", bucket, problem);
                }
                if !check.is_valid() {
                    anyhow::bail!("{} failed validation with {} problem(s)", bucket, check.problems.len());
                }
                println!("{} is valid: {} and {}", bucket, publish.data_key, publish.metadata_key);
            }
        }
    }

    Ok(())
}
