use std::sync::Arc;

use nt_core::config::PublishConfig;
use nt_core::{Error, ObjectStore, Result};
use tracing::info;

pub mod backends;
pub mod publisher;

pub use backends::*;
pub use publisher::{Destination, PublishReport, PublishStatus, Publisher};

/// Where objects go.
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    /// `memory` or `s3`
    pub kind: String,
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

/// Builds the object store named by `options.kind`.
#[cfg_attr(not(feature = "s3"), allow(unused_variables))]
pub fn create_store(options: &StoreOptions, publish: &PublishConfig) -> Result<Arc<dyn ObjectStore>> {
    match options.kind.as_str() {
        "memory" => {
            info!("🏦 Using in-memory object store");
            Ok(Arc::new(MemoryStore::new()))
        }
        #[cfg(feature = "s3")]
        "s3" => {
            let settings = S3Settings {
                endpoint: options
                    .endpoint
                    .clone()
                    .unwrap_or_else(|| "https://s3.amazonaws.com".to_string()),
                region: options.region.clone().unwrap_or_else(|| "us-east-1".to_string()),
                access_key: options.access_key.clone(),
                secret_key: options.secret_key.clone(),
                public_buckets: vec![publish.public_bucket.clone()],
            };
            Ok(Arc::new(S3Store::new(settings)?))
        }
        other => Err(Error::Config(format!(
            "Unknown object store '{}'. Available stores: memory{}",
            other,
            if cfg!(feature = "s3") { ", s3" } else { "" }
        ))),
    }
}

pub mod prelude {
    pub use super::{create_store, MemoryStore, PublishStatus, Publisher, StoreOptions};
    pub use nt_core::{ObjectStore, PutOutcome};
}
