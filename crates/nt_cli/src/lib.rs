pub mod check;
pub mod logging;
pub mod pipeline;

pub use check::{check_bucket, check_document, check_metadata, BucketCheck, DocumentSummary};
pub use logging::init_logging;
pub use pipeline::{Pipeline, RunReport};
