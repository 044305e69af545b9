pub mod memory;

#[cfg(feature = "s3")]
pub mod s3;

pub use memory::MemoryStore;

#[cfg(feature = "s3")]
pub use self::s3::{S3Settings, S3Store};
