use ::s3::creds::Credentials;
use ::s3::error::S3Error;
use ::s3::{Bucket, Region};
use async_trait::async_trait;
use nt_core::{Error, ObjectStore, PutOutcome, Result};
use tracing::{info, warn};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Connection settings for an S3-compatible endpoint.
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub endpoint: String,
    pub region: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    /// Buckets whose objects get a `public-read` ACL
    pub public_buckets: Vec<String>,
}

/// Object store backed by `rust-s3`.
pub struct S3Store {
    settings: S3Settings,
    region: Region,
    credentials: Credentials,
}

impl S3Store {
    pub fn new(settings: S3Settings) -> Result<Self> {
        let region = Region::Custom {
            region: settings.region.clone(),
            endpoint: settings.endpoint.clone(),
        };
        let credentials = match (&settings.access_key, &settings.secret_key) {
            (Some(access), Some(secret)) => Credentials::new(Some(access.as_str()), Some(secret.as_str()), None, None, None),
            _ => Credentials::default(),
        }
        .map_err(|e| Error::Config(format!("invalid S3 credentials: {}", e)))?;

        info!("🪣 S3 object store ready at {}", settings.endpoint);
        Ok(Self {
            settings,
            region,
            credentials,
        })
    }

    fn bucket(&self, name: &str) -> Result<Bucket> {
        Bucket::new(name, self.region.clone(), self.credentials.clone())
            .map(|bucket| bucket.with_path_style())
            .map_err(map_s3_error)
    }

    fn is_public(&self, bucket: &str) -> bool {
        self.settings.public_buckets.iter().any(|b| b == bucket)
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(&self, bucket_name: &str, key: &str, bytes: Vec<u8>) -> Result<PutOutcome> {
        let mut bucket = self.bucket(bucket_name)?;

        if !self.is_public(bucket_name) {
            put_object(&bucket, key, &bytes).await?;
            return Ok(PutOutcome::Stored);
        }

        bucket.add_header("x-amz-acl", "public-read");
        match put_object(&bucket, key, &bytes).await {
            Ok(()) => Ok(PutOutcome::Stored),
            Err(Error::Storage(reason)) => {
                warn!(bucket = %bucket_name, key = %key, "⚠️ public-read ACL rejected: {}", reason);
                let plain = self.bucket(bucket_name)?;
                put_object(&plain, key, &bytes).await?;
                Ok(PutOutcome::StoredWithWarning(format!(
                    "stored without public-read ACL: {}",
                    reason
                )))
            }
            Err(e) => Err(e),
        }
    }

    async fn list(&self, bucket_name: &str) -> Result<Vec<String>> {
        let bucket = self.bucket(bucket_name)?;
        let pages = bucket.list(String::new(), None).await.map_err(map_s3_error)?;
        Ok(pages
            .into_iter()
            .flat_map(|page| page.contents.into_iter().map(|object| object.key))
            .collect())
    }

    async fn read(&self, bucket_name: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let bucket = self.bucket(bucket_name)?;
        let response = match bucket.get_object(key).await {
            Ok(response) => response,
            Err(S3Error::Http(404, _)) => return Ok(None),
            Err(e) => return Err(map_s3_error(e)),
        };
        match response.status_code() {
            404 => Ok(None),
            code if (200..300).contains(&code) => Ok(Some(response.as_slice().to_vec())),
            code => Err(classify_status(code, &String::from_utf8_lossy(response.as_slice()))),
        }
    }
}

async fn put_object(bucket: &Bucket, key: &str, bytes: &[u8]) -> Result<()> {
    let response = bucket
        .put_object_with_content_type(key, bytes, JSON_CONTENT_TYPE)
        .await
        .map_err(map_s3_error)?;
    let code = response.status_code();
    if (200..300).contains(&code) {
        Ok(())
    } else {
        Err(classify_status(code, &String::from_utf8_lossy(response.as_slice())))
    }
}

fn map_s3_error(error: S3Error) -> Error {
    match error {
        S3Error::Http(code, body) => classify_status(code, &body),
        other => Error::StorageTransient(other.to_string()),
    }
}

/// 5xx and 429 are worth retrying, any other status is final.
fn classify_status(code: u16, body: &str) -> Error {
    let message = format!("HTTP {}: {}", code, body.trim());
    if code >= 500 || code == 429 {
        Error::StorageTransient(message)
    } else {
        Error::Storage(message)
    }
}
