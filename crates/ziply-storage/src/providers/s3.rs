//! S3-compatible object storage provider (requires the `s3` feature).

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{debug, info};

use ziply_core::config::S3StorageConfig;
use ziply_core::error::{AppError, ErrorKind};
use ziply_core::result::AppResult;
use ziply_core::traits::storage::{ObjectStorage, SignedUpload, StoredObject};

/// S3-compatible storage provider.
#[derive(Debug, Clone)]
pub struct S3ObjectStorage {
    client: Client,
    bucket: String,
}

impl S3ObjectStorage {
    /// Create a new S3 storage provider. Static credentials are used when
    /// configured; otherwise the default AWS credential chain applies.
    pub async fn new(config: &S3StorageConfig) -> AppResult<Self> {
        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            bucket = %config.bucket,
            "Initializing S3 storage provider"
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));
        if !config.access_key.is_empty() {
            loader = loader.credentials_provider(Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "ziply-config",
            ));
        }
        if !config.endpoint.is_empty() {
            loader = loader.endpoint_url(config.endpoint.clone());
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        })
    }
}

fn presigning(ttl: Duration) -> AppResult<PresigningConfig> {
    PresigningConfig::expires_in(ttl).map_err(|e| {
        AppError::with_source(ErrorKind::Storage, "Invalid presigning duration", e)
    })
}

fn storage_error<E>(context: &str, key: &str, err: E) -> AppError
where
    E: std::error::Error + Send + Sync + 'static,
{
    AppError::with_source(ErrorKind::Storage, format!("{context}: {key}"), err)
}

/// Pull the signature out of a presigned URL's query string.
fn signature_of(url: &str) -> String {
    url.split_once('?')
        .map(|(_, query)| query)
        .unwrap_or_default()
        .split('&')
        .find_map(|pair| pair.strip_prefix("X-Amz-Signature="))
        .unwrap_or_default()
        .to_string()
}

fn attachment_disposition(name: &str) -> String {
    let escaped = name.replace(['"', '\\'], "_");
    format!("attachment; filename=\"{escaped}\"")
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok())
    }

    async fn upload(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<String> {
        let len = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| storage_error("Failed to upload object", key, e))?;

        debug!(key, bytes = len, "Uploaded object");
        Ok(key.to_string())
    }

    async fn create_signed_download_url(
        &self,
        key: &str,
        ttl: Duration,
        download_name: Option<&str>,
    ) -> AppResult<String> {
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .set_response_content_disposition(download_name.map(attachment_disposition))
            .presigned(presigning(ttl)?)
            .await
            .map_err(|e| storage_error("Failed to presign download", key, e))?;
        Ok(request.uri().to_string())
    }

    async fn create_signed_preview_url(&self, key: &str, ttl: Duration) -> AppResult<String> {
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning(ttl)?)
            .await
            .map_err(|e| storage_error("Failed to presign preview", key, e))?;
        Ok(request.uri().to_string())
    }

    async fn create_signed_upload_url(
        &self,
        key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> AppResult<SignedUpload> {
        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(presigning(ttl)?)
            .await
            .map_err(|e| storage_error("Failed to presign upload", key, e))?;
        let url = request.uri().to_string();
        Ok(SignedUpload {
            token: signature_of(&url),
            url,
        })
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| storage_error("Failed to delete object", key, e))?;
        debug!(key, "Deleted object");
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => Ok(false),
            Err(e) => Err(storage_error("Failed to stat object", key, e)),
        }
    }

    async fn list(&self, prefix: &str) -> AppResult<Vec<StoredObject>> {
        let mut objects = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let page = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| storage_error("Failed to list objects", prefix, e))?;

            for object in page.contents() {
                let Some(key) = object.key() else { continue };
                objects.push(StoredObject {
                    key: key.to_string(),
                    size_bytes: object.size().and_then(|s| u64::try_from(s).ok()).unwrap_or(0),
                    last_modified: object.last_modified().and_then(|t| {
                        chrono::DateTime::from_timestamp(t.secs(), t.subsec_nanos())
                    }),
                });
            }

            match page.next_continuation_token() {
                Some(token) if page.is_truncated().unwrap_or(false) => {
                    continuation = Some(token.to_string());
                }
                _ => break,
            }
        }

        Ok(objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_of_presigned_url() {
        let url = "https://s3.local/bucket/key?X-Amz-Algorithm=AWS4-HMAC-SHA256\
                   &X-Amz-Signature=deadbeef&X-Amz-SignedHeaders=host";
        assert_eq!(signature_of(url), "deadbeef");
        assert_eq!(signature_of("https://s3.local/bucket/key"), "");
    }

    #[test]
    fn test_attachment_disposition_escapes_quotes() {
        assert_eq!(
            attachment_disposition("my \"file\".pdf"),
            "attachment; filename=\"my _file_.pdf\""
        );
    }
}
