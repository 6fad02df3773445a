//! S3 implementation of [`ObjectUploader`].
//!
//! Each manifest row names the local AWS profile whose credentials perform its
//! upload, so a fresh SDK config and client are built for every put. Nothing
//! is cached between rows. No metadata or ACL is set on the object.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use tracing::{debug, info};

use crate::contract::{ObjectUploader, UploadRequest};
use crate::error::UploadError;

#[derive(Debug, Default, Clone)]
pub struct S3Uploader;

impl S3Uploader {
    pub fn new() -> Self {
        Self
    }

    /// Client scoped to `profile_name`. An empty name uses the default provider chain.
    async fn client_for_profile(profile_name: &str) -> aws_sdk_s3::Client {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if !profile_name.is_empty() {
            loader = loader.profile_name(profile_name);
        }
        let sdk_config = loader.load().await;
        debug!(
            profile = profile_name,
            region = ?sdk_config.region(),
            "Loaded AWS config for upload"
        );
        aws_sdk_s3::Client::new(&sdk_config)
    }
}

#[async_trait]
impl ObjectUploader for S3Uploader {
    async fn upload_object(&self, request: UploadRequest) -> Result<(), UploadError> {
        let client = Self::client_for_profile(&request.profile_name).await;
        let size = request.body.len();

        client
            .put_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .body(ByteStream::from(request.body))
            .send()
            .await
            .map_err(|e| UploadError::Put {
                bucket: request.bucket.clone(),
                key: request.key.clone(),
                profile: request.profile_name.clone(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        info!(
            bucket = %request.bucket,
            key = %request.key,
            profile = %request.profile_name,
            size,
            "File uploaded successfully"
        );
        Ok(())
    }
}
