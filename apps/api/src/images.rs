//! Storage for uploaded food photos (S3 or MinIO).

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn put_image(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), AppError>;

    async fn delete_image(&self, key: &str) -> Result<(), AppError>;
}

pub struct S3ImageStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ImageStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl ImageStore for S3ImageStore {
    async fn put_image(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded food photo to s3://{}/{}", self.bucket, key);
        Ok(())
    }

    async fn delete_image(&self, key: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 delete failed: {e}")))?;

        info!("Removed food photo s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

/// Object key for a user's uploaded photo: `predictions/{email}/{uuid}.{ext}`.
pub fn image_key(user_email: &str, content_type: &str) -> String {
    let ext = match content_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/heic" => "heic",
        _ => "bin",
    };
    format!("predictions/{}/{}.{}", user_email, Uuid::new_v4(), ext)
}
