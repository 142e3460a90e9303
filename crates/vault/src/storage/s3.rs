//! [`StorageGateway`] over Amazon S3 (or any S3-compatible endpoint).

use async_trait::async_trait;
use aws_sdk_s3::{
    error::DisplayErrorContext, primitives::ByteStream, types::ServerSideEncryption,
};
use tracing::debug;

use super::{StorageError, StorageGateway, StoredObject};
use crate::mode::Metadata;

/// S3-backed object store bound to a single bucket.
#[derive(Clone, Debug)]
pub struct S3Gateway {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Gateway {
    /// Create a gateway for `bucket` using an initialised S3 client.
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

fn io_error<E>(err: &E) -> StorageError
where
    E: std::error::Error,
{
    StorageError::Io(DisplayErrorContext(err).to_string())
}

#[async_trait]
impl StorageGateway for S3Gateway {
    async fn put(
        &self,
        storage_key: &str,
        body: Vec<u8>,
        metadata: Metadata,
        provider_key_id: Option<String>,
    ) -> Result<(), StorageError> {
        let mut req = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(storage_key)
            .body(ByteStream::from(body))
            .set_metadata(Some(metadata));

        if let Some(key_id) = provider_key_id {
            req = req
                .server_side_encryption(ServerSideEncryption::AwsKms)
                .ssekms_key_id(key_id);
        }

        req.send().await.map_err(|e| io_error(&e))?;
        debug!(bucket = %self.bucket, storage_key, "object stored");
        Ok(())
    }

    async fn get(&self, storage_key: &str) -> Result<StoredObject, StorageError> {
        let out = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(storage_key)
            .send()
            .await
        {
            Ok(out) => out,
            Err(err) => {
                let missing = err
                    .as_service_error()
                    .map(|e| e.is_no_such_key())
                    .unwrap_or(false);
                return Err(if missing {
                    StorageError::NotFound(storage_key.to_owned())
                } else {
                    io_error(&err)
                });
            }
        };

        let metadata = out.metadata().cloned().unwrap_or_default();
        let body = out
            .body
            .collect()
            .await
            .map_err(|e| io_error(&e))?
            .into_bytes();

        Ok(StoredObject {
            key: storage_key.to_owned(),
            body: body.to_vec(),
            metadata,
        })
    }

    async fn list(&self, prefix: &str, max: i32) -> Result<Vec<String>, StorageError> {
        let out = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .max_keys(max)
            .send()
            .await
            .map_err(|e| io_error(&e))?;

        Ok(out
            .contents()
            .iter()
            .filter_map(|obj| obj.key().map(str::to_owned))
            .collect())
    }
}
