//! Object operations.

use super::{validate_location, ObjectStoreGateway};
use crate::error::{GatewayError, ObjectError};
use crate::types::{
    CopyObjectOutput, CopyObjectRequest, CopySource, DeleteObjectRequest, GetObjectOutput,
    GetObjectRequest, HeadObjectRequest, PutObjectRequest,
};
use bytes::Bytes;
use tracing::{debug, info, warn};

impl ObjectStoreGateway {
    /// Upload `bytes` to `bucket/key` with the bucket's ACL.
    ///
    /// Returns `false` on any failure.
    pub async fn upload_object(
        &self,
        bytes: impl Into<Bytes>,
        content_type: &str,
        bucket: &str,
        key: &str,
    ) -> bool {
        if let Err(e) = validate_location(bucket, key) {
            warn!(bucket, key, error = %e, "Rejected upload");
            return false;
        }

        let acl = self.acl_policy.acl_for(bucket);
        let request = PutObjectRequest::new(bucket, key, bytes)
            .with_content_type(content_type)
            .with_acl(acl);
        let size = request.body.len();

        match self.store.put_object(request).await {
            Ok(_) => {
                info!(bucket, key, size, acl = %acl, "Uploaded object");
                true
            }
            Err(e) => {
                warn!(bucket, key, error = %e, code = ?e.error_code(), "Upload failed");
                false
            }
        }
    }

    /// Whether `bucket/key` exists with one of the configured content types.
    pub async fn object_exists(&self, bucket: &str, key: &str) -> bool {
        let allowed = self.config.allowed_content_types.as_slice();
        self.object_exists_with_content_types(bucket, key, allowed)
            .await
    }

    /// Whether `bucket/key` exists with one of `allowed` content types.
    ///
    /// Any error, not-found included, yields `false`.
    pub async fn object_exists_with_content_types<S: AsRef<str>>(
        &self,
        bucket: &str,
        key: &str,
        allowed: &[S],
    ) -> bool {
        if validate_location(bucket, key).is_err() {
            return false;
        }

        match self.store.head_object(HeadObjectRequest::new(bucket, key)).await {
            Ok(head) => {
                let matched = head
                    .content_type
                    .as_deref()
                    .is_some_and(|ct| allowed.iter().any(|a| a.as_ref() == ct));
                if !matched {
                    debug!(
                        bucket,
                        key,
                        content_type = ?head.content_type,
                        "Object exists with a disallowed content type"
                    );
                }
                matched
            }
            Err(e) if e.is_not_found() => false,
            Err(e) => {
                debug!(bucket, key, error = %e, "Existence check failed");
                false
            }
        }
    }

    /// Server-side copy of `source` (`"bucket/key"`) to `dest_bucket/dest_key`.
    ///
    /// The copy gets the destination bucket's ACL.
    pub async fn copy_object(
        &self,
        source: &str,
        dest_bucket: &str,
        dest_key: &str,
    ) -> Result<CopyObjectOutput, GatewayError> {
        let source = CopySource::parse(source)?;
        validate_location(dest_bucket, dest_key)?;
        self.copy_from(source, dest_bucket, dest_key).await
    }

    /// Copy then delete the source.
    ///
    /// Not atomic. If the delete fails the object exists in both places and
    /// the error is [`ObjectError::MoveIncomplete`].
    pub async fn move_object(
        &self,
        source_key: &str,
        source_bucket: &str,
        dest_bucket: &str,
        dest_key: &str,
    ) -> Result<bool, GatewayError> {
        validate_location(source_bucket, source_key)?;
        validate_location(dest_bucket, dest_key)?;

        self.copy_from(CopySource::new(source_bucket, source_key), dest_bucket, dest_key)
            .await?;

        if let Err(cause) = self
            .store
            .delete_object(DeleteObjectRequest::new(source_bucket, source_key))
            .await
        {
            warn!(
                source_bucket,
                source_key,
                dest_bucket,
                dest_key,
                error = %cause,
                "Source delete failed after copy"
            );
            return Err(GatewayError::Object(ObjectError::MoveIncomplete {
                source_bucket: source_bucket.to_string(),
                source_key: source_key.to_string(),
                dest_bucket: dest_bucket.to_string(),
                dest_key: dest_key.to_string(),
                cause: Box::new(cause),
            }));
        }

        info!(source_bucket, source_key, dest_bucket, dest_key, "Moved object");
        Ok(true)
    }

    /// Delete `bucket/key`. Deleting a missing key succeeds.
    pub async fn delete_object(&self, bucket: &str, key: &str) -> Result<bool, GatewayError> {
        validate_location(bucket, key)?;
        self.store
            .delete_object(DeleteObjectRequest::new(bucket, key))
            .await?;
        debug!(bucket, key, "Deleted object");
        Ok(true)
    }

    /// Download `bucket/key`.
    pub async fn download_object(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<GetObjectOutput, GatewayError> {
        validate_location(bucket, key)?;
        self.store.get_object(GetObjectRequest::new(bucket, key)).await
    }

    async fn copy_from(
        &self,
        source: CopySource,
        dest_bucket: &str,
        dest_key: &str,
    ) -> Result<CopyObjectOutput, GatewayError> {
        let acl = self.acl_policy.acl_for(dest_bucket);
        debug!(source = %source, dest_bucket, dest_key, acl = %acl, "Copying object");

        self.store
            .copy_object(CopyObjectRequest::new(source, dest_bucket, dest_key).with_acl(acl))
            .await
    }
}
