//! Presigned URL issuance.

use super::{validate_location, ObjectStoreGateway};
use crate::config::MAX_PRESIGN_EXPIRY;
use crate::error::{GatewayError, RequestError};
use crate::types::{PresignRequest, PresignedUrl};
use std::time::Duration;
use tracing::debug;

impl ObjectStoreGateway {
    /// Presigned PUT URL for uploading `key` with the given content type.
    ///
    /// `expires_in` defaults to the configured upload expiry (one hour unless
    /// changed). The URL carries the bucket's ACL, so the uploader must send
    /// the returned `signed_headers`.
    pub async fn generate_upload_url(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        expires_in: Option<Duration>,
    ) -> Result<PresignedUrl, GatewayError> {
        validate_location(bucket, key)?;
        let expires_in = expires_in.unwrap_or(self.config.upload_url_expiry);
        validate_expiry(expires_in)?;

        let acl = self.acl_policy.acl_for(bucket);
        debug!(
            bucket,
            key,
            content_type,
            acl = %acl,
            expires_in_secs = expires_in.as_secs(),
            "Generating presigned upload URL"
        );

        self.store
            .presign(
                PresignRequest::put(bucket, key, expires_in)
                    .with_content_type(content_type)
                    .with_acl(acl),
            )
            .await
    }

    /// Presigned GET URL for downloading `key`.
    ///
    /// Lifetime is the configured download expiry; callers cannot override it.
    pub async fn generate_download_url(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<PresignedUrl, GatewayError> {
        validate_location(bucket, key)?;
        let expires_in = self.config.download_url_expiry;

        debug!(
            bucket,
            key,
            expires_in_secs = expires_in.as_secs(),
            "Generating presigned download URL"
        );

        self.store
            .presign(PresignRequest::get(bucket, key, expires_in))
            .await
    }
}

fn validate_expiry(expires_in: Duration) -> Result<(), GatewayError> {
    if expires_in.is_zero() || expires_in > MAX_PRESIGN_EXPIRY {
        return Err(GatewayError::Request(RequestError::InvalidExpiry {
            seconds: expires_in.as_secs(),
            max_seconds: MAX_PRESIGN_EXPIRY.as_secs(),
        }));
    }
    Ok(())
}
