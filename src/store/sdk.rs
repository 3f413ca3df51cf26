//! Object store backed by the AWS SDK for Rust.
//!
//! Works against any S3-compatible endpoint (Wasabi, MinIO, R2, AWS).

use super::ObjectStore;
use crate::config::GatewayConfig;
use crate::error::{
    map_error_code, ErrorResponse, GatewayError, NetworkError, ObjectError, PresignError,
    RequestError,
};
use crate::types::*;
use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::presigning::{PresignedRequest, PresigningConfig};
use aws_sdk_s3::primitives::{ByteStream, DateTime as SdkDateTime};
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{info, trace};

const PROVIDER_NAME: &str = "s3-gateway";

/// [`ObjectStore`] implementation using `aws-sdk-s3`.
#[derive(Clone)]
pub struct SdkObjectStore {
    client: Client,
}

impl SdkObjectStore {
    /// Build an SDK client from the gateway configuration.
    ///
    /// Credentials are resolved here, once.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let credentials = config.credentials_provider.provide()?;
        let credentials = Credentials::new(
            credentials.access_key_id(),
            credentials.secret_access_key(),
            credentials.session_token().map(String::from),
            None,
            PROVIDER_NAME,
        );

        let sdk_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(config.endpoint.as_str().trim_end_matches('/'))
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(config.path_style)
            .build();

        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            path_style = config.path_style,
            credentials = config.credentials_provider.name(),
            "Object store client initialized"
        );

        Ok(Self::from_client(Client::from_conf(sdk_config)))
    }

    /// Wrap an already configured SDK client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Access the underlying SDK client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl std::fmt::Debug for SdkObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkObjectStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl ObjectStore for SdkObjectStore {
    async fn put_object(&self, request: PutObjectRequest) -> Result<PutObjectOutput, GatewayError> {
        trace!(bucket = %request.bucket, key = %request.key, size = request.body.len(), "PutObject");

        let output = self
            .client
            .put_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .body(ByteStream::from(request.body.clone()))
            .set_content_type(request.content_type.clone())
            .set_acl(request.acl.map(sdk_acl))
            .send()
            .await
            .map_err(|e| map_sdk_error(e, object_context(&request.bucket, &request.key)))?;

        Ok(PutObjectOutput {
            e_tag: output.e_tag().map(String::from),
            version_id: output.version_id().map(String::from),
        })
    }

    async fn get_object(&self, request: GetObjectRequest) -> Result<GetObjectOutput, GatewayError> {
        trace!(bucket = %request.bucket, key = %request.key, "GetObject");

        let output = self
            .client
            .get_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, object_context(&request.bucket, &request.key)))?;

        let content_type = output.content_type().map(String::from);
        let content_length = output.content_length().and_then(|len| u64::try_from(len).ok());
        let e_tag = output.e_tag().map(String::from);
        let last_modified = output.last_modified().and_then(to_chrono);

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| {
                GatewayError::Network(NetworkError::BodyRead {
                    message: e.to_string(),
                })
            })?
            .into_bytes();

        Ok(GetObjectOutput {
            body,
            content_type,
            content_length,
            e_tag,
            last_modified,
        })
    }

    async fn head_object(
        &self,
        request: HeadObjectRequest,
    ) -> Result<HeadObjectOutput, GatewayError> {
        trace!(bucket = %request.bucket, key = %request.key, "HeadObject");

        let output = self
            .client
            .head_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, object_context(&request.bucket, &request.key)))?;

        Ok(HeadObjectOutput {
            content_type: output.content_type().map(String::from),
            content_length: output.content_length().and_then(|len| u64::try_from(len).ok()),
            e_tag: output.e_tag().map(String::from),
            last_modified: output.last_modified().and_then(to_chrono),
            metadata: output.metadata().cloned().unwrap_or_default(),
        })
    }

    async fn copy_object(
        &self,
        request: CopyObjectRequest,
    ) -> Result<CopyObjectOutput, GatewayError> {
        trace!(
            source = %request.source,
            dest_bucket = %request.dest_bucket,
            dest_key = %request.dest_key,
            "CopyObject"
        );

        let output = self
            .client
            .copy_object()
            .copy_source(request.source.encoded())
            .bucket(&request.dest_bucket)
            .key(&request.dest_key)
            .set_acl(request.acl.map(sdk_acl))
            .send()
            .await
            .map_err(|e| {
                attribute_copy_error(
                    map_sdk_error(e, ErrorResponse::default().for_bucket(&request.dest_bucket)),
                    &request,
                )
            })?;

        let result = output.copy_object_result();
        Ok(CopyObjectOutput {
            e_tag: result.and_then(|r| r.e_tag()).map(String::from),
            last_modified: result.and_then(|r| r.last_modified()).and_then(to_chrono),
            version_id: output.version_id().map(String::from),
            copy_source_version_id: output.copy_source_version_id().map(String::from),
        })
    }

    async fn delete_object(
        &self,
        request: DeleteObjectRequest,
    ) -> Result<DeleteObjectOutput, GatewayError> {
        trace!(bucket = %request.bucket, key = %request.key, "DeleteObject");

        let output = self
            .client
            .delete_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, object_context(&request.bucket, &request.key)))?;

        Ok(DeleteObjectOutput {
            delete_marker: output.delete_marker(),
            version_id: output.version_id().map(String::from),
        })
    }

    async fn list_objects(
        &self,
        request: ListObjectsRequest,
    ) -> Result<ListObjectsOutput, GatewayError> {
        trace!(
            bucket = %request.bucket,
            prefix = ?request.prefix,
            delimiter = ?request.delimiter,
            "ListObjectsV2"
        );

        let output = self
            .client
            .list_objects_v2()
            .bucket(&request.bucket)
            .set_prefix(request.prefix.clone())
            .set_delimiter(request.delimiter.clone())
            .set_max_keys(request.max_keys.map(|k| i32::try_from(k).unwrap_or(i32::MAX)))
            .set_continuation_token(request.continuation_token.clone())
            .set_start_after(request.start_after.clone())
            .send()
            .await
            .map_err(|e| {
                map_sdk_error(e, ErrorResponse::default().for_bucket(&request.bucket))
            })?;

        let contents = output
            .contents()
            .iter()
            .map(|object| ObjectSummary {
                key: object.key().unwrap_or_default().to_string(),
                size: object.size().and_then(|s| u64::try_from(s).ok()),
                e_tag: object.e_tag().map(String::from),
                last_modified: object.last_modified().and_then(to_chrono),
                storage_class: object.storage_class().map(|c| c.as_str().to_string()),
            })
            .collect();

        let common_prefixes = output
            .common_prefixes()
            .iter()
            .filter_map(|p| p.prefix().map(String::from))
            .collect();

        Ok(ListObjectsOutput {
            name: output.name().map(String::from),
            prefix: output.prefix().map(String::from),
            delimiter: output.delimiter().map(String::from),
            max_keys: output.max_keys().and_then(|k| u32::try_from(k).ok()),
            key_count: output.key_count().and_then(|k| u32::try_from(k).ok()),
            is_truncated: output.is_truncated().unwrap_or(false),
            continuation_token: output.continuation_token().map(String::from),
            next_continuation_token: output.next_continuation_token().map(String::from),
            start_after: output.start_after().map(String::from),
            contents,
            common_prefixes,
        })
    }

    async fn presign(&self, request: PresignRequest) -> Result<PresignedUrl, GatewayError> {
        let signing_failed = |message: String| {
            GatewayError::Presign(PresignError::SigningFailed {
                bucket: request.bucket.clone(),
                key: request.key.clone(),
                message,
            })
        };

        let presigning = PresigningConfig::expires_in(request.expires_in)
            .map_err(|e| signing_failed(e.to_string()))?;

        let presigned: PresignedRequest = match request.method {
            PresignMethod::Get => self
                .client
                .get_object()
                .bucket(&request.bucket)
                .key(&request.key)
                .presigned(presigning)
                .await
                .map_err(|e| signing_failed(DisplayErrorContext(&e).to_string()))?,
            PresignMethod::Put => self
                .client
                .put_object()
                .bucket(&request.bucket)
                .key(&request.key)
                .set_content_type(request.content_type.clone())
                .set_acl(request.acl.map(sdk_acl))
                .presigned(presigning)
                .await
                .map_err(|e| signing_failed(DisplayErrorContext(&e).to_string()))?,
        };

        let signed_headers: HashMap<String, String> = presigned
            .headers()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        Ok(PresignedUrl {
            url: presigned.uri().to_string(),
            method: presigned.method().to_string(),
            expires_at: Utc::now() + chrono::Duration::seconds(request.expires_in.as_secs() as i64),
            signed_headers,
        })
    }

    fn name(&self) -> &'static str {
        "aws-sdk-s3"
    }
}

fn sdk_acl(acl: CannedAcl) -> ObjectCannedAcl {
    match acl {
        CannedAcl::Private => ObjectCannedAcl::Private,
        CannedAcl::PublicRead => ObjectCannedAcl::PublicRead,
        CannedAcl::PublicReadWrite => ObjectCannedAcl::PublicReadWrite,
        CannedAcl::AuthenticatedRead => ObjectCannedAcl::AuthenticatedRead,
        CannedAcl::BucketOwnerRead => ObjectCannedAcl::BucketOwnerRead,
        CannedAcl::BucketOwnerFullControl => ObjectCannedAcl::BucketOwnerFullControl,
    }
}

fn to_chrono(value: &SdkDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(value.secs(), value.subsec_nanos())
}

fn object_context(bucket: &str, key: &str) -> ErrorResponse {
    ErrorResponse::default().for_object(bucket, key)
}

/// Name the right side of a copy in its error.
///
/// The request addresses the destination bucket, so bucket-level errors name
/// it. A missing key can only be the source.
fn attribute_copy_error(err: GatewayError, request: &CopyObjectRequest) -> GatewayError {
    match err {
        GatewayError::Object(ObjectError::NotFound { .. }) => {
            GatewayError::Object(ObjectError::NotFound {
                bucket: request.source.bucket.clone(),
                key: request.source.key.clone(),
            })
        }
        other => other,
    }
}

/// Map an SDK failure onto the gateway error hierarchy.
fn map_sdk_error<E>(err: SdkError<E>, context: ErrorResponse) -> GatewayError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    match &err {
        SdkError::DispatchFailure(_) => {
            return GatewayError::Network(NetworkError::DispatchFailed {
                message: DisplayErrorContext(&err).to_string(),
            })
        }
        SdkError::TimeoutError(_) => {
            return GatewayError::Network(NetworkError::Timeout {
                message: DisplayErrorContext(&err).to_string(),
            })
        }
        SdkError::ConstructionFailure(_) => {
            return GatewayError::Request(RequestError::Validation {
                message: DisplayErrorContext(&err).to_string(),
            })
        }
        _ => {}
    }

    let status = err.raw_response().map(|response| response.status().as_u16());
    let code = err.code().unwrap_or_default().to_string();
    let message = err.message().unwrap_or_default().to_string();

    map_error_code(
        &code,
        ErrorResponse {
            code: code.clone(),
            message,
            ..context
        }
        .with_status(status),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BucketError;
    use test_case::test_case;

    #[test_case(CannedAcl::PublicRead, "public-read")]
    #[test_case(CannedAcl::BucketOwnerFullControl, "bucket-owner-full-control")]
    #[test_case(CannedAcl::Private, "private")]
    fn test_sdk_acl_matches_wire_value(acl: CannedAcl, expected: &str) {
        assert_eq!(sdk_acl(acl).as_str(), expected);
        assert_eq!(acl.as_str(), expected);
    }

    fn copy_request() -> CopyObjectRequest {
        CopyObjectRequest::new(CopySource::new("src-bucket", "tmp/a.png"), "dst-bucket", "a.png")
    }

    #[test]
    fn test_copy_missing_key_names_source() {
        let err = attribute_copy_error(
            GatewayError::Object(ObjectError::NotFound {
                bucket: "dst-bucket".to_string(),
                key: String::new(),
            }),
            &copy_request(),
        );
        match err {
            GatewayError::Object(ObjectError::NotFound { bucket, key }) => {
                assert_eq!(bucket, "src-bucket");
                assert_eq!(key, "tmp/a.png");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_copy_bucket_error_names_destination() {
        let err = attribute_copy_error(
            GatewayError::Bucket(BucketError::NotFound {
                bucket: "dst-bucket".to_string(),
            }),
            &copy_request(),
        );
        assert!(matches!(
            err,
            GatewayError::Bucket(BucketError::NotFound { ref bucket }) if bucket == "dst-bucket"
        ));
    }

    #[test]
    fn test_to_chrono() {
        let value = SdkDateTime::from_secs_and_nanos(1_705_314_600, 500);
        let converted = to_chrono(&value).unwrap();
        assert_eq!(converted.timestamp(), 1_705_314_600);
        assert_eq!(converted.timestamp_subsec_nanos(), 500);
    }
}
