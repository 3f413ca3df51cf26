//! Object store abstraction.
//!
//! The gateway talks to the storage provider only through [`ObjectStore`].
//! [`SdkObjectStore`] is the production implementation; the in-memory store in
//! [`crate::mocks`] stands in for it in tests.

mod sdk;

pub use sdk::SdkObjectStore;

use crate::error::GatewayError;
use crate::types::*;
use async_trait::async_trait;

/// Capability set of an S3-compatible provider.
///
/// Every method issues exactly one provider request.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload an object.
    async fn put_object(&self, request: PutObjectRequest) -> Result<PutObjectOutput, GatewayError>;

    /// Download an object.
    async fn get_object(&self, request: GetObjectRequest) -> Result<GetObjectOutput, GatewayError>;

    /// Fetch object metadata.
    async fn head_object(
        &self,
        request: HeadObjectRequest,
    ) -> Result<HeadObjectOutput, GatewayError>;

    /// Server-side copy.
    async fn copy_object(
        &self,
        request: CopyObjectRequest,
    ) -> Result<CopyObjectOutput, GatewayError>;

    /// Delete an object.
    async fn delete_object(
        &self,
        request: DeleteObjectRequest,
    ) -> Result<DeleteObjectOutput, GatewayError>;

    /// List one page of objects.
    async fn list_objects(
        &self,
        request: ListObjectsRequest,
    ) -> Result<ListObjectsOutput, GatewayError>;

    /// Produce a presigned URL. No request is sent to the provider.
    async fn presign(&self, request: PresignRequest) -> Result<PresignedUrl, GatewayError>;

    /// Store name, for logging.
    fn name(&self) -> &'static str;
}
