//! S3-compatible object store gateway.
//!
//! A thin convenience layer over an S3-compatible storage provider, used by a
//! host application to move user files in and out of buckets.
//!
//! # Features
//!
//! - **Presigned URLs**: PUT URLs carrying the bucket ACL, GET URLs for downloads
//! - **Objects**: Upload, existence check with content-type filter, copy, move, delete
//! - **Listing**: Single pages or a stream following continuation tokens
//! - **ACL policy**: `public-read` for the public bucket, owner-only elsewhere
//! - **S3-Compatible**: Works with Wasabi, MinIO, R2, etc.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! #[tokio::main]
//! async fn main() -> Result<(), s3_gateway::GatewayError> {
//!     // Create gateway from environment
//!     let gateway = s3_gateway::create_gateway_from_env()?;
//!
//!     let url = gateway
//!         .generate_upload_url("avatars", "user/42.png", "image/png", None)
//!         .await?;
//!     println!("PUT to {}", url.url);
//!
//!     if gateway.object_exists("avatars", "user/42.png").await {
//!         println!("upload landed");
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod mocks;
pub mod store;
pub mod types;

// Re-export main types at crate root
pub use config::{GatewayConfig, GatewayConfigBuilder};
pub use credentials::{
    CredentialsProvider, EnvCredentialsProvider, StaticCredentialsProvider, StorageCredentials,
};
pub use error::{
    AccessError, BucketError, ConfigurationError, CredentialsError, GatewayError, NetworkError,
    ObjectError, PresignError, RequestError, ServiceError,
};
pub use gateway::{AclPolicy, ObjectStoreGateway};
pub use store::{ObjectStore, SdkObjectStore};
pub use types::{
    // Request types
    CopyObjectRequest,
    DeleteObjectRequest,
    GetObjectRequest,
    HeadObjectRequest,
    ListObjectsRequest,
    PresignMethod,
    PresignRequest,
    PutObjectRequest,
    // Response types
    CopyObjectOutput,
    DeleteObjectOutput,
    GetObjectOutput,
    HeadObjectOutput,
    ListObjectsOutput,
    PresignedUrl,
    PutObjectOutput,
    // Common types
    CannedAcl,
    CopySource,
    ListDelimiter,
    ObjectSummary,
};

/// Create a gateway from environment variables.
///
/// This will attempt to read configuration from:
/// - `STORAGE_ENDPOINT` / `AWS_ENDPOINT_URL_S3` / `AWS_ENDPOINT_URL` for the endpoint
/// - `STORAGE_REGION` / `AWS_REGION` / `AWS_DEFAULT_REGION` for region
/// - `STORAGE_ACCESS_KEY` and `STORAGE_SECRET_KEY` (or the `AWS_*` pair) for credentials
/// - `PUBLIC_BUCKET` for the bucket that gets `public-read` objects
///
/// # Example
///
/// ```rust,no_run
/// let gateway = s3_gateway::create_gateway_from_env()?;
/// # Ok::<(), s3_gateway::GatewayError>(())
/// ```
pub fn create_gateway_from_env() -> Result<ObjectStoreGateway> {
    let config = GatewayConfig::builder().from_env().build()?;
    ObjectStoreGateway::from_config(config)
}

/// Create a gateway with explicit configuration.
///
/// # Example
///
/// ```rust,no_run
/// use s3_gateway::{GatewayConfig, StorageCredentials};
///
/// let config = GatewayConfig::builder()
///     .endpoint("https://s3.eu-west-1.wasabisys.com")
///     .public_bucket("public-assets")
///     .credentials(StorageCredentials::new("AKID", "SECRET"))
///     .build()?;
///
/// let gateway = s3_gateway::create_gateway(config)?;
/// # Ok::<(), s3_gateway::GatewayError>(())
/// ```
pub fn create_gateway(config: GatewayConfig) -> Result<ObjectStoreGateway> {
    ObjectStoreGateway::from_config(config)
}

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
