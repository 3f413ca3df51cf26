//! Response types for store operations.

use super::common::*;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Response from put object operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PutObjectOutput {
    /// ETag of the uploaded object.
    pub e_tag: Option<String>,
    /// Version ID if versioning enabled.
    pub version_id: Option<String>,
}

/// Response from get object operation.
#[derive(Debug, Clone)]
pub struct GetObjectOutput {
    /// Object body.
    pub body: Bytes,
    /// Content type.
    pub content_type: Option<String>,
    /// Content length.
    pub content_length: Option<u64>,
    /// ETag.
    pub e_tag: Option<String>,
    /// Last modified.
    pub last_modified: Option<DateTime<Utc>>,
}

/// Response from head object operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeadObjectOutput {
    /// Content type.
    pub content_type: Option<String>,
    /// Content length.
    pub content_length: Option<u64>,
    /// ETag.
    pub e_tag: Option<String>,
    /// Last modified.
    pub last_modified: Option<DateTime<Utc>>,
    /// User metadata.
    pub metadata: HashMap<String, String>,
}

/// Response from copy object operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CopyObjectOutput {
    /// ETag of the copied object.
    pub e_tag: Option<String>,
    /// Last modified date.
    pub last_modified: Option<DateTime<Utc>>,
    /// Version ID of the new object.
    pub version_id: Option<String>,
    /// Version ID of the source object.
    pub copy_source_version_id: Option<String>,
}

/// Response from delete object operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteObjectOutput {
    /// Delete marker flag.
    pub delete_marker: Option<bool>,
    /// Version ID of the delete marker.
    pub version_id: Option<String>,
}

/// Response from list objects operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListObjectsOutput {
    /// Bucket name.
    pub name: Option<String>,
    /// Prefix used.
    pub prefix: Option<String>,
    /// Delimiter used.
    pub delimiter: Option<String>,
    /// Maximum keys.
    pub max_keys: Option<u32>,
    /// Key count returned.
    pub key_count: Option<u32>,
    /// Is truncated (more results available).
    pub is_truncated: bool,
    /// Continuation token used.
    pub continuation_token: Option<String>,
    /// Continuation token for next page.
    pub next_continuation_token: Option<String>,
    /// Start after value.
    pub start_after: Option<String>,
    /// Objects returned.
    pub contents: Vec<ObjectSummary>,
    /// Common prefixes (for hierarchy).
    pub common_prefixes: Vec<String>,
}

/// Presigned URL result.
#[derive(Debug, Clone, Serialize)]
pub struct PresignedUrl {
    /// The presigned URL.
    pub url: String,
    /// HTTP method.
    pub method: String,
    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
    /// Headers the client must send with the request.
    pub signed_headers: HashMap<String, String>,
}

impl PresignedUrl {
    /// Check if the URL has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Get remaining time until expiration.
    pub fn time_remaining(&self) -> Option<chrono::Duration> {
        let remaining = self.expires_at - Utc::now();
        if remaining.num_seconds() > 0 {
            Some(remaining)
        } else {
            None
        }
    }
}
