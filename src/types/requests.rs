//! Request types for store operations.

use super::common::*;
use bytes::Bytes;
use std::time::Duration;

/// Request to put an object.
#[derive(Debug, Clone)]
pub struct PutObjectRequest {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Object body.
    pub body: Bytes,
    /// Content type.
    pub content_type: Option<String>,
    /// Canned ACL.
    pub acl: Option<CannedAcl>,
}

impl PutObjectRequest {
    /// Create a new put object request.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            body: body.into(),
            content_type: None,
            acl: None,
        }
    }

    /// Set content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set canned ACL.
    pub fn with_acl(mut self, acl: CannedAcl) -> Self {
        self.acl = Some(acl);
        self
    }
}

/// Request to get an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetObjectRequest {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
}

impl GetObjectRequest {
    /// Create a new get object request.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

/// Request for object metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadObjectRequest {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
}

impl HeadObjectRequest {
    /// Create a new head object request.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

/// Request to copy an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyObjectRequest {
    /// Source object.
    pub source: CopySource,
    /// Destination bucket.
    pub dest_bucket: String,
    /// Destination key.
    pub dest_key: String,
    /// Canned ACL for the copy.
    pub acl: Option<CannedAcl>,
}

impl CopyObjectRequest {
    /// Create a new copy object request.
    pub fn new(
        source: CopySource,
        dest_bucket: impl Into<String>,
        dest_key: impl Into<String>,
    ) -> Self {
        Self {
            source,
            dest_bucket: dest_bucket.into(),
            dest_key: dest_key.into(),
            acl: None,
        }
    }

    /// Set canned ACL.
    pub fn with_acl(mut self, acl: CannedAcl) -> Self {
        self.acl = Some(acl);
        self
    }
}

/// Request to delete an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteObjectRequest {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
}

impl DeleteObjectRequest {
    /// Create a new delete object request.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

/// Request to list objects (ListObjectsV2 semantics).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListObjectsRequest {
    /// Bucket name.
    pub bucket: String,
    /// Prefix filter.
    pub prefix: Option<String>,
    /// Delimiter for hierarchy.
    pub delimiter: Option<String>,
    /// Maximum keys to return.
    pub max_keys: Option<u32>,
    /// Continuation token.
    pub continuation_token: Option<String>,
    /// Start after key.
    pub start_after: Option<String>,
}

impl ListObjectsRequest {
    /// Create a new list objects request.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }

    /// Set prefix filter.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set delimiter.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Set maximum keys.
    pub fn with_max_keys(mut self, max_keys: u32) -> Self {
        self.max_keys = Some(max_keys);
        self
    }

    /// Set continuation token.
    pub fn with_continuation_token(mut self, token: impl Into<String>) -> Self {
        self.continuation_token = Some(token.into());
        self
    }

    /// Set start-after key.
    pub fn with_start_after(mut self, start_after: impl Into<String>) -> Self {
        self.start_after = Some(start_after.into());
        self
    }
}

/// HTTP method of a presigned URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresignMethod {
    /// Download.
    Get,
    /// Upload.
    Put,
}

impl PresignMethod {
    /// Returns the HTTP method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PresignMethod::Get => "GET",
            PresignMethod::Put => "PUT",
        }
    }
}

/// Request to presign a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignRequest {
    /// HTTP method the URL authorizes.
    pub method: PresignMethod,
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Expiration duration (max 7 days).
    pub expires_in: Duration,
    /// Content type the upload must carry.
    pub content_type: Option<String>,
    /// Canned ACL the upload must carry.
    pub acl: Option<CannedAcl>,
}

impl PresignRequest {
    /// Create a presigned GET request.
    pub fn get(bucket: impl Into<String>, key: impl Into<String>, expires_in: Duration) -> Self {
        Self {
            method: PresignMethod::Get,
            bucket: bucket.into(),
            key: key.into(),
            expires_in,
            content_type: None,
            acl: None,
        }
    }

    /// Create a presigned PUT request.
    pub fn put(bucket: impl Into<String>, key: impl Into<String>, expires_in: Duration) -> Self {
        Self {
            method: PresignMethod::Put,
            ..Self::get(bucket, key, expires_in)
        }
    }

    /// Set content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set canned ACL.
    pub fn with_acl(mut self, acl: CannedAcl) -> Self {
        self.acl = Some(acl);
        self
    }
}
