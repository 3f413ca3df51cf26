//! ACL selection for writes.

use crate::types::CannedAcl;

/// Chooses the canned ACL for objects written to a bucket.
///
/// Objects in the configured public bucket are `public-read`; everything else
/// is `bucket-owner-full-control`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AclPolicy {
    public_bucket: Option<String>,
}

impl AclPolicy {
    /// Create a policy for the given public bucket, if any.
    pub fn new(public_bucket: Option<String>) -> Self {
        Self { public_bucket }
    }

    /// The configured public bucket.
    pub fn public_bucket(&self) -> Option<&str> {
        self.public_bucket.as_deref()
    }

    /// ACL for an object written to `bucket`.
    pub fn acl_for(&self, bucket: &str) -> CannedAcl {
        match &self.public_bucket {
            Some(public) if public == bucket => CannedAcl::PublicRead,
            _ => CannedAcl::BucketOwnerFullControl,
        }
    }
}
