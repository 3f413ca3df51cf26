//! Common types shared across operations.

use crate::error::{GatewayError, RequestError};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content types accepted by the existence check unless configured otherwise.
pub const DEFAULT_VALID_CONTENT_TYPES: &[&str] = &[
    "image/gif",
    "image/jpeg",
    "image/png",
    "image/webp",
    "video/mp4",
    "application/pdf",
];

/// Fixed page size for listings.
pub const LIST_PAGE_SIZE: u32 = 1000;

/// Characters escaped when rendering a copy source.
///
/// Matches `encodeURI`: reserved URI characters and `/` are left alone.
const COPY_SOURCE_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Canned ACL for objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CannedAcl {
    /// Owner gets FULL_CONTROL. No one else has access rights.
    #[default]
    Private,
    /// Owner gets FULL_CONTROL. Everyone else gets READ access.
    PublicRead,
    /// Owner gets FULL_CONTROL. Everyone else gets READ and WRITE access.
    PublicReadWrite,
    /// Owner gets FULL_CONTROL. Authenticated users get READ access.
    AuthenticatedRead,
    /// Object owner gets FULL_CONTROL. Bucket owner gets READ access.
    BucketOwnerRead,
    /// Both object and bucket owners get FULL_CONTROL.
    BucketOwnerFullControl,
}

impl CannedAcl {
    /// Returns the wire string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CannedAcl::Private => "private",
            CannedAcl::PublicRead => "public-read",
            CannedAcl::PublicReadWrite => "public-read-write",
            CannedAcl::AuthenticatedRead => "authenticated-read",
            CannedAcl::BucketOwnerRead => "bucket-owner-read",
            CannedAcl::BucketOwnerFullControl => "bucket-owner-full-control",
        }
    }
}

impl fmt::Display for CannedAcl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source object of a server-side copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CopySource {
    /// Source bucket.
    pub bucket: String,
    /// Source key.
    pub key: String,
}

impl CopySource {
    /// Create a copy source from its parts.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parse a `bucket/key` reference. A leading `/` is ignored.
    pub fn parse(source: &str) -> Result<Self, GatewayError> {
        let trimmed = source.strip_prefix('/').unwrap_or(source);
        match trimmed.split_once('/') {
            Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => {
                Ok(Self::new(bucket, key))
            }
            _ => Err(GatewayError::Request(RequestError::InvalidCopySource {
                source_ref: source.to_string(),
            })),
        }
    }

    /// Render as the provider's `x-amz-copy-source` value.
    pub fn encoded(&self) -> String {
        let raw = format!("{}/{}", self.bucket, self.key);
        utf8_percent_encode(&raw, COPY_SOURCE_ENCODE_SET).to_string()
    }
}

impl fmt::Display for CopySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Delimiter sent with listing requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListDelimiter {
    /// Use the listing prefix itself as the delimiter.
    #[default]
    Prefix,
    /// Use `/`, grouping keys into folder-like common prefixes.
    Slash,
    /// Send no delimiter.
    None,
}

impl ListDelimiter {
    /// Resolve the delimiter for a listing under `prefix`.
    ///
    /// An empty prefix resolves to no delimiter in `Prefix` mode.
    pub fn resolve(&self, prefix: &str) -> Option<String> {
        match self {
            ListDelimiter::Prefix if !prefix.is_empty() => Some(prefix.to_string()),
            ListDelimiter::Prefix | ListDelimiter::None => None,
            ListDelimiter::Slash => Some("/".to_string()),
        }
    }

    /// Parse a configuration value (`prefix`, `slash` or `none`).
    pub fn from_config_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "prefix" => Some(ListDelimiter::Prefix),
            "slash" | "/" => Some(ListDelimiter::Slash),
            "none" | "" => Some(ListDelimiter::None),
            _ => None,
        }
    }
}

/// Object entry from a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSummary {
    /// Object key.
    pub key: String,
    /// Size in bytes.
    pub size: Option<u64>,
    /// ETag (entity tag).
    pub e_tag: Option<String>,
    /// Last modified time.
    pub last_modified: Option<chrono::DateTime<chrono::Utc>>,
    /// Storage class as reported by the provider.
    pub storage_class: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_canned_acl_as_str() {
        assert_eq!(CannedAcl::Private.as_str(), "private");
        assert_eq!(CannedAcl::PublicRead.as_str(), "public-read");
        assert_eq!(
            CannedAcl::BucketOwnerFullControl.as_str(),
            "bucket-owner-full-control"
        );
        assert_eq!(CannedAcl::PublicRead.to_string(), "public-read");
    }

    #[test]
    fn test_canned_acl_serde() {
        let json = serde_json::to_string(&CannedAcl::BucketOwnerFullControl).unwrap();
        assert_eq!(json, "\"bucket-owner-full-control\"");
    }

    #[test_case("media/avatars/a.png", "media", "avatars/a.png")]
    #[test_case("/media/a.png", "media", "a.png")]
    #[test_case("b/k/", "b", "k/")]
    fn test_copy_source_parse(input: &str, bucket: &str, key: &str) {
        let source = CopySource::parse(input).unwrap();
        assert_eq!(source.bucket, bucket);
        assert_eq!(source.key, key);
    }

    #[test_case("no-slash")]
    #[test_case("/key-only")]
    #[test_case("bucket/")]
    #[test_case("")]
    fn test_copy_source_parse_invalid(input: &str) {
        let err = CopySource::parse(input).unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Request(RequestError::InvalidCopySource { .. })
        ));
    }

    #[test_case("media", "plain/key.png", "media/plain/key.png")]
    #[test_case("media", "with space.png", "media/with%20space.png")]
    #[test_case("media", "a+b=c&d.png", "media/a+b=c&d.png")]
    #[test_case("media", "100%.png", "media/100%25.png")]
    #[test_case("media", "café.png", "media/caf%C3%A9.png")]
    fn test_copy_source_encoding(bucket: &str, key: &str, expected: &str) {
        assert_eq!(CopySource::new(bucket, key).encoded(), expected);
    }

    #[test]
    fn test_list_delimiter_resolve() {
        assert_eq!(
            ListDelimiter::Prefix.resolve("photos/"),
            Some("photos/".to_string())
        );
        assert_eq!(ListDelimiter::Prefix.resolve(""), None);
        assert_eq!(ListDelimiter::Slash.resolve("photos/"), Some("/".to_string()));
        assert_eq!(ListDelimiter::None.resolve("photos/"), None);
    }

    #[test_case("prefix", Some(ListDelimiter::Prefix))]
    #[test_case("SLASH", Some(ListDelimiter::Slash))]
    #[test_case("none", Some(ListDelimiter::None))]
    #[test_case("comma", None)]
    fn test_list_delimiter_config_value(value: &str, expected: Option<ListDelimiter>) {
        assert_eq!(ListDelimiter::from_config_value(value), expected);
    }
}
