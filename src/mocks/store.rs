//! In-memory object store for testing.

use crate::error::{GatewayError, ObjectError};
use crate::store::ObjectStore;
use crate::types::*;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap, VecDeque};

const TOKEN_PREFIX: &str = "mock-token:";

/// Store operation, used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `put_object`.
    Put,
    /// `get_object`.
    Get,
    /// `head_object`.
    Head,
    /// `copy_object`.
    Copy,
    /// `delete_object`.
    Delete,
    /// `list_objects`.
    List,
    /// `presign`.
    Presign,
}

/// A request received by the store.
#[derive(Debug, Clone)]
pub enum RecordedCall {
    /// `put_object` call.
    Put(PutObjectRequest),
    /// `get_object` call.
    Get(GetObjectRequest),
    /// `head_object` call.
    Head(HeadObjectRequest),
    /// `copy_object` call.
    Copy(CopyObjectRequest),
    /// `delete_object` call.
    Delete(DeleteObjectRequest),
    /// `list_objects` call.
    List(ListObjectsRequest),
    /// `presign` call.
    Presign(PresignRequest),
}

impl RecordedCall {
    /// The operation this call belongs to.
    pub fn operation(&self) -> Operation {
        match self {
            RecordedCall::Put(_) => Operation::Put,
            RecordedCall::Get(_) => Operation::Get,
            RecordedCall::Head(_) => Operation::Head,
            RecordedCall::Copy(_) => Operation::Copy,
            RecordedCall::Delete(_) => Operation::Delete,
            RecordedCall::List(_) => Operation::List,
            RecordedCall::Presign(_) => Operation::Presign,
        }
    }
}

/// Object held by the in-memory store.
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Object body.
    pub body: Bytes,
    /// Content type.
    pub content_type: Option<String>,
    /// ACL the object was written with.
    pub acl: Option<CannedAcl>,
    /// Quoted MD5 hex of the body.
    pub e_tag: String,
    /// Write time.
    pub last_modified: DateTime<Utc>,
}

impl StoredObject {
    fn new(body: Bytes, content_type: Option<String>, acl: Option<CannedAcl>) -> Self {
        let e_tag = format!("\"{}\"", hex::encode(Md5::digest(&body)));
        Self {
            body,
            content_type,
            acl,
            e_tag,
            last_modified: Utc::now(),
        }
    }
}

/// In-memory [`ObjectStore`].
///
/// Objects live in per-bucket ordered maps. Every request is recorded, and
/// [`fail_next`](Self::fail_next) makes the next call of an operation
/// return the supplied error instead of running.
#[derive(Default)]
pub struct InMemoryObjectStore {
    buckets: RwLock<HashMap<String, BTreeMap<String, StoredObject>>>,
    calls: Mutex<Vec<RecordedCall>>,
    failures: Mutex<HashMap<Operation, VecDeque<GatewayError>>>,
}

impl InMemoryObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without recording a call.
    pub fn insert(
        &self,
        bucket: impl Into<String>,
        key: impl Into<String>,
        body: impl Into<Bytes>,
        content_type: Option<&str>,
    ) {
        self.buckets.write().entry(bucket.into()).or_default().insert(
            key.into(),
            StoredObject::new(body.into(), content_type.map(String::from), None),
        );
    }

    /// Look up a stored object.
    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.buckets
            .read()
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .cloned()
    }

    /// Check whether an object is stored.
    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.object(bucket, key).is_some()
    }

    /// Number of objects stored in a bucket.
    pub fn object_count(&self, bucket: &str) -> usize {
        self.buckets.read().get(bucket).map_or(0, BTreeMap::len)
    }

    /// Make the next call of `operation` fail with `error`.
    ///
    /// Multiple failures for the same operation are returned in order.
    pub fn fail_next(&self, operation: Operation, error: GatewayError) {
        self.failures
            .lock()
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    /// All recorded calls, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Recorded calls of one operation.
    pub fn calls_for(&self, operation: Operation) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.operation() == operation)
            .cloned()
            .collect()
    }

    /// The most recent call.
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().last().cloned()
    }

    /// Total number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Clear recorded calls.
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn begin(&self, call: RecordedCall) -> Result<(), GatewayError> {
        let operation = call.operation();
        self.calls.lock().push(call);
        match self
            .failures
            .lock()
            .get_mut(&operation)
            .and_then(VecDeque::pop_front)
        {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn require(&self, bucket: &str, key: &str) -> Result<StoredObject, GatewayError> {
        self.object(bucket, key).ok_or_else(|| {
            GatewayError::Object(ObjectError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
        })
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("buckets", &self.buckets.read().len())
            .field("calls", &self.calls.lock().len())
            .finish()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put_object(&self, request: PutObjectRequest) -> Result<PutObjectOutput, GatewayError> {
        self.begin(RecordedCall::Put(request.clone()))?;

        let object = StoredObject::new(request.body, request.content_type, request.acl);
        let e_tag = object.e_tag.clone();
        self.buckets
            .write()
            .entry(request.bucket)
            .or_default()
            .insert(request.key, object);

        Ok(PutObjectOutput {
            e_tag: Some(e_tag),
            version_id: None,
        })
    }

    async fn get_object(&self, request: GetObjectRequest) -> Result<GetObjectOutput, GatewayError> {
        self.begin(RecordedCall::Get(request.clone()))?;
        let object = self.require(&request.bucket, &request.key)?;

        Ok(GetObjectOutput {
            content_length: Some(object.body.len() as u64),
            body: object.body,
            content_type: object.content_type,
            e_tag: Some(object.e_tag),
            last_modified: Some(object.last_modified),
        })
    }

    async fn head_object(
        &self,
        request: HeadObjectRequest,
    ) -> Result<HeadObjectOutput, GatewayError> {
        self.begin(RecordedCall::Head(request.clone()))?;
        let object = self.require(&request.bucket, &request.key)?;

        Ok(HeadObjectOutput {
            content_type: object.content_type,
            content_length: Some(object.body.len() as u64),
            e_tag: Some(object.e_tag),
            last_modified: Some(object.last_modified),
            metadata: HashMap::new(),
        })
    }

    async fn copy_object(
        &self,
        request: CopyObjectRequest,
    ) -> Result<CopyObjectOutput, GatewayError> {
        self.begin(RecordedCall::Copy(request.clone()))?;
        let source = self.require(&request.source.bucket, &request.source.key)?;

        let copy = StoredObject::new(source.body, source.content_type, request.acl);
        let output = CopyObjectOutput {
            e_tag: Some(copy.e_tag.clone()),
            last_modified: Some(copy.last_modified),
            version_id: None,
            copy_source_version_id: None,
        };
        self.buckets
            .write()
            .entry(request.dest_bucket)
            .or_default()
            .insert(request.dest_key, copy);

        Ok(output)
    }

    async fn delete_object(
        &self,
        request: DeleteObjectRequest,
    ) -> Result<DeleteObjectOutput, GatewayError> {
        self.begin(RecordedCall::Delete(request.clone()))?;

        // Deleting a missing key succeeds, as it does on S3.
        if let Some(objects) = self.buckets.write().get_mut(&request.bucket) {
            objects.remove(&request.key);
        }

        Ok(DeleteObjectOutput::default())
    }

    async fn list_objects(
        &self,
        request: ListObjectsRequest,
    ) -> Result<ListObjectsOutput, GatewayError> {
        self.begin(RecordedCall::List(request.clone()))?;

        let prefix = request.prefix.clone().unwrap_or_default();
        let delimiter = request.delimiter.clone().filter(|d| !d.is_empty());
        let max_keys = request.max_keys.unwrap_or(LIST_PAGE_SIZE) as usize;

        // The continuation token wins over start_after, as on S3.
        let resume_after = match &request.continuation_token {
            Some(token) => Some(token.strip_prefix(TOKEN_PREFIX).unwrap_or(token).to_string()),
            None => request.start_after.clone(),
        };

        let buckets = self.buckets.read();
        let empty = BTreeMap::new();
        let objects = buckets.get(&request.bucket).unwrap_or(&empty);

        let mut contents = Vec::new();
        let mut common_prefixes: Vec<String> = Vec::new();
        let mut last_key: Option<String> = None;
        let mut is_truncated = false;

        let candidates = objects.iter().filter(|(key, _)| {
            key.starts_with(&prefix)
                && resume_after
                    .as_ref()
                    .map_or(true, |after| key.as_str() > after.as_str())
        });

        for (key, object) in candidates {
            let rolled_up = delimiter.as_ref().and_then(|d| {
                key[prefix.len()..]
                    .find(d.as_str())
                    .map(|pos| key[..prefix.len() + pos + d.len()].to_string())
            });

            if let Some(common) = &rolled_up {
                if common_prefixes.last() == Some(common) {
                    last_key = Some(key.clone());
                    continue;
                }
            }

            if contents.len() + common_prefixes.len() >= max_keys {
                is_truncated = true;
                break;
            }

            match rolled_up {
                Some(common) => common_prefixes.push(common),
                None => contents.push(ObjectSummary {
                    key: key.clone(),
                    size: Some(object.body.len() as u64),
                    e_tag: Some(object.e_tag.clone()),
                    last_modified: Some(object.last_modified),
                    storage_class: Some("STANDARD".to_string()),
                }),
            }
            last_key = Some(key.clone());
        }

        let key_count = (contents.len() + common_prefixes.len()) as u32;
        Ok(ListObjectsOutput {
            name: Some(request.bucket.clone()),
            prefix: request.prefix,
            delimiter: request.delimiter,
            max_keys: Some(max_keys as u32),
            key_count: Some(key_count),
            is_truncated,
            continuation_token: request.continuation_token,
            next_continuation_token: if is_truncated {
                last_key.map(|key| format!("{}{}", TOKEN_PREFIX, key))
            } else {
                None
            },
            start_after: request.start_after,
            contents,
            common_prefixes,
        })
    }

    async fn presign(&self, request: PresignRequest) -> Result<PresignedUrl, GatewayError> {
        self.begin(RecordedCall::Presign(request.clone()))?;

        let mut url = format!(
            "https://mock.storage.local/{}/{}?X-Amz-Expires={}&X-Amz-Signature=mock",
            request.bucket,
            request.key,
            request.expires_in.as_secs()
        );
        let mut signed_headers = HashMap::new();
        if let Some(acl) = request.acl {
            url.push_str(&format!("&x-amz-acl={}", acl.as_str()));
            signed_headers.insert("x-amz-acl".to_string(), acl.as_str().to_string());
        }
        if let Some(content_type) = &request.content_type {
            signed_headers.insert("content-type".to_string(), content_type.clone());
        }

        Ok(PresignedUrl {
            url,
            method: request.method.as_str().to_string(),
            expires_at: Utc::now()
                + chrono::Duration::seconds(request.expires_in.as_secs() as i64),
            signed_headers,
        })
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_head() {
        let store = InMemoryObjectStore::new();
        store
            .put_object(
                PutObjectRequest::new("bucket", "a.png", Bytes::from_static(b"png"))
                    .with_content_type("image/png"),
            )
            .await
            .unwrap();

        let head = store
            .head_object(HeadObjectRequest::new("bucket", "a.png"))
            .await
            .unwrap();
        assert_eq!(head.content_type.as_deref(), Some("image/png"));
        assert_eq!(head.content_length, Some(3));
        assert_eq!(store.call_count(), 2);
    }

    #[tokio::test]
    async fn test_etag_is_quoted_md5() {
        let store = InMemoryObjectStore::new();
        store.insert("bucket", "k", "hello", None);
        assert_eq!(
            store.object("bucket", "k").unwrap().e_tag,
            "\"5d41402abc4b2a76b9719d911017c592\""
        );
    }

    #[tokio::test]
    async fn test_injected_failure_is_one_shot() {
        let store = InMemoryObjectStore::new();
        store.insert("bucket", "k", "x", None);
        store.fail_next(
            Operation::Delete,
            GatewayError::Object(ObjectError::NotFound {
                bucket: "bucket".to_string(),
                key: "k".to_string(),
            }),
        );

        let request = DeleteObjectRequest::new("bucket", "k");
        assert!(store.delete_object(request.clone()).await.is_err());
        assert!(store.contains("bucket", "k"));
        assert!(store.delete_object(request).await.is_ok());
        assert!(!store.contains("bucket", "k"));
        assert_eq!(store.calls_for(Operation::Delete).len(), 2);
    }

    #[tokio::test]
    async fn test_list_with_slash_delimiter_rolls_up_folders() {
        let store = InMemoryObjectStore::new();
        store.insert("bucket", "photos/a.jpg", "a", None);
        store.insert("bucket", "photos/2024/b.jpg", "b", None);
        store.insert("bucket", "photos/2024/c.jpg", "c", None);
        store.insert("bucket", "videos/d.mp4", "d", None);

        let output = store
            .list_objects(
                ListObjectsRequest::new("bucket")
                    .with_prefix("photos/")
                    .with_delimiter("/"),
            )
            .await
            .unwrap();

        assert_eq!(output.common_prefixes, vec!["photos/2024/".to_string()]);
        assert_eq!(output.contents.len(), 1);
        assert_eq!(output.contents[0].key, "photos/a.jpg");
        assert_eq!(output.key_count, Some(2));
        assert!(!output.is_truncated);
    }

    #[tokio::test]
    async fn test_list_pagination_tokens() {
        let store = InMemoryObjectStore::new();
        for i in 0..5 {
            store.insert("bucket", format!("k{}", i), "x", None);
        }

        let first = store
            .list_objects(ListObjectsRequest::new("bucket").with_max_keys(2))
            .await
            .unwrap();
        assert!(first.is_truncated);
        let keys: Vec<_> = first.contents.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["k0", "k1"]);

        let token = first.next_continuation_token.unwrap();
        let second = store
            .list_objects(
                ListObjectsRequest::new("bucket")
                    .with_max_keys(2)
                    .with_continuation_token(token),
            )
            .await
            .unwrap();
        let keys: Vec<_> = second.contents.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["k2", "k3"]);

        let after = store
            .list_objects(ListObjectsRequest::new("bucket").with_start_after("k3"))
            .await
            .unwrap();
        assert_eq!(after.contents.len(), 1);
        assert!(after.next_continuation_token.is_none());
    }
}
