//! Listing.

use super::{validate_bucket, ObjectStoreGateway};
use crate::error::GatewayError;
use crate::types::{ListObjectsOutput, ListObjectsRequest, LIST_PAGE_SIZE};
use futures::stream::{self, Stream};
use tracing::debug;

impl ObjectStoreGateway {
    /// List one page (up to 1000 keys) under `prefix`.
    ///
    /// Empty tokens are treated as absent. The delimiter follows the
    /// configured [`ListDelimiter`](crate::types::ListDelimiter).
    pub async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<&str>,
        start_after: Option<&str>,
    ) -> Result<ListObjectsOutput, GatewayError> {
        validate_bucket(bucket)?;

        let request = self.list_request(bucket, prefix, continuation_token, start_after);
        debug!(
            bucket,
            prefix,
            delimiter = ?request.delimiter,
            continuation_token = ?request.continuation_token,
            start_after = ?request.start_after,
            "Listing objects"
        );

        self.store.list_objects(request).await
    }

    /// Every page under `prefix`, following continuation tokens.
    ///
    /// The stream ends after the first error.
    pub fn list_all_objects<'a>(
        &'a self,
        bucket: &'a str,
        prefix: &'a str,
    ) -> impl Stream<Item = Result<ListObjectsOutput, GatewayError>> + Send + 'a {
        // None once the last page has been yielded.
        let initial: Option<Option<String>> = Some(None);

        stream::try_unfold(initial, move |state| async move {
            let Some(token) = state else {
                return Ok::<_, GatewayError>(None);
            };

            let page = self
                .list_objects(bucket, prefix, token.as_deref(), None)
                .await?;

            let next = match (&page.next_continuation_token, page.is_truncated) {
                (Some(next), true) if !next.is_empty() => Some(Some(next.clone())),
                _ => None,
            };

            Ok::<_, GatewayError>(Some((page, next)))
        })
    }

    fn list_request(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<&str>,
        start_after: Option<&str>,
    ) -> ListObjectsRequest {
        let mut request = ListObjectsRequest::new(bucket)
            .with_prefix(prefix)
            .with_max_keys(LIST_PAGE_SIZE);

        if let Some(delimiter) = self.config.list_delimiter.resolve(prefix) {
            request = request.with_delimiter(delimiter);
        }
        if let Some(token) = continuation_token.filter(|t| !t.is_empty()) {
            request = request.with_continuation_token(token);
        }
        if let Some(start_after) = start_after.filter(|s| !s.is_empty()) {
            request = request.with_start_after(start_after);
        }

        request
    }
}
