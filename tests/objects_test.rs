//! Integration tests for gateway object operations.

use s3_gateway::mocks::{Operation, RecordedCall, TestFixtures};
use s3_gateway::{CannedAcl, GatewayConfig, GatewayError, ObjectError, RequestError};

const PUBLIC: &str = TestFixtures::PUBLIC_BUCKET;
const PRIVATE: &str = TestFixtures::PRIVATE_BUCKET;

#[tokio::test]
async fn test_upload_to_public_bucket_is_public_read() {
    let (gateway, store) = TestFixtures::gateway();

    let uploaded = gateway
        .upload_object(TestFixtures::png_bytes(), "image/png", PUBLIC, "avatars/1.png")
        .await;

    assert!(uploaded);
    let object = store.object(PUBLIC, "avatars/1.png").unwrap();
    assert_eq!(object.acl, Some(CannedAcl::PublicRead));
    assert_eq!(object.content_type.as_deref(), Some("image/png"));
    assert_eq!(object.body.as_ref(), TestFixtures::png_bytes().as_slice());
}

#[tokio::test]
async fn test_upload_to_private_bucket_is_owner_controlled() {
    let (gateway, store) = TestFixtures::gateway();

    assert!(
        gateway
            .upload_object(b"%PDF-1.7".to_vec(), "application/pdf", PRIVATE, "docs/a.pdf")
            .await
    );

    let object = store.object(PRIVATE, "docs/a.pdf").unwrap();
    assert_eq!(object.acl, Some(CannedAcl::BucketOwnerFullControl));
}

#[tokio::test]
async fn test_upload_without_public_bucket_is_private_everywhere() {
    let config = GatewayConfig::builder()
        .endpoint("http://localhost:9000")
        .credentials(s3_gateway::StorageCredentials::new("AKID", "SECRET"))
        .build()
        .unwrap();
    let (gateway, store) = TestFixtures::gateway_with_config(config);

    assert!(gateway.upload_object(vec![1u8, 2, 3], "image/png", PUBLIC, "k").await);
    assert_eq!(
        store.object(PUBLIC, "k").unwrap().acl,
        Some(CannedAcl::BucketOwnerFullControl)
    );
}

#[tokio::test]
async fn test_upload_failure_returns_false() {
    let (gateway, store) = TestFixtures::gateway();
    store.fail_next(Operation::Put, TestFixtures::access_denied());

    let uploaded = gateway
        .upload_object(TestFixtures::png_bytes(), "image/png", PRIVATE, "a.png")
        .await;

    assert!(!uploaded);
    assert!(!store.contains(PRIVATE, "a.png"));
}

#[tokio::test]
async fn test_upload_network_failure_returns_false() {
    let (gateway, store) = TestFixtures::gateway();
    store.fail_next(Operation::Put, TestFixtures::network_failure());

    assert!(
        !gateway
            .upload_object(TestFixtures::png_bytes(), "image/png", PRIVATE, "a.png")
            .await
    );
}

#[tokio::test]
async fn test_upload_empty_key_never_reaches_store() {
    let (gateway, store) = TestFixtures::gateway();

    assert!(!gateway.upload_object(vec![1u8], "image/png", PRIVATE, "").await);
    assert!(!gateway.upload_object(vec![1u8], "image/png", "", "a.png").await);
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn test_exists_with_allowed_content_type() {
    let (gateway, store) = TestFixtures::gateway();
    store.insert(PRIVATE, "a.png", TestFixtures::png_bytes(), Some("image/png"));

    assert!(gateway.object_exists(PRIVATE, "a.png").await);
    assert_eq!(store.calls_for(Operation::Head).len(), 1);
}

#[tokio::test]
async fn test_exists_with_disallowed_content_type() {
    let (gateway, store) = TestFixtures::gateway();
    store.insert(PRIVATE, "a.txt", b"hello".to_vec(), Some("text/plain"));

    assert!(!gateway.object_exists(PRIVATE, "a.txt").await);
}

#[tokio::test]
async fn test_exists_without_content_type() {
    let (gateway, store) = TestFixtures::gateway();
    store.insert(PRIVATE, "blob", b"hello".to_vec(), None);

    assert!(!gateway.object_exists(PRIVATE, "blob").await);
}

#[tokio::test]
async fn test_exists_missing_object() {
    let (gateway, _store) = TestFixtures::gateway();

    assert!(!gateway.object_exists(PRIVATE, "missing.png").await);
}

#[tokio::test]
async fn test_exists_swallows_access_denied() {
    let (gateway, store) = TestFixtures::gateway();
    store.insert(PRIVATE, "a.png", TestFixtures::png_bytes(), Some("image/png"));
    store.fail_next(Operation::Head, TestFixtures::access_denied());

    assert!(!gateway.object_exists(PRIVATE, "a.png").await);
    // Failure was one-shot.
    assert!(gateway.object_exists(PRIVATE, "a.png").await);
}

#[tokio::test]
async fn test_exists_with_custom_content_types() {
    let (gateway, store) = TestFixtures::gateway();
    store.insert(PRIVATE, "notes.txt", b"hello".to_vec(), Some("text/plain"));

    assert!(
        gateway
            .object_exists_with_content_types(PRIVATE, "notes.txt", &["text/plain"])
            .await
    );
    assert!(
        !gateway
            .object_exists_with_content_types(PRIVATE, "notes.txt", &["image/png"])
            .await
    );
    let none: [&str; 0] = [];
    assert!(
        !gateway
            .object_exists_with_content_types(PRIVATE, "notes.txt", &none)
            .await
    );
}

#[tokio::test]
async fn test_exists_uses_configured_content_types() {
    let config = GatewayConfig::builder()
        .endpoint("http://localhost:9000")
        .credentials(s3_gateway::StorageCredentials::new("AKID", "SECRET"))
        .allowed_content_types(["text/csv"])
        .build()
        .unwrap();
    let (gateway, store) = TestFixtures::gateway_with_config(config);
    store.insert(PRIVATE, "a.csv", b"a,b".to_vec(), Some("text/csv"));
    store.insert(PRIVATE, "a.png", TestFixtures::png_bytes(), Some("image/png"));

    assert!(gateway.object_exists(PRIVATE, "a.csv").await);
    assert!(!gateway.object_exists(PRIVATE, "a.png").await);
}

#[tokio::test]
async fn test_copy_to_public_bucket() {
    let (gateway, store) = TestFixtures::gateway();
    store.insert(PRIVATE, "tmp/a.png", TestFixtures::png_bytes(), Some("image/png"));

    let output = gateway
        .copy_object("private-uploads/tmp/a.png", PUBLIC, "final/a.png")
        .await
        .unwrap();

    assert!(output.e_tag.is_some());
    let copy = store.object(PUBLIC, "final/a.png").unwrap();
    assert_eq!(copy.acl, Some(CannedAcl::PublicRead));
    assert_eq!(copy.content_type.as_deref(), Some("image/png"));
    assert!(store.contains(PRIVATE, "tmp/a.png"));

    match store.last_call().unwrap() {
        RecordedCall::Copy(request) => {
            assert_eq!(request.source.bucket, PRIVATE);
            assert_eq!(request.source.key, "tmp/a.png");
            assert_eq!(request.acl, Some(CannedAcl::PublicRead));
        }
        other => panic!("unexpected call: {:?}", other),
    }
}

#[tokio::test]
async fn test_copy_accepts_leading_slash() {
    let (gateway, store) = TestFixtures::gateway();
    store.insert(PRIVATE, "a.png", TestFixtures::png_bytes(), Some("image/png"));

    gateway
        .copy_object("/private-uploads/a.png", PRIVATE, "b.png")
        .await
        .unwrap();

    assert!(store.contains(PRIVATE, "b.png"));
    assert_eq!(
        store.object(PRIVATE, "b.png").unwrap().acl,
        Some(CannedAcl::BucketOwnerFullControl)
    );
}

#[tokio::test]
async fn test_copy_malformed_source_never_reaches_store() {
    let (gateway, store) = TestFixtures::gateway();

    for source in ["no-slash", "/", "bucket/", "/key-only"] {
        let result = gateway.copy_object(source, PRIVATE, "b.png").await;
        assert!(
            matches!(
                result,
                Err(GatewayError::Request(RequestError::InvalidCopySource { .. }))
            ),
            "source {:?} should be rejected",
            source
        );
    }
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn test_copy_missing_source_propagates_not_found() {
    let (gateway, _store) = TestFixtures::gateway();

    let err = gateway
        .copy_object("private-uploads/missing.png", PUBLIC, "b.png")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_copy_propagates_access_denied() {
    let (gateway, store) = TestFixtures::gateway();
    store.insert(PRIVATE, "a.png", TestFixtures::png_bytes(), Some("image/png"));
    store.fail_next(Operation::Copy, TestFixtures::access_denied());

    let err = gateway
        .copy_object("private-uploads/a.png", PUBLIC, "a.png")
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(403));
}

#[tokio::test]
async fn test_move_copies_then_deletes() {
    let (gateway, store) = TestFixtures::gateway();
    store.insert(PRIVATE, "tmp/a.png", TestFixtures::png_bytes(), Some("image/png"));

    let moved = gateway
        .move_object("tmp/a.png", PRIVATE, PUBLIC, "a.png")
        .await
        .unwrap();

    assert!(moved);
    assert!(!store.contains(PRIVATE, "tmp/a.png"));
    assert!(store.contains(PUBLIC, "a.png"));
    assert_eq!(
        store.object(PUBLIC, "a.png").unwrap().acl,
        Some(CannedAcl::PublicRead)
    );

    let operations: Vec<Operation> = store.calls().iter().map(|c| c.operation()).collect();
    assert_eq!(operations, vec![Operation::Copy, Operation::Delete]);

    match &store.calls_for(Operation::Copy)[0] {
        RecordedCall::Copy(request) => {
            assert_eq!(request.source.bucket, PRIVATE);
            assert_eq!(request.source.key, "tmp/a.png");
            assert_eq!(request.dest_bucket, PUBLIC);
            assert_eq!(request.acl, Some(CannedAcl::PublicRead));
        }
        other => panic!("unexpected call: {:?}", other),
    }
}

#[tokio::test]
async fn test_move_into_private_bucket_is_owner_controlled() {
    let (gateway, store) = TestFixtures::gateway();
    store.insert(PUBLIC, "a.png", TestFixtures::png_bytes(), Some("image/png"));

    assert!(gateway
        .move_object("a.png", PUBLIC, PRIVATE, "archive/a.png")
        .await
        .unwrap());

    assert!(!store.contains(PUBLIC, "a.png"));
    assert_eq!(
        store.object(PRIVATE, "archive/a.png").unwrap().acl,
        Some(CannedAcl::BucketOwnerFullControl)
    );

    match &store.calls_for(Operation::Copy)[0] {
        RecordedCall::Copy(request) => {
            assert_eq!(request.dest_bucket, PRIVATE);
            assert_eq!(request.acl, Some(CannedAcl::BucketOwnerFullControl));
        }
        other => panic!("unexpected call: {:?}", other),
    }
}

#[tokio::test]
async fn test_move_copy_failure_skips_delete() {
    let (gateway, store) = TestFixtures::gateway();
    store.insert(PRIVATE, "a.png", TestFixtures::png_bytes(), Some("image/png"));
    store.fail_next(Operation::Copy, TestFixtures::network_failure());

    let err = gateway
        .move_object("a.png", PRIVATE, PUBLIC, "a.png")
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Network(_)));
    assert!(store.calls_for(Operation::Delete).is_empty());
    assert!(store.contains(PRIVATE, "a.png"));
    assert!(!store.contains(PUBLIC, "a.png"));
}

#[tokio::test]
async fn test_move_delete_failure_reports_incomplete() {
    let (gateway, store) = TestFixtures::gateway();
    store.insert(PRIVATE, "a.png", TestFixtures::png_bytes(), Some("image/png"));
    store.fail_next(Operation::Delete, TestFixtures::access_denied());

    let err = gateway
        .move_object("a.png", PRIVATE, PUBLIC, "b.png")
        .await
        .unwrap_err();

    match &err {
        GatewayError::Object(ObjectError::MoveIncomplete {
            source_bucket,
            source_key,
            dest_bucket,
            dest_key,
            cause,
        }) => {
            assert_eq!(source_bucket, PRIVATE);
            assert_eq!(source_key, "a.png");
            assert_eq!(dest_bucket, PUBLIC);
            assert_eq!(dest_key, "b.png");
            assert!(matches!(**cause, GatewayError::Access(_)));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // Both copies remain.
    assert!(store.contains(PRIVATE, "a.png"));
    assert!(store.contains(PUBLIC, "b.png"));
}

#[tokio::test]
async fn test_move_missing_source() {
    let (gateway, store) = TestFixtures::gateway();

    let err = gateway
        .move_object("missing.png", PRIVATE, PUBLIC, "a.png")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(store.calls_for(Operation::Delete).is_empty());
}

#[tokio::test]
async fn test_delete_existing_and_missing() {
    let (gateway, store) = TestFixtures::gateway();
    store.insert(PRIVATE, "a.png", TestFixtures::png_bytes(), Some("image/png"));

    assert!(gateway.delete_object(PRIVATE, "a.png").await.unwrap());
    assert!(!store.contains(PRIVATE, "a.png"));

    // No existence check before deleting.
    assert!(gateway.delete_object(PRIVATE, "a.png").await.unwrap());
    assert!(store.calls_for(Operation::Head).is_empty());
}

#[tokio::test]
async fn test_delete_propagates_errors() {
    let (gateway, store) = TestFixtures::gateway();
    store.fail_next(Operation::Delete, TestFixtures::access_denied());

    let err = gateway.delete_object(PRIVATE, "a.png").await.unwrap_err();
    assert!(matches!(err, GatewayError::Access(_)));
}

#[tokio::test]
async fn test_delete_empty_key_is_validation_error() {
    let (gateway, store) = TestFixtures::gateway();

    let err = gateway.delete_object(PRIVATE, "").await.unwrap_err();
    assert!(matches!(
        err,
        GatewayError::Request(RequestError::Validation { .. })
    ));
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn test_download_object() {
    let (gateway, store) = TestFixtures::gateway();
    store.insert(PUBLIC, "a.png", TestFixtures::png_bytes(), Some("image/png"));

    let output = gateway.download_object(PUBLIC, "a.png").await.unwrap();

    assert_eq!(output.body.as_ref(), TestFixtures::png_bytes().as_slice());
    assert_eq!(output.content_type.as_deref(), Some("image/png"));
    assert_eq!(output.content_length, Some(8));
}

#[tokio::test]
async fn test_download_missing_object() {
    let (gateway, _store) = TestFixtures::gateway();

    let err = gateway.download_object(PUBLIC, "missing").await.unwrap_err();
    assert!(err.is_not_found());
}
