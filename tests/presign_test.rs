//! Integration tests for presigned URL issuance.

use s3_gateway::mocks::{Operation, RecordedCall, TestFixtures};
use s3_gateway::{
    CannedAcl, GatewayConfig, GatewayError, PresignMethod, PresignRequest, RequestError,
    StorageCredentials,
};
use std::time::Duration;

const PUBLIC: &str = TestFixtures::PUBLIC_BUCKET;
const PRIVATE: &str = TestFixtures::PRIVATE_BUCKET;

fn last_presign(store: &s3_gateway::mocks::InMemoryObjectStore) -> PresignRequest {
    match store.last_call().unwrap() {
        RecordedCall::Presign(request) => request,
        other => panic!("unexpected call: {:?}", other),
    }
}

#[tokio::test]
async fn test_upload_url_defaults_to_one_hour() {
    let (gateway, store) = TestFixtures::gateway();

    let url = gateway
        .generate_upload_url(PRIVATE, "a.png", "image/png", None)
        .await
        .unwrap();

    assert_eq!(url.method, "PUT");
    assert!(url.url.contains("X-Amz-Expires=3600"));

    let request = last_presign(&store);
    assert_eq!(request.method, PresignMethod::Put);
    assert_eq!(request.expires_in, Duration::from_secs(3600));
    assert_eq!(request.content_type.as_deref(), Some("image/png"));
    assert_eq!(request.acl, Some(CannedAcl::BucketOwnerFullControl));
}

#[tokio::test]
async fn test_upload_url_explicit_expiry_overrides_default() {
    let (gateway, store) = TestFixtures::gateway();

    gateway
        .generate_upload_url(PRIVATE, "a.png", "image/png", Some(Duration::from_secs(60)))
        .await
        .unwrap();

    assert_eq!(last_presign(&store).expires_in, Duration::from_secs(60));
}

#[tokio::test]
async fn test_upload_url_public_bucket_signs_public_read() {
    let (gateway, _store) = TestFixtures::gateway();

    let url = gateway
        .generate_upload_url(PUBLIC, "a.png", "image/png", None)
        .await
        .unwrap();

    assert_eq!(
        url.signed_headers.get("x-amz-acl").map(String::as_str),
        Some("public-read")
    );
    assert_eq!(
        url.signed_headers.get("content-type").map(String::as_str),
        Some("image/png")
    );
    assert!(!url.is_expired());
}

#[tokio::test]
async fn test_upload_url_uses_configured_default_expiry() {
    let config = GatewayConfig::builder()
        .endpoint("http://localhost:9000")
        .credentials(StorageCredentials::new("AKID", "SECRET"))
        .upload_url_expiry(Duration::from_secs(120))
        .build()
        .unwrap();
    let (gateway, store) = TestFixtures::gateway_with_config(config);

    gateway
        .generate_upload_url(PRIVATE, "a.png", "image/png", None)
        .await
        .unwrap();

    assert_eq!(last_presign(&store).expires_in, Duration::from_secs(120));
}

#[tokio::test]
async fn test_upload_url_rejects_invalid_expiry() {
    let (gateway, store) = TestFixtures::gateway();

    for expiry in [Duration::ZERO, Duration::from_secs(7 * 24 * 3600 + 1)] {
        let err = gateway
            .generate_upload_url(PRIVATE, "a.png", "image/png", Some(expiry))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Request(RequestError::InvalidExpiry { .. })
        ));
    }
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn test_upload_url_accepts_seven_days() {
    let (gateway, _store) = TestFixtures::gateway();

    let result = gateway
        .generate_upload_url(
            PRIVATE,
            "a.png",
            "image/png",
            Some(Duration::from_secs(7 * 24 * 3600)),
        )
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_download_url_uses_fifteen_minutes() {
    let (gateway, store) = TestFixtures::gateway();

    let url = gateway.generate_download_url(PUBLIC, "a.png").await.unwrap();

    assert_eq!(url.method, "GET");
    let request = last_presign(&store);
    assert_eq!(request.method, PresignMethod::Get);
    assert_eq!(request.expires_in, Duration::from_secs(900));
    assert_eq!(request.acl, None);
    assert_eq!(request.content_type, None);
}

#[tokio::test]
async fn test_download_url_propagates_signing_failure() {
    let (gateway, store) = TestFixtures::gateway();
    store.fail_next(
        Operation::Presign,
        GatewayError::Presign(s3_gateway::PresignError::SigningFailed {
            bucket: PUBLIC.to_string(),
            key: "a.png".to_string(),
            message: "clock skew".to_string(),
        }),
    );

    let err = gateway.generate_download_url(PUBLIC, "a.png").await.unwrap_err();
    assert!(matches!(err, GatewayError::Presign(_)));
}

#[tokio::test]
async fn test_presign_rejects_empty_key() {
    let (gateway, store) = TestFixtures::gateway();

    assert!(gateway.generate_download_url(PUBLIC, "").await.is_err());
    assert!(gateway
        .generate_upload_url("", "a.png", "image/png", None)
        .await
        .is_err());
    assert_eq!(store.call_count(), 0);
}
