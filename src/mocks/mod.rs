//! Mock implementations for testing.
//!
//! This module provides an in-memory object store and fixtures for exercising
//! the gateway without a provider.

mod store;

pub use store::{InMemoryObjectStore, Operation, RecordedCall, StoredObject};

use crate::config::GatewayConfig;
use crate::credentials::StorageCredentials;
use crate::error::{AccessError, GatewayError, NetworkError};
use crate::gateway::ObjectStoreGateway;
use std::sync::Arc;

/// Test fixtures for gateway operations.
pub struct TestFixtures;

impl TestFixtures {
    /// Name of the public bucket in [`config`](Self::config).
    pub const PUBLIC_BUCKET: &'static str = "public-assets";

    /// A private bucket.
    pub const PRIVATE_BUCKET: &'static str = "private-uploads";

    /// Configuration with a public bucket and static credentials.
    pub fn config() -> GatewayConfig {
        GatewayConfig::builder()
            .endpoint("http://localhost:9000")
            .region("eu-west-1")
            .path_style(true)
            .public_bucket(Self::PUBLIC_BUCKET)
            .credentials(StorageCredentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG"))
            .build()
            .expect("fixture config is valid")
    }

    /// A gateway over a fresh in-memory store, returning both.
    pub fn gateway() -> (ObjectStoreGateway, Arc<InMemoryObjectStore>) {
        Self::gateway_with_config(Self::config())
    }

    /// A gateway over a fresh in-memory store with the given configuration.
    pub fn gateway_with_config(
        config: GatewayConfig,
    ) -> (ObjectStoreGateway, Arc<InMemoryObjectStore>) {
        let store = Arc::new(InMemoryObjectStore::new());
        let gateway = ObjectStoreGateway::new(config, store.clone());
        (gateway, store)
    }

    /// A small PNG header, enough to stand in for an image upload.
    pub fn png_bytes() -> Vec<u8> {
        vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]
    }

    /// Provider access-denied error.
    pub fn access_denied() -> GatewayError {
        GatewayError::Access(AccessError::AccessDenied {
            message: Some("Access Denied".to_string()),
        })
    }

    /// Connection failure.
    pub fn network_failure() -> GatewayError {
        GatewayError::Network(NetworkError::DispatchFailed {
            message: "connection refused".to_string(),
        })
    }
}
