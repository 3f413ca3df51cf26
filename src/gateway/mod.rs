//! Object store gateway.
//!
//! [`ObjectStoreGateway`] is the single entry point a host application uses.
//! Each method forwards to one [`ObjectStore`] call (two for
//! [`move_object`](ObjectStoreGateway::move_object)).
//!
//! Error policy differs per operation:
//! - `upload_object` and `object_exists*` never fail; any error becomes
//!   `false` and is logged.
//! - Every other operation returns the provider error to the caller.
//!
//! Nothing is retried.

mod acl;
mod listing;
mod objects;
mod presign;

pub use acl::AclPolicy;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, RequestError};
use crate::store::{ObjectStore, SdkObjectStore};
use std::sync::Arc;

/// Convenience layer over an [`ObjectStore`].
///
/// Holds only immutable configuration and the store handle, so it can be
/// shared freely across tasks.
#[derive(Clone)]
pub struct ObjectStoreGateway {
    config: Arc<GatewayConfig>,
    store: Arc<dyn ObjectStore>,
    acl_policy: AclPolicy,
}

impl ObjectStoreGateway {
    /// Create a gateway over the given store.
    pub fn new(config: GatewayConfig, store: Arc<dyn ObjectStore>) -> Self {
        let acl_policy = AclPolicy::new(config.public_bucket.clone());
        Self {
            config: Arc::new(config),
            store,
            acl_policy,
        }
    }

    /// Create a gateway backed by the AWS SDK.
    pub fn from_config(config: GatewayConfig) -> Result<Self, GatewayError> {
        let store = SdkObjectStore::new(&config)?;
        Ok(Self::new(config, Arc::new(store)))
    }

    /// The gateway configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The ACL policy applied to writes.
    pub fn acl_policy(&self) -> &AclPolicy {
        &self.acl_policy
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }
}

impl std::fmt::Debug for ObjectStoreGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreGateway")
            .field("config", &self.config)
            .field("store", &self.store.name())
            .finish()
    }
}

fn validate_location(bucket: &str, key: &str) -> Result<(), GatewayError> {
    validate_bucket(bucket)?;
    if key.is_empty() {
        return Err(GatewayError::Request(RequestError::Validation {
            message: "object key must not be empty".to_string(),
        }));
    }
    Ok(())
}

fn validate_bucket(bucket: &str) -> Result<(), GatewayError> {
    if bucket.is_empty() {
        return Err(GatewayError::Request(RequestError::Validation {
            message: "bucket name must not be empty".to_string(),
        }));
    }
    Ok(())
}
