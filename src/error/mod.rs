//! Error types for the storage gateway.
//!
//! Errors are grouped by source so callers can tell a bad argument from a
//! missing object or an unreachable provider. Provider error codes are turned
//! into these variants by [`map_error_code`].

mod mapping;

pub use mapping::{map_error_code, ErrorResponse};

use thiserror::Error;

/// Top-level error type for gateway and store operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Credential-related errors.
    #[error("Credentials error: {0}")]
    Credentials(#[from] CredentialsError),

    /// Request validation errors.
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// Bucket-level errors.
    #[error("Bucket error: {0}")]
    Bucket(#[from] BucketError),

    /// Object operation errors.
    #[error("Object error: {0}")]
    Object(#[from] ObjectError),

    /// Access and authorization errors.
    #[error("Access error: {0}")]
    Access(#[from] AccessError),

    /// Network and transport errors.
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Provider-side errors.
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// URL presigning errors.
    #[error("Presign error: {0}")]
    Presign(#[from] PresignError),
}

impl GatewayError {
    /// Returns true if the error means the bucket or object does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GatewayError::Object(ObjectError::NotFound { .. })
                | GatewayError::Bucket(BucketError::NotFound { .. })
        )
    }

    /// Returns true if repeating the call could succeed.
    ///
    /// The gateway never retries on its own; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Network(_) => true,
            GatewayError::Service(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Returns the HTTP status code if applicable.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GatewayError::Request(_) => Some(400),
            GatewayError::Access(_) => Some(403),
            GatewayError::Bucket(BucketError::NotFound { .. }) => Some(404),
            GatewayError::Object(ObjectError::NotFound { .. }) => Some(404),
            GatewayError::Object(ObjectError::MoveIncomplete { cause, .. }) => {
                cause.status_code()
            }
            GatewayError::Service(e) => e.status_code(),
            _ => None,
        }
    }

    /// Returns the provider error code if available.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            GatewayError::Bucket(e) => Some(e.code()),
            GatewayError::Object(ObjectError::NotFound { .. }) => Some("NoSuchKey"),
            GatewayError::Object(ObjectError::MoveIncomplete { cause, .. }) => cause.error_code(),
            GatewayError::Access(e) => Some(e.code()),
            GatewayError::Service(e) => Some(e.code()),
            _ => None,
        }
    }
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Invalid endpoint URL.
    #[error("Invalid endpoint URL: {url} ({details})")]
    InvalidEndpoint {
        /// The invalid URL.
        url: String,
        /// Details about the parse failure.
        details: String,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {field} - {message}")]
    InvalidConfiguration {
        /// The configuration field name.
        field: String,
        /// Error message.
        message: String,
    },
}

/// Credential-related errors.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// No credentials could be found.
    #[error("Credentials not found: {message}")]
    NotFound {
        /// Where the lookup happened.
        message: String,
    },

    /// Credentials are present but unusable.
    #[error("Invalid credentials: {message}")]
    Invalid {
        /// Details about why credentials are invalid.
        message: String,
    },
}

/// Request validation errors, raised before contacting the provider.
#[derive(Debug, Error)]
pub enum RequestError {
    /// General validation error.
    #[error("Validation error: {message}")]
    Validation {
        /// Details about the validation error.
        message: String,
    },

    /// Copy source is not of the form `bucket/key`.
    #[error("Invalid copy source '{source_ref}': expected 'bucket/key'")]
    InvalidCopySource {
        /// The rejected source reference.
        source_ref: String,
    },

    /// Presigned URL expiry out of range.
    #[error("Invalid expiry of {seconds}s: must be between 1 and {max_seconds} seconds")]
    InvalidExpiry {
        /// Requested expiry.
        seconds: u64,
        /// Maximum allowed expiry.
        max_seconds: u64,
    },
}

/// Bucket-level errors.
#[derive(Debug, Error)]
pub enum BucketError {
    /// Bucket not found.
    #[error("Bucket not found: '{bucket}'")]
    NotFound {
        /// The bucket name.
        bucket: String,
    },
}

impl BucketError {
    /// Returns the provider error code.
    pub fn code(&self) -> &str {
        match self {
            BucketError::NotFound { .. } => "NoSuchBucket",
        }
    }
}

/// Object operation errors.
#[derive(Debug, Error)]
pub enum ObjectError {
    /// Object not found.
    #[error("Object not found: '{bucket}/{key}'")]
    NotFound {
        /// The bucket name.
        bucket: String,
        /// The object key.
        key: String,
    },

    /// The copy step of a move succeeded but deleting the source failed.
    ///
    /// The object now exists at both locations.
    #[error(
        "Move incomplete: '{source_bucket}/{source_key}' was copied to \
         '{dest_bucket}/{dest_key}' but the source could not be deleted: {cause}"
    )]
    MoveIncomplete {
        /// Source bucket, still holding the object.
        source_bucket: String,
        /// Source key.
        source_key: String,
        /// Destination bucket.
        dest_bucket: String,
        /// Destination key.
        dest_key: String,
        /// The delete failure.
        #[source]
        cause: Box<GatewayError>,
    },
}

/// Access and authorization errors.
#[derive(Debug, Error)]
pub enum AccessError {
    /// Access denied.
    #[error("Access denied: {}", .message.as_deref().unwrap_or("no details"))]
    AccessDenied {
        /// Provider message, if any.
        message: Option<String>,
    },

    /// Access key is not recognized.
    #[error("Invalid access key ID")]
    InvalidAccessKeyId,

    /// Request signature does not match.
    #[error("Signature does not match")]
    SignatureDoesNotMatch,

    /// Session token expired.
    #[error("Token expired")]
    ExpiredToken,
}

impl AccessError {
    /// Returns the provider error code.
    pub fn code(&self) -> &str {
        match self {
            AccessError::AccessDenied { .. } => "AccessDenied",
            AccessError::InvalidAccessKeyId => "InvalidAccessKeyId",
            AccessError::SignatureDoesNotMatch => "SignatureDoesNotMatch",
            AccessError::ExpiredToken => "ExpiredToken",
        }
    }
}

/// Network and transport errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Request could not be dispatched.
    #[error("Dispatch failed: {message}")]
    DispatchFailed {
        /// Details.
        message: String,
    },

    /// Request timed out.
    #[error("Timeout: {message}")]
    Timeout {
        /// Details.
        message: String,
    },

    /// Response body could not be read.
    #[error("Body read failed: {message}")]
    BodyRead {
        /// Details.
        message: String,
    },
}

/// Provider-side errors.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Internal provider error.
    #[error("Internal error: {message}")]
    InternalError {
        /// Provider message.
        message: String,
    },

    /// Provider temporarily unavailable.
    #[error("Service unavailable: {message}")]
    ServiceUnavailable {
        /// Provider message.
        message: String,
    },

    /// Request rate too high.
    #[error("Slow down: {message}")]
    SlowDown {
        /// Provider message.
        message: String,
    },

    /// Error that does not map to a known category.
    #[error("Unknown error ({code}, status {status:?}): {message}")]
    Unknown {
        /// Provider error code.
        code: String,
        /// Provider message.
        message: String,
        /// HTTP status code, if a response was received.
        status: Option<u16>,
    },
}

impl ServiceError {
    /// Returns the provider error code.
    pub fn code(&self) -> &str {
        match self {
            ServiceError::InternalError { .. } => "InternalError",
            ServiceError::ServiceUnavailable { .. } => "ServiceUnavailable",
            ServiceError::SlowDown { .. } => "SlowDown",
            ServiceError::Unknown { code, .. } => code,
        }
    }

    /// Returns the HTTP status code.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ServiceError::InternalError { .. } => Some(500),
            ServiceError::ServiceUnavailable { .. } | ServiceError::SlowDown { .. } => Some(503),
            ServiceError::Unknown { status, .. } => *status,
        }
    }

    /// Returns true if the error is transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::InternalError { .. }
            | ServiceError::ServiceUnavailable { .. }
            | ServiceError::SlowDown { .. } => true,
            ServiceError::Unknown { status, .. } => matches!(status, Some(500..=599)),
        }
    }
}

/// URL presigning errors.
#[derive(Debug, Error)]
pub enum PresignError {
    /// The provider refused to sign the request.
    #[error("Signing failed for '{bucket}/{key}': {message}")]
    SigningFailed {
        /// The bucket name.
        bucket: String,
        /// The object key.
        key: String,
        /// Details.
        message: String,
    },
}
