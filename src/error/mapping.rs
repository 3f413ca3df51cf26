//! Error code mapping from provider responses to typed errors.

use super::*;

/// Parsed provider error response.
#[derive(Debug, Clone, Default)]
pub struct ErrorResponse {
    /// Provider error code (e.g., "NoSuchKey").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Affected bucket, if known.
    pub bucket: Option<String>,
    /// Affected key, if known.
    pub key: Option<String>,
    /// HTTP status of the response, if one was received.
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a response for the given code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    /// Attach the bucket and key the request targeted.
    pub fn for_object(mut self, bucket: impl Into<String>, key: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self.key = Some(key.into());
        self
    }

    /// Attach the bucket the request targeted.
    pub fn for_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// Attach the HTTP status.
    pub fn with_status(mut self, status: Option<u16>) -> Self {
        self.status = status;
        self
    }
}

/// Map a provider error code to a typed error.
///
/// HEAD requests carry no error body, so an empty or generic code falls back
/// to the HTTP status.
pub fn map_error_code(code: &str, response: ErrorResponse) -> GatewayError {
    match code {
        "NoSuchBucket" => GatewayError::Bucket(BucketError::NotFound {
            bucket: response.bucket.unwrap_or_default(),
        }),
        "NoSuchKey" | "NotFound" => GatewayError::Object(ObjectError::NotFound {
            bucket: response.bucket.unwrap_or_default(),
            key: response.key.unwrap_or_default(),
        }),

        "AccessDenied" | "Forbidden" => GatewayError::Access(AccessError::AccessDenied {
            message: non_empty(response.message),
        }),
        "InvalidAccessKeyId" => GatewayError::Access(AccessError::InvalidAccessKeyId),
        "SignatureDoesNotMatch" => GatewayError::Access(AccessError::SignatureDoesNotMatch),
        "ExpiredToken" | "TokenRefreshRequired" => {
            GatewayError::Access(AccessError::ExpiredToken)
        }

        "InternalError" => GatewayError::Service(ServiceError::InternalError {
            message: response.message,
        }),
        "ServiceUnavailable" => GatewayError::Service(ServiceError::ServiceUnavailable {
            message: response.message,
        }),
        "SlowDown" => GatewayError::Service(ServiceError::SlowDown {
            message: response.message,
        }),

        _ => map_status(code, response),
    }
}

fn map_status(code: &str, response: ErrorResponse) -> GatewayError {
    match response.status {
        Some(404) => GatewayError::Object(ObjectError::NotFound {
            bucket: response.bucket.unwrap_or_default(),
            key: response.key.unwrap_or_default(),
        }),
        Some(403) => GatewayError::Access(AccessError::AccessDenied {
            message: non_empty(response.message),
        }),
        Some(503) => GatewayError::Service(ServiceError::ServiceUnavailable {
            message: response.message,
        }),
        status => GatewayError::Service(ServiceError::Unknown {
            code: if code.is_empty() {
                "Unknown".to_string()
            } else {
                code.to_string()
            },
            message: response.message,
            status,
        }),
    }
}

fn non_empty(message: String) -> Option<String> {
    if message.is_empty() {
        None
    } else {
        Some(message)
    }
}
