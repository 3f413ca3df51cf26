//! Configuration types for the gateway.
//!
//! [`GatewayConfig`] carries both the provider connection settings (endpoint,
//! region, credentials, addressing style) and the gateway policy (public
//! bucket, URL expiries, listing delimiter, accepted content types).

use crate::credentials::{
    CredentialsProvider, EnvCredentialsProvider, StaticCredentialsProvider, StorageCredentials,
    AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY, AWS_SESSION_TOKEN, STORAGE_ACCESS_KEY,
    STORAGE_SECRET_KEY, STORAGE_SESSION_TOKEN,
};
use crate::error::{ConfigurationError, GatewayError};
use crate::types::{ListDelimiter, DEFAULT_VALID_CONTENT_TYPES};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://s3.eu-west-1.wasabisys.com";

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "eu-west-1";

/// Default lifetime of presigned upload URLs.
pub const DEFAULT_UPLOAD_URL_EXPIRY: Duration = Duration::from_secs(3600);

/// Default lifetime of presigned download URLs.
pub const DEFAULT_DOWNLOAD_URL_EXPIRY: Duration = Duration::from_secs(900);

/// Longest lifetime a presigned URL may have (7 days).
pub const MAX_PRESIGN_EXPIRY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Gateway configuration.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Provider region (e.g., "eu-west-1").
    pub region: String,

    /// Provider endpoint URL.
    pub endpoint: Url,

    /// Credentials provider.
    pub credentials_provider: Arc<dyn CredentialsProvider>,

    /// Use path-style addressing instead of virtual-hosted style.
    pub path_style: bool,

    /// Bucket whose objects are written `public-read`.
    pub public_bucket: Option<String>,

    /// Lifetime of presigned upload URLs when the caller gives none.
    pub upload_url_expiry: Duration,

    /// Lifetime of presigned download URLs.
    pub download_url_expiry: Duration,

    /// Delimiter policy for listings.
    pub list_delimiter: ListDelimiter,

    /// Content types accepted by the existence check.
    pub allowed_content_types: Vec<String>,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint.as_str())
            .field("credentials_provider", &self.credentials_provider.name())
            .field("path_style", &self.path_style)
            .field("public_bucket", &self.public_bucket)
            .field("upload_url_expiry", &self.upload_url_expiry)
            .field("download_url_expiry", &self.download_url_expiry)
            .field("list_delimiter", &self.list_delimiter)
            .field("allowed_content_types", &self.allowed_content_types)
            .finish()
    }
}

impl GatewayConfig {
    /// Create a new configuration builder.
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::default()
    }
}

/// Builder for gateway configuration.
#[derive(Default)]
pub struct GatewayConfigBuilder {
    region: Option<String>,
    endpoint: Option<String>,
    credentials_provider: Option<Arc<dyn CredentialsProvider>>,
    path_style: Option<bool>,
    public_bucket: Option<String>,
    upload_url_expiry: Option<Duration>,
    download_url_expiry: Option<Duration>,
    list_delimiter: Option<ListDelimiter>,
    allowed_content_types: Option<Vec<String>>,
    errors: Vec<ConfigurationError>,
}

impl GatewayConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the endpoint. A missing scheme defaults to `https://`.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the credentials provider.
    pub fn credentials_provider(mut self, provider: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials_provider = Some(provider);
        self
    }

    /// Use fixed credentials.
    pub fn credentials(self, credentials: StorageCredentials) -> Self {
        self.credentials_provider(Arc::new(StaticCredentialsProvider::new(credentials)))
    }

    /// Enable path-style addressing.
    pub fn path_style(mut self, enabled: bool) -> Self {
        self.path_style = Some(enabled);
        self
    }

    /// Set the public bucket.
    pub fn public_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.public_bucket = Some(bucket.into());
        self
    }

    /// Set the default presigned upload URL lifetime.
    pub fn upload_url_expiry(mut self, expiry: Duration) -> Self {
        self.upload_url_expiry = Some(expiry);
        self
    }

    /// Set the presigned download URL lifetime.
    pub fn download_url_expiry(mut self, expiry: Duration) -> Self {
        self.download_url_expiry = Some(expiry);
        self
    }

    /// Set the listing delimiter policy.
    pub fn list_delimiter(mut self, delimiter: ListDelimiter) -> Self {
        self.list_delimiter = Some(delimiter);
        self
    }

    /// Replace the content types accepted by the existence check.
    pub fn allowed_content_types<I, S>(mut self, content_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_content_types = Some(content_types.into_iter().map(Into::into).collect());
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env(self) -> Self {
        self.from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through a variable lookup function.
    ///
    /// Reads the same variables as [`from_env`](Self::from_env). Empty values
    /// count as unset.
    pub fn from_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| lookup(name).filter(|value| !value.is_empty()))
        };

        if let Some(endpoint) = get(&["STORAGE_ENDPOINT", "AWS_ENDPOINT_URL_S3", "AWS_ENDPOINT_URL"]) {
            self.endpoint = Some(endpoint);
        }
        if let Some(region) = get(&["STORAGE_REGION", "AWS_REGION", "AWS_DEFAULT_REGION"]) {
            self.region = Some(region);
        }

        let access_key = get(&[STORAGE_ACCESS_KEY, AWS_ACCESS_KEY_ID]);
        let secret_key = get(&[STORAGE_SECRET_KEY, AWS_SECRET_ACCESS_KEY]);
        if let (Some(access_key), Some(secret_key)) = (access_key, secret_key) {
            let credentials = match get(&[STORAGE_SESSION_TOKEN, AWS_SESSION_TOKEN]) {
                Some(token) => StorageCredentials::with_session_token(access_key, secret_key, token),
                None => StorageCredentials::new(access_key, secret_key),
            };
            self = self.credentials(credentials);
        }

        if let Some(bucket) = get(&["PUBLIC_BUCKET"]) {
            self.public_bucket = Some(bucket);
        }
        if let Some(value) = get(&["STORAGE_PATH_STYLE"]) {
            self.path_style = Some(matches!(value.to_lowercase().as_str(), "true" | "1"));
        }
        if let Some(value) = get(&["STORAGE_LIST_DELIMITER"]) {
            match ListDelimiter::from_config_value(&value) {
                Some(delimiter) => self.list_delimiter = Some(delimiter),
                None => self.errors.push(ConfigurationError::InvalidConfiguration {
                    field: "list_delimiter".to_string(),
                    message: format!("'{}' is not one of prefix, slash, none", value),
                }),
            }
        }
        if let Some(value) = get(&["STORAGE_UPLOAD_URL_EXPIRY_SECS"]) {
            match value.parse() {
                Ok(secs) => self.upload_url_expiry = Some(Duration::from_secs(secs)),
                Err(_) => self.errors.push(invalid_seconds("upload_url_expiry", &value)),
            }
        }
        if let Some(value) = get(&["STORAGE_DOWNLOAD_URL_EXPIRY_SECS"]) {
            match value.parse() {
                Ok(secs) => self.download_url_expiry = Some(Duration::from_secs(secs)),
                Err(_) => self.errors.push(invalid_seconds("download_url_expiry", &value)),
            }
        }

        self
    }

    /// Build the configuration.
    pub fn build(mut self) -> Result<GatewayConfig, GatewayError> {
        if !self.errors.is_empty() {
            return Err(GatewayError::Configuration(self.errors.remove(0)));
        }

        let endpoint = parse_endpoint(self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT))?;

        let upload_url_expiry = self.upload_url_expiry.unwrap_or(DEFAULT_UPLOAD_URL_EXPIRY);
        let download_url_expiry = self
            .download_url_expiry
            .unwrap_or(DEFAULT_DOWNLOAD_URL_EXPIRY);
        validate_expiry("upload_url_expiry", upload_url_expiry)?;
        validate_expiry("download_url_expiry", download_url_expiry)?;

        let region = self.region.unwrap_or_else(|| DEFAULT_REGION.to_string());
        if region.trim().is_empty() {
            return Err(GatewayError::Configuration(
                ConfigurationError::InvalidConfiguration {
                    field: "region".to_string(),
                    message: "region must not be empty".to_string(),
                },
            ));
        }

        Ok(GatewayConfig {
            region,
            endpoint,
            credentials_provider: self
                .credentials_provider
                .unwrap_or_else(|| Arc::new(EnvCredentialsProvider::new())),
            path_style: self.path_style.unwrap_or(false),
            public_bucket: self.public_bucket.filter(|bucket| !bucket.is_empty()),
            upload_url_expiry,
            download_url_expiry,
            list_delimiter: self.list_delimiter.unwrap_or_default(),
            allowed_content_types: self.allowed_content_types.unwrap_or_else(|| {
                DEFAULT_VALID_CONTENT_TYPES
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            }),
        })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, GatewayError> {
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    let url = Url::parse(&candidate).map_err(|e| {
        GatewayError::Configuration(ConfigurationError::InvalidEndpoint {
            url: raw.to_string(),
            details: e.to_string(),
        })
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(GatewayError::Configuration(
            ConfigurationError::InvalidEndpoint {
                url: raw.to_string(),
                details: format!("unsupported scheme '{}'", url.scheme()),
            },
        ));
    }

    Ok(url)
}

fn validate_expiry(field: &str, expiry: Duration) -> Result<(), GatewayError> {
    if expiry.is_zero() || expiry > MAX_PRESIGN_EXPIRY {
        return Err(GatewayError::Configuration(
            ConfigurationError::InvalidConfiguration {
                field: field.to_string(),
                message: format!(
                    "must be between 1 and {} seconds",
                    MAX_PRESIGN_EXPIRY.as_secs()
                ),
            },
        ));
    }
    Ok(())
}

fn invalid_seconds(field: &str, value: &str) -> ConfigurationError {
    ConfigurationError::InvalidConfiguration {
        field: field.to_string(),
        message: format!("'{}' is not a whole number of seconds", value),
    }
}
