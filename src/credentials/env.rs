//! Environment variable credentials provider.

use super::{CredentialsProvider, StorageCredentials};
use crate::error::{CredentialsError, GatewayError};
use std::env;

/// Access key variable.
pub const STORAGE_ACCESS_KEY: &str = "STORAGE_ACCESS_KEY";
/// Secret key variable.
pub const STORAGE_SECRET_KEY: &str = "STORAGE_SECRET_KEY";
/// Session token variable.
pub const STORAGE_SESSION_TOKEN: &str = "STORAGE_SESSION_TOKEN";

/// Standard AWS access key variable, used as a fallback.
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
/// Standard AWS secret key variable, used as a fallback.
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
/// Standard AWS session token variable, used as a fallback.
pub const AWS_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

/// Credentials provider that reads from environment variables.
///
/// By default it looks up `STORAGE_ACCESS_KEY`, `STORAGE_SECRET_KEY` and
/// `STORAGE_SESSION_TOKEN`, falling back to the standard `AWS_*` names.
/// Custom names disable the fallback.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentialsProvider {
    access_key_var: Option<String>,
    secret_key_var: Option<String>,
    session_token_var: Option<String>,
}

impl EnvCredentialsProvider {
    /// Create a provider with the default variable names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider with custom variable names.
    pub fn with_vars(
        access_key_var: impl Into<String>,
        secret_key_var: impl Into<String>,
        session_token_var: Option<String>,
    ) -> Self {
        Self {
            access_key_var: Some(access_key_var.into()),
            secret_key_var: Some(secret_key_var.into()),
            session_token_var,
        }
    }

    fn candidates<'a>(custom: &'a Option<String>, primary: &'a str, fallback: &'a str) -> Vec<&'a str> {
        match custom {
            Some(name) => vec![name.as_str()],
            None => vec![primary, fallback],
        }
    }

    fn read_required(names: &[&str]) -> Result<String, GatewayError> {
        for name in names {
            if let Ok(value) = env::var(name) {
                if value.is_empty() {
                    return Err(GatewayError::Credentials(CredentialsError::Invalid {
                        message: format!("{} is empty", name),
                    }));
                }
                return Ok(value);
            }
        }
        Err(GatewayError::Credentials(CredentialsError::NotFound {
            message: format!("none of {} are set", names.join(", ")),
        }))
    }
}

impl CredentialsProvider for EnvCredentialsProvider {
    fn provide(&self) -> Result<StorageCredentials, GatewayError> {
        let access_key_id = Self::read_required(&Self::candidates(
            &self.access_key_var,
            STORAGE_ACCESS_KEY,
            AWS_ACCESS_KEY_ID,
        ))?;
        let secret_access_key = Self::read_required(&Self::candidates(
            &self.secret_key_var,
            STORAGE_SECRET_KEY,
            AWS_SECRET_ACCESS_KEY,
        ))?;

        let session_token = match &self.session_token_var {
            Some(name) => env::var(name).ok(),
            None if self.access_key_var.is_none() => env::var(STORAGE_SESSION_TOKEN)
                .or_else(|_| env::var(AWS_SESSION_TOKEN))
                .ok(),
            None => None,
        }
        .filter(|s| !s.is_empty());

        Ok(match session_token {
            Some(token) => {
                StorageCredentials::with_session_token(access_key_id, secret_access_key, token)
            }
            None => StorageCredentials::new(access_key_id, secret_access_key),
        })
    }

    fn name(&self) -> &'static str {
        "environment"
    }
}
