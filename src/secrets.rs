//! Startup-time credential resolution.
//!
//! Secrets live in an external store behind the [`SecretStore`] trait; the
//! service resolves the two it needs exactly once, before the listener is
//! bound. A missing secret is a startup failure, not a per-request error.
//! Credentials are read-only for the life of the process.

use crate::error::{RelayError, Result};
use async_trait::async_trait;
use std::collections::HashMap;

const SLACK_TOKEN_KEY: &str = "SLACK_TOKEN";
const BUILD_USER_KEY: &str = "USER";
const BUILD_API_KEY: &str = "API";
const BUILD_URL_KEY: &str = "URL";

/// A named secret resolves to a flat bundle of string key/value pairs.
pub type SecretBundle = HashMap<String, String>;

#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get_secret(&self, name: &str) -> Result<SecretBundle>;
}

/// Reads each secret as a JSON object from the environment variable of the
/// same name. Stands in for a cloud secret manager; a real backend slots
/// in behind the same trait.
#[derive(Debug, Default)]
pub struct EnvSecretStore;

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn get_secret(&self, name: &str) -> Result<SecretBundle> {
        let raw = std::env::var(name).map_err(|_| RelayError::SecretUnavailable {
            name: name.to_string(),
            message: "environment variable not set".to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| RelayError::SecretUnavailable {
            name: name.to_string(),
            message: format!("not a JSON object of strings: {}", e),
        })
    }
}

/// In-memory store for tests.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: HashMap<String, SecretBundle>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, name: &str, bundle: SecretBundle) -> Self {
        self.secrets.insert(name.to_string(), bundle);
        self
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get_secret(&self, name: &str) -> Result<SecretBundle> {
        self.secrets
            .get(name)
            .cloned()
            .ok_or_else(|| RelayError::SecretUnavailable {
                name: name.to_string(),
                message: "secret not found".to_string(),
            })
    }
}

/// Credentials for the build system's remote trigger endpoint.
#[derive(Debug, Clone)]
pub struct BuildCredentials {
    pub user: String,
    pub api_key: String,
    /// Host (and optional port/path prefix) of the build system, no scheme.
    pub base_url: String,
}

/// Everything resolved at startup, shared read-only across requests.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub slack_token: String,
    pub build: BuildCredentials,
}

fn require<'a>(bundle: &'a SecretBundle, secret: &str, key: &str) -> Result<&'a str> {
    bundle
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| RelayError::SecretKeyMissing {
            secret: secret.to_string(),
            key: key.to_string(),
        })
}

/// Resolves the messaging token and the build-system credential bundle.
/// Called once from the process entry point; any error here aborts
/// startup before traffic is served.
pub async fn resolve_credentials(
    store: &dyn SecretStore,
    slack_secret_name: &str,
    build_secret_name: &str,
) -> Result<Credentials> {
    let slack_bundle = store.get_secret(slack_secret_name).await?;
    let slack_token = require(&slack_bundle, slack_secret_name, SLACK_TOKEN_KEY)?.to_string();

    let build_bundle = store.get_secret(build_secret_name).await?;
    let build = BuildCredentials {
        user: require(&build_bundle, build_secret_name, BUILD_USER_KEY)?.to_string(),
        api_key: require(&build_bundle, build_secret_name, BUILD_API_KEY)?.to_string(),
        base_url: require(&build_bundle, build_secret_name, BUILD_URL_KEY)?.to_string(),
    };

    Ok(Credentials { slack_token, build })
}
