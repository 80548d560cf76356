//! Backend configuration for the note API and attachment store.
//!
//! Values come from an optional JSON file and are overridden by environment
//! variables. Secrets may live in either place; neither is ever logged.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::{ApiConfig, DEFAULT_HTTP_TIMEOUT_SECS};
use crate::error::{Error, Result};
use crate::storage::{S3Config, DEFAULT_KEY_PREFIX, DEFAULT_URL_TTL_SECS};
use crate::util::{is_http_url, normalize_text_option};

const CONFIG_FILE_NAME: &str = "backend.json";
const DEFAULT_REGION: &str = "us-east-1";

pub const ENV_CONFIG_PATH: &str = "NOTEKEEPER_CONFIG";
const ENV_API_URL: &str = "NOTEKEEPER_API_URL";
const ENV_API_KEY: &str = "NOTEKEEPER_API_KEY";
const ENV_HTTP_TIMEOUT_SECS: &str = "NOTEKEEPER_HTTP_TIMEOUT_SECS";
const ENV_S3_BUCKET: &str = "NOTEKEEPER_S3_BUCKET";
const ENV_S3_REGION: &str = "NOTEKEEPER_S3_REGION";
const ENV_S3_ENDPOINT: &str = "NOTEKEEPER_S3_ENDPOINT";
const ENV_S3_ACCESS_KEY_ID: &str = "NOTEKEEPER_S3_ACCESS_KEY_ID";
const ENV_S3_SECRET_ACCESS_KEY: &str = "NOTEKEEPER_S3_SECRET_ACCESS_KEY";
const ENV_S3_PREFIX: &str = "NOTEKEEPER_S3_PREFIX";
const ENV_S3_PUBLIC_BASE_URL: &str = "NOTEKEEPER_S3_PUBLIC_BASE_URL";
const ENV_S3_URL_TTL_SECS: &str = "NOTEKEEPER_S3_URL_TTL_SECS";

/// On-disk backend configuration. Every field is optional so that the
/// environment can fill in or override any of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BackendConfigFile {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub storage: StorageSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ApiSection {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StorageSection {
    #[serde(default)]
    pub bucket: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
    #[serde(default)]
    pub key_prefix: Option<String>,
    #[serde(default)]
    pub public_base_url: Option<String>,
    #[serde(default)]
    pub url_ttl_secs: Option<u64>,
}

impl BackendConfigFile {
    /// Read a config file. A missing file yields the empty default.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|error| {
            Error::Config(format!(
                "Failed to parse config at {}: {error}",
                path.display()
            ))
        })
    }
}

/// Fully resolved backend configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub api: ApiConfig,
    pub storage: S3Config,
}

impl BackendConfig {
    /// Load configuration from `path` (or the default location) plus the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map_or_else(resolve_config_path, Path::to_path_buf);
        tracing::debug!("Loading backend config from {}", path.display());
        let file = BackendConfigFile::load_from_path(&path)?;
        resolve_config(file, |key| env::var(key).ok())
    }

    /// Load configuration from the process environment only.
    pub fn from_env() -> Result<Self> {
        resolve_config(BackendConfigFile::default(), |key| env::var(key).ok())
    }
}

/// Resolve the config file location from `NOTEKEEPER_CONFIG` or the platform config directory.
pub fn resolve_config_path() -> PathBuf {
    env::var_os(ENV_CONFIG_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("notekeeper")
        .join(CONFIG_FILE_NAME)
}

/// Merge a config file with environment overrides and validate the result.
pub fn resolve_config(
    file: BackendConfigFile,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<BackendConfig> {
    let pick = |key: &str, fallback: Option<String>| {
        normalize_text_option(lookup(key)).or_else(|| normalize_text_option(fallback))
    };

    let api_url = pick(ENV_API_URL, file.api.url);
    let api_key = pick(ENV_API_KEY, file.api.api_key);
    let timeout_secs = parse_secs(
        ENV_HTTP_TIMEOUT_SECS,
        lookup(ENV_HTTP_TIMEOUT_SECS),
        file.api.timeout_secs,
    )?
    .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

    let storage = file.storage;
    let bucket = pick(ENV_S3_BUCKET, storage.bucket);
    let region = pick(ENV_S3_REGION, storage.region).unwrap_or_else(|| DEFAULT_REGION.to_string());
    let endpoint = pick(ENV_S3_ENDPOINT, storage.endpoint);
    let access_key_id = pick(ENV_S3_ACCESS_KEY_ID, storage.access_key_id);
    let secret_access_key = pick(ENV_S3_SECRET_ACCESS_KEY, storage.secret_access_key);
    let key_prefix = lookup(ENV_S3_PREFIX)
        .or(storage.key_prefix)
        .map_or_else(|| DEFAULT_KEY_PREFIX.to_string(), |raw| normalize_key_prefix(&raw));
    let public_base_url = pick(ENV_S3_PUBLIC_BASE_URL, storage.public_base_url);
    let url_ttl_secs = parse_secs(
        ENV_S3_URL_TTL_SECS,
        lookup(ENV_S3_URL_TTL_SECS),
        storage.url_ttl_secs,
    )?
    .unwrap_or(DEFAULT_URL_TTL_SECS);

    let mut missing = Vec::new();
    if api_url.is_none() {
        missing.push(ENV_API_URL);
    }
    if bucket.is_none() {
        missing.push(ENV_S3_BUCKET);
    }
    if access_key_id.is_none() {
        missing.push(ENV_S3_ACCESS_KEY_ID);
    }
    if secret_access_key.is_none() {
        missing.push(ENV_S3_SECRET_ACCESS_KEY);
    }
    if !missing.is_empty() {
        return Err(Error::Config(format!(
            "Backend configuration is incomplete. Missing: {}",
            missing.join(", ")
        )));
    }

    let api_url = require_http_url(api_url, ENV_API_URL)?;
    let endpoint = endpoint
        .map(|value| require_http_url(Some(value), ENV_S3_ENDPOINT))
        .transpose()?;
    let public_base_url = public_base_url
        .map(|value| require_http_url(Some(value), ENV_S3_PUBLIC_BASE_URL))
        .transpose()?;

    Ok(BackendConfig {
        api: ApiConfig {
            endpoint: api_url,
            api_key,
            timeout: Duration::from_secs(timeout_secs),
        },
        storage: S3Config {
            bucket: bucket.unwrap_or_default(),
            region,
            endpoint_url: endpoint,
            access_key_id: access_key_id.unwrap_or_default(),
            secret_access_key: secret_access_key.unwrap_or_default(),
            key_prefix,
            public_base_url,
            url_ttl: Duration::from_secs(url_ttl_secs),
        },
    })
}

fn parse_secs(key: &str, raw: Option<String>, fallback: Option<u64>) -> Result<Option<u64>> {
    let Some(raw) = normalize_text_option(raw) else {
        return Ok(fallback);
    };
    match raw.parse::<u64>() {
        Ok(0) | Err(_) => Err(Error::Config(format!(
            "{key} must be a positive number of seconds, got '{raw}'"
        ))),
        Ok(value) => Ok(Some(value)),
    }
}

fn require_http_url(value: Option<String>, key: &str) -> Result<String> {
    let value = value.unwrap_or_default();
    if is_http_url(&value) {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(Error::Config(format!(
            "{key} must start with http:// or https://"
        )))
    }
}

fn normalize_key_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}
