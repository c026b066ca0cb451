//! Application configuration.
//!
//! # Responsibility
//! - Load `glamdex.toml` into an `AppConfig` with defaults for absent fields.
//! - Apply environment overrides for remote-store secrets.
//! - Decide which inventory backend to construct.
//!
//! # Invariants
//! - A remote backend is selected only when both endpoint and credential are set.
//! - Credentials are redacted from `Debug` output.

use crate::catalog::{DEFAULT_ASSET_ROOT, DEFAULT_CATALOG_PATH};
use crate::remote::DEFAULT_NAMESPACE;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Default config file name, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "glamdex.toml";
/// Default local inventory database file.
pub const DEFAULT_DB_PATH: &str = "glamdex.sqlite3";
/// Environment variable overriding `store.remote.endpoint_url`.
pub const ENV_REMOTE_URL: &str = "GLAMDEX_REMOTE_URL";
/// Environment variable overriding `store.remote.credential`.
pub const ENV_REMOTE_CREDENTIAL: &str = "GLAMDEX_REMOTE_CREDENTIAL";

const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    IncompleteRemote(&'static str),
    InvalidValue(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::IncompleteRemote(field) => {
                write!(f, "remote store configured without `{field}`")
            }
            Self::InvalidValue(message) => write!(f, "invalid config value: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::IncompleteRemote(_) | Self::InvalidValue(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Opaque service credential for the remote store.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub catalog_path: PathBuf,
    pub asset_root: PathBuf,
    /// Optional outfit library used by `assemble cosmetic`.
    pub outfits_path: Option<PathBuf>,
    pub logging: LoggingConfig,
    pub store: StoreConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            asset_root: PathBuf::from(DEFAULT_ASSET_ROOT),
            outfits_path: None,
            logging: LoggingConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `trace|debug|info|warn|error`; build-mode default when absent.
    pub level: Option<String>,
    /// Log directory; resolved against the working directory when relative.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub remote: Option<RemoteSection>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            remote: None,
        }
    }
}

/// `[store.remote]` as written in the file; every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteSection {
    pub endpoint_url: Option<String>,
    pub credential: Option<Credential>,
    pub namespace: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Complete connection parameters for the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub endpoint_url: String,
    pub credential: Credential,
    pub namespace: String,
    pub timeout_secs: u64,
}

/// Backend chosen at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreSelection {
    Local { db_path: PathBuf },
    Remote(RemoteConfig),
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Applies `GLAMDEX_REMOTE_URL` / `GLAMDEX_REMOTE_CREDENTIAL` from `lookup`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let url = lookup(ENV_REMOTE_URL).filter(|value| !value.trim().is_empty());
        let credential = lookup(ENV_REMOTE_CREDENTIAL).filter(|value| !value.trim().is_empty());
        if url.is_none() && credential.is_none() {
            return;
        }

        let remote = self.store.remote.get_or_insert_with(RemoteSection::default);
        if let Some(url) = url {
            remote.endpoint_url = Some(url);
        }
        if let Some(credential) = credential {
            remote.credential = Some(Credential::new(credential));
        }
    }

    /// Applies overrides from the process environment.
    pub fn apply_process_env(&mut self) {
        self.apply_env_overrides(|key| std::env::var(key).ok());
    }

    /// Complete remote parameters, `None` when no remote section exists.
    ///
    /// # Errors
    /// - `IncompleteRemote` when the section lacks endpoint or credential.
    /// - `InvalidValue` for a zero timeout.
    pub fn remote_config(&self) -> Result<Option<RemoteConfig>, ConfigError> {
        let Some(section) = &self.store.remote else {
            return Ok(None);
        };

        let endpoint_url = section
            .endpoint_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::IncompleteRemote("endpoint_url"))?;
        let credential = section
            .credential
            .clone()
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::IncompleteRemote("credential"))?;
        let timeout_secs = section.timeout_secs.unwrap_or(DEFAULT_REMOTE_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "store.remote.timeout_secs must be positive".to_string(),
            ));
        }

        Ok(Some(RemoteConfig {
            endpoint_url: endpoint_url.to_string(),
            credential,
            namespace: section
                .namespace
                .clone()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
            timeout_secs,
        }))
    }

    /// Picks the remote backend when configured, the local one otherwise.
    pub fn store_selection(&self) -> Result<StoreSelection, ConfigError> {
        Ok(match self.remote_config()? {
            Some(remote) => StoreSelection::Remote(remote),
            None => StoreSelection::Local {
                db_path: self.store.db_path.clone(),
            },
        })
    }
}
