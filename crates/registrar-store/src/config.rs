//! Store configuration
//!
//! A backend is selected by connection string. Only SQLite is supported:
//!
//! | URL | Backend |
//! |---|---|
//! | `sqlite::memory:`, `sqlite://`, `sqlite://:memory:`, `sqlite:///:memory:` | in-memory |
//! | `sqlite:///relative.db`, `sqlite:////abs/path.db`, `sqlite://path.db` | file |

use registrar_core::errors::RegistrarError;
use serde::Deserialize;
use std::path::PathBuf;

/// Default connection string: a transient in-memory database
pub const MEMORY_URL: &str = "sqlite::memory:";

/// Where the data lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Memory,
    File(PathBuf),
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Connection string, see module docs
    pub url: String,
    /// Enforce foreign keys on every connection
    pub foreign_keys: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: MEMORY_URL.to_string(),
            foreign_keys: true,
        }
    }
}

impl StoreConfig {
    /// Config for an in-memory database
    pub fn memory() -> Self {
        Self::default()
    }

    /// Build a config from a connection string, validating it up front
    pub fn from_url(url: impl Into<String>) -> Result<Self, RegistrarError> {
        let config = Self {
            url: url.into(),
            ..Self::default()
        };
        config.backend()?;
        Ok(config)
    }

    /// Resolve the connection string
    pub fn backend(&self) -> Result<Backend, RegistrarError> {
        parse_url(&self.url)
    }
}

fn parse_url(url: &str) -> Result<Backend, RegistrarError> {
    let (scheme, rest) = url
        .split_once(':')
        .ok_or_else(|| RegistrarError::InvalidConnectionString {
            url: url.to_string(),
            reason: "missing scheme".to_string(),
        })?;

    if scheme != "sqlite" {
        return Err(RegistrarError::UnsupportedScheme {
            scheme: scheme.to_string(),
        });
    }

    if rest == ":memory:" {
        return Ok(Backend::Memory);
    }

    let path = rest
        .strip_prefix("///")
        .or_else(|| rest.strip_prefix("//"))
        .ok_or_else(|| RegistrarError::InvalidConnectionString {
            url: url.to_string(),
            reason: "expected sqlite::memory: or sqlite://<path>".to_string(),
        })?;

    match path {
        "" | ":memory:" => Ok(Backend::Memory),
        path => Ok(Backend::File(PathBuf::from(path))),
    }
}
