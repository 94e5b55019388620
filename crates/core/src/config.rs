//! Configuration access
//!
//! The resolver and the S3 adapter consume configuration through the
//! [`ConfigProvider`] trait, a plain key-to-string lookup. [`Settings`] is the
//! TOML-backed provider used by the server; tests typically wrap one in an
//! `RwLock` so values can change between calls.

use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration keys consumed by this crate and the S3 adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    /// Base path or URI under which model artifacts are stored
    ModelStorageRoot,
    /// S3 access key id
    S3AccessKey,
    /// S3 secret access key
    S3SecretKey,
    /// S3 session token for temporary credentials
    S3SessionToken,
    /// AWS region
    S3Region,
    /// Custom S3-compatible endpoint URL
    S3EndpointUrl,
}

impl Property {
    /// Stable key string for this property
    pub const fn key(self) -> &'static str {
        match self {
            Property::ModelStorageRoot => "storage.model-storage-root",
            Property::S3AccessKey => "s3.access-key",
            Property::S3SecretKey => "s3.secret-key",
            Property::S3SessionToken => "s3.session-token",
            Property::S3Region => "s3.region",
            Property::S3EndpointUrl => "s3.endpoint-url",
        }
    }
}

/// Key-to-string configuration lookup
///
/// Implementations must be cheap to call; the storage-root cache re-reads the
/// configured value on every resolution to detect changes.
pub trait ConfigProvider: Send + Sync {
    /// Current value for the property, if configured
    fn get(&self, property: Property) -> Option<String>;
}

impl<P: ConfigProvider> ConfigProvider for Arc<P> {
    fn get(&self, property: Property) -> Option<String> {
        (**self).get(property)
    }
}

impl<P: ConfigProvider> ConfigProvider for RwLock<P> {
    fn get(&self, property: Property) -> Option<String> {
        self.read().ok().and_then(|guard| guard.get(property))
    }
}

/// S3 connection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Settings {
    /// Access key id
    #[serde(default)]
    pub access_key: Option<String>,

    /// Secret access key
    #[serde(default)]
    pub secret_key: Option<String>,

    /// Session token for temporary credentials
    #[serde(default)]
    pub session_token: Option<String>,

    /// AWS region
    #[serde(default)]
    pub region: Option<String>,

    /// Custom endpoint URL for S3-compatible services
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

/// Storage configuration loaded from a TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Base path or URI for model artifacts; defaults to the working
    /// directory when unset
    #[serde(default)]
    pub model_storage_root: Option<String>,

    /// S3 connection settings
    #[serde(default)]
    pub s3: S3Settings,
}

impl Settings {
    /// Load settings from a TOML file
    ///
    /// A missing file yields default settings; an unset storage root is not
    /// an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(path)?;
        let settings = toml::from_str(&content)?;
        Ok(settings)
    }
}

impl ConfigProvider for Settings {
    fn get(&self, property: Property) -> Option<String> {
        match property {
            Property::ModelStorageRoot => self.model_storage_root.clone(),
            Property::S3AccessKey => self.s3.access_key.clone(),
            Property::S3SecretKey => self.s3.secret_key.clone(),
            Property::S3SessionToken => self.s3.session_token.clone(),
            Property::S3Region => self.s3.region.clone(),
            Property::S3EndpointUrl => self.s3.endpoint_url.clone(),
        }
    }
}
