//! Storage root resolution and location building
//!
//! [`LocationResolver`] owns the configuration provider and a cache of the
//! derived storage root. The configured value is re-read on every call and
//! value-compared against the value the cache was derived from, so a
//! configuration change invalidates the cache without any explicit signal.

use std::sync::{Mutex, PoisonError};

use crate::config::{ConfigProvider, Property};
use crate::error::Result;
use crate::uri;

#[derive(Debug, Default)]
struct RootCache {
    /// Configured value the cached root was derived from
    configured: Option<String>,
    /// Derived canonical root, no trailing separator
    root: Option<String>,
}

/// Resolves catalog entity identifiers into storage location URIs
#[derive(Debug)]
pub struct LocationResolver<P: ConfigProvider> {
    config: P,
    cache: Mutex<RootCache>,
}

impl<P: ConfigProvider> LocationResolver<P> {
    /// Create a resolver over a configuration provider
    pub fn new(config: P) -> Self {
        Self {
            config,
            cache: Mutex::new(RootCache::default()),
        }
    }

    /// Canonical storage root URI, memoized against the configured value
    ///
    /// Defaults to the current working directory when no root is configured.
    /// The result never ends with a trailing separator. The lock is not held
    /// while the root is computed; concurrent recomputation yields the same
    /// value.
    pub fn model_storage_root(&self) -> Result<String> {
        let configured = self.config.get(Property::ModelStorageRoot);

        {
            let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            if cache.configured == configured {
                if let Some(root) = &cache.root {
                    return Ok(root.clone());
                }
            }
        }

        let raw = match &configured {
            Some(value) => value.clone(),
            None => std::env::current_dir()?.display().to_string(),
        };
        let mut root = uri::create_uri(&raw)?.to_string();
        while root.ends_with('/') {
            root.pop();
        }

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.root = Some(root.clone());
        cache.configured = configured;
        Ok(root)
    }

    /// Storage location for a model
    pub fn model_storage_location(
        &self,
        catalog_id: &str,
        schema_id: &str,
        model_id: &str,
    ) -> Result<String> {
        self.model_directory_uri(&format!("{catalog_id}.{schema_id}.models.{model_id}"))
    }

    /// Storage location for a model version
    pub fn model_version_storage_location(
        &self,
        catalog_id: &str,
        schema_id: &str,
        model_id: &str,
        version_id: &str,
    ) -> Result<String> {
        self.model_directory_uri(&format!(
            "{catalog_id}.{schema_id}.models.{model_id}.versions.{version_id}"
        ))
    }

    /// Clear the cached root and the value it was derived from
    ///
    /// The next call recomputes from configuration; intended for test
    /// isolation.
    pub fn reset(&self) {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.configured = None;
        cache.root = None;
    }

    /// Dot segments of an entity full name map 1:1 to path segments under
    /// the storage root.
    fn model_directory_uri(&self, entity_full_name: &str) -> Result<String> {
        Ok(format!(
            "{}/{}",
            self.model_storage_root()?,
            entity_full_name.replace('.', "/")
        ))
    }
}
