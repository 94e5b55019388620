//! Object-storage location parsing
//!
//! An `s3://bucket/key` URI is split into bucket and key for the client
//! abstraction; directory semantics are carried by a trailing `/` on the key.

use url::Url;

use crate::error::{Error, Result};

/// A parsed S3 location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Location {
    /// Bucket name
    pub bucket: String,
    /// Object key or prefix (empty for the bucket root)
    pub key: String,
}

impl S3Location {
    /// Create a new S3Location
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Split a parsed `s3://` URL into bucket and key
    pub fn from_url(url: &Url) -> Result<Self> {
        let bucket = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| Error::InvalidLocation(format!("Missing bucket in URI: {url}")))?;
        let key = url.path().trim_start_matches('/');
        Ok(Self::new(bucket, key))
    }

    /// Force directory semantics by ensuring the key ends with `/`
    pub fn as_directory(mut self) -> Self {
        if !self.key.ends_with('/') {
            self.key.push('/');
        }
        self
    }

    /// Render as an `s3://bucket/key` URI
    pub fn uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}

impl std::fmt::Display for S3Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uri())
    }
}
