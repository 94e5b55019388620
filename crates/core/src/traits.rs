//! ObjectStore trait definition
//!
//! This trait is the seam between directory operations and the object-storage
//! client. Credentials, region, and endpoint resolution live behind it, so
//! the core stays decoupled from any specific S3 SDK and the trait can be
//! mocked for testing.

use async_trait::async_trait;

use crate::error::Result;

/// One page of a prefix listing
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    /// Object keys on this page
    pub keys: Vec<String>,

    /// Whether more pages are available
    pub truncated: bool,

    /// Continuation token for the next page
    pub continuation_token: Option<String>,
}

/// Object-storage operations needed for directory emulation
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Whether any object exists at or under the given prefix
    async fn prefix_exists(&self, bucket: &str, prefix: &str) -> Result<bool>;

    /// List one page of object keys under a prefix
    async fn list_prefix(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> Result<ListPage>;

    /// Write a zero-byte object marking a directory's presence
    async fn put_directory_marker(&self, bucket: &str, key: &str) -> Result<()>;

    /// Delete a single object
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;
}
