//! Directory lifecycle operations
//!
//! [`DirectoryOps`] validates a location, classifies its scheme, and routes
//! create/delete to the local filesystem or the object-storage client. On
//! object storage a directory is emulated: a zero-byte marker object stands
//! in for creation, and deletion removes every object under the prefix.

use url::Url;

use crate::error::{Error, Result};
use crate::fs;
use crate::path::S3Location;
use crate::traits::ObjectStore;
use crate::uri::{self, StorageScheme};

/// Directory create/delete across the local and object-storage backends
#[derive(Debug)]
pub struct DirectoryOps<S: ObjectStore> {
    store: S,
}

impl<S: ObjectStore> DirectoryOps<S> {
    /// Create directory operations over an object-storage client
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Delete the directory-equivalent container at a location
    ///
    /// Local trees are removed bottom-up; object-storage prefixes are listed
    /// page by page and every object deleted individually. Deleting a prefix
    /// with zero objects is not an error. Neither backend rolls back on a
    /// partial failure.
    pub async fn delete_directory(&self, location: &str) -> Result<()> {
        let url = validated_url(location)?;
        match StorageScheme::of(&url) {
            StorageScheme::Local => {
                let dir_path = local_path(&url, location)?;
                fs::delete_local_directory(&dir_path)
                    .map_err(|e| Error::internal(location, e))
            }
            StorageScheme::ObjectStorage => {
                let removed = self.delete_prefix(&url).await?;
                tracing::debug!(uri = %removed, "object-storage prefix removed");
                Ok(())
            }
            StorageScheme::Unsupported(scheme) => Err(Error::InvalidLocation(format!(
                "Unsupported URI scheme: {scheme}"
            ))),
        }
    }

    /// Create the directory-equivalent container at a location
    ///
    /// Returns the canonical URI of the created container. On object storage
    /// this writes a zero-byte marker object and fails with `AlreadyExists`
    /// when anything already lives at or under the prefix.
    pub async fn create_directory(&self, location: &str) -> Result<String> {
        let url = validated_url(location)?;
        match StorageScheme::of(&url) {
            StorageScheme::Local => {
                let dir_path = local_path(&url, location)?;
                std::fs::create_dir_all(&dir_path)
                    .map_err(|e| Error::internal(location, e))?;
                Ok(url.to_string())
            }
            StorageScheme::ObjectStorage => self.create_prefix(&url).await,
            StorageScheme::Unsupported(scheme) => Err(Error::InvalidLocation(format!(
                "Unsupported URI scheme: {scheme}"
            ))),
        }
    }

    async fn create_prefix(&self, url: &Url) -> Result<String> {
        let location = S3Location::from_url(url)?.as_directory();
        if self
            .store
            .prefix_exists(&location.bucket, &location.key)
            .await?
        {
            return Err(Error::AlreadyExists(location.key));
        }
        self.store
            .put_directory_marker(&location.bucket, &location.key)
            .await?;
        tracing::debug!(uri = %location, "directory marker created");
        Ok(location.uri())
    }

    async fn delete_prefix(&self, url: &Url) -> Result<String> {
        let location = S3Location::from_url(url)?;
        let mut continuation_token: Option<String> = None;

        loop {
            let page = self
                .store
                .list_prefix(&location.bucket, &location.key, continuation_token.take())
                .await?;
            for key in page.keys {
                self.store.delete_object(&location.bucket, &key).await?;
            }
            if page.truncated {
                continuation_token = page.continuation_token;
            } else {
                break;
            }
        }

        Ok(location.uri())
    }
}

/// Canonicalize and validate a location, then parse it for dispatch
fn validated_url(location: &str) -> Result<Url> {
    let canonical = uri::canonical_uri_string(location)?;
    uri::assert_valid_location(&canonical)?;
    Url::parse(&canonical).map_err(|e| Error::InvalidLocation(format!("{location}: {e}")))
}

fn local_path(url: &Url, location: &str) -> Result<std::path::PathBuf> {
    url.to_file_path()
        .map_err(|_| Error::InvalidLocation(format!("Invalid path: {location}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{ListPage, MockObjectStore};
    use mockall::predicate::eq;
    use tempfile::TempDir;

    fn ops_with_mock(store: MockObjectStore) -> DirectoryOps<MockObjectStore> {
        DirectoryOps::new(store)
    }

    fn untouched_store() -> MockObjectStore {
        MockObjectStore::new()
    }

    #[tokio::test]
    async fn test_delete_local_directory_from_bare_path() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("tree");
        std::fs::create_dir_all(root.join("sub")).unwrap();
        std::fs::write(root.join("sub/file.txt"), b"x").unwrap();

        let ops = ops_with_mock(untouched_store());
        ops.delete_directory(root.to_str().unwrap()).await.unwrap();
        assert!(!root.exists());
    }

    #[tokio::test]
    async fn test_delete_local_directory_from_file_uri() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("tree");
        std::fs::create_dir(&root).unwrap();

        let uri = format!("file://{}", root.display());
        let ops = ops_with_mock(untouched_store());
        ops.delete_directory(&uri).await.unwrap();
        assert!(!root.exists());
    }

    #[tokio::test]
    async fn test_delete_missing_local_path_is_internal() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        let ops = ops_with_mock(untouched_store());
        let err = ops
            .delete_directory(missing.to_str().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Internal { .. }));
    }

    #[tokio::test]
    async fn test_delete_rejects_traversal() {
        let ops = ops_with_mock(untouched_store());
        let err = ops
            .delete_directory("file:///data/models/../../etc")
            .await
            .unwrap_err();
        assert!(err.is_invalid_location());
    }

    #[tokio::test]
    async fn test_delete_rejects_unsupported_scheme() {
        let ops = ops_with_mock(untouched_store());
        let err = ops
            .delete_directory("https://example.com/models/m1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidLocation(msg) if msg.contains("Unsupported URI scheme")));
    }

    #[tokio::test]
    async fn test_delete_prefix_removes_all_pages() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_prefix()
            .with(eq("bucket"), eq("models/m1"), eq(None::<String>))
            .times(1)
            .returning(|_, _, _| {
                Ok(ListPage {
                    keys: vec!["models/m1/a".into(), "models/m1/b".into()],
                    truncated: true,
                    continuation_token: Some("next".into()),
                })
            });
        store
            .expect_list_prefix()
            .with(eq("bucket"), eq("models/m1"), eq(Some("next".to_string())))
            .times(1)
            .returning(|_, _, _| {
                Ok(ListPage {
                    keys: vec!["models/m1/c".into()],
                    ..ListPage::default()
                })
            });
        store.expect_delete_object().times(3).returning(|_, _| Ok(()));

        let ops = ops_with_mock(store);
        ops.delete_directory("s3://bucket/models/m1").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_empty_prefix_succeeds() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_prefix()
            .times(1)
            .returning(|_, _, _| Ok(ListPage::default()));

        let ops = ops_with_mock(store);
        ops.delete_directory("s3://bucket/absent/").await.unwrap();
    }

    #[tokio::test]
    async fn test_create_directory_writes_marker() {
        let mut store = MockObjectStore::new();
        store
            .expect_prefix_exists()
            .with(eq("bucket"), eq("models/m1/"))
            .times(1)
            .returning(|_, _| Ok(false));
        store
            .expect_put_directory_marker()
            .with(eq("bucket"), eq("models/m1/"))
            .times(1)
            .returning(|_, _| Ok(()));

        let ops = ops_with_mock(store);
        let uri = ops.create_directory("s3://bucket/models/m1").await.unwrap();
        assert_eq!(uri, "s3://bucket/models/m1/");
    }

    #[tokio::test]
    async fn test_create_directory_on_occupied_prefix_fails() {
        let mut store = MockObjectStore::new();
        store
            .expect_prefix_exists()
            .with(eq("bucket"), eq("models/m1/"))
            .times(1)
            .returning(|_, _| Ok(true));

        let ops = ops_with_mock(store);
        let err = ops
            .create_directory("s3://bucket/models/m1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
    }

    /// Object store over a shared key set, for multi-step flows the
    /// per-call mocks cannot express.
    #[derive(Debug, Default)]
    struct InMemoryStore {
        objects: std::sync::Mutex<std::collections::BTreeSet<(String, String)>>,
    }

    #[async_trait::async_trait]
    impl ObjectStore for InMemoryStore {
        async fn prefix_exists(&self, bucket: &str, prefix: &str) -> crate::Result<bool> {
            let objects = self.objects.lock().unwrap();
            Ok(objects
                .iter()
                .any(|(b, k)| b == bucket && k.starts_with(prefix)))
        }

        async fn list_prefix(
            &self,
            bucket: &str,
            prefix: &str,
            _continuation_token: Option<String>,
        ) -> crate::Result<ListPage> {
            let objects = self.objects.lock().unwrap();
            Ok(ListPage {
                keys: objects
                    .iter()
                    .filter(|(b, k)| b == bucket && k.starts_with(prefix))
                    .map(|(_, k)| k.clone())
                    .collect(),
                ..ListPage::default()
            })
        }

        async fn put_directory_marker(&self, bucket: &str, key: &str) -> crate::Result<()> {
            let mut objects = self.objects.lock().unwrap();
            objects.insert((bucket.into(), key.into()));
            Ok(())
        }

        async fn delete_object(&self, bucket: &str, key: &str) -> crate::Result<()> {
            let mut objects = self.objects.lock().unwrap();
            objects.remove(&(bucket.into(), key.into()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_create_then_observe_then_delete() {
        let ops = DirectoryOps::new(InMemoryStore::default());

        let uri = ops.create_directory("s3://bucket/models/m1").await.unwrap();
        assert_eq!(uri, "s3://bucket/models/m1/");
        assert!(ops
            .store
            .prefix_exists("bucket", "models/m1/")
            .await
            .unwrap());

        // Second create on the now-occupied prefix fails.
        let err = ops
            .create_directory("s3://bucket/models/m1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));

        ops.delete_directory("s3://bucket/models/m1/").await.unwrap();
        assert!(!ops
            .store
            .prefix_exists("bucket", "models/m1/")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_create_local_directory() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("new/nested");

        let ops = ops_with_mock(untouched_store());
        let uri = ops.create_directory(target.to_str().unwrap()).await.unwrap();
        assert!(target.is_dir());
        assert!(uri.starts_with("file:///"));
    }
}
