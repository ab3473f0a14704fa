//! Durable media storage behind a port.
//!
//! Keys look like `{prefix}/{uuid}.{ext}` and are served publicly by
//! whatever fronts the store. `LocalDiskStorage` is the local backend; an
//! S3-style backend slots in behind the same trait.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::media::extension::resolve_extension;
use crate::{Error, Result};

/// Object-storage port for downloaded chat media.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store the file at `local_path` under a fresh key, with `mime_type` as
    /// the object's content type.
    ///
    /// Every call produces a distinct key; repeated stores never overwrite
    /// each other, and the operation is not idempotent. All-or-nothing: on
    /// failure nothing durable is left behind and `Error::Storage` surfaces.
    async fn store(
        &self,
        prefix: &str,
        mime_type: Option<&str>,
        local_path: &Path,
    ) -> Result<String>;

    /// Public URL a stored key is served under, if the deployment exposes
    /// one.
    fn public_url(&self, key: &str) -> Option<String>;
}

/// Compose a storage key: trimmed prefix, fresh uuid, extension resolved
/// from the MIME type.
fn compose_key(prefix: &str, mime_type: Option<&str>) -> String {
    let prefix = prefix.trim_matches('/');
    let ext = resolve_extension(mime_type);
    let id = Uuid::new_v4();
    if prefix.is_empty() {
        format!("{id}.{ext}")
    } else {
        format!("{prefix}/{id}.{ext}")
    }
}

/// Local-filesystem backend: bytes land under `root/{key}` and are served
/// under `public_base_url/{key}` by the deployment's web server.
pub struct LocalDiskStorage {
    root: PathBuf,
    public_base_url: Option<String>,
}

impl LocalDiskStorage {
    pub fn new(root: PathBuf, public_base_url: Option<String>) -> Self {
        Self {
            root,
            public_base_url,
        }
    }
}

#[async_trait]
impl MediaStorage for LocalDiskStorage {
    async fn store(
        &self,
        prefix: &str,
        mime_type: Option<&str>,
        local_path: &Path,
    ) -> Result<String> {
        let key = compose_key(prefix, mime_type);
        let target = self.root.join(&key);

        let parent = target
            .parent()
            .ok_or_else(|| Error::Storage(format!("storage key has no parent: {key}")))?;
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::Storage(format!("creating {}: {e}", parent.display())))?;

        tokio::fs::copy(local_path, &target)
            .await
            .map_err(|e| Error::Storage(format!("storing {}: {e}", local_path.display())))?;

        tracing::debug!(key = %key, "stored media object");
        Ok(key)
    }

    fn public_url(&self, key: &str) -> Option<String> {
        let base = self.public_base_url.as_deref()?;
        Some(format!("{}/{}", base.trim_end_matches('/'), key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_fixture(dir: &Path) -> PathBuf {
        let src = dir.join("fixture.bin");
        std::fs::write(&src, b"media bytes").unwrap();
        src
    }

    #[tokio::test]
    async fn consecutive_stores_yield_distinct_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let src = write_fixture(tmp.path());
        let storage = LocalDiskStorage::new(tmp.path().join("store"), None);

        let a = storage
            .store("chats/1", Some("image/jpeg"), &src)
            .await
            .unwrap();
        let b = storage
            .store("chats/1", Some("image/jpeg"), &src)
            .await
            .unwrap();

        assert_ne!(a, b);
        assert!(a.starts_with("chats/1/") && a.ends_with(".jpg"), "{a}");
        assert!(b.starts_with("chats/1/") && b.ends_with(".jpg"), "{b}");
    }

    #[tokio::test]
    async fn stored_bytes_land_on_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let src = write_fixture(tmp.path());
        let root = tmp.path().join("store");
        let storage = LocalDiskStorage::new(root.clone(), None);

        let key = storage.store("/chats/9/", None, &src).await.unwrap();
        assert!(key.starts_with("chats/9/") && key.ends_with(".bin"), "{key}");
        assert_eq!(std::fs::read(root.join(&key)).unwrap(), b"media bytes");
    }

    #[tokio::test]
    async fn storing_a_missing_file_is_a_storage_error() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = LocalDiskStorage::new(tmp.path().join("store"), None);

        let err = storage
            .store("chats/1", None, Path::new("/nonexistent/input"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[test]
    fn public_url_joins_base_and_key() {
        let storage = LocalDiskStorage::new(
            PathBuf::from("/srv/media"),
            Some("https://cdn.example.com/media/".to_string()),
        );
        assert_eq!(
            storage.public_url("chats/1/abc.jpg").unwrap(),
            "https://cdn.example.com/media/chats/1/abc.jpg"
        );

        let bare = LocalDiskStorage::new(PathBuf::from("/srv/media"), None);
        assert!(bare.public_url("chats/1/abc.jpg").is_none());
    }
}
