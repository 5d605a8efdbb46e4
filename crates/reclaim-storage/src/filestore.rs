// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filesystem-backed file store: one directory per bucket under a
//! configured root, with public URLs issued against a configured base.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use reclaim_config::model::FilesConfig;
use reclaim_core::{Adapter, AdapterType, Bucket, FileStore, HealthStatus, ReclaimError};

/// Local-disk implementation of [`FileStore`].
pub struct LocalFileStore {
    root: PathBuf,
    base_url: String,
}

impl LocalFileStore {
    pub fn new(config: &FilesConfig) -> Self {
        Self {
            root: PathBuf::from(&config.root_dir),
            base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolves an object path under the bucket directory, rejecting
    /// anything that could escape the root.
    fn object_path(&self, bucket: Bucket, path: &str) -> Result<PathBuf, ReclaimError> {
        validate_object_path(path)?;
        Ok(self.root.join(bucket.to_string()).join(path))
    }
}

fn validate_object_path(path: &str) -> Result<(), ReclaimError> {
    if path.is_empty() {
        return Err(ReclaimError::Validation(
            "object path must not be empty".to_string(),
        ));
    }
    let candidate = Path::new(path);
    for component in candidate.components() {
        match component {
            Component::Normal(_) => {}
            _ => {
                return Err(ReclaimError::Validation(format!(
                    "invalid object path `{path}`"
                )));
            }
        }
    }
    Ok(())
}

#[async_trait]
impl Adapter for LocalFileStore {
    fn name(&self) -> &str {
        "local-files"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::FileStore
    }

    async fn health_check(&self) -> Result<HealthStatus, ReclaimError> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|err| {
            ReclaimError::remote_with(
                format!("file store root `{}` is not writable", self.root.display()),
                err,
            )
        })?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ReclaimError> {
        Ok(())
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn upload(&self, bucket: Bucket, path: &str, bytes: &[u8]) -> Result<(), ReclaimError> {
        let target = self.object_path(bucket, path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|err| {
                ReclaimError::remote_with("failed to create object directory", err)
            })?;
        }
        tokio::fs::write(&target, bytes)
            .await
            .map_err(|err| ReclaimError::remote_with("failed to write object", err))?;
        debug!(bucket = %bucket, path, size = bytes.len(), "stored object");
        Ok(())
    }

    fn public_url(&self, bucket: Bucket, path: &str) -> String {
        format!("{}/{bucket}/{path}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_store(root: &Path) -> LocalFileStore {
        LocalFileStore::new(&FilesConfig {
            root_dir: root.display().to_string(),
            public_base_url: "http://localhost:8000/storage/".to_string(),
        })
    }

    #[tokio::test]
    async fn upload_writes_bytes_under_the_bucket_directory() {
        let dir = tempdir().unwrap();
        let store = make_store(dir.path());

        store
            .upload(Bucket::Proofs, "user-a/1710000000.png", b"proof")
            .await
            .unwrap();

        let stored =
            std::fs::read(dir.path().join("proofs").join("user-a/1710000000.png")).unwrap();
        assert_eq!(stored, b"proof");
    }

    #[tokio::test]
    async fn upload_overwrites_existing_objects() {
        let dir = tempdir().unwrap();
        let store = make_store(dir.path());

        store
            .upload(Bucket::Avatars, "user-a/pic.jpg", b"one")
            .await
            .unwrap();
        store
            .upload(Bucket::Avatars, "user-a/pic.jpg", b"two")
            .await
            .unwrap();

        let stored = std::fs::read(dir.path().join("avatars/user-a/pic.jpg")).unwrap();
        assert_eq!(stored, b"two");
    }

    #[tokio::test]
    async fn traversal_and_absolute_paths_are_rejected() {
        let dir = tempdir().unwrap();
        let store = make_store(dir.path());

        for bad in ["../escape.png", "/etc/passwd", "a/../../b.png", ""] {
            let result = store.upload(Bucket::ItemImages, bad, b"x").await;
            assert!(
                matches!(result, Err(ReclaimError::Validation(_))),
                "expected `{bad}` to be rejected"
            );
        }
    }

    #[test]
    fn public_url_joins_base_bucket_and_path() {
        let dir = tempdir().unwrap();
        let store = make_store(dir.path());

        assert_eq!(
            store.public_url(Bucket::ItemImages, "user-a/1710000000.webp"),
            "http://localhost:8000/storage/item-images/user-a/1710000000.webp"
        );
    }
}
