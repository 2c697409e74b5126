// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use std::path::PathBuf;

use super::{AssetError, AssetStore};

/// Writes assets under a root directory; public URLs are the configured
/// base followed by the relative path.
pub struct LocalFsAssetStore {
    root: PathBuf,
    public_base: String,
}

impl LocalFsAssetStore {
    #[must_use]
    pub fn new(root: PathBuf, public_base: impl Into<String>) -> Self {
        Self {
            root,
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn path_for_url(&self, url: &str) -> Result<PathBuf, AssetError> {
        let relative = url
            .strip_prefix(&self.public_base)
            .map(|r| r.trim_start_matches('/'))
            .ok_or_else(|| AssetError(format!("url outside asset base: {url}")))?;
        if relative.is_empty() || relative.split('/').any(|seg| seg == "..") {
            return Err(AssetError(format!("invalid asset url: {url}")));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl AssetStore for LocalFsAssetStore {
    async fn put(
        &self,
        relative_path: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<String, AssetError> {
        if relative_path.split('/').any(|seg| seg == "..") {
            return Err(AssetError(format!("invalid asset path: {relative_path}")));
        }
        let target = self.root.join(relative_path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AssetError(format!("mkdir {}: {e}", parent.display())))?;
        }
        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| AssetError(format!("write {}: {e}", target.display())))?;
        Ok(format!("{}/{relative_path}", self.public_base))
    }

    async fn get_by_url(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.path_for_url(url)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| AssetError(format!("read {}: {e}", path.display())))
    }

    async fn delete_by_url(&self, url: &str) -> Result<(), AssetError> {
        let path = self.path_for_url(url)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // Already gone is fine; the URL field gets cleared either way.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AssetError(format!("remove {}: {e}", path.display()))),
        }
    }
}