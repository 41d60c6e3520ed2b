//! Content Store - 文件系统内容寻址存储
//!
//! 实现 AssetStorePort trait
//!
//! 目录布局:
//! - `<hash>.<ext>`           已发布资源
//! - `.<hash>.tmp_<pid>_<ms>_<seq>` 写入中的临时文件

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::application::ports::{AssetStorePort, CachedAsset, StoreError};
use crate::domain::synthesis::ContentHash;

/// 进程内临时文件序号，保证同一毫秒内多个写入者不冲突
static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// 文件系统内容寻址存储
pub struct FileContentStore {
    /// 存储目录（首次写入时创建）
    base_dir: PathBuf,
    /// 资源文件扩展名
    extension: String,
}

impl FileContentStore {
    /// 创建新的存储，不触碰文件系统
    pub fn new(base_dir: impl AsRef<Path>, extension: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            extension: extension.into(),
        }
    }

    /// 资源最终路径
    pub fn asset_path(&self, hash: &ContentHash) -> PathBuf {
        self.base_dir.join(format!("{}.{}", hash, self.extension))
    }

    /// 本次写入专用的临时路径
    fn temp_path(&self, hash: &ContentHash) -> PathBuf {
        let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
        self.base_dir.join(format!(
            ".{}.tmp_{}_{}_{}",
            hash,
            std::process::id(),
            chrono::Utc::now().timestamp_millis(),
            seq
        ))
    }

    /// 是否为临时文件名
    pub fn is_temp_file(name: &str) -> bool {
        name.starts_with('.') && name.contains(".tmp_")
    }

    /// 已发布且非空的资源大小
    async fn published_size(path: &Path) -> Option<u64> {
        match fs::metadata(path).await {
            Ok(meta) if meta.is_file() && meta.len() > 0 => Some(meta.len()),
            _ => None,
        }
    }

    /// 写临时文件 + fsync
    async fn write_durable(path: &Path, data: &[u8]) -> std::io::Result<()> {
        let mut file = fs::File::create(path).await?;
        file.write_all(data).await?;
        file.flush().await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[async_trait]
impl AssetStorePort for FileContentStore {
    async fn put(&self, data: &[u8]) -> Result<CachedAsset, StoreError> {
        if data.is_empty() {
            return Err(StoreError::EmptyAsset);
        }

        let content_hash = ContentHash::of(data);
        let final_path = self.asset_path(&content_hash);

        if let Some(size_bytes) = Self::published_size(&final_path).await {
            tracing::debug!(hash = %content_hash, size = size_bytes, "Asset cache hit");
            return Ok(CachedAsset {
                content_hash,
                path: final_path,
                size_bytes,
            });
        }

        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| StoreError::IoError(e.to_string()))?;

        let tmp_path = self.temp_path(&content_hash);
        if let Err(e) = Self::write_durable(&tmp_path, data).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StoreError::IoError(format!(
                "Failed to write {}: {}",
                tmp_path.display(),
                e
            )));
        }

        // 原子发布：并发写入相同内容时，最后一次 rename 覆盖的是相同字节
        if let Err(e) = fs::rename(&tmp_path, &final_path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StoreError::IoError(format!(
                "Failed to publish {}: {}",
                final_path.display(),
                e
            )));
        }

        tracing::info!(
            hash = %content_hash,
            size = data.len(),
            path = %final_path.display(),
            "Asset stored"
        );

        Ok(CachedAsset {
            content_hash,
            path: final_path,
            size_bytes: data.len() as u64,
        })
    }

    async fn resolve(&self, content_hash: &ContentHash) -> Result<PathBuf, StoreError> {
        let path = self.asset_path(content_hash);
        match Self::published_size(&path).await {
            Some(_) => Ok(path),
            None => Err(StoreError::NotFound(content_hash.clone())),
        }
    }

    async fn contains(&self, content_hash: &ContentHash) -> bool {
        Self::published_size(&self.asset_path(content_hash))
            .await
            .is_some()
    }
}
