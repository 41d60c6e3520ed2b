//! Asset Store Port - 内容寻址音频存储
//!
//! 定义音频资源存储的抽象接口，具体实现在 infrastructure/adapters/storage 层

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::synthesis::ContentHash;

/// 存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Asset not found: {0}")]
    NotFound(ContentHash),

    #[error("Refusing to store empty asset")]
    EmptyAsset,

    #[error("IO error: {0}")]
    IoError(String),
}

/// 已缓存的音频资源
///
/// 写入后不可变，相同内容只存一份
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedAsset {
    pub content_hash: ContentHash,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Asset Store Port
///
/// 以 SHA-256 为 key 的去重存储
/// - 最终路径: `<dir>/<hash>.<ext>`
/// - 临时文件: `<dir>/.<hash>.tmp_*`，读取方不得视为有效资源
#[async_trait]
pub trait AssetStorePort: Send + Sync {
    /// 存储字节内容
    ///
    /// 已存在且非空时直接返回（去重命中），否则写临时文件 + fsync + 原子 rename
    async fn put(&self, data: &[u8]) -> Result<CachedAsset, StoreError>;

    /// 解析内容引用到可读取的路径
    async fn resolve(&self, content_hash: &ContentHash) -> Result<PathBuf, StoreError>;

    /// 检查资源是否存在且非空
    async fn contains(&self, content_hash: &ContentHash) -> bool;
}
