//! Storage Adapter - 内容寻址文件存储

mod content_store;

pub use content_store::FileContentStore;
