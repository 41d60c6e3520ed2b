//! 应用层错误定义
//!
//! 统一的请求处理错误类型

use thiserror::Error;

use crate::application::ports::{EngineError, GateBusy, StoreError};

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 必填字段缺失
    #[error("Missing field: {0}")]
    MissingField(String),

    /// 字段值非法
    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    /// 二进制载荷解码失败
    #[error("Invalid base64 audio data in {field}: {reason}")]
    InvalidEncoding { field: String, reason: String },

    /// 准入门被占用
    #[error("Busy: another synthesis is in progress")]
    Busy,

    /// 引擎错误
    #[error("Engine error: {0}")]
    EngineError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建字段缺失错误
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    /// 创建字段非法错误
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }

    /// 是否属于客户端输入错误
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            Self::MissingField(_) | Self::InvalidField { .. } | Self::InvalidEncoding { .. }
        )
    }
}

impl From<GateBusy> for ApplicationError {
    fn from(_: GateBusy) -> Self {
        Self::Busy
    }
}

impl From<EngineError> for ApplicationError {
    fn from(err: EngineError) -> Self {
        Self::EngineError(err.to_string())
    }
}

impl From<StoreError> for ApplicationError {
    fn from(err: StoreError) -> Self {
        Self::StorageError(err.to_string())
    }
}
