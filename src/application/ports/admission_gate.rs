//! Admission Gate Port - 单槽准入控制
//!
//! 同一时刻最多一个任务持有引擎；竞争时立即拒绝，不排队

use std::any::Any;
use thiserror::Error;

/// 准入门已被占用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Busy: another synthesis is in progress")]
pub struct GateBusy;

/// 执行槽的独占凭证
///
/// 释放与凭证的生命周期绑定：drop 时释放且只释放一次，
/// 任务失败或 panic 时同样释放
#[must_use = "dropping the token releases the gate immediately"]
pub struct GateToken {
    _guard: Box<dyn Any + Send + Sync>,
}

impl GateToken {
    /// 由具体实现包装其持有的资源（如 semaphore permit）
    pub fn new(guard: impl Send + Sync + 'static) -> Self {
        Self {
            _guard: Box::new(guard),
        }
    }

    /// 显式释放（等价于 drop）
    pub fn release(self) {}
}

impl std::fmt::Debug for GateToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GateToken")
    }
}

/// Admission Gate Port
pub trait AdmissionGatePort: Send + Sync {
    /// 非阻塞获取执行槽
    fn try_acquire(&self) -> Result<GateToken, GateBusy>;

    /// 当前是否有任务持有执行槽
    fn is_held(&self) -> bool;
}
