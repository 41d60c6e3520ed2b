//! In-Memory Admission Gate Implementation
//!
//! 基于容量为 1 的 tokio Semaphore；permit 随 GateToken drop 归还

use std::sync::Arc;
use tokio::sync::{Semaphore, TryAcquireError};

use crate::application::ports::{AdmissionGatePort, GateBusy, GateToken};

/// 单槽准入门
///
/// 每个实例独立，测试可各自构造
pub struct SemaphoreAdmissionGate {
    slot: Arc<Semaphore>,
}

impl SemaphoreAdmissionGate {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Semaphore::new(1)),
        }
    }
}

impl Default for SemaphoreAdmissionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl AdmissionGatePort for SemaphoreAdmissionGate {
    fn try_acquire(&self) -> Result<GateToken, GateBusy> {
        match self.slot.clone().try_acquire_owned() {
            Ok(permit) => {
                tracing::debug!("Admission gate acquired");
                Ok(GateToken::new(permit))
            }
            Err(TryAcquireError::NoPermits) => Err(GateBusy),
            Err(TryAcquireError::Closed) => {
                // semaphore 从不 close，按占用处理
                tracing::error!("Admission gate semaphore closed");
                Err(GateBusy)
            }
        }
    }

    fn is_held(&self) -> bool {
        self.slot.available_permits() == 0
    }
}
