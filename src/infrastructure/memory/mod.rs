//! In-Memory Implementations
//!
//! 进程内共享状态：单槽准入门

mod admission_gate;

pub use admission_gate::SemaphoreAdmissionGate;
