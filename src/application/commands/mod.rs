//! 应用层 - 命令
//!
//! 合成请求的规范化与执行

mod synthesize_commands;

pub mod handlers;

pub use synthesize_commands::*;
