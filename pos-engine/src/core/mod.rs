//! 核心模块 - 配置与会话上下文
//!
//! - [`Config`] - 环境变量配置
//! - [`SessionContext`] - 当前商户、权限、货币

pub mod config;
pub mod session;

pub use config::Config;
pub use session::SessionContext;
