//! POS Engine - 订单定价与结账引擎
//!
//! # 架构概述
//!
//! - **定价** (`pricing`): 税费合并、含税/不含税计算、折扣校验
//! - **订单** (`orders`): 订单组装、结账、生命周期 (上菜/加菜/删菜/状态)
//! - **存储** (`store`): 文档存储 (内存 / redb)
//! - **客户** (`customers`): 防抖客户搜索
//! - **报表** (`reports`): 销售统计与趋势
//!
//! # 模块结构
//!
//! ```text
//! pos-engine/src/
//! ├── core/          # 配置、会话
//! ├── pricing/       # 合并器、折扣
//! ├── orders/        # 组装、结账、生命周期
//! ├── store/         # DocumentStore 及实现
//! ├── customers/     # 客户搜索
//! ├── reports.rs     # 销售报表
//! ├── currency.rs    # 货币表
//! ├── money.rs       # Decimal 显示与汇总
//! └── utils/         # 日志、校验
//! ```

pub mod core;
pub mod currency;
pub mod customers;
pub mod money;
pub mod orders;
pub mod pricing;
pub mod reports;
pub mod store;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, SessionContext};
pub use orders::{
    CheckoutReceipt, CheckoutRequest, CheckoutService, OrderError, OrderLifecycle, OrderResult,
    ValidationError, WriteMode,
};
pub use pricing::{CartQuote, quote};
pub use store::{DocumentStore, MemoryDocumentStore, RedbDocumentStore, StoreError};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境: 加载 .env、创建工作目录、初始化日志
///
/// 返回加载后的配置。
pub fn setup_environment() -> anyhow::Result<Config> {
    // .env 可选
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)
        .map_err(|e| anyhow::anyhow!("Failed to create work dir {}: {}", config.work_dir, e))?;

    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    tracing::debug!(work_dir = %config.work_dir, write_mode = ?config.write_mode, "Environment ready");

    Ok(config)
}
