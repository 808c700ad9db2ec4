use crate::orders::WriteMode;
use std::path::PathBuf;
use std::time::Duration;

/// 引擎配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (redb 数据库、日志) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 按天滚动的日志目录 |
/// | CURRENCY_CODE | INR | 三位货币代码 |
/// | COUNTRY | IN | 国家代码 |
/// | SELLER_ID | - | 当前商户 ID |
/// | WRITE_MODE | last_write_wins | 或 optimistic (带版本校验的写入) |
/// | SEARCH_DEBOUNCE_MS | 300 | 客户搜索防抖间隔 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/pos CURRENCY_CODE=EUR pos-engine quote cart.json
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub currency_code: String,
    pub country: String,
    pub seller_id: Option<String>,
    /// 订单更新的并发策略
    pub write_mode: WriteMode,
    pub search_debounce_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|v| !v.is_empty()),
            currency_code: std::env::var("CURRENCY_CODE").unwrap_or_else(|_| "INR".into()),
            country: std::env::var("COUNTRY").unwrap_or_else(|_| "IN".into()),
            seller_id: std::env::var("SELLER_ID").ok().filter(|v| !v.is_empty()),
            write_mode: std::env::var("WRITE_MODE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            search_debounce_ms: std::env::var("SEARCH_DEBOUNCE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, seller_id: Option<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.seller_id = seller_id;
        config
    }

    /// redb 数据库文件路径
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("pos.redb")
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
