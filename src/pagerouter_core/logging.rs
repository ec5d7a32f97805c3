//! 结构化日志。
//!
//! - 使用 tracing 记录路由事件（解析失败、守卫介入、导航提交）
//! - 日志级别优先读取 `RUST_LOG`，否则使用传入的默认过滤规则

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 默认过滤规则。
pub const DEFAULT_FILTER: &str = "pagerouter=info";

/// 安装全局 subscriber；重复调用返回错误而不是 panic。
pub fn init_logging(default_filter: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
}
