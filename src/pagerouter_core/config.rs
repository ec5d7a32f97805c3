//! 路由配置子系统。
//!
//! ```text
//! 配置文件 (TOML)
//!     → loader.rs（读取 & 反序列化）
//!     → validation.rs（语义校验，一次性收集所有错误）
//!     → RouterConfig
//!     → build_table(&ViewRegistry) → RouteTable
//! ```
//!
//! - 所有字段都有默认值，最小配置只需要 `[[routes]]`
//! - 语法错误由 serde 报告，语义错误由 validation 报告

mod loader;
mod registry;
mod schema;
mod validation;

pub use loader::*;
pub use registry::*;
pub use schema::*;
pub use validation::*;
