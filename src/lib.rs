//! pagerouter：单页应用的路由表与 history 模式路由器。
//!
//! - `pagerouter_core`：路由表、匹配、导航、守卫、配置等核心能力
//! - `app_routes`：应用自身声明的路由表

pub mod app_routes;
pub mod pagerouter_core;

pub use pagerouter_core::*;
