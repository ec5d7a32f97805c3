use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::component::ViewHandle;
use super::meta::RouteEntry;
use crate::pagerouter_core::error::RouterResult;
use crate::pagerouter_core::types::{RouteId, RouteParams};

/// 基于 path/name 解析得到的「路由解析结果」。
///
/// - 持有 RouteEntry 的 Arc，懒加载 future 不借用路由器
/// - 含 path 参数（例如 ":id" -> "42"）
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    /// 路由 ID。
    pub id: RouteId,

    /// 命中的路由表行。
    pub entry: Arc<RouteEntry>,

    /// path 参数（":id" / ":name" 等），已做 percent 解码。
    pub path_params: RouteParams,
}

impl ResolvedRoute {
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.path_params.get(key)
    }

    /// 取得要渲染的视图；懒加载组件在这里等待加载完成。
    pub async fn load_component(&self) -> RouterResult<ViewHandle> {
        self.entry.component.load().await
    }

    pub fn same_route(&self, other: &ResolvedRoute) -> bool {
        self.id == other.id && self.path_params == other.path_params
    }
}

impl Serialize for ResolvedRoute {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ResolvedRoute", 5)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("name", self.name())?;
        s.serialize_field("pattern", self.entry.path.as_str())?;
        s.serialize_field("component", self.entry.component.view_name())?;
        s.serialize_field("params", &self.path_params)?;
        s.end()
    }
}
