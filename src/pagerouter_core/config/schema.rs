use serde::{Deserialize, Serialize};

use super::registry::ViewRegistry;
use crate::pagerouter_core::error::{RouterError, RouterResult};
use crate::pagerouter_core::history::HistoryMode;
use crate::pagerouter_core::route::{RouteEntry, RouteTable};
use crate::pagerouter_core::router::{RouterOptions, DEFAULT_MAX_REDIRECTS};

/// 路由配置文件的根结构。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub history: HistoryConfig,
    pub routes: Vec<RouteConfig>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryModeKind {
    #[default]
    Web,
    Hash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub mode: HistoryModeKind,
    pub base: String,
    pub max_redirects: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            mode: HistoryModeKind::Web,
            base: "/".to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

/// 单条路由的配置。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    pub path: String,
    pub name: String,
    pub component: String,
    #[serde(default)]
    pub lazy: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RouterConfig {
    pub fn router_options(&self) -> RouterOptions {
        let history = match self.history.mode {
            HistoryModeKind::Web => HistoryMode::web(&self.history.base),
            HistoryModeKind::Hash => HistoryMode::hash(&self.history.base),
        };
        RouterOptions {
            history,
            max_redirects: self.history.max_redirects,
        }
    }

    /// 按配置顺序建表；组件通过 registry 解析。
    ///
    /// 应先通过 `validate_config` 校验，这里只返回遇到的第一个错误。
    pub fn build_table(&self, views: &ViewRegistry) -> RouterResult<RouteTable> {
        let entries = self
            .routes
            .iter()
            .map(|route| -> RouterResult<RouteEntry> {
                let component = views
                    .component(&route.component, route.lazy)
                    .ok_or_else(|| RouterError::ComponentLoad {
                        view: route.component.clone(),
                        reason: "component is not registered".to_string(),
                    })?;
                Ok(RouteEntry::new(&route.path, route.name.clone(), component)?
                    .with_tags(route.tags.iter().cloned()))
            })
            .collect::<RouterResult<Vec<_>>>()?;
        RouteTable::new(entries)
    }
}
