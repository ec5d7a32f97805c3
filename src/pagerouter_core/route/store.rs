use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use super::meta::RouteEntry;
use super::pattern::{canonical_path, decode_segment};
use super::resolved::ResolvedRoute;
use super::table::RouteTable;
use crate::pagerouter_core::error::{RouterError, RouterResult};
use crate::pagerouter_core::types::{RouteId, RouteParams};

/// 路由表的查询结构：
///
/// - 原始 RouteTable（保持插入顺序）
/// - name -> RouteId 索引
/// - path -> RouteId 匹配（基于 matchit）
pub struct RouteStore {
    /// 所有路由，下标就是 RouteId 的值。
    table: RouteTable,

    /// name-based 索引："Post" -> RouteId(4)
    name_index: HashMap<String, RouteId>,

    /// path-based 索引，使用 matchit 做底层结构。
    ///
    /// 例如：
    ///     "/about"    -> RouteId(1)
    ///     "/post/:id" -> RouteId(4)
    path_router: MatchitRouter<RouteId>,
}

impl RouteStore {
    /// 从路由表建立索引。
    ///
    /// RouteTable 已经排除了重叠路径；matchit 仍拒绝插入时返回
    /// `PathConflict`。
    pub fn build(table: RouteTable) -> RouterResult<Self> {
        let mut name_index = HashMap::with_capacity(table.len());
        let mut path_router = MatchitRouter::new();

        for (id, entry) in table.iter() {
            let path = entry.path.as_str().to_string();
            path_router
                .insert(path.clone(), id)
                .map_err(|source| RouterError::PathConflict { path, source })?;
            name_index.insert(entry.name.clone(), id);
        }

        tracing::debug!(routes = table.len(), "route store built");
        Ok(Self {
            table,
            name_index,
            path_router,
        })
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn entry(&self, id: RouteId) -> Option<&Arc<RouteEntry>> {
        self.table.get(id)
    }

    pub fn id_by_name(&self, name: &str) -> Option<RouteId> {
        self.name_index.get(name).copied()
    }

    /// 按路径匹配路由，并解码捕获到的参数。
    ///
    /// `path` 不含 query / hash；末尾的 `/` 不参与匹配（根路径除外）。
    /// 各 segment 先规范编码，与建表时的字面量片段保持一致。
    pub fn match_path(&self, path: &str) -> RouterResult<ResolvedRoute> {
        let lookup = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ if path.is_empty() => "/",
            _ => path,
        };
        let lookup = canonical_path(lookup);

        let matched = self
            .path_router
            .at(&lookup)
            .map_err(|_| RouterError::RouteNotFound {
                path: path.to_string(),
            })?;

        let id = *matched.value;
        let entry = self
            .table
            .get(id)
            .ok_or_else(|| RouterError::RouteNotFound {
                path: path.to_string(),
            })?;
        let path_params: RouteParams = matched
            .params
            .iter()
            .map(|(k, v)| (k, decode_segment(v)))
            .collect();

        Ok(ResolvedRoute {
            id,
            entry: Arc::clone(entry),
            path_params,
        })
    }

    /// 按路由名解析，同时生成该路由的具体路径。
    pub fn resolve_named(
        &self,
        name: &str,
        params: &RouteParams,
    ) -> RouterResult<(String, ResolvedRoute)> {
        let id = self
            .id_by_name(name)
            .ok_or_else(|| RouterError::RouteNameNotFound {
                name: name.to_string(),
            })?;
        let entry = self
            .table
            .get(id)
            .ok_or_else(|| RouterError::RouteNameNotFound {
                name: name.to_string(),
            })?;

        let path = entry.path.build(&entry.name, params)?;
        let path_params = entry
            .path
            .param_names()
            .filter_map(|k| params.get(k).map(|v| (k, v)))
            .collect();

        Ok((
            path,
            ResolvedRoute {
                id,
                entry: Arc::clone(entry),
                path_params,
            },
        ))
    }
}

impl fmt::Debug for RouteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteStore")
            .field("table", &self.table)
            .field("name_index", &self.name_index)
            .finish_non_exhaustive()
    }
}
