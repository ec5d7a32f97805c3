use std::collections::HashSet;
use std::sync::Arc;

use super::meta::RouteEntry;
use crate::pagerouter_core::error::{RouterError, RouterResult};
use crate::pagerouter_core::types::RouteId;

/// 只读、有序的路由表。
///
/// - 顺序就是插入顺序，下标即 RouteId
/// - 构造时校验 name / path 唯一性，重复直接拒绝
/// - 可能匹配同一 URL 的两条路径（`/post/:id` 与 `/post/new`）同样拒绝
/// - 构造完成后不可修改
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<Arc<RouteEntry>>,
}

impl RouteTable {
    pub fn new(entries: impl IntoIterator<Item = RouteEntry>) -> RouterResult<Self> {
        let mut names = HashSet::new();
        let mut paths = HashSet::new();
        let mut table: Vec<Arc<RouteEntry>> = Vec::new();

        for entry in entries {
            if !names.insert(entry.name.clone()) {
                return Err(RouterError::DuplicateRouteName { name: entry.name });
            }
            if !paths.insert(entry.path.as_str().to_string()) {
                return Err(RouterError::DuplicatePath {
                    path: entry.path.as_str().to_string(),
                });
            }
            if let Some(other) = table.iter().find(|e| e.path.overlaps(&entry.path)) {
                return Err(RouterError::AmbiguousPath {
                    path: entry.path.as_str().to_string(),
                    other: other.path.as_str().to_string(),
                });
            }
            table.push(Arc::new(entry));
        }

        Ok(Self { entries: table })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: RouteId) -> Option<&Arc<RouteEntry>> {
        self.entries.get(id.index())
    }

    pub fn by_name(&self, name: &str) -> Option<(RouteId, &Arc<RouteEntry>)> {
        self.iter().find(|(_, entry)| entry.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RouteId, &Arc<RouteEntry>)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (RouteId(i as u32), entry))
    }
}
