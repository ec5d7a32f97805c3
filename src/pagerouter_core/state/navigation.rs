use serde::Serialize;

use crate::pagerouter_core::location::Location;
use crate::pagerouter_core::route::ResolvedRoute;
use crate::pagerouter_core::types::{NavigationId, NavigationKind};

//
// ========== 导航状态模型：Navigation / RouterState ==========
//

/// 一次已提交的导航，对应渲染层需要展示的一页内容。
///
/// - 绑定命中的路由（ResolvedRoute，含 path 参数）
/// - 记录完整地址（含 query / hash）
/// - 如果由守卫重定向而来，保留原始地址
#[derive(Debug, Clone, Serialize)]
pub struct Navigation {
    /// 路由器分配的导航序号。
    pub id: NavigationId,

    /// 导航来源。
    pub kind: NavigationKind,

    /// 最终地址。
    pub location: Location,

    /// 命中的路由。
    pub route: ResolvedRoute,

    /// 被守卫重定向之前的地址（可选）。
    pub redirected_from: Option<Location>,
}

impl Navigation {
    pub fn full_path(&self) -> String {
        self.location.full_path()
    }
}

/// 路由器在导航之间保存的全部状态。
///
/// 路由表本身不可变，这里只有"当前导航"指针和序号分配器，
/// 只由 RouterHandle 自己修改。
#[derive(Debug, Default)]
pub struct RouterState {
    /// 当前生效的导航；start() 之前为 None。
    pub current: Option<Navigation>,

    /// 下一个导航序号。
    next_id: u64,
}

impl RouterState {
    pub fn allocate_id(&mut self) -> NavigationId {
        self.next_id += 1;
        NavigationId(self.next_id)
    }

    /// 提交一次导航，返回被替换掉的旧导航。
    pub fn commit(&mut self, navigation: Navigation) -> Option<Navigation> {
        self.current.replace(navigation)
    }

    pub fn current_full_path(&self) -> Option<String> {
        self.current.as_ref().map(Navigation::full_path)
    }
}
