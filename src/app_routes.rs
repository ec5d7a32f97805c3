//! 应用自身的路由表。
//!
//! | path          | name      | 视图      | 加载方式 |
//! |---------------|-----------|-----------|----------|
//! | `/`           | home      | VProfile  | 立即     |
//! | `/about`      | about     | VAbout    | 懒加载   |
//! | `/mint`       | mint      | VMint     | 懒加载   |
//! | `/gallery`    | gallery   | VGallery  | 懒加载   |
//! | `/post/:id`   | Post      | VPost     | 懒加载   |
//! | `/user/:name` | User      | VUser     | 懒加载   |

use crate::pagerouter_core::{
    create_router, ComponentRef, HistoryMode, NamedView, RouteEntry, RouteTable, RouterHandle,
    RouterOptions, RouterResult, ViewHandle,
};

/// 模拟按需加载视图模块：加载完成后返回对应的视图。
async fn load_view(name: &'static str) -> Result<ViewHandle, String> {
    tracing::debug!(view = name, "view chunk requested");
    Ok(NamedView::shared(name))
}

fn lazy(name: &'static str) -> ComponentRef {
    ComponentRef::lazy(name, move || load_view(name))
}

pub fn app_routes() -> RouterResult<Vec<RouteEntry>> {
    Ok(vec![
        RouteEntry::new("/", "home", ComponentRef::eager(NamedView::new("VProfile")))?,
        RouteEntry::new("/about", "about", lazy("VAbout"))?,
        RouteEntry::new("/mint", "mint", lazy("VMint"))?,
        RouteEntry::new("/gallery", "gallery", lazy("VGallery"))?,
        RouteEntry::new("/post/:id", "Post", lazy("VPost"))?,
        RouteEntry::new("/user/:name", "User", lazy("VUser"))?,
    ])
}

pub fn app_route_table() -> RouterResult<RouteTable> {
    RouteTable::new(app_routes()?)
}

/// 应用使用的路由器：Web history，挂在站点根路径。
pub fn create_app_router() -> RouterResult<RouterHandle> {
    create_router(RouterOptions::new(HistoryMode::web("/")), app_route_table()?)
}
