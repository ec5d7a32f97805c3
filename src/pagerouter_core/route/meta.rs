use super::component::ComponentRef;
use super::pattern::PathPattern;
use crate::pagerouter_core::error::RouterResult;

/// 路由表中的一行：path → 页面视图的绑定。
///
/// 描述"这条路是什么"、"叫什么名字"、"由哪个视图渲染"。
#[derive(Debug, Clone)]
pub struct RouteEntry {
    /// 路由的路径模式，用于 URL 匹配。
    ///
    /// 例如：
    /// - "/"
    /// - "/about"
    /// - "/post/:id"
    pub path: PathPattern,

    /// 路由名，编程式导航时代替字面路径使用。
    ///
    /// 区分大小写，例如 "home" / "Post"。
    pub name: String,

    /// 页面视图（立即可用或懒加载）。
    pub component: ComponentRef,

    /// 业务标签（例如 "auth-required" / "public"）。
    ///
    /// 导航守卫可以通过 TagMatcher 根据标签决定是否生效。
    pub tags: Vec<String>,
}

impl RouteEntry {
    pub fn new(path: &str, name: impl Into<String>, component: ComponentRef) -> RouterResult<Self> {
        Ok(Self {
            path: PathPattern::parse(path)?,
            name: name.into(),
            component,
            tags: Vec::new(),
        })
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
