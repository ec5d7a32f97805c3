use std::sync::Arc;

use crate::pagerouter_core::location::{Location, RouteTarget};
use crate::pagerouter_core::route::ResolvedRoute;
use crate::pagerouter_core::state::Navigation;
use crate::pagerouter_core::types::{GuardId, NavigationKind};

//
// ========== Matcher 相关 ==========
//

/// 守卫执行时可以访问的信息（只读）。
#[derive(Debug)]
pub struct GuardContext<'a> {
    /// 即将进入的路由。
    pub to: &'a ResolvedRoute,

    /// 即将进入的地址（含 query / hash）。
    pub to_location: &'a Location,

    /// 当前已生效的导航；首次导航时为 None。
    pub from: Option<&'a Navigation>,

    /// 导航来源：push / replace / pop / initial。
    pub kind: NavigationKind,
}

/// GuardMatcher trait：决定守卫是否对当前导航生效。
pub trait GuardMatcher: Send + Sync {
    /// 判断是否匹配。
    fn matches(&self, ctx: &GuardContext) -> bool;

    /// 可选：返回一个描述性名称，用于调试。
    fn name(&self) -> &str {
        "unnamed_matcher"
    }
}

//
// ========== Guard 相关 ==========
//

/// 守卫执行结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// 继续执行后续守卫。
    Continue,

    /// 中止导航，不再执行后续守卫。
    ///
    /// 可以携带一个原因说明。
    Abort { reason: String },

    /// 改为导航到另一个目标（以 replace 方式）。
    Redirect { target: RouteTarget },
}

impl GuardOutcome {
    pub fn abort(reason: impl Into<String>) -> Self {
        GuardOutcome::Abort {
            reason: reason.into(),
        }
    }

    pub fn redirect(target: impl Into<RouteTarget>) -> Self {
        GuardOutcome::Redirect {
            target: target.into(),
        }
    }
}

/// NavigationGuard trait：守卫的具体执行逻辑。
pub trait NavigationGuard: Send + Sync {
    /// 检查这次导航。
    fn check(&self, ctx: &GuardContext) -> GuardOutcome;

    /// 可选：返回一个描述性名称，用于调试。
    fn name(&self) -> &str {
        "unnamed_guard"
    }
}

/// 完整的前置守卫定义。
///
/// 一个守卫由以下部分组成：
/// - Matcher：决定是否对当前导航生效
/// - NavigationGuard：具体的检查逻辑
/// - Priority：执行顺序
#[derive(Clone)]
pub struct Guard {
    /// 守卫唯一标识。
    pub id: GuardId,

    /// 匹配器：决定这个守卫是否对当前导航生效。
    pub matcher: Arc<dyn GuardMatcher>,

    /// 具体的检查逻辑。
    pub guard: Arc<dyn NavigationGuard>,

    /// 优先级：数值越小越先执行，相同优先级按注册顺序。
    pub priority: i32,
}

impl Guard {
    pub fn new(
        id: impl Into<Arc<str>>,
        matcher: impl GuardMatcher + 'static,
        guard: impl NavigationGuard + 'static,
    ) -> Self {
        Self {
            id: GuardId(id.into()),
            matcher: Arc::new(matcher),
            guard: Arc::new(guard),
            priority: 0,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl std::fmt::Debug for Guard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guard")
            .field("id", &self.id)
            .field("matcher", &self.matcher.name())
            .field("guard", &self.guard.name())
            .field("priority", &self.priority)
            .finish()
    }
}

/// 导航提交后的只读监听器。
pub type AfterEachHook = Arc<dyn Fn(&Navigation) + Send + Sync>;

//
// ========== 闭包实现 ==========
//

/// 用闭包实现 GuardMatcher（返回 bool）或 NavigationGuard（返回 GuardOutcome）。
pub struct FnHook<F> {
    name: String,
    func: F,
}

impl<F> FnHook<F>
where
    F: Fn(&GuardContext) -> bool + Send + Sync,
{
    pub fn matcher(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> FnHook<F>
where
    F: Fn(&GuardContext) -> GuardOutcome + Send + Sync,
{
    pub fn guard(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> GuardMatcher for FnHook<F>
where
    F: Fn(&GuardContext) -> bool + Send + Sync,
{
    fn matches(&self, ctx: &GuardContext) -> bool {
        (self.func)(ctx)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> NavigationGuard for FnHook<F>
where
    F: Fn(&GuardContext) -> GuardOutcome + Send + Sync,
{
    fn check(&self, ctx: &GuardContext) -> GuardOutcome {
        (self.func)(ctx)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// 匹配所有导航。
pub struct AlwaysMatcher;

impl GuardMatcher for AlwaysMatcher {
    fn matches(&self, _ctx: &GuardContext) -> bool {
        true
    }
}

/// 目标路由带有指定标签时匹配。
pub struct TagMatcher {
    tag: String,
}

impl TagMatcher {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl GuardMatcher for TagMatcher {
    fn matches(&self, ctx: &GuardContext) -> bool {
        ctx.to.entry.has_tag(&self.tag)
    }

    fn name(&self) -> &str {
        &self.tag
    }
}
