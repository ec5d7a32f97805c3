use super::types::{AfterEachHook, Guard, GuardContext, GuardOutcome};
use crate::pagerouter_core::state::Navigation;
use crate::pagerouter_core::types::GuardId;

/// 路由器持有的守卫链。
///
/// - before：导航提交前执行，可以中止或重定向
/// - after：导航提交后执行，只读
#[derive(Default, Clone)]
pub struct GuardChain {
    /// 前置守卫，始终按 priority 升序排列（稳定排序）。
    before: Vec<Guard>,

    /// 后置监听器，按注册顺序调用。
    after: Vec<AfterEachHook>,
}

impl GuardChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_before(&mut self, guard: Guard) {
        let at = self
            .before
            .partition_point(|g| g.priority <= guard.priority);
        self.before.insert(at, guard);
    }

    pub fn remove_before(&mut self, id: &GuardId) -> bool {
        let len = self.before.len();
        self.before.retain(|g| &g.id != id);
        self.before.len() != len
    }

    pub fn add_after(&mut self, hook: AfterEachHook) {
        self.after.push(hook);
    }

    pub fn before_ids(&self) -> impl Iterator<Item = &GuardId> {
        self.before.iter().map(|g| &g.id)
    }

    /// 依次执行匹配的前置守卫，返回第一个非 Continue 的结果。
    pub fn run_before(&self, ctx: &GuardContext) -> (GuardOutcome, Option<GuardId>) {
        for guard in self.before.iter().filter(|g| g.matcher.matches(ctx)) {
            let outcome = guard.guard.check(ctx);
            if outcome != GuardOutcome::Continue {
                tracing::debug!(
                    guard = %guard.id,
                    route = ctx.to.name(),
                    ?outcome,
                    "navigation guard intervened"
                );
                return (outcome, Some(guard.id.clone()));
            }
        }
        (GuardOutcome::Continue, None)
    }

    pub fn run_after(&self, navigation: &Navigation) {
        for hook in &self.after {
            hook(navigation);
        }
    }
}

impl std::fmt::Debug for GuardChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardChain")
            .field("before", &self.before)
            .field("after", &self.after.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::pagerouter_core::guard::{AlwaysMatcher, FnHook, GuardMatcher, TagMatcher};
    use crate::pagerouter_core::location::Location;
    use crate::pagerouter_core::route::{ComponentRef, NamedView, ResolvedRoute, RouteEntry};
    use crate::pagerouter_core::types::{NavigationKind, RouteId, RouteParams};

    fn resolved(tags: &[&str]) -> ResolvedRoute {
        let entry = RouteEntry::new("/mint", "mint", ComponentRef::eager(NamedView::new("VMint")))
            .unwrap()
            .with_tags(tags.iter().copied());
        ResolvedRoute {
            id: RouteId(2),
            entry: Arc::new(entry),
            path_params: RouteParams::new(),
        }
    }

    fn recording(
        id: &str,
        matcher: impl GuardMatcher + 'static,
        log: &Arc<Mutex<Vec<String>>>,
        outcome: GuardOutcome,
    ) -> Guard {
        let log = Arc::clone(log);
        let label = id.to_string();
        let guard = FnHook::guard(id, move |_ctx: &GuardContext| {
            log.lock().unwrap().push(label.clone());
            outcome.clone()
        });
        Guard::new(id, matcher, guard)
    }

    fn push_ctx<'a>(to: &'a ResolvedRoute, loc: &'a Location) -> GuardContext<'a> {
        GuardContext {
            to,
            to_location: loc,
            from: None,
            kind: NavigationKind::Push,
        }
    }

    #[test]
    fn test_runs_in_priority_order_and_stops() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = GuardChain::new();
        let pass = GuardOutcome::Continue;
        chain.add_before(recording("late", AlwaysMatcher, &log, pass.clone()).with_priority(10));
        chain.add_before(recording("first", AlwaysMatcher, &log, pass).with_priority(-1));
        chain.add_before(recording("blocker", AlwaysMatcher, &log, GuardOutcome::abort("nope")));

        let to = resolved(&[]);
        let loc = Location::from_path("/mint");
        let ctx = push_ctx(&to, &loc);

        let (outcome, by) = chain.run_before(&ctx);
        assert_eq!(outcome, GuardOutcome::abort("nope"));
        assert_eq!(by, Some(GuardId("blocker".into())));
        assert_eq!(*log.lock().unwrap(), vec!["first", "blocker"]);
    }

    #[test]
    fn test_tag_matcher_skips_untagged_routes() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = GuardChain::new();
        let blocked = GuardOutcome::abort("connect wallet");
        chain.add_before(recording("wallet", TagMatcher::new("wallet"), &log, blocked.clone()));

        let loc = Location::from_path("/mint");
        let plain = resolved(&[]);
        assert_eq!(chain.run_before(&push_ctx(&plain, &loc)).0, GuardOutcome::Continue);

        let tagged = resolved(&["wallet"]);
        assert_eq!(chain.run_before(&push_ctx(&tagged, &loc)).0, blocked);

        let copy = chain.clone();
        assert_eq!(copy.before_ids().count(), 1);

        assert!(chain.remove_before(&GuardId("wallet".into())));
        assert_eq!(chain.before_ids().count(), 0);
    }
}
