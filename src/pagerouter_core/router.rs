use crate::pagerouter_core::error::{RouterError, RouterResult};
use crate::pagerouter_core::guard::{Guard, GuardChain, GuardContext, GuardOutcome};
use crate::pagerouter_core::history::{History, HistoryMode, MemoryHistory};
use crate::pagerouter_core::location::{Location, RouteTarget};
use crate::pagerouter_core::route::{ResolvedRoute, RouteStore, RouteTable};
use crate::pagerouter_core::state::{Navigation, RouterState};
use crate::pagerouter_core::types::{GuardId, NavigationKind, RouteParams};

/// 守卫连续重定向的默认上限。
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// 创建路由器时的配置，创建之后不再改变。
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// 地址呈现方式：Web（path）或 Hash（fragment）。
    pub history: HistoryMode,

    /// 守卫连续重定向的上限，超过后返回 `RedirectLoop`。
    pub max_redirects: usize,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            history: HistoryMode::default(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl RouterOptions {
    pub fn new(history: HistoryMode) -> Self {
        Self {
            history,
            ..Self::default()
        }
    }
}

/// 用内存 history 创建路由器，初始位置为应用根路径。
pub fn create_router(
    options: RouterOptions,
    routes: RouteTable,
) -> RouterResult<RouterHandle<MemoryHistory>> {
    let initial = options.history.href(&Location::from_path("/"));
    RouterHandle::with_history(options, routes, MemoryHistory::new(initial))
}

/// 应用会话期间唯一的路由器实例。
///
/// 导航流程：
///
/// ```text
/// RouteTarget / popstate href
///     → resolve（RouteStore：matchit + name 索引）
///     → before 守卫（Continue / Abort / Redirect）
///     → 写入 History（push / replace）
///     → 提交为 current
///     → after 监听器
/// ```
///
/// 每次导航都在 `&mut self` 上同步完成，不存在并发的解析。
#[derive(Debug)]
pub struct RouterHandle<H: History = MemoryHistory> {
    store: RouteStore,
    options: RouterOptions,
    history: H,
    guards: GuardChain,
    state: RouterState,
}

impl<H: History> RouterHandle<H> {
    pub fn with_history(
        options: RouterOptions,
        routes: RouteTable,
        history: H,
    ) -> RouterResult<Self> {
        let store = RouteStore::build(routes)?;
        tracing::info!(
            routes = store.table().len(),
            mode = ?options.history,
            "router created"
        );
        Ok(Self {
            store,
            options,
            history,
            guards: GuardChain::new(),
            state: RouterState::default(),
        })
    }

    pub fn routes(&self) -> &RouteTable {
        self.store.table()
    }

    pub fn mode(&self) -> &HistoryMode {
        &self.options.history
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn current(&self) -> Option<&Navigation> {
        self.state.current.as_ref()
    }

    /// 异步加载结束后，渲染层用它判断这次导航是否已被后续导航取代。
    pub fn is_current(&self, navigation: &Navigation) -> bool {
        self.state
            .current
            .as_ref()
            .is_some_and(|current| current.id == navigation.id)
    }

    //
    // ========== 解析（纯函数，不改变状态） ==========
    //

    /// URL → 路由 + path 参数。
    pub fn resolve(&self, url: &str) -> RouterResult<ResolvedRoute> {
        self.resolve_target(&RouteTarget::Path(url.to_string()))
            .map(|(_, route)| route)
    }

    /// 路由名 + 参数 → 路由，与按生成的路径解析结果一致。
    pub fn resolve_named(&self, name: &str, params: &RouteParams) -> RouterResult<ResolvedRoute> {
        self.store
            .resolve_named(name, params)
            .map(|(_, route)| route)
    }

    pub fn resolve_target(&self, target: &RouteTarget) -> RouterResult<(Location, ResolvedRoute)> {
        let resolved = match target {
            RouteTarget::Path(url) => {
                let location = Location::parse(url)?;
                self.store
                    .match_path(&location.path)
                    .map(|route| (location, route))
            }
            RouteTarget::Named {
                name,
                params,
                query,
            } => self
                .store
                .resolve_named(name, params)
                .map(|(path, route)| {
                    (Location::from_path(path).with_query(query.clone()), route)
                }),
        };
        if let Err(err) = &resolved {
            tracing::debug!(?target, error = %err, "route resolution failed");
        }
        resolved
    }

    /// 路由名 + 参数 → 宿主可见的 href。
    pub fn href_for(&self, name: &str, params: &RouteParams) -> RouterResult<String> {
        let (path, _) = self.store.resolve_named(name, params)?;
        Ok(self.href(&Location::from_path(path)))
    }

    pub fn href(&self, location: &Location) -> String {
        self.options.history.href(location)
    }

    //
    // ========== 守卫 ==========
    //

    pub fn before_each(&mut self, guard: Guard) {
        self.guards.add_before(guard);
    }

    pub fn remove_guard(&mut self, id: &GuardId) -> bool {
        self.guards.remove_before(id)
    }

    pub fn after_each<F>(&mut self, hook: F)
    where
        F: Fn(&Navigation) + Send + Sync + 'static,
    {
        self.guards.add_after(std::sync::Arc::new(hook));
    }

    //
    // ========== 导航 ==========
    //

    /// 按宿主当前 href 做首次导航。
    pub fn start(&mut self) -> RouterResult<Navigation> {
        let href = self.history.location().to_string();
        let (location, route) = self.resolve_href(&href)?;
        self.run(location, route, NavigationKind::Initial, None, 0)
    }

    pub fn push(&mut self, url: &str) -> RouterResult<Navigation> {
        self.navigate(RouteTarget::Path(url.to_string()), NavigationKind::Push)
    }

    pub fn replace(&mut self, url: &str) -> RouterResult<Navigation> {
        self.navigate(RouteTarget::Path(url.to_string()), NavigationKind::Replace)
    }

    pub fn push_named(&mut self, name: &str, params: RouteParams) -> RouterResult<Navigation> {
        self.navigate(RouteTarget::named(name, params), NavigationKind::Push)
    }

    pub fn replace_named(&mut self, name: &str, params: RouteParams) -> RouterResult<Navigation> {
        self.navigate(RouteTarget::named(name, params), NavigationKind::Replace)
    }

    pub fn navigate(
        &mut self,
        target: RouteTarget,
        kind: NavigationKind,
    ) -> RouterResult<Navigation> {
        let (location, route) = self.resolve_target(&target)?;
        self.run(location, route, kind, None, 0)
    }

    pub fn back(&mut self) -> RouterResult<Navigation> {
        self.go(-1)
    }

    pub fn forward(&mut self) -> RouterResult<Navigation> {
        self.go(1)
    }

    /// 在历史记录中移动，并按新位置重新解析。
    pub fn go(&mut self, delta: i32) -> RouterResult<Navigation> {
        let href = self
            .history
            .go(delta)
            .ok_or(RouterError::NoHistoryEntry { delta })?;
        self.pop(&href, Some(delta))
    }

    /// 宿主环境触发的前进 / 后退（popstate）。
    ///
    /// 宿主的 history 已经移动到 `href`，这里只负责重新解析。
    pub fn on_pop_state(&mut self, href: &str) -> RouterResult<Navigation> {
        self.pop(href, None)
    }

    /// history 已经移动；任何失败都要把它退回去，保持与 current 一致。
    fn pop(&mut self, href: &str, delta: Option<i32>) -> RouterResult<Navigation> {
        let result = self
            .resolve_href(href)
            .and_then(|(location, route)| self.run(location, route, NavigationKind::Pop, None, 0));
        if let Err(err) = &result {
            tracing::debug!(%href, error = %err, "pop navigation failed, restoring history");
            self.restore_history(delta);
        }
        result
    }

    fn resolve_href(&self, href: &str) -> RouterResult<(Location, ResolvedRoute)> {
        let location = self.options.history.location_from_href(href)?;
        let route = self.store.match_path(&location.path)?;
        Ok((location, route))
    }

    /// 失败的 pop 导航：把宿主 history 退回到当前导航所在位置。
    fn restore_history(&mut self, delta: Option<i32>) {
        match delta {
            Some(delta) => {
                self.history.go(-delta);
            }
            None => {
                if let Some(current) = &self.state.current {
                    let href = self.options.history.href(&current.location);
                    self.history.replace(&href);
                }
            }
        }
    }

    fn run(
        &mut self,
        location: Location,
        route: ResolvedRoute,
        kind: NavigationKind,
        redirected_from: Option<Location>,
        depth: usize,
    ) -> RouterResult<Navigation> {
        let full_path = location.full_path();
        if matches!(kind, NavigationKind::Push | NavigationKind::Replace)
            && self.state.current_full_path().as_deref() == Some(full_path.as_str())
        {
            return Err(RouterError::NavigationDuplicated { path: full_path });
        }

        let (outcome, _) = self.guards.run_before(&GuardContext {
            to: &route,
            to_location: &location,
            from: self.state.current.as_ref(),
            kind,
        });

        match outcome {
            GuardOutcome::Continue => {}
            GuardOutcome::Abort { reason } => {
                tracing::warn!(path = %full_path, %reason, "navigation aborted");
                return Err(RouterError::NavigationAborted {
                    path: full_path,
                    reason,
                });
            }
            GuardOutcome::Redirect { target } => {
                if depth >= self.options.max_redirects {
                    return Err(RouterError::RedirectLoop {
                        path: full_path,
                        limit: self.options.max_redirects,
                    });
                }
                let (next_location, next_route) = self.resolve_target(&target)?;
                let next_kind = match kind {
                    NavigationKind::Push => NavigationKind::Push,
                    _ => NavigationKind::Replace,
                };
                tracing::debug!(from = %full_path, to = %next_location, "navigation redirected");
                return self.run(
                    next_location,
                    next_route,
                    next_kind,
                    redirected_from.or(Some(location)),
                    depth + 1,
                );
            }
        }

        let href = self.options.history.href(&location);
        match kind {
            NavigationKind::Push => self.history.push(&href),
            NavigationKind::Replace => self.history.replace(&href),
            NavigationKind::Initial if self.history.location() != href => {
                self.history.replace(&href)
            }
            NavigationKind::Initial | NavigationKind::Pop => {}
        }

        let navigation = Navigation {
            id: self.state.allocate_id(),
            kind,
            location,
            route,
            redirected_from,
        };
        self.state.commit(navigation.clone());
        tracing::info!(
            navigation_id = %navigation.id,
            route = navigation.route.name(),
            path = %navigation.location,
            ?kind,
            "navigation committed"
        );

        self.guards.run_after(&navigation);
        Ok(navigation)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::pagerouter_core::guard::{AlwaysMatcher, FnHook, TagMatcher};
    use crate::pagerouter_core::route::{ComponentRef, NamedView, RouteEntry};
    use crate::pagerouter_core::types::NavigationId;

    fn table() -> RouteTable {
        let entry = |path: &str, name: &str| {
            RouteEntry::new(path, name, ComponentRef::eager(NamedView::new(name))).unwrap()
        };
        RouteTable::new([
            entry("/", "home"),
            entry("/about", "about"),
            entry("/mint", "mint").with_tags(["wallet"]),
            entry("/post/:id", "Post"),
            entry("/login", "login"),
        ])
        .unwrap()
    }

    fn router() -> RouterHandle {
        let mut router = create_router(RouterOptions::default(), table()).unwrap();
        router.start().unwrap();
        router
    }

    #[test]
    fn test_start_resolves_initial_location() {
        let router = router();
        let current = router.current().unwrap();
        assert_eq!(current.route.name(), "home");
        assert_eq!(current.kind, NavigationKind::Initial);
        assert_eq!(current.id, NavigationId(1));
        assert_eq!(router.history().entries(), ["/"]);
    }

    #[test]
    fn test_push_replace_and_history() {
        let mut router = router();
        router.push("/about").unwrap();
        let post = router.push("/post/7?tab=comments").unwrap();
        assert_eq!(post.route.param("id"), Some("7"));
        assert_eq!(post.location.query_value("tab"), Some("comments"));

        router.replace("/post/8").unwrap();
        assert_eq!(router.history().entries(), ["/", "/about", "/post/8"]);

        let back = router.back().unwrap();
        assert_eq!(back.kind, NavigationKind::Pop);
        assert_eq!(back.route.name(), "about");

        let forward = router.forward().unwrap();
        assert_eq!(forward.route.param("id"), Some("8"));

        assert!(matches!(router.forward(), Err(RouterError::NoHistoryEntry { delta: 1 })));
    }

    #[test]
    fn test_push_same_location_is_duplicated() {
        let mut router = router();
        router.push("/about").unwrap();
        assert!(matches!(
            router.push("/about"),
            Err(RouterError::NavigationDuplicated { .. })
        ));
        assert_eq!(router.history().entries().len(), 2);
        router.push("/about?x=1").unwrap();

        router.push("/about?q=a%20b&flag").unwrap();
        assert_eq!(router.history().location(), "/about?q=a%20b&flag");
        assert!(matches!(
            router.push("/about?q=a%20b&flag"),
            Err(RouterError::NavigationDuplicated { .. })
        ));
    }

    #[test]
    fn test_not_found_leaves_state_untouched() {
        let mut router = router();
        assert!(router.push("/nonexistent").unwrap_err().is_not_found());
        assert_eq!(router.current().unwrap().route.name(), "home");
        assert_eq!(router.history().entries(), ["/"]);
    }

    #[test]
    fn test_named_navigation_matches_path_navigation() {
        let router = router();
        let by_name = router.resolve_named("Post", &RouteParams::from([("id", "42")])).unwrap();
        let by_path = router.resolve("/post/42").unwrap();
        assert!(by_name.same_route(&by_path));
        assert_eq!(
            router.href_for("Post", &RouteParams::from([("id", "42")])).unwrap(),
            "/post/42"
        );
        assert!(matches!(
            router.href_for("Post", &RouteParams::new()),
            Err(RouterError::MissingParam { .. })
        ));
    }

    #[test]
    fn test_guard_abort_blocks_navigation() {
        let mut router = router();
        router.before_each(Guard::new(
            "wallet_required",
            TagMatcher::new("wallet"),
            FnHook::guard("wallet_required", |_ctx: &GuardContext| {
                GuardOutcome::abort("wallet not connected")
            }),
        ));

        let err = router.push("/mint").unwrap_err();
        assert!(matches!(
            err,
            RouterError::NavigationAborted { ref reason, .. } if reason == "wallet not connected"
        ));
        assert_eq!(router.current().unwrap().route.name(), "home");
        router.push("/about").unwrap();

        assert!(router.remove_guard(&GuardId("wallet_required".into())));
        router.push("/mint").unwrap();
    }

    #[test]
    fn test_guard_redirect_records_origin() {
        let mut router = router();
        router.before_each(Guard::new(
            "login_redirect",
            TagMatcher::new("wallet"),
            FnHook::guard("login_redirect", |_ctx: &GuardContext| {
                GuardOutcome::redirect("/login")
            }),
        ));

        let nav = router.push("/mint?amount=2").unwrap();
        assert_eq!(nav.route.name(), "login");
        assert_eq!(nav.redirected_from.unwrap().full_path(), "/mint?amount=2");
        assert_eq!(router.history().entries(), ["/", "/login"]);
    }

    #[test]
    fn test_redirect_loop_is_detected() {
        let mut router = router();
        router.before_each(Guard::new(
            "ping_pong",
            FnHook::matcher("not_home", |ctx: &GuardContext| ctx.to.name() != "home"),
            FnHook::guard("ping_pong", |ctx: &GuardContext| {
                if ctx.to.name() == "about" {
                    GuardOutcome::redirect("/login")
                } else {
                    GuardOutcome::redirect("/about")
                }
            }),
        ));

        assert!(matches!(
            router.push("/about"),
            Err(RouterError::RedirectLoop { limit: DEFAULT_MAX_REDIRECTS, .. })
        ));
    }

    #[test]
    fn test_aborted_pop_restores_history() {
        let mut router = router();
        router.push("/about").unwrap();
        router.push("/post/1").unwrap();
        router.before_each(Guard::new(
            "leave_guard",
            AlwaysMatcher,
            FnHook::guard("leave_guard", |ctx: &GuardContext| match ctx.kind {
                NavigationKind::Pop => GuardOutcome::abort("unsaved changes"),
                _ => GuardOutcome::Continue,
            }),
        ));

        assert!(matches!(router.back(), Err(RouterError::NavigationAborted { .. })));
        assert_eq!(router.history().location(), "/post/1");
        assert_eq!(router.current().unwrap().route.name(), "Post");
    }

    #[test]
    fn test_after_each_sees_committed_navigation() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut router = create_router(RouterOptions::default(), table()).unwrap();
        let sink = Arc::clone(&seen);
        router.after_each(move |nav| sink.lock().unwrap().push(nav.route.name().to_string()));

        router.start().unwrap();
        router.push("/post/3").unwrap();
        let _ = router.push("/missing");

        assert_eq!(*seen.lock().unwrap(), vec!["home", "Post"]);
    }

    #[test]
    fn test_hash_mode_writes_fragment_hrefs() {
        let options = RouterOptions::new(HistoryMode::hash("/app"));
        let mut router = create_router(options, table()).unwrap();
        assert_eq!(router.history().location(), "/app/#/");
        router.start().unwrap();

        router.push("/post/9").unwrap();
        assert_eq!(router.history().location(), "/app/#/post/9");
        assert_eq!(router.href_for("about", &RouteParams::new()).unwrap(), "/app/#/about");

        let nav = router.on_pop_state("/app/#/about").unwrap();
        assert_eq!(nav.route.name(), "about");
    }

    #[test]
    fn test_is_current_tracks_superseded_navigations() {
        let mut router = router();
        let first = router.push("/about").unwrap();
        assert!(router.is_current(&first));
        router.push("/post/2").unwrap();
        assert!(!router.is_current(&first));
    }

    fn redirect_pops_to(target: &'static str) -> Guard {
        Guard::new(
            "pop_redirect",
            AlwaysMatcher,
            FnHook::guard("pop_redirect", move |ctx: &GuardContext| match ctx.kind {
                NavigationKind::Pop => GuardOutcome::redirect(target),
                _ => GuardOutcome::Continue,
            }),
        )
    }

    #[test]
    fn test_failed_pop_redirect_restores_history() {
        let mut router = router();
        router.push("/about").unwrap();
        router.push("/post/1").unwrap();
        router.before_each(redirect_pops_to("/post/1"));

        assert!(matches!(router.back(), Err(RouterError::NavigationDuplicated { .. })));
        assert_eq!(router.history().location(), "/post/1");
        assert_eq!(router.current().unwrap().route.name(), "Post");

        assert!(router.remove_guard(&GuardId("pop_redirect".into())));
        router.before_each(redirect_pops_to("/nonexistent"));
        assert!(router.back().unwrap_err().is_not_found());
        assert_eq!(router.history().location(), "/post/1");
        assert_eq!(router.history().position(), 2);
    }

    #[test]
    fn test_unknown_or_looping_pop_restores_history() {
        let mut router = router();
        router.push("/about").unwrap();

        assert!(router.on_pop_state("/gone").unwrap_err().is_not_found());
        assert_eq!(router.history().location(), "/about");
        assert_eq!(router.current().unwrap().route.name(), "about");

        let mut router = create_router(RouterOptions::default(), table()).unwrap();
        router.start().unwrap();
        router.push("/about").unwrap();
        router.before_each(Guard::new(
            "loop",
            AlwaysMatcher,
            FnHook::guard("loop", |ctx: &GuardContext| match ctx.to.name() {
                "home" => GuardOutcome::redirect("/login"),
                _ => GuardOutcome::redirect("/"),
            }),
        ));
        assert!(matches!(router.back(), Err(RouterError::RedirectLoop { .. })));
        assert_eq!(router.history().location(), "/about");
        assert_eq!(router.history().position(), 1);
    }

    #[test]
    fn test_named_params_that_cannot_round_trip_are_rejected() {
        let router = router();
        let err = router
            .resolve_named("Post", &RouteParams::from([("id", "")]))
            .unwrap_err();
        assert!(matches!(err, RouterError::MissingParam { .. }));
        let err = router
            .href_for("Post", &RouteParams::from([("id", "..")]))
            .unwrap_err();
        assert!(matches!(err, RouterError::InvalidParam { .. }));
    }
}
