use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures_util::FutureExt;

use crate::pagerouter_core::route::{
    ComponentRef, LazyComponent, NamedView, PageView, ViewHandle, ViewLoader,
};

/// 视图的来源：已经就绪，或需要异步加载。
#[derive(Clone)]
pub enum ViewSource {
    Eager(ViewHandle),
    Lazy(ViewLoader),
}

/// 配置中的组件名 → 视图来源。
///
/// 渲染层在启动时注册自己的视图，配置文件只引用名字。
#[derive(Clone, Default)]
pub struct ViewRegistry {
    views: HashMap<String, ViewSource>,

    /// 未注册的组件名是否回落为 NamedView（CLI / 调试用）。
    named_fallback: bool,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 任何组件名都可用，未注册的名字解析为 NamedView。
    pub fn with_named_fallback() -> Self {
        Self {
            views: HashMap::new(),
            named_fallback: true,
        }
    }

    pub fn register_eager(&mut self, view: impl PageView + 'static) -> &mut Self {
        let name = view.view_name().to_string();
        self.views.insert(name, ViewSource::Eager(Arc::new(view)));
        self
    }

    pub fn register_lazy<F, Fut>(&mut self, name: impl Into<String>, loader: F) -> &mut Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ViewHandle, String>> + Send + 'static,
    {
        let loader: ViewLoader = Arc::new(move || loader().boxed());
        self.views.insert(name.into(), ViewSource::Lazy(loader));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.named_fallback || self.views.contains_key(name)
    }

    /// 只注册了懒加载来源、无法同步提供的组件。
    pub fn is_lazy_only(&self, name: &str) -> bool {
        matches!(self.views.get(name), Some(ViewSource::Lazy(_)))
    }

    /// 为路由生成组件引用。
    ///
    /// `lazy = true` 时总是返回 Lazy；已就绪的视图包装成立即完成的加载。
    pub fn component(&self, name: &str, lazy: bool) -> Option<ComponentRef> {
        let source = match self.views.get(name) {
            Some(source) => source.clone(),
            None if self.named_fallback => ViewSource::Eager(NamedView::shared(name)),
            None => return None,
        };

        match (source, lazy) {
            (ViewSource::Eager(view), false) => Some(ComponentRef::Eager(view)),
            (ViewSource::Eager(view), true) => Some(ComponentRef::Lazy(LazyComponent::new(
                name,
                move || {
                    let view = Arc::clone(&view);
                    async move { Ok(view) }
                },
            ))),
            (ViewSource::Lazy(loader), true) => {
                Some(ComponentRef::Lazy(LazyComponent::from_loader(name, loader)))
            }
            (ViewSource::Lazy(_), false) => None,
        }
    }
}

impl std::fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.views.keys().collect();
        names.sort();
        f.debug_struct("ViewRegistry")
            .field("views", &names)
            .field("named_fallback", &self.named_fallback)
            .finish()
    }
}
