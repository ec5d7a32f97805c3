use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tokio::sync::OnceCell;

use crate::pagerouter_core::error::{RouterError, RouterResult};

/// 页面级视图。
///
/// 视图本身由渲染层实现，路由层只持有引用并把它交给渲染层。
pub trait PageView: Send + Sync + fmt::Debug {
    /// 视图名，例如 "VProfile"。
    fn view_name(&self) -> &str;
}

/// 只有名字的视图，渲染层按名字查找真正的实现。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedView(pub String);

impl NamedView {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn shared(name: impl Into<String>) -> Arc<dyn PageView> {
        Arc::new(Self::new(name))
    }
}

impl PageView for NamedView {
    fn view_name(&self) -> &str {
        &self.0
    }
}

pub type ViewHandle = Arc<dyn PageView>;

/// 懒加载视图的加载函数：每次调用返回一个新的加载 future。
pub type ViewLoader =
    Arc<dyn Fn() -> BoxFuture<'static, Result<ViewHandle, String>> + Send + Sync>;

/// 首次导航时才加载的视图。
///
/// - 加载成功后结果缓存在 OnceCell 中，并发的 await 共享同一次加载
/// - 加载失败不缓存，下一次导航会重试
#[derive(Clone)]
pub struct LazyComponent {
    view_name: String,
    loader: ViewLoader,
    cell: Arc<OnceCell<ViewHandle>>,
}

impl LazyComponent {
    pub fn new<F, Fut>(view_name: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ViewHandle, String>> + Send + 'static,
    {
        Self {
            view_name: view_name.into(),
            loader: Arc::new(move || loader().boxed()),
            cell: Arc::new(OnceCell::new()),
        }
    }

    pub fn from_loader(view_name: impl Into<String>, loader: ViewLoader) -> Self {
        Self {
            view_name: view_name.into(),
            loader,
            cell: Arc::new(OnceCell::new()),
        }
    }

    pub fn view_name(&self) -> &str {
        &self.view_name
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    pub async fn load(&self) -> RouterResult<ViewHandle> {
        let view = self
            .cell
            .get_or_try_init(|| async {
                tracing::debug!(view = %self.view_name, "loading lazy component");
                (self.loader)().await.map_err(|reason| {
                    tracing::warn!(
                        view = %self.view_name,
                        %reason,
                        "lazy component failed to load"
                    );
                    RouterError::ComponentLoad {
                        view: self.view_name.clone(),
                        reason,
                    }
                })
            })
            .await?;
        Ok(Arc::clone(view))
    }
}

impl fmt::Debug for LazyComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyComponent")
            .field("view_name", &self.view_name)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// 路由绑定的页面视图：立即可用，或首次导航时异步加载。
#[derive(Debug, Clone)]
pub enum ComponentRef {
    Eager(ViewHandle),
    Lazy(LazyComponent),
}

impl ComponentRef {
    pub fn eager(view: impl PageView + 'static) -> Self {
        ComponentRef::Eager(Arc::new(view))
    }

    pub fn lazy<F, Fut>(view_name: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ViewHandle, String>> + Send + 'static,
    {
        ComponentRef::Lazy(LazyComponent::new(view_name, loader))
    }

    pub fn view_name(&self) -> &str {
        match self {
            ComponentRef::Eager(view) => view.view_name(),
            ComponentRef::Lazy(lazy) => lazy.view_name(),
        }
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, ComponentRef::Lazy(_))
    }

    /// 已经可以直接渲染时返回视图（Eager，或已加载完成的 Lazy）。
    pub fn ready(&self) -> Option<ViewHandle> {
        match self {
            ComponentRef::Eager(view) => Some(Arc::clone(view)),
            ComponentRef::Lazy(lazy) => lazy.cell.get().cloned(),
        }
    }

    pub async fn load(&self) -> RouterResult<ViewHandle> {
        match self {
            ComponentRef::Eager(view) => Ok(Arc::clone(view)),
            ComponentRef::Lazy(lazy) => lazy.load().await,
        }
    }
}
