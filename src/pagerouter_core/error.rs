use thiserror::Error;

/// 路由器的统一错误类型。
///
/// `RouteNotFound` 是解析阶段唯一的错误；其余变体来自建表、
/// 反向生成 URL、导航守卫以及组件懒加载。
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("no route matches path `{path}`")]
    RouteNotFound { path: String },

    #[error("`{input}` is not a valid location")]
    InvalidLocation {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("no route named `{name}`")]
    RouteNameNotFound { name: String },

    #[error("route name `{name}` is declared more than once")]
    DuplicateRouteName { name: String },

    #[error("route path `{path}` is declared more than once")]
    DuplicatePath { path: String },

    #[error("route path `{path}` can match the same URLs as `{other}`")]
    AmbiguousPath { path: String, other: String },

    #[error("route path `{path}` conflicts with an existing route")]
    PathConflict {
        path: String,
        #[source]
        source: matchit::InsertError,
    },

    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("route `{route}` requires param `{param}`")]
    MissingParam { route: String, param: String },

    #[error("param `{param}` of route `{route}` cannot be `{value}`")]
    InvalidParam {
        route: String,
        param: String,
        value: String,
    },

    #[error("navigation to `{path}` aborted: {reason}")]
    NavigationAborted { path: String, reason: String },

    #[error("already at `{path}`")]
    NavigationDuplicated { path: String },

    #[error("navigation to `{path}` redirected more than {limit} times")]
    RedirectLoop { path: String, limit: usize },

    #[error("no history entry at offset {delta}")]
    NoHistoryEntry { delta: i32 },

    #[error("failed to load component `{view}`: {reason}")]
    ComponentLoad { view: String, reason: String },
}

impl RouterError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RouterError::RouteNotFound { .. })
    }
}

pub type RouterResult<T> = Result<T, RouterError>;
