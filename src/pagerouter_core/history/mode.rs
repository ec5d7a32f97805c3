use crate::pagerouter_core::error::{RouterError, RouterResult};
use crate::pagerouter_core::location::Location;

/// 导航状态在宿主 URL 中的呈现方式，仅在创建路由器时确定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryMode {
    /// 完整 path 寻址：`{base}/post/42`。
    ///
    /// 服务端需要把未知路径回落到入口页面。
    Web { base: String },

    /// fragment 寻址：`{base}/#/post/42`。
    Hash { base: String },
}

impl Default for HistoryMode {
    fn default() -> Self {
        HistoryMode::web("/")
    }
}

impl HistoryMode {
    pub fn web(base: &str) -> Self {
        HistoryMode::Web {
            base: normalize_base(base),
        }
    }

    pub fn hash(base: &str) -> Self {
        HistoryMode::Hash {
            base: normalize_base(base),
        }
    }

    /// 规范化后的 base，根路径为空串。
    pub fn base(&self) -> &str {
        match self {
            HistoryMode::Web { base } | HistoryMode::Hash { base } => base,
        }
    }

    /// 应用内地址 → 宿主可见的 href。
    pub fn href(&self, location: &Location) -> String {
        match self {
            HistoryMode::Web { base } => format!("{base}{}", location.full_path()),
            HistoryMode::Hash { base } => format!("{base}/#{}", location.full_path()),
        }
    }

    /// 宿主 href → 应用内地址，是 `href` 的逆操作。
    ///
    /// href 不在 base 之下时返回 `RouteNotFound`。
    pub fn location_from_href(&self, href: &str) -> RouterResult<Location> {
        let outside = || RouterError::RouteNotFound {
            path: href.to_string(),
        };
        let local = strip_origin(href);

        match self {
            HistoryMode::Web { base } => {
                let rest = local.strip_prefix(base.as_str()).ok_or_else(outside)?;
                if !(rest.is_empty() || rest.starts_with(['/', '?', '#'])) {
                    return Err(outside());
                }
                Location::parse(rest)
            }
            HistoryMode::Hash { base } => {
                let (before, fragment) = local.split_once('#').unwrap_or((local, ""));
                let before = before.split('?').next().unwrap_or_default();
                let before = before.strip_suffix('/').unwrap_or(before);
                if before != base.as_str() {
                    return Err(outside());
                }
                Location::parse(fragment)
            }
        }
    }
}

/// "" / "/" → ""；"app/" → "/app"。
fn normalize_base(base: &str) -> String {
    let trimmed = base.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// 去掉 `scheme://host`，只保留 path 起始的部分。
fn strip_origin(href: &str) -> &str {
    match href.split_once("://") {
        Some((_, rest)) => rest.find('/').map(|i| &rest[i..]).unwrap_or("/"),
        None => href,
    }
}
