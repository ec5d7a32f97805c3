use std::fmt;

use serde::Serialize;
use url::{form_urlencoded, Url};

use crate::pagerouter_core::error::{RouterError, RouterResult};
use crate::pagerouter_core::types::RouteParams;

/// 解析相对地址时使用的占位 origin，只用来借助 url crate 做规范化。
const APP_ORIGIN: &str = "http://app.localhost/";

/// 应用内的一个地址：path + query + hash。
///
/// path 保持 percent 编码形式，参数在匹配后再解码。
/// 解析得到的 query 原文单独保留，`full_path` 用它还原地址。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub hash: Option<String>,
    #[serde(skip)]
    raw_query: Option<String>,
}

impl Location {
    /// 解析应用内地址，例如 `/post/42?ref=home#comments`。
    ///
    /// - 缺少开头的 `/` 时视为相对根路径
    /// - `.` / `..` 片段会被规范化
    /// - 完整 URL（带 scheme）只取 path / query / fragment
    pub fn parse(input: &str) -> RouterResult<Self> {
        let invalid = |source| RouterError::InvalidLocation {
            input: input.to_string(),
            source,
        };

        let url = if input.contains("://") {
            Url::parse(input).map_err(invalid)?
        } else {
            // "//x" 不能被当成 network-path 引用
            let relative = format!("/{}", input.trim_start_matches('/'));
            Url::parse(APP_ORIGIN)
                .and_then(|base| base.join(&relative))
                .map_err(invalid)?
        };

        Ok(Self {
            path: url.path().to_string(),
            query: url.query_pairs().into_owned().collect(),
            hash: url
                .fragment()
                .filter(|f| !f.is_empty())
                .map(str::to_string),
            raw_query: url.query().filter(|q| !q.is_empty()).map(str::to_string),
        })
    }

    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
            hash: None,
            raw_query: None,
        }
    }

    pub fn with_query<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.raw_query = None;
        self
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        let hash = hash.into();
        self.hash = (!hash.is_empty()).then_some(hash);
        self
    }

    /// 取 query 中 key 的第一个值。
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `path?query#hash` 形式的完整地址。
    pub fn full_path(&self) -> String {
        let mut out = self.path.clone();
        if let Some(raw) = &self.raw_query {
            out.push('?');
            out.push_str(raw);
        } else if !self.query.is_empty() {
            out.push('?');
            out.push_str(
                &form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(&self.query)
                    .finish(),
            );
        }
        if let Some(hash) = &self.hash {
            out.push('#');
            out.push_str(hash);
        }
        out
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path())
    }
}

/// 导航目标：字面地址，或路由名 + 参数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    Path(String),
    Named {
        name: String,
        params: RouteParams,
        query: Vec<(String, String)>,
    },
}

impl RouteTarget {
    pub fn named(name: impl Into<String>, params: RouteParams) -> Self {
        RouteTarget::Named {
            name: name.into(),
            params,
            query: Vec::new(),
        }
    }
}

impl From<&str> for RouteTarget {
    fn from(path: &str) -> Self {
        RouteTarget::Path(path.to_string())
    }
}

impl From<String> for RouteTarget {
    fn from(path: String) -> Self {
        RouteTarget::Path(path)
    }
}
