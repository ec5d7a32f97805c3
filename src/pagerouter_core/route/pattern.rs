use std::collections::HashSet;
use std::fmt;

use percent_encoding::{percent_decode_str, percent_encode, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::pagerouter_core::error::{RouterError, RouterResult};
use crate::pagerouter_core::types::RouteParams;

/// 单个 path segment 内需要转义的字符。
///
/// 反向生成 URL 和匹配前的规范化共用这一套；`:` / `*` 对 matchit 有特殊含义。
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'*')
    .add(b'/')
    .add(b':')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// 字面量片段，例如 `/post/:id` 中的 `post`。
    ///
    /// 保存规范化后的编码形式：`café` 存为 `caf%C3%A9`。
    Static(String),
    /// 命名参数片段，例如 `:id`，这里只保存 `id`。
    Param(String),
}

/// 解析后的路由路径模式。
///
/// 语法与 matchit 0.7 一致：`:name` 表示捕获一个完整的 segment。
/// 不支持 catch-all（`*rest`）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> RouterResult<Self> {
        let invalid = |reason: &str| RouterError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let Some(rest) = pattern.strip_prefix('/') else {
            return Err(invalid("must start with `/`"));
        };
        let rest = rest.strip_suffix('/').unwrap_or(rest);

        let mut segments = Vec::new();
        let mut seen = HashSet::new();
        if !rest.is_empty() {
            for part in rest.split('/') {
                if part.is_empty() {
                    return Err(invalid("empty segment"));
                }
                if part.contains('*') {
                    return Err(invalid("catch-all segments are not supported"));
                }
                match part.strip_prefix(':') {
                    Some(name) => {
                        if name.is_empty() {
                            return Err(invalid("unnamed parameter"));
                        }
                        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                            return Err(invalid("parameter names may only use [A-Za-z0-9_]"));
                        }
                        if !seen.insert(name) {
                            return Err(invalid("parameter name used twice"));
                        }
                        segments.push(Segment::Param(name.to_string()));
                    }
                    None if part.contains(':') => {
                        return Err(invalid("`:` may only start a segment"));
                    }
                    None => {
                        if is_dot_segment(&decode_segment(part)) {
                            return Err(invalid("`.` and `..` segments are not allowed"));
                        }
                        segments.push(Segment::Static(canonical_segment(part)));
                    }
                }
            }
        }

        let raw = Self::render(&segments, |name| format!(":{name}"));
        Ok(Self { raw, segments })
    }

    /// 规范化后的模式字符串，也是插入 matchit 的 key。
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Static(_) => None,
        })
    }

    pub fn is_static(&self) -> bool {
        self.param_names().next().is_none()
    }

    /// 两个模式能否匹配到同一个 URL。
    ///
    /// segment 数量相同，且每个位置要么字面量相等、要么至少一方是参数。
    pub fn overlaps(&self, other: &PathPattern) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|pair| match pair {
                    (Segment::Static(a), Segment::Static(b)) => a == b,
                    _ => true,
                })
    }

    /// 用参数值填充模式，生成具体路径。
    ///
    /// 多余的参数会被忽略；缺失或为空返回 `MissingParam`。
    /// `.` / `..` 会被 URL 规范化吃掉，返回 `InvalidParam`。
    pub fn build(&self, route: &str, params: &RouteParams) -> RouterResult<String> {
        for name in self.param_names() {
            match params.get(name) {
                None | Some("") => {
                    return Err(RouterError::MissingParam {
                        route: route.to_string(),
                        param: name.to_string(),
                    });
                }
                Some(value) if is_dot_segment(value) => {
                    return Err(RouterError::InvalidParam {
                        route: route.to_string(),
                        param: name.to_string(),
                        value: value.to_string(),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(Self::render(&self.segments, |name| {
            let value = params.get(name).unwrap_or_default();
            utf8_percent_encode(value, SEGMENT).to_string()
        }))
    }

    fn render(segments: &[Segment], mut param: impl FnMut(&str) -> String) -> String {
        if segments.is_empty() {
            return "/".to_string();
        }
        let mut out = String::new();
        for segment in segments {
            out.push('/');
            match segment {
                Segment::Static(text) => out.push_str(text),
                Segment::Param(name) => out.push_str(&param(name)),
            }
        }
        out
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.raw)
    }
}

fn is_dot_segment(text: &str) -> bool {
    text == "." || text == ".."
}

/// segment 的规范编码：先解码再按 `SEGMENT` 重新编码。
///
/// `café`、`caf%C3%A9`、`caf%c3%a9` 得到同一个结果。
pub fn canonical_segment(raw: &str) -> String {
    let bytes: Vec<u8> = percent_decode_str(raw).collect();
    percent_encode(&bytes, SEGMENT).to_string()
}

/// 逐段规范化整条路径，用作 matchit 的查询 key。
pub fn canonical_path(path: &str) -> String {
    path.split('/')
        .map(canonical_segment)
        .collect::<Vec<_>>()
        .join("/")
}

/// 解码捕获到的 segment；解码结果不是合法 UTF-8 时保留原文。
pub fn decode_segment(raw: &str) -> String {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}
