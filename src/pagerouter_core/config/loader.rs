//! 从磁盘加载路由配置。

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::registry::ViewRegistry;
use super::schema::RouterConfig;
use super::validation::{validate_config, ValidationError};
use crate::pagerouter_core::error::RouterError;
use crate::pagerouter_core::router::{create_router, RouterHandle};

/// 加载配置时的错误。
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Router(#[from] RouterError),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// 解析并校验 TOML 文本（不检查组件引用）。
pub fn parse_config(content: &str) -> Result<RouterConfig, ConfigError> {
    let config: RouterConfig = toml::from_str(content)?;
    validate_config(&config, None).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// 从 TOML 文件加载并校验配置。
pub fn load_config(path: &Path) -> Result<RouterConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&content)?;
    tracing::info!(
        path = %path.display(),
        routes = config.routes.len(),
        "route config loaded"
    );
    Ok(config)
}

/// 配置 + 视图注册表 → 路由器。组件引用在这里校验。
pub fn router_from_config(
    config: &RouterConfig,
    views: &ViewRegistry,
) -> Result<RouterHandle, ConfigError> {
    validate_config(config, Some(views)).map_err(ConfigError::Validation)?;
    let table = config.build_table(views)?;
    Ok(create_router(config.router_options(), table)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::pagerouter_core::config::HistoryModeKind;
    use crate::pagerouter_core::history::{History, HistoryMode};

    const SAMPLE: &str = r#"
[history]
mode = "hash"
base = "/app/"

[[routes]]
path = "/"
name = "home"
component = "VProfile"

[[routes]]
path = "/post/:id"
name = "Post"
component = "VPost"
lazy = true
tags = ["content"]
"#;

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.history.mode, HistoryModeKind::Hash);
        assert_eq!(config.routes.len(), 2);
        assert!(config.routes[1].lazy);
        assert_eq!(config.routes[1].tags, vec!["content"]);
        assert_eq!(config.router_options().history, HistoryMode::hash("/app"));
    }

    #[test]
    fn test_defaults_apply() {
        let config = parse_config(
            r#"
[[routes]]
path = "/about"
name = "about"
component = "VAbout"
"#,
        )
        .unwrap();
        assert_eq!(config.history.mode, HistoryModeKind::Web);
        assert_eq!(config.router_options().max_redirects, 10);
        assert!(!config.routes[0].lazy);
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_parse_and_validation_errors() {
        assert!(matches!(parse_config("routes = 3"), Err(ConfigError::Parse(_))));

        let err = parse_config(
            r#"
[[routes]]
path = "/a"
name = "dup"
component = "A"

[[routes]]
path = "/b"
name = "dup"
component = "B"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("route name `dup` is declared more than once"));
    }

    #[tokio::test]
    async fn test_router_from_config_resolves_lazy_routes() {
        let config = parse_config(SAMPLE).unwrap();
        let mut router = router_from_config(&config, &ViewRegistry::with_named_fallback()).unwrap();
        router.start().unwrap();

        let nav = router.push("/post/5").unwrap();
        assert!(nav.route.entry.component.is_lazy());
        assert!(nav.route.entry.has_tag("content"));
        assert_eq!(router.history().location(), "/app/#/post/5");
        assert_eq!(nav.route.load_component().await.unwrap().view_name(), "VPost");
    }

    #[test]
    fn test_router_from_config_rejects_unknown_components() {
        let config = parse_config(SAMPLE).unwrap();
        let err = router_from_config(&config, &ViewRegistry::new()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 2));
    }
}
