//! 路由配置的语义校验。
//!
//! - serde 负责语法，这里负责语义
//! - 返回全部错误，而不是只返回第一个
//! - 纯函数：RouterConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;

use thiserror::Error;

use super::registry::ViewRegistry;
use super::schema::RouterConfig;
use crate::pagerouter_core::error::RouterError;
use crate::pagerouter_core::route::PathPattern;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no routes declared")]
    NoRoutes,

    #[error("route at `{path}` has an empty name")]
    EmptyName { path: String },

    #[error("route name `{name}` is declared more than once")]
    DuplicateName { name: String },

    #[error("route path `{path}` is declared more than once")]
    DuplicatePath { path: String },

    #[error("route path `{path}` can match the same URLs as `{other}`")]
    AmbiguousPath { path: String, other: String },

    #[error("invalid route path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("route `{route}` references unknown component `{component}`")]
    UnknownComponent { route: String, component: String },

    #[error("route `{route}` needs `{component}` eagerly, but it is only registered as lazy")]
    LazyOnlyComponent { route: String, component: String },
}

/// 校验配置；传入 registry 时同时检查组件引用。
pub fn validate_config(
    config: &RouterConfig,
    views: Option<&ViewRegistry>,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.routes.is_empty() {
        errors.push(ValidationError::NoRoutes);
    }

    let mut names = HashSet::new();
    let mut patterns: Vec<PathPattern> = Vec::new();

    for route in &config.routes {
        if route.name.trim().is_empty() {
            errors.push(ValidationError::EmptyName {
                path: route.path.clone(),
            });
        } else if !names.insert(route.name.as_str()) {
            errors.push(ValidationError::DuplicateName {
                name: route.name.clone(),
            });
        }

        match PathPattern::parse(&route.path) {
            Ok(pattern) => {
                if patterns.iter().any(|p| p == &pattern) {
                    errors.push(ValidationError::DuplicatePath {
                        path: pattern.as_str().to_string(),
                    });
                } else if let Some(other) = patterns.iter().find(|p| p.overlaps(&pattern)) {
                    errors.push(ValidationError::AmbiguousPath {
                        path: pattern.as_str().to_string(),
                        other: other.as_str().to_string(),
                    });
                } else {
                    patterns.push(pattern);
                }
            }
            Err(RouterError::InvalidPattern { reason, .. }) => {
                errors.push(ValidationError::InvalidPath {
                    path: route.path.clone(),
                    reason,
                });
            }
            Err(other) => {
                errors.push(ValidationError::InvalidPath {
                    path: route.path.clone(),
                    reason: other.to_string(),
                });
            }
        }

        if let Some(views) = views {
            if !views.contains(&route.component) {
                errors.push(ValidationError::UnknownComponent {
                    route: route.name.clone(),
                    component: route.component.clone(),
                });
            } else if !route.lazy && views.is_lazy_only(&route.component) {
                errors.push(ValidationError::LazyOnlyComponent {
                    route: route.name.clone(),
                    component: route.component.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagerouter_core::config::RouteConfig;
    use crate::pagerouter_core::route::NamedView;

    fn route(path: &str, name: &str, component: &str) -> RouteConfig {
        RouteConfig {
            path: path.to_string(),
            name: name.to_string(),
            component: component.to_string(),
            lazy: false,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_valid_config() {
        let config = RouterConfig {
            routes: vec![route("/", "home", "VProfile"), route("/post/:id", "Post", "VPost")],
            ..Default::default()
        };
        assert!(validate_config(&config, None).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let config = RouterConfig {
            routes: vec![
                route("/", "home", "VProfile"),
                route("/", "home", "VProfile"),
                route("about", "about", "VAbout"),
                route("/post/:id", "", "VPost"),
                route("/post/new", "NewPost", "VPost"),
            ],
            ..Default::default()
        };
        let errors = validate_config(&config, None).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::DuplicateName { name: "home".into() },
                ValidationError::DuplicatePath { path: "/".into() },
                ValidationError::InvalidPath {
                    path: "about".into(),
                    reason: "must start with `/`".into()
                },
                ValidationError::EmptyName { path: "/post/:id".into() },
                ValidationError::AmbiguousPath {
                    path: "/post/new".into(),
                    other: "/post/:id".into()
                },
            ]
        );
    }

    #[test]
    fn test_checks_components_against_registry() {
        let mut views = ViewRegistry::new();
        views.register_eager(NamedView::new("VProfile"));
        views.register_lazy("VAbout", || async { Ok(NamedView::shared("VAbout")) });

        let mut about = route("/about", "about", "VAbout");
        let config = RouterConfig {
            routes: vec![
                route("/", "home", "VProfile"),
                about.clone(),
                route("/mint", "mint", "VMint"),
            ],
            ..Default::default()
        };
        let errors = validate_config(&config, Some(&views)).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::LazyOnlyComponent {
                    route: "about".into(),
                    component: "VAbout".into()
                },
                ValidationError::UnknownComponent {
                    route: "mint".into(),
                    component: "VMint".into()
                },
            ]
        );

        about.lazy = true;
        let config = RouterConfig {
            routes: vec![route("/", "home", "VProfile"), about],
            ..Default::default()
        };
        assert!(validate_config(&config, Some(&views)).is_ok());
    }

    #[test]
    fn test_empty_config() {
        let errors = validate_config(&RouterConfig::default(), None).unwrap_err();
        assert_eq!(errors, vec![ValidationError::NoRoutes]);
    }
}
