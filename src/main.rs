//! `pagerouter`：查看路由表、解析 URL、生成 href、模拟一次导航会话。

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;

use pagerouter::app_routes::app_route_table;
use pagerouter::config::{load_config, router_from_config, HistoryModeKind, ViewRegistry};
use pagerouter::logging::{init_logging, DEFAULT_FILTER};
use pagerouter::{
    create_router, HistoryMode, RouteParams, RouteTarget, RouterHandle, RouterOptions,
};

#[derive(Parser, Debug)]
#[command(name = "pagerouter", version, about = "Inspect and exercise the SPA route table")]
struct Cli {
    /// Load routes from a TOML file instead of the built-in app table
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use hash history (`/#/path`) instead of web history
    #[arg(long, global = true)]
    hash: bool,

    /// Base path the app is served under
    #[arg(long, global = true)]
    base: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = DEFAULT_FILTER)]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the route table in declaration order
    Routes,
    /// Resolve URLs and print the matched route as JSON
    Resolve {
        #[arg(required = true)]
        urls: Vec<String>,
        /// Also load each route's component
        #[arg(long)]
        load: bool,
    },
    /// Build the href for a named route
    Href {
        name: String,
        /// Route params as key=value
        params: Vec<String>,
    },
    /// Start the router and run a sequence of navigations (URLs, `back`, `forward`)
    Navigate {
        #[arg(required = true)]
        steps: Vec<String>,
    },
}

fn build_router(cli: &Cli) -> Result<RouterHandle, Box<dyn std::error::Error>> {
    match &cli.config {
        Some(path) => {
            let mut config = load_config(path)?;
            if cli.hash {
                config.history.mode = HistoryModeKind::Hash;
            }
            if let Some(base) = &cli.base {
                config.history.base = base.clone();
            }
            Ok(router_from_config(&config, &ViewRegistry::with_named_fallback())?)
        }
        None => {
            let base = cli.base.as_deref().unwrap_or("/");
            let history = if cli.hash {
                HistoryMode::hash(base)
            } else {
                HistoryMode::web(base)
            };
            Ok(create_router(RouterOptions::new(history), app_route_table()?)?)
        }
    }
}

fn parse_params(pairs: &[String]) -> Result<RouteParams, String> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .ok_or_else(|| format!("expected key=value, got `{pair}`"))
        })
        .collect()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log)?;

    let mut router = build_router(&cli)?;

    match &cli.command {
        Command::Routes => {
            for (id, entry) in router.routes().iter() {
                println!(
                    "{:>2}  {:<8} {:<14} {:<10} {}",
                    id.0,
                    entry.name,
                    entry.path,
                    entry.component.view_name(),
                    if entry.component.is_lazy() { "lazy" } else { "eager" }
                );
            }
        }
        Command::Resolve { urls, load } => {
            for url in urls {
                let output = match router.resolve_target(&RouteTarget::Path(url.clone())) {
                    Ok((location, route)) => {
                        let view = if *load {
                            Some(route.load_component().await?.view_name().to_string())
                        } else {
                            None
                        };
                        json!({ "input": url, "location": location, "route": route, "view": view })
                    }
                    Err(err) => json!({ "input": url, "error": err.to_string() }),
                };
                println!("{output}");
            }
        }
        Command::Href { name, params } => {
            let params = parse_params(params)?;
            println!("{}", router.href_for(name, &params)?);
        }
        Command::Navigate { steps } => {
            router.start()?;
            for step in steps {
                let result = match step.as_str() {
                    "back" => router.back(),
                    "forward" => router.forward(),
                    url => router.push(url),
                };
                let output = match result {
                    Ok(navigation) => json!(navigation),
                    Err(err) => json!({ "step": step, "error": err.to_string() }),
                };
                println!("{output}");
            }
            println!("{}", json!({ "history": router.history().entries() }));
        }
    }

    Ok(())
}
