//! inn-cgi
//!
//! Runs one request through a demo route table the way a CGI script would:
//! the request method and URI are read once from the environment (or flags),
//! turned into a routing path and dispatched. The response is written to
//! stdout with a CGI status line.

use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};

use anyhow::Context;
use clap::Parser;
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

use inn_router::{
    Controller, ControllerRegistry, Handler, PathParams, Router, RouterConfig, request_path,
};

/// Dispatch one CGI request through the demo routes.
#[derive(Parser)]
#[command(name = "inn-cgi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Request method token.
    #[arg(short, long, env = "REQUEST_METHOD", default_value = "GET")]
    method: String,

    /// Raw request URI, query string included.
    #[arg(short, long, env = "REQUEST_URI", default_value = "/")]
    uri: String,

    /// Path of the script, used to strip its mount directory.
    #[arg(short, long, env = "SCRIPT_NAME", default_value = "/index.php")]
    script_name: String,

    /// JSON file with router settings.
    #[arg(short, long, env = "INN_ROUTER_CONFIG")]
    config: Option<PathBuf>,

    /// Warn about unreachable symbolic handlers.
    #[arg(short, long)]
    warnings: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

/// Demo controller reachable as `controllers::Controller`.
struct DemoController {
    out: Sender<String>,
}

impl Controller for DemoController {
    fn responds_to(&self, action: &str) -> bool {
        matches!(action, "users" | "action" | "GET" | "POST")
    }

    fn call(&mut self, action: &str, params: &PathParams) {
        let params = serde_json::to_string(params).unwrap_or_default();
        // The receiver outlives every dispatch.
        let _ = self.out.send(format!("controller::{action} {params}"));
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<RouterConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?
        }
        None => RouterConfig::default(),
    };
    if cli.warnings {
        config.warnings = true;
    }
    Ok(config)
}

fn build_router(config: RouterConfig, out: &Sender<String>) -> inn_router::Result<Router> {
    let mut registry = ControllerRegistry::new();
    let controller_out = out.clone();
    registry.register("controllers::Controller", move || DemoController {
        out: controller_out.clone(),
    });

    let text = |body: &'static str| {
        let out = out.clone();
        Handler::direct(move |_| {
            let _ = out.send(body.to_string());
        })
    };
    let admin_out = out.clone();

    let mut router = Router::with_registry(registry, config);
    router
        .get("/", text("hello!"))?
        .get(
            "/admin/@action",
            Handler::direct(move |params| {
                let action = params.get("action").unwrap_or_default();
                let _ = admin_out.send(format!("administrators/{action}"));
            }),
        )?
        .get("/static/controller/@id", ("controllers::Controller", "users"))?
        .get("/izisaurio", ("controllers::Controller", "action"))?
        .get("/controller/@name", ("controllers::Controller", ":name"))?
        .all("/rest/@@", ("controllers::Controller", ":method"))?;
    Ok(router)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&cli)?;
    debug!(?config, "Loaded router config");

    let (tx, rx) = mpsc::channel();
    let router = build_router(config, &tx)?;
    drop(tx);

    let path = request_path(&cli.uri, &cli.script_name);
    let outcome = router.dispatch(&cli.method, &path);
    info!(method = %cli.method, path = %path, ?outcome, "Dispatched request");
    drop(router);

    if outcome.is_invoked() {
        println!("Status: 200 OK\r\nContent-Type: text/plain\r\n\r");
        for line in rx.try_iter() {
            println!("{line}");
        }
    } else {
        println!("Status: 404 Not Found\r\nContent-Type: text/plain\r\n\r");
        println!("no route for {} {path}", cli.method);
    }

    Ok(())
}
