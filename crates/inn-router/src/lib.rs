//! # inn-router
//!
//! A small request router for script-style HTTP handlers.
//!
//! This crate provides:
//! - Route templates with named (`@id`) and wildcard (`@@`) captures
//! - Method-gated routing where the first registered match wins
//! - Direct function handlers
//! - Symbolic `Class|method` handlers resolved through a controller registry,
//!   with `:param` and `:method` placeholders
//! - Request path derivation for hosts that mount a script under a directory
//!
//! ## Quick Start
//!
//! ```
//! use inn_router::{DispatchOutcome, Handler, Router};
//!
//! let mut router = Router::new();
//! router
//!     .get("/", Handler::direct(|_| println!("hello!")))?
//!     .get("/admin/@action", Handler::direct(|params| {
//!         println!("admin/{}", params.get("action").unwrap_or_default());
//!     }))?;
//!
//! assert_eq!(router.dispatch("GET", "/admin/delete"), DispatchOutcome::Invoked);
//! assert_eq!(router.dispatch("POST", "/admin/delete"), DispatchOutcome::NotMatched);
//! # Ok::<(), inn_router::RouterError>(())
//! ```
//!
//! ## Route Templates
//!
//! - `/users` matches exactly `/users`
//! - `/users/@id` captures one segment of `[A-Za-z0-9_-]` characters as `id`
//! - `/files/@@` captures the remainder, slashes included, as `path`
//!
//! ## Symbolic Handlers
//!
//! ```
//! use inn_router::{Controller, ControllerRegistry, PathParams, Router, RouterConfig};
//!
//! #[derive(Default)]
//! struct Pages;
//!
//! impl Controller for Pages {
//!     fn responds_to(&self, action: &str) -> bool {
//!         matches!(action, "GET" | "POST")
//!     }
//!
//!     fn call(&mut self, action: &str, params: &PathParams) {
//!         println!("{action} {:?}", params.get("slug"));
//!     }
//! }
//!
//! let mut registry = ControllerRegistry::new();
//! registry.register_default::<Pages>("Pages");
//!
//! let mut router = Router::with_registry(registry, RouterConfig::new().warnings(true));
//! router.all("/pages/@slug", ("Pages", ":method"))?;
//!
//! assert!(router.dispatch("POST", "/pages/about").is_invoked());
//! assert!(!router.dispatch("PUT", "/pages/about").is_invoked());
//! # Ok::<(), inn_router::RouterError>(())
//! ```

mod config;
mod error;
mod handler;
mod path;
mod request;
mod resolve;
mod router;
mod uri;

pub use config::{ParamNormalization, RouterConfig};
pub use error::{Result, RouterError};
pub use handler::{
    Controller, ControllerFactory, ControllerRegistry, Handler, HandlerFn, SymbolicHandler,
};
pub use path::{MatchResult, PathPattern, PathSegment, WILDCARD_PARAM};
pub use request::{Method, PathParams};
pub use resolve::{HandlerResolver, Resolution, Unreachable};
pub use router::{DispatchOutcome, Route, Router};
pub use uri::request_path;
