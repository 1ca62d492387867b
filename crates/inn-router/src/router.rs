//! Route table and dispatch.

use tracing::debug;

use crate::config::RouterConfig;
use crate::error::{Result, RouterError};
use crate::handler::{ControllerRegistry, Handler};
use crate::path::{MatchResult, PathPattern};
use crate::request::Method;
use crate::resolve::HandlerResolver;

/// A single route definition.
#[derive(Debug, Clone)]
pub struct Route {
    /// Request methods this route answers, deduplicated, never empty.
    methods: Vec<String>,
    /// Compiled path pattern.
    pattern: PathPattern,
    /// What runs on a match.
    handler: Handler,
}

impl Route {
    /// Creates a new route, compiling its template.
    ///
    /// # Errors
    ///
    /// Fails with [`RouterError::EmptyMethodSet`] when `methods` is empty and
    /// with [`RouterError::InvalidPattern`] when the template is malformed.
    pub fn new<I, S>(methods: I, template: &str, handler: impl Into<Handler>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set: Vec<String> = Vec::new();
        for method in methods {
            let method = method.into();
            if !set.contains(&method) {
                set.push(method);
            }
        }
        if set.is_empty() {
            return Err(RouterError::EmptyMethodSet {
                template: template.to_string(),
            });
        }

        Ok(Self {
            methods: set,
            pattern: PathPattern::new(template)?,
            handler: handler.into(),
        })
    }

    /// Returns the request methods of this route.
    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    /// Returns true if this route answers `method`.
    pub fn allows(&self, method: &str) -> bool {
        self.methods.iter().any(|m| m == method)
    }

    /// Returns the compiled pattern.
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// Returns the route template.
    pub fn template(&self) -> &str {
        self.pattern.template()
    }

    /// Returns the handler.
    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// Matches a request against this route. Misses on a foreign method
    /// without looking at the path.
    pub fn match_request(&self, method: &str, path: &str) -> MatchResult {
        if self.allows(method) {
            self.pattern.match_path(path)
        } else {
            MatchResult::default()
        }
    }
}

/// What [`Router::dispatch`] did with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A route matched and its handler ran.
    Invoked,
    /// No route matched, or the matching symbolic handler was unreachable.
    NotMatched,
}

impl DispatchOutcome {
    /// Returns true if a handler ran.
    pub fn is_invoked(self) -> bool {
        self == Self::Invoked
    }
}

/// Routes requests to handlers, first registered match wins.
///
/// The router never touches the hosting environment: the request method and
/// path are passed to [`Router::dispatch`], and the caller decides what to
/// do once a handler ran.
#[derive(Debug, Default)]
pub struct Router {
    /// Registered routes in registration order.
    routes: Vec<Route>,
    resolver: HandlerResolver,
}

impl Router {
    /// Creates a new empty router with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty router with the given configuration.
    pub fn with_config(config: RouterConfig) -> Self {
        Self::with_registry(ControllerRegistry::new(), config)
    }

    /// Creates a new empty router over a populated controller registry.
    pub fn with_registry(registry: ControllerRegistry, config: RouterConfig) -> Self {
        Self {
            routes: Vec::new(),
            resolver: HandlerResolver::new(registry, config),
        }
    }

    /// Returns the controller registry used by symbolic handlers.
    pub fn controllers_mut(&mut self) -> &mut ControllerRegistry {
        self.resolver.registry_mut()
    }

    /// Returns the handler resolver.
    pub fn resolver(&self) -> &HandlerResolver {
        &self.resolver
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RouterConfig {
        self.resolver.config()
    }

    /// Adds a route for an arbitrary set of methods.
    ///
    /// # Errors
    ///
    /// See [`Route::new`].
    pub fn route<I, S>(
        &mut self,
        methods: I,
        template: &str,
        handler: impl Into<Handler>,
    ) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let route = Route::new(methods, template, handler)?;
        debug!(
            template,
            methods = %route.methods.join(","),
            index = self.routes.len(),
            "Registered route"
        );
        self.routes.push(route);
        Ok(self)
    }

    /// Adds a route answering GET, HEAD, POST, PUT, DELETE and OPTIONS.
    ///
    /// # Errors
    ///
    /// See [`Route::new`].
    pub fn all(&mut self, template: &str, handler: impl Into<Handler>) -> Result<&mut Self> {
        self.route(Method::ALL, template, handler)
    }

    /// Adds a GET route.
    ///
    /// # Errors
    ///
    /// See [`Route::new`].
    pub fn get(&mut self, template: &str, handler: impl Into<Handler>) -> Result<&mut Self> {
        self.route([Method::Get], template, handler)
    }

    /// Adds a POST route.
    ///
    /// # Errors
    ///
    /// See [`Route::new`].
    pub fn post(&mut self, template: &str, handler: impl Into<Handler>) -> Result<&mut Self> {
        self.route([Method::Post], template, handler)
    }

    /// Adds a PUT route.
    ///
    /// # Errors
    ///
    /// See [`Route::new`].
    pub fn put(&mut self, template: &str, handler: impl Into<Handler>) -> Result<&mut Self> {
        self.route([Method::Put], template, handler)
    }

    /// Adds a DELETE route.
    ///
    /// # Errors
    ///
    /// See [`Route::new`].
    pub fn delete(&mut self, template: &str, handler: impl Into<Handler>) -> Result<&mut Self> {
        self.route([Method::Delete], template, handler)
    }

    /// Adds an OPTIONS route.
    ///
    /// # Errors
    ///
    /// See [`Route::new`].
    pub fn options(&mut self, template: &str, handler: impl Into<Handler>) -> Result<&mut Self> {
        self.route([Method::Options], template, handler)
    }

    /// Returns the registered routes in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns the number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no route is registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Dispatches a request to the first matching route.
    ///
    /// `method` and `path` are compared as given: the path is expected to be
    /// normalized already (see [`request_path`](crate::request_path)).
    pub fn dispatch(&self, method: &str, path: &str) -> DispatchOutcome {
        for (index, route) in self.routes.iter().enumerate() {
            let Some(params) = route.match_request(method, path).into_params() else {
                continue;
            };
            debug!(method, path, template = route.template(), index, "Route matched");

            return match &route.handler {
                Handler::Direct(handler) => {
                    handler(&params);
                    DispatchOutcome::Invoked
                }
                Handler::Symbolic(symbolic) => {
                    if self.resolver.resolve(symbolic, &params, method).is_invoked() {
                        DispatchOutcome::Invoked
                    } else {
                        DispatchOutcome::NotMatched
                    }
                }
            };
        }

        debug!(method, path, "No route matched");
        DispatchOutcome::NotMatched
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::request::PathParams;

    type Hits = Arc<Mutex<Vec<String>>>;

    fn record(hits: &Hits, label: &'static str) -> Handler {
        let hits = Arc::clone(hits);
        Handler::direct(move |params: &PathParams| {
            let rendered: Vec<_> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
            hits.lock()
                .unwrap()
                .push(format!("{label}({})", rendered.join(",")));
        })
    }

    #[test]
    fn test_basic_routing() {
        let hits = Hits::default();
        let mut router = Router::new();
        router
            .get("/", record(&hits, "home"))
            .unwrap()
            .get("/admin/@action", record(&hits, "admin"))
            .unwrap();

        assert_eq!(router.dispatch("GET", "/"), DispatchOutcome::Invoked);
        assert_eq!(router.dispatch("GET", "/admin/delete"), DispatchOutcome::Invoked);
        assert_eq!(*hits.lock().unwrap(), ["home()", "admin(action=delete)"]);
    }

    #[test]
    fn test_not_found_is_a_no_op() {
        let hits = Hits::default();
        let mut router = Router::new();
        router.get("/", record(&hits, "home")).unwrap();

        assert_eq!(router.dispatch("GET", "/nonexistent"), DispatchOutcome::NotMatched);
        assert!(hits.lock().unwrap().is_empty());
    }

    #[test]
    fn test_method_gating() {
        let hits = Hits::default();
        let mut router = Router::new();
        router.get("/form", record(&hits, "form")).unwrap();

        assert!(!router.dispatch("POST", "/form").is_invoked());
        assert!(router.dispatch("GET", "/form").is_invoked());
    }

    #[test]
    fn test_first_registered_route_wins() {
        let hits = Hits::default();
        let mut router = Router::new();
        router
            .route(["GET", "POST"], "/@@", record(&hits, "catch_all"))
            .unwrap()
            .get("/", record(&hits, "home"))
            .unwrap();

        router.dispatch("GET", "/");
        router.dispatch("POST", "/a/b");
        assert_eq!(*hits.lock().unwrap(), ["catch_all(path=)", "catch_all(path=a/b)"]);
    }

    #[test]
    fn test_later_route_reached_for_other_methods() {
        let hits = Hits::default();
        let mut router = Router::new();
        router
            .get("/item/@id", record(&hits, "show"))
            .unwrap()
            .delete("/item/@id", record(&hits, "remove"))
            .unwrap();

        router.dispatch("DELETE", "/item/9");
        assert_eq!(*hits.lock().unwrap(), ["remove(id=9)"]);
    }

    #[test]
    fn test_all_includes_head() {
        let hits = Hits::default();
        let mut router = Router::new();
        router.all("/ping", record(&hits, "ping")).unwrap();

        for method in ["GET", "HEAD", "POST", "PUT", "DELETE", "OPTIONS"] {
            assert!(router.dispatch(method, "/ping").is_invoked(), "{method}");
        }
        assert!(!router.dispatch("PATCH", "/ping").is_invoked());
    }

    #[test]
    fn test_methods_are_opaque_tokens() {
        let hits = Hits::default();
        let mut router = Router::new();
        router.route(["PURGE"], "/cache", record(&hits, "purge")).unwrap();

        assert!(router.dispatch("PURGE", "/cache").is_invoked());
        assert!(!router.dispatch("purge", "/cache").is_invoked());
    }

    #[test]
    fn test_empty_method_set_is_rejected() {
        let mut router = Router::new();
        let err = router
            .route(Vec::<String>::new(), "/", Handler::direct(|_| {}))
            .unwrap_err();
        assert!(matches!(err, RouterError::EmptyMethodSet { .. }));
        assert!(router.is_empty());
    }

    #[test]
    fn test_invalid_template_fails_at_registration() {
        let mut router = Router::new();
        let err = router.get("/@@/@@", Handler::direct(|_| {})).unwrap_err();
        assert!(matches!(err, RouterError::InvalidPattern { .. }));
        assert!(router.is_empty());
    }

    #[test]
    fn test_duplicate_methods_are_collapsed() {
        let route = Route::new(["GET", "GET", "POST"], "/", Handler::direct(|_| {})).unwrap();
        assert_eq!(route.methods(), ["GET", "POST"]);
        assert!(!route.match_request("PUT", "/").is_match());
    }
}
