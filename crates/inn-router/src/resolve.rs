//! Symbolic handler resolution.
//!
//! A symbolic handler names a controller class and an action through
//! templates such as `("Pages", ":method")` or `("reports::Ctrl", "show_:id")`.
//! At dispatch time the placeholders are filled, the class is looked up in the
//! [`ControllerRegistry`], a fresh instance is built and the action is called.

use std::fmt;

use tracing::{debug, warn};

use crate::config::RouterConfig;
use crate::handler::{ControllerRegistry, SymbolicHandler};
use crate::request::PathParams;

/// Placeholder always bound to the request method.
const METHOD_PLACEHOLDER: &str = "method";

/// Which part of a symbolic handler could not be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unreachable {
    /// No class is registered under the resolved name.
    Class,
    /// The class exists but does not respond to the resolved method.
    Method,
}

impl Unreachable {
    /// Returns `"class"` or `"method"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Method => "method",
        }
    }
}

impl fmt::Display for Unreachable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of resolving a symbolic handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The action ran.
    Invoked {
        /// Resolved class name.
        class: String,
        /// Resolved method name.
        method: String,
    },
    /// No class is registered under the resolved name.
    ClassNotFound {
        /// Resolved class name.
        class: String,
        /// Resolved method name.
        method: String,
    },
    /// The class does not respond to the resolved method.
    MethodNotFound {
        /// Resolved class name.
        class: String,
        /// Resolved method name.
        method: String,
    },
}

impl Resolution {
    /// Returns true if the action ran.
    pub fn is_invoked(&self) -> bool {
        matches!(self, Self::Invoked { .. })
    }

    /// Returns what could not be reached, if anything.
    pub fn unreachable(&self) -> Option<Unreachable> {
        match self {
            Self::Invoked { .. } => None,
            Self::ClassNotFound { .. } => Some(Unreachable::Class),
            Self::MethodNotFound { .. } => Some(Unreachable::Method),
        }
    }
}

/// Turns symbolic handlers into controller calls.
#[derive(Debug, Clone, Default)]
pub struct HandlerResolver {
    registry: ControllerRegistry,
    config: RouterConfig,
}

impl HandlerResolver {
    /// Creates a resolver over a populated registry.
    pub fn new(registry: ControllerRegistry, config: RouterConfig) -> Self {
        Self { registry, config }
    }

    /// Returns the controller registry.
    pub fn registry(&self) -> &ControllerRegistry {
        &self.registry
    }

    /// Returns a mutable reference to the controller registry.
    pub fn registry_mut(&mut self) -> &mut ControllerRegistry {
        &mut self.registry
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Fills the placeholders of a handler and returns `(class, method)`.
    ///
    /// `:method` is bound to `request_method` and every `:name` to the
    /// captured parameter `name`, normalized per [`RouterConfig::normalize`].
    /// A parameter called `method` shadows the request method. Where keys
    /// overlap the longest one wins; colons with no binding are left as is.
    ///
    /// ```
    /// use inn_router::{HandlerResolver, PathParams, SymbolicHandler};
    ///
    /// let resolver = HandlerResolver::default();
    /// let params: PathParams = [("report", "year-end")].into_iter().collect();
    /// let handler = SymbolicHandler::new("Reports", ":method_:report");
    /// let (class, method) = resolver.resolve_names(&handler, &params, "GET");
    /// assert_eq!(class, "Reports");
    /// assert_eq!(method, "GET_year_end");
    /// ```
    pub fn resolve_names(
        &self,
        handler: &SymbolicHandler,
        params: &PathParams,
        request_method: &str,
    ) -> (String, String) {
        if params.is_empty() && !handler.has_placeholders() {
            return (handler.class().to_string(), handler.method().to_string());
        }

        let mut bindings: Vec<(&str, String)> = params
            .iter()
            .map(|(key, value)| (key, self.config.normalize.apply(value)))
            .collect();
        if params.get(METHOD_PLACEHOLDER).is_none() {
            bindings.push((METHOD_PLACEHOLDER, request_method.to_string()));
        }
        (
            substitute(handler.class(), &bindings),
            substitute(handler.method(), &bindings),
        )
    }

    /// Resolves a symbolic handler and runs it with `params`.
    ///
    /// A missing class or method is reported in the returned [`Resolution`]
    /// and, when [`RouterConfig::warnings`] is set, as a `warn!` event.
    pub fn resolve(
        &self,
        handler: &SymbolicHandler,
        params: &PathParams,
        request_method: &str,
    ) -> Resolution {
        let (class, method) = self.resolve_names(handler, params, request_method);

        let Some(mut instance) = self.registry.instantiate(&class) else {
            self.warn(handler, Unreachable::Class, &class, &method);
            return Resolution::ClassNotFound { class, method };
        };
        if !instance.responds_to(&method) {
            self.warn(handler, Unreachable::Method, &class, &method);
            return Resolution::MethodNotFound { class, method };
        }

        debug!(class = %class, method = %method, "Invoking controller");
        instance.call(&method, params);
        Resolution::Invoked { class, method }
    }

    fn warn(&self, handler: &SymbolicHandler, kind: Unreachable, class: &str, method: &str) {
        if self.config.warnings {
            warn!(
                kind = kind.as_str(),
                callable = %handler,
                class,
                method,
                "Not callable {kind} ({handler}) ({class}|{method})"
            );
        }
    }
}

/// Replaces each `:key` with its bound value, preferring the longest key
/// that follows the colon. Unbound colons are kept.
fn substitute(template: &str, bindings: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(':') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let binding = bindings
            .iter()
            .filter(|(key, _)| !key.is_empty() && after.starts_with(key))
            .max_by_key(|(key, _)| key.len());

        match binding {
            Some((key, value)) => {
                out.push_str(value);
                rest = &after[key.len()..];
            }
            None => {
                out.push(':');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
