//! Handler descriptors and the controller registry.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::RouterError;
use crate::request::PathParams;

/// A boxed direct handler function.
pub type HandlerFn = Arc<dyn Fn(&PathParams) + Send + Sync>;

/// Builds a fresh controller instance for one invocation.
pub type ControllerFactory = Arc<dyn Fn() -> Box<dyn Controller> + Send + Sync>;

/// What a route runs when it matches.
#[derive(Clone)]
pub enum Handler {
    /// A function bound at registration time.
    Direct(HandlerFn),
    /// A controller class and action looked up at dispatch time.
    Symbolic(SymbolicHandler),
}

impl Handler {
    /// Wraps a function as a direct handler.
    pub fn direct<F>(handler: F) -> Self
    where
        F: Fn(&PathParams) + Send + Sync + 'static,
    {
        Self::Direct(Arc::new(handler))
    }

    /// Creates a symbolic handler from class and method templates.
    pub fn symbolic(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self::Symbolic(SymbolicHandler::new(class, method))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(_) => f.write_str("Direct(<fn>)"),
            Self::Symbolic(symbolic) => f.debug_tuple("Symbolic").field(symbolic).finish(),
        }
    }
}

impl<C: Into<String>, M: Into<String>> From<(C, M)> for Handler {
    fn from((class, method): (C, M)) -> Self {
        Self::symbolic(class, method)
    }
}

impl From<SymbolicHandler> for Handler {
    fn from(symbolic: SymbolicHandler) -> Self {
        Self::Symbolic(symbolic)
    }
}

/// Parses a `Class|method` descriptor.
///
/// ```
/// use inn_router::Handler;
///
/// let handler: Handler = "controllers::Pages|:method".parse().unwrap();
/// assert!(matches!(handler, Handler::Symbolic(_)));
/// assert!("no-separator".parse::<Handler>().is_err());
/// ```
impl FromStr for Handler {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RouterError::InvalidHandler {
            descriptor: s.to_string(),
        };
        let (class, method) = s.split_once('|').ok_or_else(invalid)?;
        if class.is_empty() || method.is_empty() || method.contains('|') {
            return Err(invalid());
        }
        Ok(Self::symbolic(class, method))
    }
}

/// Class and method name templates of a symbolic handler.
///
/// Either template may contain `:name` placeholders, filled from the matched
/// path parameters, and `:method`, filled with the request method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolicHandler {
    class: String,
    method: String,
}

impl SymbolicHandler {
    /// Creates a new symbolic handler.
    pub fn new(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            method: method.into(),
        }
    }

    /// The class name template.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// The method name template.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// True if either template contains a `:` placeholder marker.
    pub fn has_placeholders(&self) -> bool {
        self.class.contains(':') || self.method.contains(':')
    }
}

impl fmt::Display for SymbolicHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.class, self.method)
    }
}

/// A handler class reachable through a symbolic descriptor.
///
/// # Example
///
/// ```
/// use inn_router::{Controller, PathParams};
///
/// #[derive(Default)]
/// struct Pages {
///     hits: usize,
/// }
///
/// impl Controller for Pages {
///     fn responds_to(&self, action: &str) -> bool {
///         matches!(action, "show" | "GET")
///     }
///
///     fn call(&mut self, _action: &str, _params: &PathParams) {
///         self.hits += 1;
///     }
/// }
/// ```
pub trait Controller {
    /// Returns true if `action` names a method this controller exposes.
    fn responds_to(&self, action: &str) -> bool;

    /// Runs `action`. Only called after `responds_to` returned true.
    fn call(&mut self, action: &str, params: &PathParams);
}

/// Maps class names to controller factories.
///
/// Populated once at startup; lookups never instantiate anything that was
/// not registered.
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    factories: HashMap<String, ControllerFactory>,
}

impl ControllerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under a class name, replacing any previous one.
    pub fn register<F, C>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> C + Send + Sync + 'static,
        C: Controller + 'static,
    {
        let factory: ControllerFactory =
            Arc::new(move || Box::new(factory()) as Box<dyn Controller>);
        self.factories.insert(name.into(), factory);
        self
    }

    /// Registers a controller built with `Default::default`.
    pub fn register_default<C>(&mut self, name: impl Into<String>) -> &mut Self
    where
        C: Controller + Default + 'static,
    {
        self.register(name, C::default)
    }

    /// Returns true if a class with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Builds a new instance of the named class.
    pub fn instantiate(&self, name: &str) -> Option<Box<dyn Controller>> {
        self.factories.get(name).map(|factory| factory())
    }

    /// Returns the number of registered classes.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("ControllerRegistry")
            .field("classes", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Echo;

    impl Controller for Echo {
        fn responds_to(&self, action: &str) -> bool {
            action == "echo"
        }

        fn call(&mut self, _action: &str, _params: &PathParams) {}
    }

    #[test]
    fn test_parse_descriptor() {
        let handler: Handler = "app::Users|show_:id".parse().unwrap();
        match handler {
            Handler::Symbolic(symbolic) => {
                assert_eq!(symbolic.class(), "app::Users");
                assert_eq!(symbolic.method(), "show_:id");
                assert_eq!(symbolic.to_string(), "app::Users|show_:id");
            }
            Handler::Direct(_) => panic!("expected a symbolic handler"),
        }
    }

    #[test]
    fn test_parse_invalid_descriptors() {
        for descriptor in ["", "Users", "|show", "Users|", "A|b|c"] {
            assert!(
                matches!(
                    descriptor.parse::<Handler>(),
                    Err(RouterError::InvalidHandler { .. })
                ),
                "{descriptor:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_tuple_conversion() {
        let handler = Handler::from(("Ctrl", ":method"));
        assert!(matches!(handler, Handler::Symbolic(ref s) if s.has_placeholders()));
    }

    #[test]
    fn test_placeholder_detection() {
        assert!(!SymbolicHandler::new("Ctrl", "index").has_placeholders());
        assert!(SymbolicHandler::new("Ctrl", ":method").has_placeholders());
        assert!(SymbolicHandler::new("app::ctrl_:section", "index").has_placeholders());
        assert!(!SymbolicHandler::new("Ctrl", "@id").has_placeholders());
    }

    #[test]
    fn test_registry() {
        let mut registry = ControllerRegistry::new();
        registry.register_default::<Echo>("Echo");

        assert!(registry.contains("Echo"));
        assert!(!registry.contains("echo"));
        assert_eq!(registry.len(), 1);

        let instance = registry.instantiate("Echo").unwrap();
        assert!(instance.responds_to("echo"));
        assert!(registry.instantiate("Missing").is_none());
    }
}
