//! Router configuration.

use serde::{Deserialize, Serialize};

/// How captured values are rewritten before they are substituted into a
/// symbolic handler's class or method template.
///
/// Handlers always receive the raw captured values; this only affects the
/// names that are looked up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamNormalization {
    /// Substitute values exactly as captured.
    Verbatim,
    /// Replace `-` with `_` so `/reports/year-end` can name `year_end`.
    #[default]
    DashToUnderscore,
}

impl ParamNormalization {
    /// Applies the policy to one captured value.
    pub fn apply(self, value: &str) -> String {
        match self {
            Self::Verbatim => value.to_string(),
            Self::DashToUnderscore => value.replace('-', "_"),
        }
    }
}

/// Settings for a [`Router`](crate::Router).
///
/// # Example
///
/// ```
/// use inn_router::{ParamNormalization, RouterConfig};
///
/// let config: RouterConfig =
///     serde_json::from_str(r#"{"warnings": true, "normalize": "verbatim"}"#).unwrap();
/// assert!(config.warnings);
/// assert_eq!(config.normalize, ParamNormalization::Verbatim);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Emit a warning when a symbolic handler cannot be reached.
    pub warnings: bool,
    /// Rewriting applied to values substituted into handler templates.
    pub normalize: ParamNormalization,
}

impl RouterConfig {
    /// Creates the default configuration: silent, dash-to-underscore.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables unreachable-handler warnings.
    #[must_use]
    pub fn warnings(mut self, enabled: bool) -> Self {
        self.warnings = enabled;
        self
    }

    /// Sets the value normalization policy.
    #[must_use]
    pub fn normalize(mut self, policy: ParamNormalization) -> Self {
        self.normalize = policy;
        self
    }
}
