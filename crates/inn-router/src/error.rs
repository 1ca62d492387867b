//! Error types for routing.

use thiserror::Error;

/// Router-specific errors.
///
/// These are programming errors made while building the route table. A
/// symbolic handler that cannot be reached at dispatch time is not an error;
/// see [`Resolution`](crate::Resolution).
#[derive(Debug, Error)]
pub enum RouterError {
    /// The route template cannot be compiled.
    #[error("invalid route template {template:?}: {reason}")]
    InvalidPattern {
        /// The offending template.
        template: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A route was registered without any request method.
    #[error("route {template:?} has an empty method set")]
    EmptyMethodSet {
        /// Template of the rejected route.
        template: String,
    },

    /// A handler descriptor is neither a function nor a `Class|method` pair.
    #[error("invalid handler descriptor: {descriptor:?}")]
    InvalidHandler {
        /// The descriptor as given.
        descriptor: String,
    },

    /// The regex engine rejected a generated pattern.
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
