//! Route template compilation and path matching.

use regex::Regex;

use crate::error::{Result, RouterError};
use crate::request::PathParams;

/// Capture name used by the `@@` wildcard segment.
pub const WILDCARD_PARAM: &str = "path";

/// Characters accepted by a named `@param` capture.
const PARAM_CLASS: &str = "[A-Za-z0-9_-]+";

/// A segment in a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A literal string segment, matched verbatim.
    Literal(String),
    /// A named parameter segment (e.g., `@id`), never spans a `/`.
    Param(String),
    /// The `@@` segment, captured as `path` and allowed to span `/`.
    Wildcard,
}

impl PathSegment {
    /// Classifies one `/`-delimited piece of a template.
    fn classify(part: &str) -> Self {
        if part == "@@" {
            Self::Wildcard
        } else if let Some(name) = part.strip_prefix('@').filter(|n| !n.is_empty()) {
            Self::Param(name.to_string())
        } else {
            Self::Literal(part.to_string())
        }
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    /// Template without placeholders, compared byte for byte.
    Exact,
    /// Anchored regex with one named group per placeholder.
    Regex(Regex),
}

/// The outcome of matching one path against a [`PathPattern`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    matched: bool,
    params: PathParams,
}

impl MatchResult {
    fn hit(params: PathParams) -> Self {
        Self {
            matched: true,
            params,
        }
    }

    fn miss() -> Self {
        Self::default()
    }

    /// Returns true if the path matched.
    pub fn is_match(&self) -> bool {
        self.matched
    }

    /// Named captures in template order. Empty on a miss.
    pub fn params(&self) -> &PathParams {
        &self.params
    }

    /// Converts into the captured params, or `None` on a miss.
    pub fn into_params(self) -> Option<PathParams> {
        self.matched.then_some(self.params)
    }
}

/// A compiled route template.
///
/// Template syntax:
/// - `/users` - literal path, compared exactly
/// - `/users/@id` - named parameter matching `[A-Za-z0-9_-]+`
/// - `/files/@@` - wildcard captured as `path`, may contain `/`
///
/// A compiled pattern holds no per-match state and can be shared freely
/// between threads.
#[derive(Debug, Clone)]
pub struct PathPattern {
    /// The original template string.
    template: String,
    /// Parsed segments. Empty for exact templates.
    segments: Vec<PathSegment>,
    matcher: Matcher,
    /// Capture names in template order.
    param_names: Vec<String>,
}

impl PathPattern {
    /// Compiles a route template.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidPattern`] when a parameter name is not an
    /// identifier or a capture name is used twice (this includes a second
    /// `@@`).
    ///
    /// # Example
    ///
    /// ```
    /// use inn_router::PathPattern;
    ///
    /// let pattern = PathPattern::new("/posts/@id/comments/@comment_id").unwrap();
    /// let result = pattern.match_path("/posts/123/comments/456");
    /// assert!(result.is_match());
    /// assert_eq!(result.params().get("id"), Some("123"));
    /// assert_eq!(result.params().get("comment_id"), Some("456"));
    /// ```
    pub fn new(template: &str) -> Result<Self> {
        if !template.contains('@') {
            return Ok(Self {
                template: template.to_string(),
                segments: Vec::new(),
                matcher: Matcher::Exact,
                param_names: Vec::new(),
            });
        }

        let mut segments = Vec::new();
        let mut param_names: Vec<String> = Vec::new();
        let mut pieces = Vec::new();

        let body = template.strip_prefix('/').unwrap_or(template);
        for part in body.split('/') {
            let segment = PathSegment::classify(part);
            let piece = match &segment {
                PathSegment::Literal(text) => regex::escape(text),
                PathSegment::Param(name) => {
                    if !is_identifier(name) {
                        return Err(invalid(
                            template,
                            format!("parameter name {name:?} is not an identifier"),
                        ));
                    }
                    claim_name(template, &mut param_names, name)?;
                    format!("(?P<{name}>{PARAM_CLASS})")
                }
                PathSegment::Wildcard => {
                    claim_name(template, &mut param_names, WILDCARD_PARAM)?;
                    format!("(?P<{WILDCARD_PARAM}>.*?)")
                }
            };
            pieces.push(piece);
            segments.push(segment);
        }

        let regex = Regex::new(&format!("^/{}$", pieces.join("/")))?;

        Ok(Self {
            template: template.to_string(),
            segments,
            matcher: Matcher::Regex(regex),
            param_names,
        })
    }

    /// Matches a request path against this pattern.
    pub fn match_path(&self, path: &str) -> MatchResult {
        match &self.matcher {
            Matcher::Exact if self.template == path => MatchResult::hit(PathParams::new()),
            Matcher::Exact => MatchResult::miss(),
            Matcher::Regex(regex) => {
                let Some(caps) = regex.captures(path) else {
                    return MatchResult::miss();
                };
                let params = self
                    .param_names
                    .iter()
                    .filter_map(|name| caps.name(name).map(|m| (name.as_str(), m.as_str())))
                    .collect();
                MatchResult::hit(params)
            }
        }
    }

    /// Returns the original template string.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the parsed segments. Templates without placeholders have none.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns the parameter names in template order.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Returns true if the template has no placeholders.
    pub fn is_exact(&self) -> bool {
        matches!(self.matcher, Matcher::Exact)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn claim_name(template: &str, names: &mut Vec<String>, name: &str) -> Result<()> {
    if names.iter().any(|n| n == name) {
        return Err(invalid(
            template,
            format!("capture name {name:?} is used more than once"),
        ));
    }
    names.push(name.to_string());
    Ok(())
}

fn invalid(template: &str, reason: String) -> RouterError {
    RouterError::InvalidPattern {
        template: template.to_string(),
        reason,
    }
}
