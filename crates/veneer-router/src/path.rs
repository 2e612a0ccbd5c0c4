//! Path pattern matching.

use regex::Regex;
use veneer_params::Params;

use crate::error::{Result, RouterError};

/// A segment in a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A literal string segment.
    Literal(String),
    /// A parameter segment (e.g., `:id`).
    Param(String),
}

/// Result of matching a pattern against the start of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMatch<'p> {
    /// Captured parameters.
    pub params: Params,
    /// Unconsumed part of the path. Empty, or starts with `/`.
    pub remainder: &'p str,
}

/// A compiled path pattern for matching URLs.
#[derive(Debug, Clone)]
pub struct PathPattern {
    /// The original pattern string.
    pattern: String,
    /// Parsed segments.
    segments: Vec<PathSegment>,
    /// Compiled regex for matching.
    regex: Regex,
    /// Parameter names in order.
    param_names: Vec<String>,
}

impl PathPattern {
    /// Parses a path pattern string.
    ///
    /// Pattern syntax:
    /// - `/users` - Literal path
    /// - `/users/:id` - Path with parameter
    ///
    /// Literal segments are escaped, and a parameter matches one or more
    /// characters that are neither `/` nor whitespace.
    ///
    /// # Example
    ///
    /// ```
    /// use veneer_router::PathPattern;
    ///
    /// let pattern = PathPattern::parse("/users/:id/posts/:postId").unwrap();
    /// let params = pattern.match_path("/users/42/posts/7").unwrap();
    /// assert_eq!(params.get("id"), Some("42"));
    /// assert_eq!(params.get("postId"), Some("7"));
    ///
    /// let tail = pattern.match_prefix("/users/42/posts/7/edit").unwrap();
    /// assert_eq!(tail.remainder, "/edit");
    /// ```
    pub fn parse(pattern: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut param_names = Vec::new();
        let mut regex_str = String::from("^");

        for part in pattern.split('/').filter(|s| !s.is_empty()) {
            regex_str.push('/');

            if let Some(name) = part.strip_prefix(':').filter(|n| !n.is_empty()) {
                segments.push(PathSegment::Param(name.to_string()));
                param_names.push(name.to_string());
                regex_str.push_str(r"([^\s/]+)");
            } else {
                segments.push(PathSegment::Literal(part.to_string()));
                regex_str.push_str(&regex::escape(part));
            }
        }

        let regex = Regex::new(&regex_str).map_err(|source| RouterError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            segments,
            regex,
            param_names,
        })
    }

    /// Parses a pattern, panicking if it cannot be compiled.
    ///
    /// Literal segments are escaped before compiling, so this only fails
    /// for patterns that exceed the regex size limit.
    pub fn new(pattern: &str) -> Self {
        Self::parse(pattern).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Matches the pattern against the start of `path`.
    ///
    /// The match must end at a segment boundary: the remainder is either
    /// empty or starts with `/`. A pattern without segments (`/` or the
    /// empty string) only matches an empty path or `/`.
    pub fn match_prefix<'p>(&self, path: &'p str) -> Option<PrefixMatch<'p>> {
        if self.segments.is_empty() {
            return (path.is_empty() || path == "/").then(|| PrefixMatch {
                params: Params::new(),
                remainder: "",
            });
        }

        let caps = self.regex.captures(path)?;
        let end = caps.get(0)?.end();
        let remainder = &path[end..];
        if !(remainder.is_empty() || remainder.starts_with('/')) {
            return None;
        }

        let mut params = Params::new();
        for (i, name) in self.param_names.iter().enumerate() {
            if let Some(value) = caps.get(i + 1) {
                params.insert(name.clone(), value.as_str());
            }
        }

        Some(PrefixMatch { params, remainder })
    }

    /// Attempts to match the whole path. A single trailing `/` is allowed.
    ///
    /// Returns extracted parameters if the path matches.
    pub fn match_path(&self, path: &str) -> Option<Params> {
        self.match_prefix(path)
            .filter(|m| m.remainder.is_empty() || m.remainder == "/")
            .map(|m| m.params)
    }

    /// Returns the original pattern string.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Returns the parsed segments.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns the parameter names.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }
}
