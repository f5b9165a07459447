//! # Route Patterns
//!
//! Path templates matched segment by segment against request paths.
//!
//! A pattern is a `/`-separated template. `{name}` matches exactly one
//! non-empty segment and captures it under `name`. A final `*name` segment
//! captures the whole remainder of the path, slashes included, possibly
//! empty. Everything else matches literally.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// One piece of a parsed pattern
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Matches its text exactly
    Literal(String),
    /// Matches one non-empty segment, captured by name
    Param(String),
    /// Matches the rest of the path, captured by name; always terminal
    Wildcard(String),
}

/// A parsed path pattern, ready for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    pattern: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parse a pattern string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRoutePattern`] when the pattern does not start
    /// with `/`, contains an empty segment or placeholder name, or places a
    /// wildcard anywhere but the final segment.
    pub fn parse(pattern: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidRoutePattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let Some(rest) = pattern.strip_prefix('/') else {
            return Err(invalid("must start with '/'"));
        };

        let mut segments = Vec::new();
        if !rest.is_empty() {
            let pieces: Vec<&str> = rest.split('/').collect();
            let last = pieces.len() - 1;
            for (i, piece) in pieces.iter().enumerate() {
                if let Some(name) = piece.strip_prefix('*') {
                    if name.is_empty() {
                        return Err(invalid("wildcard segment needs a name"));
                    }
                    if i != last {
                        return Err(invalid("wildcard must be the final segment"));
                    }
                    segments.push(Segment::Wildcard(name.to_string()));
                } else if let Some(inner) =
                    piece.strip_prefix('{').and_then(|p| p.strip_suffix('}'))
                {
                    if inner.is_empty() {
                        return Err(invalid("placeholder segment needs a name"));
                    }
                    segments.push(Segment::Param(inner.to_string()));
                } else if piece.is_empty() {
                    return Err(invalid("empty path segment"));
                } else {
                    segments.push(Segment::Literal((*piece).to_string()));
                }
            }
        }

        Ok(Self {
            pattern: pattern.to_string(),
            segments,
        })
    }

    /// The original pattern string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Match a request path, returning captured parameters on success.
    ///
    /// Matching is exact: no segment may be empty, trailing slashes are
    /// significant, and every path segment must be consumed unless a
    /// wildcard swallows the remainder.
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = match path.strip_prefix('/') {
            Some("") => Vec::new(),
            Some(rest) => rest.split('/').collect(),
            None => return None,
        };

        let mut params = HashMap::new();
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Wildcard(name) => {
                    let remainder = parts.get(i..).map_or_else(String::new, |r| r.join("/"));
                    params.insert(name.clone(), remainder);
                    return Some(params);
                }
                Segment::Literal(lit) => {
                    if parts.get(i).copied() != Some(lit.as_str()) {
                        return None;
                    }
                }
                Segment::Param(name) => match parts.get(i) {
                    Some(value) if !value.is_empty() => {
                        params.insert(name.clone(), (*value).to_string());
                    }
                    _ => return None,
                },
            }
        }

        if parts.len() == self.segments.len() {
            Some(params)
        } else {
            None
        }
    }
}
