//! # Route Table
//!
//! An ordered set of `(method, pattern)` bindings.
//!
//! Routes are matched in registration order, first match wins. With a fixed
//! handful of startup-registered routes a linear scan is both the simplest
//! implementation and the contract: a later registration can never shadow an
//! earlier one.

use crate::error::{Error, Result};
use crate::route::RoutePattern;
use std::collections::HashMap;

/// HTTP methods understood by the route table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// HTTP GET
    Get,
    /// HTTP POST
    Post,
    /// HTTP PUT
    Put,
    /// HTTP DELETE
    Delete,
    /// HTTP PATCH
    Patch,
    /// HTTP HEAD
    Head,
    /// HTTP OPTIONS
    Options,
}

impl Method {
    /// Map a hyper method onto ours. Unknown methods yield `None` and fall
    /// into the route-miss path.
    #[must_use]
    pub fn from_http(method: &hyper::Method) -> Option<Self> {
        match *method {
            hyper::Method::GET => Some(Self::Get),
            hyper::Method::POST => Some(Self::Post),
            hyper::Method::PUT => Some(Self::Put),
            hyper::Method::DELETE => Some(Self::Delete),
            hyper::Method::PATCH => Some(Self::Patch),
            hyper::Method::HEAD => Some(Self::Head),
            hyper::Method::OPTIONS => Some(Self::Options),
            _ => None,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
            Self::Patch => write!(f, "PATCH"),
            Self::Head => write!(f, "HEAD"),
            Self::Options => write!(f, "OPTIONS"),
        }
    }
}

/// Route handler identifier, assigned in registration order
pub type HandlerId = usize;

/// A single method + pattern binding
#[derive(Debug, Clone)]
struct RouteBinding {
    method: Method,
    pattern: RoutePattern,
}

/// Matched route with extracted path parameters
#[derive(Debug)]
pub struct RouteMatch {
    /// The handler ID for this route
    pub handler_id: HandlerId,
    /// Extracted path parameters
    pub params: HashMap<String, String>,
}

/// Ordered route table, first-match-wins
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<RouteBinding>,
}

impl RouteTable {
    /// Create a new empty route table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route with the given method and path pattern.
    ///
    /// # Returns
    ///
    /// The handler ID assigned to this route; ids count up from 0 in
    /// registration order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRoutePattern`] if the pattern is malformed.
    pub fn add(&mut self, method: Method, pattern: &str) -> Result<HandlerId> {
        let pattern = RoutePattern::parse(pattern)?;
        self.routes.push(RouteBinding { method, pattern });
        Ok(self.routes.len() - 1)
    }

    /// Match a request against registered routes, in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RouteNotFound`] if no binding matches the
    /// method + path combination.
    pub fn match_route(&self, method: Method, path: &str) -> Result<RouteMatch> {
        for (handler_id, binding) in self.routes.iter().enumerate() {
            if binding.method != method {
                continue;
            }
            if let Some(params) = binding.pattern.captures(path) {
                return Ok(RouteMatch { handler_id, params });
            }
        }
        Err(Error::RouteNotFound {
            path: path.to_string(),
        })
    }

    /// Number of registered routes
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Check whether any routes are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
