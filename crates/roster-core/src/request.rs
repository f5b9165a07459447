//! # Request Context
//!
//! Per-request data handed to handlers: method, path, and the parameters
//! the dispatcher extracted from the matched route pattern. Created per
//! incoming request and discarded once the response is built.

use crate::router::Method;
use std::collections::HashMap;

/// Context for a single request
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// HTTP method
    pub method: Method,
    /// Request path (without query string)
    pub path: String,
    params: HashMap<String, String>,
}

impl RequestContext {
    /// Create a context with no extracted parameters
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: HashMap::new(),
        }
    }

    /// Attach the parameters extracted by the dispatcher
    #[must_use]
    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    /// Get a path parameter by name.
    ///
    /// Values are opaque strings exactly as they appeared in the path; the
    /// router performs no validation or parsing.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// All extracted path parameters
    #[must_use]
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }
}
