//! # Roster Core
//!
//! Core runtime library for the Roster page server.
//! Provides the HTTP serving loop, an ordered route table with a
//! first-match-wins dispatcher, escaped HTML fragments, and static
//! asset delivery.
//!
//! ## Modules
//!
//! - `server` - HTTP server and request dispatcher built on Hyper
//! - `router` - Ordered route table, matched in registration order
//! - `route` - Path patterns with `{name}` placeholders and a trailing wildcard
//! - `request` - Per-request context (method, path, extracted parameters)
//! - `html` - Escaped/raw HTML fragment types
//! - `static_files` - Sanitized file reads under a configured root
//! - `error` - Error types and handling

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod html;
pub mod request;
pub mod route;
pub mod router;
pub mod server;
pub mod static_files;

pub use error::{Error, Result};
pub use html::{escape, Fragment};
pub use request::RequestContext;
pub use route::RoutePattern;
pub use router::{HandlerId, Method, RouteMatch, RouteTable};
pub use server::{Handler, Response, Server, ServerConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
