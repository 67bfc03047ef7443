//! Fluent one-shot HTTP client with handler-based response dispatch.
//!
//! Configure a request through chained calls, register handlers for status
//! codes, decoded bodies, and errors, then dispatch. The outcome is routed
//! to handlers; nothing is returned to the caller.
//!
//! # Example
//!
//! ```ignore
//! use weir::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! Fetch::new("https://api.example.com/users/1")
//!     .when_status(404, |_| {
//!         eprintln!("no such user");
//!         false
//!     })?
//!     .on_json(|user: User| println!("{}: {}", user.id, user.name))
//!     .on_error(ErrorKind::Any, |err| eprintln!("request failed: {err}"))
//!     .dispatch()
//!     .await;
//! ```

mod client;
mod config;
mod connector;
mod fetch;
pub mod prelude;

// Re-export client types
pub use client::HyperClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use fetch::Fetch;

// Re-export core types
pub use weir_core::{
    Auth, ContentType, Error, ErrorKind, HandlerRegistry, HttpClient, JsonConfig, Method, Options,
    Request, RequestBuilder, Response, Result, dispatch, from_json, from_json_value, to_json,
    to_json_pretty,
};

// Re-export http types for status codes and headers
pub use weir_core::{StatusCode, header};

// Re-export the cancellation token used by `Fetch::dispatch_cancellable`
pub use tokio_util::sync::CancellationToken;
