//! Core types and dispatch logic for the weir fluent HTTP client.
//!
//! This crate provides the transport-independent pieces used by weir:
//! - [`Method`] - HTTP method enum (GET and POST)
//! - [`Request`] and [`RequestBuilder`] - HTTP request types
//! - [`Response`] - Buffered HTTP response type
//! - [`Error`], [`ErrorKind`] and [`Result`] - Error handling
//! - [`Options`] - Shared default configuration for requests
//! - [`HandlerRegistry`] - Caller-supplied status/body/error handlers
//! - [`dispatch`] - Routing of a completed (or failed) exchange to handlers
//! - [`HttpClient`] - Transport trait implemented by the `weir` crate

mod body;
mod client;
mod dispatch;
mod error;
mod handlers;
mod method;
mod options;
pub mod prelude;
mod request;
mod response;

pub use body::{ContentType, from_json, from_json_value, to_json, to_json_pretty};
pub use client::HttpClient;
pub use dispatch::dispatch;
pub use error::{Error, ErrorKind, Result};
pub use handlers::HandlerRegistry;
pub use method::Method;
pub use options::{Auth, JsonConfig, Options};
pub use request::{Request, RequestBuilder};
pub use response::Response;

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
