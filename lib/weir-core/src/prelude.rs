//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use weir_core::prelude::*;
//! ```

pub use crate::{
    Auth, ContentType, Error, ErrorKind, HandlerRegistry, HttpClient, Method, Options, Request,
    RequestBuilder, Response, Result, StatusCode, dispatch, from_json, from_json_value, header,
    to_json,
};
