//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use weir::prelude::*;
//! ```

pub use crate::{
    Auth, CancellationToken, ContentType, Error, ErrorKind, Fetch, HttpClient, HyperClient, Method,
    Options, Request, Response, Result, StatusCode, from_json, header, to_json,
};
pub use serde::{Deserialize, Serialize};
