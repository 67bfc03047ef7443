//! Transport trait.
//!
//! The dispatcher treats the HTTP transport as a collaborator behind
//! [`HttpClient`]. The `weir` crate provides the hyper-util implementation;
//! implement this trait directly for custom transports or test doubles.

use std::future::Future;

use crate::{Request, Response, Result};

/// Core HTTP transport trait.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the fully buffered response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    /// - Invalid response
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}
