//! HTTP method types.

use derive_more::Display;

/// HTTP request method.
///
/// Weir issues one-shot GET and POST requests only, so the enum is closed
/// over those two methods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
pub enum Method {
    /// GET method - retrieve a resource.
    #[default]
    #[display("GET")]
    Get,
    /// POST method - submit a body to a resource.
    #[display("POST")]
    Post,
}

impl Method {
    /// Returns `true` if the method carries a request body.
    #[must_use]
    pub const fn has_body(&self) -> bool {
        matches!(self, Self::Post)
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
        }
    }
}
