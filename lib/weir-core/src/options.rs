//! Shared default configuration for requests.

use std::collections::HashMap;

use bytes::Bytes;

use crate::Result;

/// An `Authorization` header credential (scheme + parameter).
///
/// # Example
///
/// ```
/// use weir_core::Auth;
///
/// let auth = Auth::bearer("secret");
/// assert_eq!(auth.header_value(), "Bearer secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Auth {
    scheme: String,
    parameter: String,
}

impl Auth {
    /// Create a credential with an arbitrary scheme.
    #[must_use]
    pub fn new(scheme: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            parameter: parameter.into(),
        }
    }

    /// Create a bearer-token credential.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::new("Bearer", token)
    }

    /// Render the `Authorization` header value.
    #[must_use]
    pub fn header_value(&self) -> String {
        format!("{} {}", self.scheme, self.parameter)
    }
}

/// JSON codec configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonConfig {
    /// Serialize request bodies as pretty-printed JSON.
    pub pretty: bool,
}

impl JsonConfig {
    /// Serialize a value according to this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize<T: serde::Serialize>(&self, value: &T) -> Result<Bytes> {
        if self.pretty {
            crate::to_json_pretty(value)
        } else {
            crate::to_json(value)
        }
    }
}

/// Shared default configuration, reusable across many requests.
///
/// An `Options` value is cloned into each request at dispatch time, so
/// mutating it never affects a dispatch already in flight. It carries no
/// interior mutability and is not intended for concurrent mutation.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Static authentication credential applied when the request carries no
    /// per-request override.
    pub auth: Option<Auth>,
    /// Bypass the content-type gate before invoking text/JSON handlers.
    pub ignore_media_type_check: bool,
    /// JSON codec configuration.
    pub json: JsonConfig,
    /// Headers added to every request. Per-request headers win on collision.
    pub additional_headers: HashMap<String, String>,
}

impl Options {
    /// Create options with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a static bearer-token credential.
    #[must_use]
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(Auth::bearer(token));
        self
    }

    /// Bypass content-type checking before text/JSON handlers fire.
    #[must_use]
    pub fn with_ignore_media_type_check(mut self) -> Self {
        self.ignore_media_type_check = true;
        self
    }

    /// Serialize request bodies as pretty-printed JSON.
    #[must_use]
    pub fn with_pretty_json(mut self) -> Self {
        self.json.pretty = true;
        self
    }

    /// Add a header applied to every request built from these options.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_headers.insert(key.into(), value.into());
        self
    }
}
