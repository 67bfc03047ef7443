//! Fluent request builder and dispatch entry points.
//!
//! [`Fetch`] accumulates one request's configuration through chained calls,
//! then sends it and routes the outcome to the registered handlers. It never
//! returns the response to the caller; handlers are the only way to observe
//! the result.
//!
//! # Example
//!
//! ```ignore
//! use weir::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! struct User { id: u64 }
//!
//! Fetch::new("https://api.example.com/users/1")
//!     .on_json(|user: User| println!("got user {}", user.id))
//!     .on_error(ErrorKind::Transport, |err| eprintln!("failed: {err}"))
//!     .dispatch()
//!     .await;
//! ```

use std::collections::HashMap;
use std::io::Read;
use std::time::Instant;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Level, debug, error, info, span, warn};

use weir_core::{
    Auth, ContentType, Error, ErrorKind, HandlerRegistry, HttpClient, Method, Options, Request,
    Result, dispatch,
};

use crate::HyperClient;

/// Fluent builder for a single HTTP request.
///
/// Configuration calls chain; calls that can fail with a construction error
/// (duplicate header, duplicate status code, body serialization) return
/// `Result<Self>` so misuse surfaces at the offending call rather than at
/// dispatch.
pub struct Fetch {
    url: String,
    options: Options,
    method: Method,
    body: Option<(Bytes, String)>,
    headers: HashMap<String, String>,
    auth_override: Option<Auth>,
    registry: HandlerRegistry,
}

impl std::fmt::Debug for Fetch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetch")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("has_body", &self.body.is_some())
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Fetch {
    /// Create a request toward `url` with default [`Options`].
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_options(url, Options::default())
    }

    /// Create a request toward `url` with the given shared options.
    #[must_use]
    pub fn with_options(url: impl Into<String>, options: Options) -> Self {
        Self {
            url: url.into(),
            options,
            method: Method::Get,
            body: None,
            headers: HashMap::new(),
            auth_override: None,
            registry: HandlerRegistry::new(),
        }
    }

    // ========================================================================
    // Request configuration
    // ========================================================================

    /// Use the GET method (the default).
    #[must_use]
    pub fn via_get(mut self) -> Self {
        self.method = Method::Get;
        self
    }

    /// Use the POST method.
    #[must_use]
    pub fn via_post(mut self) -> Self {
        self.method = Method::Post;
        self
    }

    /// Attach a pre-built body with an explicit media type.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>, media_type: impl Into<String>) -> Self {
        self.body = Some((body.into(), media_type.into()));
        self
    }

    /// Serialize `value` as the JSON body, with media type
    /// `application/json`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn with_json_body<T: serde::Serialize>(self, value: &T) -> Result<Self> {
        self.with_json_body_as(value, ContentType::Json.as_str())
    }

    /// Serialize `value` as the JSON body with an explicit media type.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn with_json_body_as<T: serde::Serialize>(
        mut self,
        value: &T,
        media_type: impl Into<String>,
    ) -> Result<Self> {
        let body = self.options.json.serialize(value)?;
        self.body = Some((body, media_type.into()));
        Ok(self)
    }

    /// Override the bearer token for this request only.
    #[must_use]
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.auth_override = Some(Auth::bearer(token));
        self
    }

    /// Add one header key/value pair.
    ///
    /// Per-request headers win over [`Options::additional_headers`] on
    /// collision.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateHeader`] if the key was already added on
    /// this request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if self.headers.contains_key(&key) {
            return Err(Error::DuplicateHeader(key));
        }
        self.headers.insert(key, value.into());
        Ok(self)
    }

    // ========================================================================
    // Handler registration
    // ========================================================================

    /// Register a handler for a status code.
    ///
    /// The handler's boolean return is a continue flag: `false` suppresses
    /// all further result dispatch for the response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateStatusHandler`] if the code is already
    /// registered.
    pub fn when_status<F>(mut self, code: u16, handler: F) -> Result<Self>
    where
        F: FnMut(u16) -> bool + Send + 'static,
    {
        self.registry.when_status(code, handler)?;
        Ok(self)
    }

    /// Append an error handler for the given kind.
    ///
    /// All handlers whose kind matches a raised error fire, in registration
    /// order.
    #[must_use]
    pub fn on_error<F>(mut self, kind: ErrorKind, handler: F) -> Self
    where
        F: FnMut(&Error) + Send + 'static,
    {
        self.registry.on_error(kind, handler);
        self
    }

    /// Register the text result handler, gated on `text/plain`.
    ///
    /// Independent of the JSON handler: both may fire for one response.
    #[must_use]
    pub fn on_text<F>(mut self, handler: F) -> Self
    where
        F: FnMut(String) + Send + 'static,
    {
        self.registry.on_text(handler);
        self
    }

    /// Register a typed JSON result handler, gated on `application/json`.
    ///
    /// Replaces any previously registered JSON handler; the text handler is
    /// unaffected.
    #[must_use]
    pub fn on_json<T, F>(mut self, handler: F) -> Self
    where
        T: serde::de::DeserializeOwned,
        F: FnMut(T) + Send + 'static,
    {
        self.registry.on_json(handler);
        self
    }

    /// Register a dynamic JSON result handler, gated on `application/json`.
    ///
    /// Replaces any previously registered JSON handler; the text handler is
    /// unaffected.
    #[must_use]
    pub fn on_json_value<F>(mut self, handler: F) -> Self
    where
        F: FnMut(serde_json::Value) + Send + 'static,
    {
        self.registry.on_json_value(handler);
        self
    }

    /// Register the raw-stream handler.
    ///
    /// Fires for any content type, alongside text/JSON handlers, with the
    /// declared media type and the buffered body as a reader.
    #[must_use]
    pub fn on_stream<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&str, &mut dyn Read) + Send + 'static,
    {
        self.registry.on_stream(handler);
        self
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Send the request and route the outcome to the registered handlers.
    pub async fn dispatch(self) {
        self.dispatch_cancellable(CancellationToken::new()).await;
    }

    /// Send the request with a cancellation token.
    ///
    /// The token is observed once, immediately after the transport call
    /// returns: if cancellation was requested, no handler fires. In-flight
    /// transport work is not aborted early.
    pub async fn dispatch_cancellable(self, token: CancellationToken) {
        let client = HyperClient::new();
        self.dispatch_with(&client, token).await;
    }

    /// Send the request through a caller-supplied transport.
    pub async fn dispatch_with<C: HttpClient>(mut self, client: &C, token: CancellationToken) {
        let method = self.method;
        let url = self.url.clone();
        let span = span!(Level::INFO, "http_request", %method, %url);

        async move {
            let start = Instant::now();

            let outcome = match self.build_request() {
                Ok(request) => {
                    debug!(method = %method, url = %url, "sending request");
                    client.execute(request).await
                }
                Err(error) => Err(error),
            };

            if token.is_cancelled() {
                debug!("cancellation requested; skipping dispatch");
                return;
            }

            let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            match &outcome {
                Ok(response) => {
                    info!(status = response.status(), elapsed_ms, "request completed");
                }
                Err(error) => {
                    warn!(error = %error, elapsed_ms, "request failed");
                }
            }

            dispatch(outcome, &mut self.registry, &self.options);
        }
        .instrument(span)
        .await;
    }

    /// Blocking form of [`Fetch::dispatch`]: start the asynchronous form on
    /// a current-thread runtime and block until it completes.
    ///
    /// # Panics
    ///
    /// Panics if called from within an async runtime.
    pub fn dispatch_blocking(self) {
        match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime.block_on(self.dispatch()),
            Err(err) => error!(error = %err, "failed to build runtime for blocking dispatch"),
        }
    }

    /// Snapshot the accumulated configuration into an immutable [`Request`].
    fn build_request(&mut self) -> Result<Request> {
        let url = url::Url::parse(&self.url)?;

        // POST with no body defaults to an empty JSON object.
        let mut body = self.body.take();
        if self.method.has_body() && body.is_none() {
            body = Some((
                Bytes::from_static(b"{}"),
                ContentType::Json.as_str().to_string(),
            ));
        }

        let mut headers = self.options.additional_headers.clone();
        let request_headers = std::mem::take(&mut self.headers);
        let explicit_auth = request_headers
            .keys()
            .any(|key| key.eq_ignore_ascii_case("authorization"));
        headers.extend(request_headers);

        // An explicit per-request Authorization header beats both credentials
        if !explicit_auth
            && let Some(auth) = self
                .auth_override
                .take()
                .or_else(|| self.options.auth.clone())
        {
            headers.insert("Authorization".to_string(), auth.header_value());
        }

        let mut builder = Request::builder(self.method, url).headers(headers);
        if let Some((bytes, media_type)) = body {
            builder = builder.header("Content-Type", media_type).body(bytes);
        }
        Ok(builder.build())
    }
}
