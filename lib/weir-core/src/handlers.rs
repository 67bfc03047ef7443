//! Caller-supplied handler registry.
//!
//! The registry stores everything the dispatcher may invoke for one request:
//! status-code handlers, error handlers, at most one body handler, and an
//! optional raw-stream handler.

use std::collections::HashMap;
use std::io::Read;

use crate::{Error, ErrorKind, Result};

pub(crate) type StatusHandler = Box<dyn FnMut(u16) -> bool + Send>;
pub(crate) type ErrorHandler = Box<dyn FnMut(&Error) + Send>;
pub(crate) type TextHandler = Box<dyn FnMut(String) + Send>;
pub(crate) type StreamHandler = Box<dyn FnMut(&str, &mut dyn Read) + Send>;

/// JSON handler, tagged by the decode strategy chosen at registration time.
///
/// The typed variant captures the decode inside the closure, so no type
/// information has to survive until dispatch.
pub(crate) enum JsonHandler {
    /// Typed handler. Decode + invoke in one step; decode failure propagates
    /// to error routing.
    Typed(Box<dyn FnMut(&[u8]) -> Result<()> + Send>),
    /// Dynamic handler receiving an untyped [`serde_json::Value`].
    Dynamic(Box<dyn FnMut(serde_json::Value) + Send>),
}

/// Registered handlers for a single dispatch.
///
/// Status handlers are keyed (one per code, duplicates rejected); error
/// handlers are an ordered list (all matches fire). The text and JSON slots
/// are independent: both may fire for one response when both gates open.
/// Last-wins applies only between the two JSON overloads.
#[derive(Default)]
pub struct HandlerRegistry {
    pub(crate) status: HashMap<u16, StatusHandler>,
    pub(crate) errors: Vec<(ErrorKind, ErrorHandler)>,
    pub(crate) text: Option<TextHandler>,
    pub(crate) json: Option<JsonHandler>,
    pub(crate) stream: Option<StreamHandler>,
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("status_codes", &self.status.keys().collect::<Vec<_>>())
            .field(
                "error_kinds",
                &self.errors.iter().map(|(kind, _)| kind).collect::<Vec<_>>(),
            )
            .field("has_text_handler", &self.text.is_some())
            .field("has_json_handler", &self.json.is_some())
            .field("has_stream_handler", &self.stream.is_some())
            .finish()
    }
}

impl HandlerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a status code.
    ///
    /// The handler returns a continue flag: `false` suppresses all further
    /// result dispatch for the response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateStatusHandler`] if the code is already
    /// registered.
    pub fn when_status<F>(&mut self, code: u16, handler: F) -> Result<()>
    where
        F: FnMut(u16) -> bool + Send + 'static,
    {
        match self.status.entry(code) {
            std::collections::hash_map::Entry::Occupied(_) => {
                Err(Error::DuplicateStatusHandler(code))
            }
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(Box::new(handler));
                Ok(())
            }
        }
    }

    /// Append an error handler for the given kind.
    ///
    /// Handlers fire in registration order; every handler whose kind matches
    /// the raised error is invoked. Duplicates are allowed.
    pub fn on_error<F>(&mut self, kind: ErrorKind, handler: F)
    where
        F: FnMut(&Error) + Send + 'static,
    {
        self.errors.push((kind, Box::new(handler)));
    }

    /// Register the text body handler, replacing any previous text handler.
    ///
    /// Independent of the JSON slot: registering a JSON handler does not
    /// clear this one.
    pub fn on_text<F>(&mut self, handler: F)
    where
        F: FnMut(String) + Send + 'static,
    {
        self.text = Some(Box::new(handler));
    }

    /// Register a typed JSON body handler, replacing any previous JSON
    /// handler.
    pub fn on_json<T, F>(&mut self, mut handler: F)
    where
        T: serde::de::DeserializeOwned,
        F: FnMut(T) + Send + 'static,
    {
        self.json = Some(JsonHandler::Typed(Box::new(move |bytes| {
            let value: T = crate::from_json(bytes)?;
            handler(value);
            Ok(())
        })));
    }

    /// Register a dynamic (untyped) JSON body handler, replacing any
    /// previous JSON handler.
    pub fn on_json_value<F>(&mut self, handler: F)
    where
        F: FnMut(serde_json::Value) + Send + 'static,
    {
        self.json = Some(JsonHandler::Dynamic(Box::new(handler)));
    }

    /// Register the raw-stream handler.
    ///
    /// The handler receives the declared media type (empty string when the
    /// response carries none) and the buffered body as a reader.
    pub fn on_stream<F>(&mut self, handler: F)
    where
        F: FnMut(&str, &mut dyn Read) + Send + 'static,
    {
        self.stream = Some(Box::new(handler));
    }
}
