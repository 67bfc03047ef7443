//! Response dispatch.
//!
//! Given the outcome of one HTTP exchange, decide which registered handlers
//! fire and in what order:
//!
//! 1. a failed exchange goes straight to error routing;
//! 2. a registered status-code handler runs first and can suppress all
//!    further result dispatch by returning `false`;
//! 3. the raw-stream handler fires regardless of content type;
//! 4. the text and JSON handlers fire independently when their content-type
//!    gates are open (or the ignore flag is set); decode failures fall
//!    through to error routing;
//! 5. errors are delivered to every matching error handler in registration
//!    order, and swallowed when nothing matches.

use bytes::Buf;

use crate::handlers::JsonHandler;
use crate::{Error, HandlerRegistry, Options, Response, Result};

/// Route a completed (or failed) exchange to the registered handlers.
///
/// This never returns an error: runtime failures are delivered to matching
/// error handlers, and discarded when no handler matches.
pub fn dispatch(outcome: Result<Response>, registry: &mut HandlerRegistry, options: &Options) {
    match outcome {
        Ok(response) => {
            if let Err(error) = dispatch_response(&response, registry, options) {
                route_error(&error, registry);
            }
        }
        Err(error) => route_error(&error, registry),
    }
}

/// Result dispatch for a successful exchange. Any `Err` escaping here is
/// routed through the error handlers by [`dispatch`].
fn dispatch_response(
    response: &Response,
    registry: &mut HandlerRegistry,
    options: &Options,
) -> Result<()> {
    if let Some(handler) = registry.status.get_mut(&response.status()) {
        let proceed = handler(response.status());
        if !proceed {
            return Ok(());
        }
    }

    let media_type = response.content_type();

    if let Some(handler) = registry.stream.as_mut() {
        let mut reader = response.body().clone().reader();
        handler(media_type.as_deref().unwrap_or(""), &mut reader);
    }

    let gate_open =
        |expected: &str| options.ignore_media_type_check || media_type.as_deref() == Some(expected);

    // Text and JSON slots are independent: both fire when both gates open.
    if let Some(handler) = registry.text.as_mut()
        && gate_open("text/plain")
    {
        let text = response.text()?;
        handler(text);
    }

    if let Some(handler) = registry.json.as_mut()
        && gate_open("application/json")
    {
        match handler {
            JsonHandler::Typed(decode_and_call) => decode_and_call(response.body())?,
            JsonHandler::Dynamic(handler) => {
                let value = crate::from_json_value(response.body())?;
                handler(value);
            }
        }
    }

    Ok(())
}

/// Deliver an error to every matching handler, in registration order.
///
/// An error with no matching handler is dropped; the caller observes only a
/// normal return. A warning is logged so operators are not fully blind.
fn route_error(error: &Error, registry: &mut HandlerRegistry) {
    let mut matched = false;
    for (kind, handler) in &mut registry.errors {
        if kind.matches(error) {
            matched = true;
            handler(error);
        }
    }
    if !matched {
        tracing::warn!(%error, "no error handler matched; error swallowed");
    }
}
