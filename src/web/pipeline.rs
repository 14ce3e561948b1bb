//! In-process handler chain with a normal lane and an error lane.

use crate::error::PipelineError;
use crate::request::{Request, Response};

use super::{ErrorHandler, Handler, Next};

enum Layer {
    Handler(Box<dyn Handler>),
    ErrorHandler(Box<dyn ErrorHandler>),
}

/// An ordered chain of handlers and error handlers.
///
/// Layers run in registration order. While no error is pending, error handlers
/// are skipped; once a handler fails, normal handlers are skipped until an
/// error handler consumes the error. An error nobody consumes is returned from
/// [`run`](Self::run) so the embedding server can answer it.
///
/// The pipeline holds no per-request state and can serve concurrent requests
/// from several threads.
///
/// # Examples
///
/// ```
/// use request_validator::web::{handler_fn, Pipeline};
/// use request_validator::{catch_validation_error, schema, validate, Request, RequestField, Response};
/// use serde_json::json;
///
/// let pipeline = Pipeline::new()
///     .handler(validate("body", schema::object().field("value", schema::coerced_number())).unwrap())
///     .error_handler(catch_validation_error(|err, _req, res, _next| {
///         res.json(422, err.to_json());
///         Ok(())
///     }))
///     .handler(handler_fn(|_req, res, _next| {
///         res.send_status(200);
///         Ok(())
///     }));
///
/// let mut req = Request::new("req-1").with_field(RequestField::Body, json!({"value": "4"}));
/// let mut res = Response::new();
/// pipeline.run(&mut req, &mut res).unwrap();
///
/// assert_eq!(res.status(), Some(200));
/// assert_eq!(req.body(), Some(&json!({"value": 4})));
/// ```
#[derive(Default)]
pub struct Pipeline {
    layers: Vec<Layer>,
}

impl Pipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a normal handler.
    pub fn handler(mut self, handler: impl Handler + 'static) -> Self {
        self.layers.push(Layer::Handler(Box::new(handler)));
        self
    }

    /// Appends an error handler.
    pub fn error_handler(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.layers.push(Layer::ErrorHandler(Box::new(handler)));
        self
    }

    /// Returns the number of registered layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if no layer is registered.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Drives one request through the chain.
    ///
    /// # Errors
    ///
    /// Returns the pending error if it reaches the end of the chain without
    /// being consumed by an error handler.
    pub fn run(&self, req: &mut Request, res: &mut Response) -> Result<(), PipelineError> {
        let mut pending: Option<PipelineError> = None;

        for (index, layer) in self.layers.iter().enumerate() {
            let mut next = Next::new();
            let result = match (layer, pending.take()) {
                (Layer::Handler(handler), None) => handler.handle(req, res, &mut next),
                (Layer::ErrorHandler(handler), Some(err)) => {
                    tracing::trace!(request_id = %req.request_id(), layer = index, "error lane");
                    handler.handle_error(err, req, res, &mut next)
                }
                (Layer::Handler(_), Some(err)) => {
                    pending = Some(err);
                    continue;
                }
                (Layer::ErrorHandler(_), None) => continue,
            };

            match result {
                Err(err) => pending = Some(err),
                Ok(()) if next.was_called() => {}
                Ok(()) => {
                    tracing::trace!(request_id = %req.request_id(), layer = index, "request ended");
                    return Ok(());
                }
            }
        }

        match pending {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
