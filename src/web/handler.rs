//! Handler traits and the explicit continuation token.

use crate::error::PipelineError;
use crate::request::{Request, Response};

/// Continuation handed to every handler.
///
/// A handler calls [`call`](Self::call) to let the pipeline move on to the
/// next handler. A handler that returns `Ok(())` without calling it ends the
/// request, typically because it has already written the response.
#[derive(Debug, Default)]
pub struct Next {
    calls: usize,
}

impl Next {
    /// Creates a continuation that has not been invoked.
    pub fn new() -> Self {
        Self::default()
    }

    /// Passes control to the next handler.
    pub fn call(&mut self) {
        self.calls += 1;
    }

    /// Returns `true` once [`call`](Self::call) has been invoked.
    pub fn was_called(&self) -> bool {
        self.calls > 0
    }

    /// Returns how many times [`call`](Self::call) was invoked.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

/// A unit of request-processing logic in the normal lane.
///
/// Returning `Err` routes the error to the pipeline's error lane.
pub trait Handler: Send + Sync {
    /// Processes the request.
    ///
    /// # Errors
    ///
    /// Any error returned is forwarded to the next [`ErrorHandler`].
    fn handle(
        &self,
        req: &mut Request,
        res: &mut Response,
        next: &mut Next,
    ) -> Result<(), PipelineError>;
}

/// A unit of logic in the error lane.
///
/// Returning `Err(e)` forwards `e` to the next error handler. Returning
/// `Ok(())` after calling `next` resumes the normal lane; without calling it,
/// the request ends.
pub trait ErrorHandler: Send + Sync {
    /// Handles an error raised earlier in the pipeline.
    ///
    /// # Errors
    ///
    /// Returns the error (the same one or a new one) to keep it travelling
    /// down the error lane.
    fn handle_error(
        &self,
        err: PipelineError,
        req: &mut Request,
        res: &mut Response,
        next: &mut Next,
    ) -> Result<(), PipelineError>;
}

/// A [`Handler`] backed by a closure. Built with [`handler_fn`].
pub struct FnHandler<F> {
    f: F,
}

/// An [`ErrorHandler`] backed by a closure. Built with [`error_handler_fn`].
pub struct FnErrorHandler<F> {
    f: F,
}

/// Wraps a closure as a [`Handler`].
///
/// # Examples
///
/// ```
/// use request_validator::web::{handler_fn, Handler, Next};
/// use request_validator::{Request, Response};
///
/// let ok = handler_fn(|_req, res, _next| {
///     res.send_status(200);
///     Ok(())
/// });
///
/// let mut res = Response::new();
/// ok.handle(&mut Request::new("req-1"), &mut res, &mut Next::new()).unwrap();
/// assert_eq!(res.status(), Some(200));
/// ```
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&mut Request, &mut Response, &mut Next) -> Result<(), PipelineError> + Send + Sync,
{
    FnHandler { f }
}

/// Wraps a closure as an [`ErrorHandler`].
pub fn error_handler_fn<F>(f: F) -> FnErrorHandler<F>
where
    F: Fn(PipelineError, &mut Request, &mut Response, &mut Next) -> Result<(), PipelineError>
        + Send
        + Sync,
{
    FnErrorHandler { f }
}

impl<F> Handler for FnHandler<F>
where
    F: Fn(&mut Request, &mut Response, &mut Next) -> Result<(), PipelineError> + Send + Sync,
{
    fn handle(
        &self,
        req: &mut Request,
        res: &mut Response,
        next: &mut Next,
    ) -> Result<(), PipelineError> {
        (self.f)(req, res, next)
    }
}

impl<F> ErrorHandler for FnErrorHandler<F>
where
    F: Fn(PipelineError, &mut Request, &mut Response, &mut Next) -> Result<(), PipelineError>
        + Send
        + Sync,
{
    fn handle_error(
        &self,
        err: PipelineError,
        req: &mut Request,
        res: &mut Response,
        next: &mut Next,
    ) -> Result<(), PipelineError> {
        (self.f)(err, req, res, next)
    }
}
