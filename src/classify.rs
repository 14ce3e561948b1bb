//! Error-lane filter that only reacts to validation failures.

use crate::error::{PipelineError, ValidationError};
use crate::request::{Request, Response};
use crate::web::{ErrorHandler, Next};

/// Error handler that runs its inner handler for validation errors only.
///
/// Built with [`catch_validation_error`].
pub struct CatchValidationError<F> {
    handler: F,
}

/// Wraps `handler` so it only sees [`ValidationError`]s.
///
/// Any other error is returned unchanged, so it keeps travelling down the
/// error lane to whatever handles generic errors.
///
/// # Examples
///
/// ```
/// use request_validator::web::{ErrorHandler, Next};
/// use request_validator::{catch_validation_error, PipelineError, Request, Response};
///
/// let handler = catch_validation_error(|err, _req, res, _next| {
///     res.json(422, err.to_json());
///     Ok(())
/// });
///
/// let unrelated = handler
///     .handle_error(
///         PipelineError::other("connection reset"),
///         &mut Request::new("req-1"),
///         &mut Response::new(),
///         &mut Next::new(),
///     )
///     .unwrap_err();
///
/// assert_eq!(unrelated.to_string(), "connection reset");
/// ```
pub fn catch_validation_error<F>(handler: F) -> CatchValidationError<F>
where
    F: Fn(ValidationError, &mut Request, &mut Response, &mut Next) -> Result<(), PipelineError>
        + Send
        + Sync,
{
    CatchValidationError { handler }
}

impl<F> ErrorHandler for CatchValidationError<F>
where
    F: Fn(ValidationError, &mut Request, &mut Response, &mut Next) -> Result<(), PipelineError>
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
        match err {
            PipelineError::Validation(err) => (self.handler)(err, req, res, next),
            other => Err(other),
        }
    }
}
