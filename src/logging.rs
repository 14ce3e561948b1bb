use std::fmt;

use crate::error::ValidationError;

/// Request-scoped logging for the validation middleware.
///
/// Borrowed from the request for the duration of one handler invocation, so
/// every record carries the request ID without the middleware keeping any
/// state between requests. Records go through `tracing`; nothing is emitted
/// unless the application installs a subscriber.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ValidationLog<'a> {
    request_id: &'a str,
}

impl<'a> ValidationLog<'a> {
    /// Creates a logger bound to one request.
    pub(crate) fn new(request_id: &'a str) -> Self {
        Self { request_id }
    }

    /// Records that a request aspect is about to be checked.
    pub(crate) fn checking(&self, field: &str) {
        tracing::debug!(request_id = %self.request_id, field, "Checking request property");
    }

    /// Records a validation failure with its key and aspect.
    pub(crate) fn rejected(&self, err: &ValidationError) {
        tracing::debug!(
            request_id = %self.request_id,
            field = err.field(),
            key = ?err.key(),
            failures = err.failures().len(),
            "Validation error"
        );
    }

    /// Logs a debug-level message with request ID.
    pub(crate) fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(request_id = %self.request_id, "{}", args);
    }
}
