//! Selection of the value a validation unit checks.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::PipelineError;
use crate::request::{Request, RequestField, Response};

/// Function computing a value to validate from the request and response.
///
/// An `Err` is an unrelated pipeline error, not a validation failure.
pub type Extractor =
    Arc<dyn Fn(&Request, &Response) -> Result<Value, PipelineError> + Send + Sync>;

/// What a validation unit reads, and where it commits the normalized value.
///
/// Resolved once when the middleware is built; requests never re-inspect how
/// the unit was declared.
#[derive(Clone)]
pub enum Target {
    /// A request aspect, read and overwritten in place
    Field(RequestField),
    /// A derived value computed by a function
    Derived {
        /// Label used in errors and logs
        label: String,
        /// Computes the value to validate
        extract: Extractor,
        /// Aspect receiving the normalized value, if any
        commit_to: Option<RequestField>,
    },
}

impl Target {
    /// Creates a derived target from a function.
    pub fn derived<F>(label: impl Into<String>, extract: F) -> Self
    where
        F: Fn(&Request, &Response) -> Result<Value, PipelineError> + Send + Sync + 'static,
    {
        Target::Derived {
            label: label.into(),
            extract: Arc::new(extract),
            commit_to: None,
        }
    }

    /// Directs the normalized value of a derived target into `field`.
    ///
    /// Has no effect on field targets, which always commit to their own aspect.
    pub fn commit_to(self, field: RequestField) -> Self {
        match self {
            Target::Derived { label, extract, .. } => Target::Derived {
                label,
                extract,
                commit_to: Some(field),
            },
            field_target => field_target,
        }
    }

    /// Returns the name reported in errors and logs.
    pub fn label(&self) -> &str {
        match self {
            Target::Field(field) => field.as_str(),
            Target::Derived { label, .. } => label.as_str(),
        }
    }

    /// Returns the aspect receiving the normalized value, if any.
    pub fn commit_field(&self) -> Option<RequestField> {
        match self {
            Target::Field(field) => Some(*field),
            Target::Derived { commit_to, .. } => *commit_to,
        }
    }

    /// Reads the value to validate. Absent aspects read as `null`.
    ///
    /// # Errors
    ///
    /// Propagates any error raised by a derived target's function.
    pub fn resolve(&self, req: &Request, res: &Response) -> Result<Value, PipelineError> {
        match self {
            Target::Field(field) => Ok(req.get(*field).cloned().unwrap_or(Value::Null)),
            Target::Derived { extract, .. } => (**extract)(req, res),
        }
    }
}

impl From<RequestField> for Target {
    fn from(field: RequestField) -> Self {
        Target::Field(field)
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Field(field) => f.debug_tuple("Field").field(field).finish(),
            Target::Derived {
                label, commit_to, ..
            } => f
                .debug_struct("Derived")
                .field("label", label)
                .field("commit_to", commit_to)
                .finish_non_exhaustive(),
        }
    }
}
