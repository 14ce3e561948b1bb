use std::fmt;

use serde_json::{json, Value};

use crate::schema::{Failure, SchemaError};

/// Boxed error type for failures unrelated to validation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors travelling down a pipeline's error lane.
///
/// The `Validation` variant is the only one produced by this crate at request
/// time. Everything else raised by extractor functions or host handlers is
/// carried as `Other` and must pass through
/// [`catch_validation_error`](crate::catch_validation_error) untouched.
#[derive(Debug)]
pub enum PipelineError {
    /// A request aspect failed schema validation
    Validation(ValidationError),
    /// Any other error raised inside the pipeline
    Other(BoxError),
}

impl PipelineError {
    /// Wraps an arbitrary error as an unrelated pipeline error.
    pub fn other(err: impl Into<BoxError>) -> Self {
        PipelineError::Other(err.into())
    }

    /// Returns `true` for validation failures raised by this crate.
    pub fn is_validation(&self) -> bool {
        matches!(self, PipelineError::Validation(_))
    }

    /// Returns the validation error, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            PipelineError::Validation(err) => Some(err),
            PipelineError::Other(_) => None,
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Validation(err) => write!(f, "{}", err),
            PipelineError::Other(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Validation(err) => Some(err),
            PipelineError::Other(err) => Some(err.as_ref()),
        }
    }
}

impl From<ValidationError> for PipelineError {
    fn from(err: ValidationError) -> Self {
        PipelineError::Validation(err)
    }
}

/// A request aspect failed schema validation.
///
/// Carries the request aspect that was checked (`body`, `query`, or the label
/// of a derived value) and the schema engine's failure report.
///
/// # Examples
///
/// ```
/// use request_validator::{schema, Request, Response, Next, Handler, validate};
/// use serde_json::json;
///
/// let handler = validate("body", schema::object().field("value", schema::number())).unwrap();
///
/// let mut req = Request::new("req-1").with_field("body".parse().unwrap(), json!({"value": "nope"}));
/// let mut res = Response::new();
/// let mut next = Next::new();
///
/// let err = handler.handle(&mut req, &mut res, &mut next).unwrap_err();
/// let err = err.as_validation().expect("validation failure");
/// assert_eq!(err.field(), "body");
/// assert_eq!(err.key(), Some("value"));
/// assert!(!next.was_called());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    field: String,
    source: SchemaError,
}

impl ValidationError {
    /// Creates a validation error for the named request aspect.
    pub fn new(field: impl Into<String>, source: SchemaError) -> Self {
        Self {
            field: field.into(),
            source,
        }
    }

    /// Returns the request aspect that failed (e.g. `"body"`).
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the key of the offending location within the value.
    ///
    /// `None` when the value itself (not one of its members) was rejected.
    pub fn key(&self) -> Option<&str> {
        self.source.key()
    }

    /// Returns the full path of the primary failure.
    pub fn path(&self) -> &[String] {
        self.source.path()
    }

    /// Returns every failure the schema engine reported for this aspect.
    pub fn failures(&self) -> &[Failure] {
        self.source.failures()
    }

    /// Returns the underlying schema error.
    pub fn schema_error(&self) -> &SchemaError {
        &self.source
    }

    /// Renders the error as a JSON body suitable for a 4xx response.
    pub fn to_json(&self) -> Value {
        let issues: Vec<Value> = self
            .failures()
            .iter()
            .map(|failure| {
                json!({
                    "path": failure.path().join("."),
                    "key": failure.key(),
                    "message": failure.message(),
                })
            })
            .collect();

        json!({
            "error": "Validation failed",
            "field": self.field,
            "issues": issues,
        })
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key() {
            Some(key) => write!(
                f,
                "validation failed on key '{}' in request property '{}': {}",
                key,
                self.field,
                self.source.message()
            ),
            None => write!(
                f,
                "validation failed in request property '{}': {}",
                self.field,
                self.source.message()
            ),
        }
    }
}

impl std::error::Error for ValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// A validation middleware could not be built from its arguments.
///
/// Raised while the pipeline is being assembled, never while a request is
/// processed. It indicates a programming mistake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No request aspect was named
    EmptySpec,
    /// A request aspect was named without a schema
    MissingSchema {
        /// The aspect key missing its schema
        key: String,
    },
    /// A key does not name a recognized request aspect
    UnknownField {
        /// The unrecognized key
        key: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptySpec => write!(f, "Missing validation key"),
            ConfigError::MissingSchema { key } => {
                write!(f, "Missing schema for request property '{}'", key)
            }
            ConfigError::UnknownField { key } => {
                write!(f, "Unknown request property '{}'", key)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{self, ValidateOptions};

    fn failing(value: Value) -> ValidationError {
        let schema = schema::object()
            .field("id", schema::string())
            .field("value", schema::number());
        let err = schema::validate(&value, &schema, &ValidateOptions::default())
            .expect_err("value should be rejected");
        ValidationError::new("body", err)
    }

    #[test]
    fn validation_error_reports_key_and_field() {
        let err = failing(json!({"id": "abc", "value": "nope"}));

        assert_eq!(err.field(), "body");
        assert_eq!(err.key(), Some("value"));
        assert_eq!(err.path(), ["value".to_string()]);
    }

    #[test]
    fn validation_error_display_mentions_key() {
        let err = failing(json!({"id": "abc", "value": "nope"}));
        let message = err.to_string();

        assert!(message.contains("'value'"));
        assert!(message.contains("'body'"));
    }

    #[test]
    fn validation_error_display_without_key() {
        let err = failing(json!("not an object"));

        assert_eq!(err.key(), None);
        assert!(err.to_string().starts_with("validation failed in request property 'body'"));
    }

    #[test]
    fn to_json_lists_every_failure() {
        let err = failing(json!({"id": 1, "value": "nope"}));
        let body = err.to_json();

        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["field"], "body");
        assert_eq!(body["issues"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["issues"][0]["key"], "id");
    }

    #[test]
    fn pipeline_error_discriminates_variants() {
        let validation: PipelineError = failing(json!({"value": 1})).into();
        let other = PipelineError::other("database unavailable");

        assert!(validation.is_validation());
        assert!(validation.as_validation().is_some());
        assert!(!other.is_validation());
        assert!(other.as_validation().is_none());
        assert_eq!(other.to_string(), "database unavailable");
    }

    #[test]
    fn config_error_messages() {
        assert_eq!(ConfigError::EmptySpec.to_string(), "Missing validation key");
        assert_eq!(
            ConfigError::UnknownField {
                key: "bogus".to_string()
            }
            .to_string(),
            "Unknown request property 'bogus'"
        );
        assert_eq!(
            ConfigError::MissingSchema {
                key: "body".to_string()
            }
            .to_string(),
            "Missing schema for request property 'body'"
        );
    }
}
