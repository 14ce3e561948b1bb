//! Schema contract and the built-in validation engine.
//!
//! The middleware treats a schema as an opaque, pure function of
//! `(value, options)` that either yields a normalized value or reports where
//! the value went wrong. Any engine can be plugged in by implementing
//! [`Schema`]; the constructors in this module ([`object`], [`string`],
//! [`coerce`], ...) form a small engine that covers typical request shapes.
//!
//! # Examples
//!
//! ```
//! use request_validator::schema::{self, ValidateOptions};
//! use serde_json::json;
//!
//! let item = schema::object()
//!     .field("id", schema::string())
//!     .field("value", schema::coerced_number())
//!     .field("comment", schema::optional(schema::string()))
//!     .field("other", schema::defaulted(schema::boolean(), json!(false)));
//!
//! let input = json!({"id": "abc", "value": "4"});
//! let output = schema::validate(&input, &item, &ValidateOptions::default()).unwrap();
//!
//! assert_eq!(output, json!({"id": "abc", "value": 4, "other": false}));
//! // The input is never mutated
//! assert_eq!(input, json!({"id": "abc", "value": "4"}));
//! ```

mod combinators;
mod object;
mod primitives;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

pub use crate::options::ValidateOptions;
pub use combinators::{coerce, coerced_number, defaulted, optional, Coerce, Defaulted, Optional};
pub use object::{array, object, Array, Object};
pub use primitives::{any, boolean, integer, number, string, Any, Boolean, Integer, Number, Str};

/// Shared, type-erased schema.
pub type SchemaRef = Arc<dyn Schema>;

/// A validator and coercer for values of some target shape.
///
/// Implementations must be pure: `check` may not mutate shared state and must
/// return the same outcome for the same `(value, options)`.
pub trait Schema: Send + Sync {
    /// Short type name used in failure messages, e.g. `"number"`.
    fn type_name(&self) -> &'static str;

    /// Validates `value` at the location described by `cx`.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] holding at least one [`Failure`].
    fn check(&self, value: &Value, cx: &Context) -> Result<Value, SchemaError>;
}

impl Schema for Arc<dyn Schema> {
    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn check(&self, value: &Value, cx: &Context) -> Result<Value, SchemaError> {
        (**self).check(value, cx)
    }
}

impl Schema for Box<dyn Schema> {
    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn check(&self, value: &Value, cx: &Context) -> Result<Value, SchemaError> {
        (**self).check(value, cx)
    }
}

impl fmt::Debug for dyn Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Schema({})", self.type_name())
    }
}

/// Validates `value` against `schema`.
///
/// This is the single entry point the middleware calls. The input is borrowed
/// and never modified; the normalized value is returned on success.
///
/// # Errors
///
/// Returns the engine's [`SchemaError`] when the value is invalid even after
/// coercion (if enabled).
pub fn validate(
    value: &Value,
    schema: &dyn Schema,
    options: &ValidateOptions,
) -> Result<Value, SchemaError> {
    schema.check(value, &Context::new(*options))
}

/// Location and options for one step of a validation walk.
#[derive(Debug, Clone)]
pub struct Context {
    options: ValidateOptions,
    path: Vec<String>,
}

impl Context {
    /// Creates a root context.
    pub fn new(options: ValidateOptions) -> Self {
        Self {
            options,
            path: Vec::new(),
        }
    }

    /// Returns the options in effect.
    pub fn options(&self) -> &ValidateOptions {
        &self.options
    }

    /// Returns the path from the root value to the current location.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Returns a context one level deeper, under `key`.
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut path = self.path.clone();
        path.push(key.into());
        Self {
            options: self.options,
            path,
        }
    }

    /// Returns the same location with coercion disabled.
    pub fn without_coercion(&self) -> Self {
        Self {
            options: self.options.with_coerce(false),
            path: self.path.clone(),
        }
    }
}

/// One rejected location within a validated value.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    path: Vec<String>,
    expected: &'static str,
    value: Value,
    message: String,
}

impl Failure {
    /// Creates a failure at the location of `cx`.
    pub fn new(
        cx: &Context,
        expected: &'static str,
        value: Value,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: cx.path().to_vec(),
            expected,
            value,
            message: message.into(),
        }
    }

    /// Creates the usual "Expected a X, but received: Y" failure.
    pub fn type_mismatch(cx: &Context, expected: &'static str, value: &Value) -> Self {
        Self::new(
            cx,
            expected,
            value.clone(),
            format!("Expected {} {}, but received: {}", article(expected), expected, value),
        )
    }

    /// Returns the last path segment, or `None` at the root.
    pub fn key(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }

    /// Returns the path from the root value.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Returns the type name the schema expected.
    pub fn expected(&self) -> &'static str {
        self.expected
    }

    /// Returns the rejected value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

fn article(word: &str) -> &'static str {
    match word.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

/// Report of a value that failed validation.
///
/// Always holds at least one [`Failure`]; the first one is the primary failure
/// whose key and path are reported by [`key`](Self::key) and
/// [`path`](Self::path).
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    failures: Vec<Failure>,
}

impl SchemaError {
    /// Builds an error from one or more failures.
    ///
    /// Returns `None` when `failures` is empty.
    pub fn from_failures(failures: Vec<Failure>) -> Option<Self> {
        if failures.is_empty() {
            None
        } else {
            Some(Self { failures })
        }
    }

    fn primary(&self) -> &Failure {
        &self.failures[0]
    }

    /// Returns the key of the primary failure.
    pub fn key(&self) -> Option<&str> {
        self.primary().key()
    }

    /// Returns the path of the primary failure.
    pub fn path(&self) -> &[String] {
        self.primary().path()
    }

    /// Returns the message of the primary failure.
    pub fn message(&self) -> &str {
        self.primary().message()
    }

    /// Returns all failures, primary first.
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// Consumes the error, returning its failures.
    pub fn into_failures(self) -> Vec<Failure> {
        self.failures
    }
}

impl From<Failure> for SchemaError {
    fn from(failure: Failure) -> Self {
        Self {
            failures: vec![failure],
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key() {
            Some(_) => write!(f, "At path: {} -- {}", self.path().join("."), self.message()),
            None => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for SchemaError {}
