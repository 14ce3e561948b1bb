//! A single bound validation check.

use serde_json::Value;

use crate::error::{PipelineError, ValidationError};
use crate::options::ValidateOptions;
use crate::request::{Request, Response};
use crate::schema::{self, SchemaRef};
use crate::selector::Target;

/// A `(target, schema, options)` triple with its executable check.
///
/// Built once when the middleware is assembled and immutable afterwards. A
/// unit never calls the pipeline continuation; that is left to the handler
/// running it.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use request_validator::{schema, RequestField, Request, Response, Target, ValidateOptions, ValidationUnit};
/// use serde_json::json;
///
/// let unit = ValidationUnit::new(
///     Target::Field(RequestField::Query),
///     Arc::new(schema::object().field("page", schema::coerced_number())),
///     ValidateOptions::default(),
/// );
///
/// let mut req = Request::new("req-1").with_field(RequestField::Query, json!({"page": "2"}));
/// unit.check(&mut req, &Response::new()).unwrap();
///
/// assert_eq!(req.query(), Some(&json!({"page": 2})));
/// assert_eq!(req.get_by_name("_query"), Some(&json!({"page": "2"})));
/// ```
#[derive(Clone)]
pub struct ValidationUnit {
    target: Target,
    schema: SchemaRef,
    options: ValidateOptions,
}

impl ValidationUnit {
    /// Binds a target to a schema and options.
    pub fn new(target: Target, schema: SchemaRef, options: ValidateOptions) -> Self {
        Self {
            target,
            schema,
            options,
        }
    }

    /// Returns the target this unit checks.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Returns the options forwarded to the schema.
    pub fn options(&self) -> &ValidateOptions {
        &self.options
    }

    /// Validates the target value of `req`.
    ///
    /// On success the commit aspect's previous value is kept under its shadow
    /// name and the aspect is overwritten with the normalized value. For a
    /// derived target that is the whole aspect, not the extracted part.
    ///
    /// Nothing is committed when the target has no commit aspect, or when the
    /// aspect is absent and the schema normalized it to `null`.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Validation`] when the schema rejects the value; the
    ///   request is not modified.
    /// - Any error raised by a derived target's function, unchanged.
    pub fn check(&self, req: &mut Request, res: &Response) -> Result<(), PipelineError> {
        let raw = self.target.resolve(req, res)?;

        let normalized = schema::validate(&raw, &*self.schema, &self.options)
            .map_err(|err| ValidationError::new(self.target.label(), err))?;

        let Some(field) = self.target.commit_field() else {
            return Ok(());
        };
        match req.get(field).cloned() {
            Some(previous) => req.commit(field, previous, normalized),
            None if normalized.is_null() => {}
            None => req.commit(field, Value::Null, normalized),
        }
        Ok(())
    }
}

impl std::fmt::Debug for ValidationUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationUnit")
            .field("target", &self.target)
            .field("schema", &self.schema.type_name())
            .field("options", &self.options)
            .finish()
    }
}
