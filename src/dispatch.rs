//! Building validation middleware from its calling conventions.
//!
//! Three ways of declaring what to validate are accepted, and all of them are
//! normalized into one ordered list of [`ValidationUnit`]s when the middleware
//! is built:
//!
//! - one request aspect and its schema ([`validate`], [`ValidationSpec::key`])
//! - several aspects, each with its schema ([`validate_fields`], [`FieldMap`])
//! - a value computed by a function ([`validate_derived`], [`Target::derived`])
//!
//! # Execution
//!
//! ```text
//! request ──▶ unit 1 ──ok──▶ unit 2 ──ok──▶ ... ──▶ next()
//!               │              │
//!              err            err
//!               ▼              ▼
//!            error lane (later units never run)
//! ```
//!
//! Units commit one after the other: when a later unit fails, aspects already
//! normalized by earlier units stay normalized.

use std::fmt;
use std::sync::Arc;

use crate::error::{ConfigError, PipelineError};
use crate::logging::ValidationLog;
use crate::options::ValidateOptions;
use crate::request::{Request, RequestField, Response};
use crate::schema::{Schema, SchemaRef};
use crate::selector::Target;
use crate::validator::ValidationUnit;
use crate::web::{Handler, Next};

/// Ordered mapping of request aspect keys to schemas.
///
/// Entries keep their insertion order, which is the order they are validated
/// in. Inserting a key a second time replaces its schema in place.
///
/// # Examples
///
/// ```
/// use request_validator::{schema, FieldMap};
///
/// let fields = FieldMap::new()
///     .field("body", schema::object().field("name", schema::string()))
///     .field("query", schema::object().field("page", schema::coerced_number()));
///
/// assert_eq!(fields.keys().collect::<Vec<_>>(), ["body", "query"]);
/// ```
#[derive(Clone, Default)]
pub struct FieldMap {
    entries: Vec<(String, SchemaRef)>,
}

impl FieldMap {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the schema for `key`.
    pub fn field(self, key: impl Into<String>, schema: impl Schema + 'static) -> Self {
        self.field_ref(key, Arc::new(schema))
    }

    /// Adds (or replaces) an already shared schema for `key`.
    pub fn field_ref(mut self, key: impl Into<String>, schema: SchemaRef) -> Self {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = schema,
            None => self.entries.push((key, schema)),
        }
        self
    }

    /// Returns the keys in validation order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, SchemaRef)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, SchemaRef)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(FieldMap::new(), |map, (key, schema)| map.field_ref(key, schema))
    }
}

impl fmt::Debug for FieldMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}

/// A declaration of what a validation middleware checks.
#[derive(Debug, Clone)]
pub enum ValidationSpec {
    /// One aspect named by key. A missing schema is a configuration error.
    Key {
        /// Aspect key, e.g. `"body"`
        key: String,
        /// Schema for the aspect
        schema: Option<SchemaRef>,
    },
    /// Several aspects, validated in insertion order
    Fields(FieldMap),
    /// A field or derived value
    Target {
        /// What to read
        target: Target,
        /// Schema for the value
        schema: SchemaRef,
    },
}

impl ValidationSpec {
    /// Declares one aspect with its schema.
    pub fn key(key: impl Into<String>, schema: impl Schema + 'static) -> Self {
        ValidationSpec::Key {
            key: key.into(),
            schema: Some(Arc::new(schema)),
        }
    }

    /// Declares several aspects.
    pub fn fields(fields: FieldMap) -> Self {
        ValidationSpec::Fields(fields)
    }

    /// Declares a target (an aspect or a derived value) with its schema.
    pub fn target(target: impl Into<Target>, schema: impl Schema + 'static) -> Self {
        ValidationSpec::Target {
            target: target.into(),
            schema: Arc::new(schema),
        }
    }
}

impl From<&str> for ValidationSpec {
    fn from(key: &str) -> Self {
        ValidationSpec::Key {
            key: key.to_string(),
            schema: None,
        }
    }
}

impl From<FieldMap> for ValidationSpec {
    fn from(fields: FieldMap) -> Self {
        ValidationSpec::Fields(fields)
    }
}

/// Builds a validation middleware from a declaration.
///
/// # Errors
///
/// Returns a [`ConfigError`] when the declaration names no aspect, names an
/// unknown aspect, or omits a schema. No handler is built in that case.
///
/// # Examples
///
/// ```
/// use request_validator::{dispatch, schema, ConfigError, ValidateOptions, ValidationSpec};
///
/// let strict = dispatch(
///     ValidationSpec::key("query", schema::object().field("q", schema::string())),
///     ValidateOptions::default().with_mask(true),
/// );
/// assert!(strict.is_ok());
///
/// let err = dispatch(ValidationSpec::from("body"), ValidateOptions::default()).unwrap_err();
/// assert_eq!(err, ConfigError::MissingSchema { key: "body".to_string() });
/// ```
pub fn dispatch(
    spec: ValidationSpec,
    options: ValidateOptions,
) -> Result<ValidationHandler, ConfigError> {
    let units = match spec {
        ValidationSpec::Key { key, schema } => vec![field_unit(key, schema, options)?],
        ValidationSpec::Fields(fields) => {
            if fields.is_empty() {
                return Err(ConfigError::EmptySpec);
            }
            fields
                .entries
                .into_iter()
                .map(|(key, schema)| field_unit(key, Some(schema), options))
                .collect::<Result<Vec<_>, _>>()?
        }
        ValidationSpec::Target { target, schema } => {
            vec![ValidationUnit::new(target, schema, options)]
        }
    };

    let targets: Vec<&str> = units.iter().map(|unit| unit.target().label()).collect();
    tracing::debug!(
        ?targets,
        coerce = options.coerce,
        mask = options.mask,
        "Built validation middleware"
    );

    Ok(ValidationHandler {
        units: units.into(),
    })
}

fn field_unit(
    key: String,
    schema: Option<SchemaRef>,
    options: ValidateOptions,
) -> Result<ValidationUnit, ConfigError> {
    if key.is_empty() {
        return Err(ConfigError::EmptySpec);
    }
    let field: RequestField = key.parse()?;
    let schema = schema.ok_or(ConfigError::MissingSchema { key })?;
    Ok(ValidationUnit::new(Target::Field(field), schema, options))
}

/// Validates one request aspect with default options.
///
/// # Errors
///
/// Returns a [`ConfigError`] if `key` is not a recognized aspect.
pub fn validate(
    key: &str,
    schema: impl Schema + 'static,
) -> Result<ValidationHandler, ConfigError> {
    dispatch(ValidationSpec::key(key, schema), ValidateOptions::default())
}

/// Validates several request aspects, in insertion order, with default options.
///
/// # Errors
///
/// Returns a [`ConfigError`] if `fields` is empty or holds an unknown key.
pub fn validate_fields(fields: FieldMap) -> Result<ValidationHandler, ConfigError> {
    dispatch(ValidationSpec::fields(fields), ValidateOptions::default())
}

/// Validates a value computed from the request, with default options.
///
/// The normalized value is written back only if the target was given a commit
/// aspect with [`Target::commit_to`].
///
/// # Errors
///
/// Never fails for derived targets; the `Result` keeps the constructors
/// interchangeable.
pub fn validate_derived(
    target: Target,
    schema: impl Schema + 'static,
) -> Result<ValidationHandler, ConfigError> {
    dispatch(ValidationSpec::target(target, schema), ValidateOptions::default())
}

/// Pipeline handler running a fixed list of validation units.
///
/// Units run in declaration order against the same request. The first failing
/// unit's error is returned and the remaining units are skipped; when every
/// unit passes, the continuation is invoked exactly once.
#[derive(Clone)]
pub struct ValidationHandler {
    units: Arc<[ValidationUnit]>,
}

impl ValidationHandler {
    /// Returns the units in execution order.
    pub fn units(&self) -> &[ValidationUnit] {
        &self.units
    }
}

impl Handler for ValidationHandler {
    fn handle(
        &self,
        req: &mut Request,
        res: &mut Response,
        next: &mut Next,
    ) -> Result<(), PipelineError> {
        for unit in self.units.iter() {
            ValidationLog::new(req.request_id()).checking(unit.target().label());

            if let Err(err) = unit.check(req, res) {
                if let Some(validation) = err.as_validation() {
                    ValidationLog::new(req.request_id()).rejected(validation);
                }
                return Err(err);
            }
        }

        ValidationLog::new(req.request_id())
            .debug(format_args!("{} request properties passed validation", self.units.len()));
        next.call();
        Ok(())
    }
}

impl fmt::Debug for ValidationHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationHandler")
            .field("units", &self.units)
            .finish()
    }
}
