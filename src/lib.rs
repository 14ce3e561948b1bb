//! Schema-driven request validation middleware for handler-chain HTTP servers.
//!
//! This crate validates a named part of an incoming request (body, query,
//! route parameters, any other request aspect, or a value computed from the
//! request) against a schema, and either replaces it with the normalized value
//! or halts the pipeline with a classified validation error:
//! - **Validator units**: one `(target, schema, options)` check per aspect
//! - **Dispatch**: single-aspect, multi-aspect and derived-value declarations,
//!   normalized into one ordered, fail-fast handler
//! - **Error classification**: an error-lane wrapper that only fires on
//!   validation failures and lets every other error through untouched
//!
//! # Core Types
//!
//! - [`ValidationHandler`]: Pipeline handler built by [`validate`], [`validate_fields`],
//!   [`validate_derived`] or [`dispatch`]
//! - [`ValidationUnit`]: A bound check for one [`Target`]
//! - [`ValidationError`]: Classified validation failure carrying the failing key
//! - [`PipelineError`]: The error lane's error type
//! - [`catch_validation_error`]: Filters an error handler down to validation failures
//! - [`schema`]: The schema contract and a built-in engine
//!
//! # Examples
//!
//! ```
//! use request_validator::web::{handler_fn, Pipeline};
//! use request_validator::{
//!     catch_validation_error, schema, validate_fields, FieldMap, Request, RequestField, Response,
//! };
//! use serde_json::json;
//!
//! let item = schema::object()
//!     .field("id", schema::string())
//!     .field("value", schema::coerced_number());
//!
//! let pipeline = Pipeline::new()
//!     .handler(
//!         validate_fields(
//!             FieldMap::new()
//!                 .field("body", item)
//!                 .field("query", schema::object().field("dry_run", schema::optional(schema::string()))),
//!         )
//!         .expect("valid declaration"),
//!     )
//!     .error_handler(catch_validation_error(|err, _req, res, _next| {
//!         res.json(422, err.to_json());
//!         Ok(())
//!     }))
//!     .handler(handler_fn(|_req, res, _next| {
//!         res.send_status(201);
//!         Ok(())
//!     }));
//!
//! let mut req = Request::new("req-42")
//!     .with_field(RequestField::Body, json!({"id": "abc", "value": "nope"}))
//!     .with_field(RequestField::Query, json!({}));
//! let mut res = Response::new();
//! pipeline.run(&mut req, &mut res).expect("handled by the catcher");
//!
//! assert_eq!(res.status(), Some(422));
//! assert_eq!(res.body().unwrap()["issues"][0]["key"], "value");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod classify;
mod dispatch;
mod error;
mod logging;
mod options;
mod request;
pub mod schema;
mod selector;
mod validator;
pub mod web;

#[cfg(test)]
mod test_utils;

pub use classify::{catch_validation_error, CatchValidationError};
pub use dispatch::{
    dispatch, validate, validate_derived, validate_fields, FieldMap, ValidationHandler,
    ValidationSpec,
};
pub use error::{BoxError, ConfigError, PipelineError, ValidationError};
pub use options::ValidateOptions;
pub use request::{Request, RequestField, Response};
pub use schema::{Schema, SchemaError, SchemaRef};
pub use selector::{Extractor, Target};
pub use validator::ValidationUnit;
pub use web::{Handler, Next};
