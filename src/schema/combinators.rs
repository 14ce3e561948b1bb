//! Schemas wrapping other schemas: absence handling and coercion.

use serde_json::Value;

use super::{primitives, Context, Schema, SchemaError};

/// Accepts an absent (`null`) value, otherwise defers to the inner schema.
pub struct Optional<S> {
    inner: S,
}

/// Replaces an absent (`null`) value with a default when coercing.
pub struct Defaulted<S> {
    inner: S,
    default: Value,
}

/// Converts values matching a condition before validating them.
pub struct Coerce<S, C, F> {
    target: S,
    condition: C,
    convert: F,
}

/// Makes `inner` accept absent values.
pub fn optional<S: Schema>(inner: S) -> Optional<S> {
    Optional { inner }
}

/// Fills in `default` for absent values when coercion is enabled.
///
/// Without coercion an absent value is handed to `inner` unchanged.
pub fn defaulted<S: Schema>(inner: S, default: Value) -> Defaulted<S> {
    Defaulted { inner, default }
}

/// Converts values that match `condition` with `convert`, then validates the
/// result with `target`.
///
/// The conversion only runs when coercion is enabled, and the condition is
/// checked without coercion. A value already in the target shape is left alone
/// unless it also matches the condition.
///
/// # Examples
///
/// ```
/// use request_validator::schema::{self, ValidateOptions};
/// use serde_json::{json, Value};
///
/// let trimmed = schema::coerce(schema::string(), schema::string(), |v: &Value| {
///     Value::String(v.as_str().unwrap_or_default().trim().to_string())
/// });
///
/// let out = schema::validate(&json!("  hi  "), &trimmed, &ValidateOptions::default()).unwrap();
/// assert_eq!(out, json!("hi"));
/// ```
pub fn coerce<S, C, F>(target: S, condition: C, convert: F) -> Coerce<S, C, F>
where
    S: Schema,
    C: Schema,
    F: Fn(&Value) -> Value + Send + Sync,
{
    Coerce {
        target,
        condition,
        convert,
    }
}

/// A number schema that also accepts numeric strings when coercing.
///
/// `"4"` becomes `4` and `"2.5"` becomes `2.5`; integral values such as
/// `"4.0"` or `"1e3"` become integers. Strings that do not parse to a finite
/// number are left as they are and rejected as non-numbers.
pub fn coerced_number() -> Coerce<primitives::Number, primitives::Str, fn(&Value) -> Value> {
    coerce(
        primitives::number(),
        primitives::string(),
        parse_number as fn(&Value) -> Value,
    )
}

fn parse_number(value: &Value) -> Value {
    let Some(text) = value.as_str().map(str::trim) else {
        return value.clone();
    };
    if let Ok(int) = text.parse::<i64>() {
        return Value::from(int);
    }
    match text.parse::<f64>() {
        Ok(float) if float.is_finite() => match integral(float) {
            Some(int) => Value::from(int),
            None => Value::from(float),
        },
        _ => value.clone(),
    }
}

// `"4.0"` and `"1e3"` normalize like `"4"` and `"1000"`.
fn integral(float: f64) -> Option<i64> {
    let in_range = float >= i64::MIN as f64 && float < i64::MAX as f64;
    (float.fract() == 0.0 && in_range).then_some(float as i64)
}

impl<S: Schema> Schema for Optional<S> {
    fn type_name(&self) -> &'static str {
        self.inner.type_name()
    }

    fn check(&self, value: &Value, cx: &Context) -> Result<Value, SchemaError> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        self.inner.check(value, cx)
    }
}

impl<S: Schema> Schema for Defaulted<S> {
    fn type_name(&self) -> &'static str {
        self.inner.type_name()
    }

    fn check(&self, value: &Value, cx: &Context) -> Result<Value, SchemaError> {
        if value.is_null() && cx.options().coerce {
            return self.inner.check(&self.default, cx);
        }
        self.inner.check(value, cx)
    }
}

impl<S, C, F> Schema for Coerce<S, C, F>
where
    S: Schema,
    C: Schema,
    F: Fn(&Value) -> Value + Send + Sync,
{
    fn type_name(&self) -> &'static str {
        self.target.type_name()
    }

    fn check(&self, value: &Value, cx: &Context) -> Result<Value, SchemaError> {
        if cx.options().coerce && self.condition.check(value, &cx.without_coercion()).is_ok() {
            let converted = (self.convert)(value);
            return self.target.check(&converted, cx);
        }
        self.target.check(value, cx)
    }
}
