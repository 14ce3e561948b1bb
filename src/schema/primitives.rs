//! Leaf schemas for scalar JSON values.

use serde_json::Value;

use super::{Context, Failure, Schema, SchemaError};

/// Accepts JSON strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Str;

/// Accepts JSON numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Number;

/// Accepts JSON numbers without a fractional part.
#[derive(Debug, Clone, Copy, Default)]
pub struct Integer;

/// Accepts `true` and `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Boolean;

/// Accepts any value, including `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Any;

/// Returns a schema accepting strings.
pub fn string() -> Str {
    Str
}

/// Returns a schema accepting numbers.
///
/// Numeric strings are rejected; wrap with [`coerce`](super::coerce) or use
/// [`coerced_number`](super::coerced_number) to accept them.
pub fn number() -> Number {
    Number
}

/// Returns a schema accepting integral numbers.
pub fn integer() -> Integer {
    Integer
}

/// Returns a schema accepting booleans.
pub fn boolean() -> Boolean {
    Boolean
}

/// Returns a schema accepting anything.
pub fn any() -> Any {
    Any
}

fn accept_if(
    ok: bool,
    value: &Value,
    expected: &'static str,
    cx: &Context,
) -> Result<Value, SchemaError> {
    if ok {
        Ok(value.clone())
    } else {
        Err(Failure::type_mismatch(cx, expected, value).into())
    }
}

impl Schema for Str {
    fn type_name(&self) -> &'static str {
        "string"
    }

    fn check(&self, value: &Value, cx: &Context) -> Result<Value, SchemaError> {
        accept_if(value.is_string(), value, self.type_name(), cx)
    }
}

impl Schema for Number {
    fn type_name(&self) -> &'static str {
        "number"
    }

    fn check(&self, value: &Value, cx: &Context) -> Result<Value, SchemaError> {
        accept_if(value.is_number(), value, self.type_name(), cx)
    }
}

impl Schema for Integer {
    fn type_name(&self) -> &'static str {
        "integer"
    }

    fn check(&self, value: &Value, cx: &Context) -> Result<Value, SchemaError> {
        let integral = match value {
            Value::Number(n) => {
                n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
            }
            _ => false,
        };
        accept_if(integral, value, self.type_name(), cx)
    }
}

impl Schema for Boolean {
    fn type_name(&self) -> &'static str {
        "boolean"
    }

    fn check(&self, value: &Value, cx: &Context) -> Result<Value, SchemaError> {
        accept_if(value.is_boolean(), value, self.type_name(), cx)
    }
}

impl Schema for Any {
    fn type_name(&self) -> &'static str {
        "any"
    }

    fn check(&self, value: &Value, _cx: &Context) -> Result<Value, SchemaError> {
        Ok(value.clone())
    }
}
