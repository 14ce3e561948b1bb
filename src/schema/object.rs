//! Composite schemas: objects with named fields and homogeneous arrays.

use serde_json::{Map, Value};

use super::{Context, Failure, Schema, SchemaError};

/// Object schema with a fixed, ordered set of fields.
///
/// Absent fields are validated as `null`, so [`optional`](super::optional)
/// and [`defaulted`](super::defaulted) decide how absence is handled. Unknown
/// keys are rejected unless the `mask` option is on (they are stripped) or the
/// schema was built with [`passthrough`](Self::passthrough) (they are kept).
///
/// Every field is checked; all failures are reported, in field order, followed
/// by failures for unknown keys.
#[derive(Default)]
pub struct Object {
    fields: Vec<(String, Box<dyn Schema>)>,
    passthrough: bool,
}

/// Array schema validating every element with the same schema.
pub struct Array<S> {
    item: S,
}

/// Starts an empty object schema.
pub fn object() -> Object {
    Object::default()
}

/// Returns a schema for arrays whose elements match `item`.
pub fn array<S: Schema>(item: S) -> Array<S> {
    Array { item }
}

impl Object {
    /// Adds a field. Declaring the same name twice replaces the earlier schema
    /// in place.
    pub fn field(mut self, name: impl Into<String>, schema: impl Schema + 'static) -> Self {
        let name = name.into();
        let schema: Box<dyn Schema> = Box::new(schema);
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = schema,
            None => self.fields.push((name, schema)),
        }
        self
    }

    /// Keeps unknown keys in the output without validating them.
    pub fn passthrough(mut self) -> Self {
        self.passthrough = true;
        self
    }

    fn declares(&self, name: &str) -> bool {
        self.fields.iter().any(|(field, _)| field == name)
    }
}

impl Schema for Object {
    fn type_name(&self) -> &'static str {
        "object"
    }

    fn check(&self, value: &Value, cx: &Context) -> Result<Value, SchemaError> {
        let Value::Object(input) = value else {
            return Err(Failure::type_mismatch(cx, self.type_name(), value).into());
        };

        let mut output = Map::new();
        let mut failures = Vec::new();

        for (name, schema) in &self.fields {
            let raw = input.get(name);
            match schema.check(raw.unwrap_or(&Value::Null), &cx.child(name.as_str())) {
                Ok(Value::Null) if raw.is_none() => {}
                Ok(normalized) => {
                    output.insert(name.clone(), normalized);
                }
                Err(err) => failures.extend(err.into_failures()),
            }
        }

        for (name, raw) in input.iter().filter(|(name, _)| !self.declares(name)) {
            if self.passthrough {
                output.insert(name.clone(), raw.clone());
            } else if !cx.options().mask {
                failures.push(Failure::new(
                    &cx.child(name.as_str()),
                    "never",
                    raw.clone(),
                    format!("Unknown key \"{}\"", name),
                ));
            }
        }

        match SchemaError::from_failures(failures) {
            Some(err) => Err(err),
            None => Ok(Value::Object(output)),
        }
    }
}

impl<S: Schema> Schema for Array<S> {
    fn type_name(&self) -> &'static str {
        "array"
    }

    fn check(&self, value: &Value, cx: &Context) -> Result<Value, SchemaError> {
        let Value::Array(items) = value else {
            return Err(Failure::type_mismatch(cx, self.type_name(), value).into());
        };

        let mut output = Vec::with_capacity(items.len());
        let mut failures = Vec::new();
        for (index, item) in items.iter().enumerate() {
            match self.item.check(item, &cx.child(index.to_string())) {
                Ok(normalized) => output.push(normalized),
                Err(err) => failures.extend(err.into_failures()),
            }
        }

        match SchemaError::from_failures(failures) {
            Some(err) => Err(err),
            None => Ok(Value::Array(output)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{coerced_number, defaulted, optional, string, validate, ValidateOptions};
    use serde_json::json;

    fn check_with(
        schema: &dyn Schema,
        value: Value,
        options: ValidateOptions,
    ) -> Result<Value, SchemaError> {
        validate(&value, schema, &options)
    }

    fn check(schema: &dyn Schema, value: Value) -> Result<Value, SchemaError> {
        check_with(schema, value, ValidateOptions::default())
    }

    #[test]
    fn object_rejects_non_objects() {
        let err = check(&object(), json!("x")).unwrap_err();
        assert_eq!(err.message(), "Expected an object, but received: \"x\"");
    }

    #[test]
    fn object_omits_absent_optional_fields() {
        let schema = object()
            .field("id", string())
            .field("comment", optional(string()));

        assert_eq!(check(&schema, json!({"id": "a"})).unwrap(), json!({"id": "a"}));
    }

    #[test]
    fn object_keeps_explicit_null_for_optional_fields() {
        let schema = object().field("comment", optional(string()));

        assert_eq!(
            check(&schema, json!({"comment": null})).unwrap(),
            json!({"comment": null})
        );
    }

    #[test]
    fn object_fills_defaults() {
        let schema = object().field("page", defaulted(coerced_number(), json!(1)));

        assert_eq!(check(&schema, json!({})).unwrap(), json!({"page": 1}));
        assert_eq!(check(&schema, json!({"page": "3"})).unwrap(), json!({"page": 3}));
    }

    #[test]
    fn object_rejects_unknown_keys() {
        let schema = object().field("id", string());
        let err = check(&schema, json!({"id": "a", "extra": 1})).unwrap_err();

        assert_eq!(err.key(), Some("extra"));
        assert_eq!(err.failures()[0].expected(), "never");
    }

    #[test]
    fn object_masks_unknown_keys() {
        let schema = object().field("id", string());
        let output = check_with(
            &schema,
            json!({"id": "a", "extra": 1}),
            ValidateOptions::default().with_mask(true),
        )
        .unwrap();

        assert_eq!(output, json!({"id": "a"}));
    }

    #[test]
    fn object_passthrough_keeps_unknown_keys() {
        let schema = object().field("id", string()).passthrough();

        assert_eq!(
            check(&schema, json!({"id": "a", "extra": 1})).unwrap(),
            json!({"id": "a", "extra": 1})
        );
    }

    #[test]
    fn object_collects_failures_in_field_order() {
        let schema = object()
            .field("id", string())
            .field("value", coerced_number());
        let err = check(&schema, json!({"id": 1, "value": "nope", "zzz": true})).unwrap_err();

        let keys: Vec<_> = err.failures().iter().map(|f| f.key()).collect();
        assert_eq!(keys, vec![Some("id"), Some("value"), Some("zzz")]);
        assert_eq!(err.key(), Some("id"));
    }

    #[test]
    fn object_redeclared_field_replaces_schema() {
        let schema = object().field("id", string()).field("id", coerced_number());

        assert_eq!(check(&schema, json!({"id": "7"})).unwrap(), json!({"id": 7}));
    }

    #[test]
    fn nested_failures_carry_full_path() {
        let schema = object().field(
            "items",
            array(object().field("qty", coerced_number())),
        );
        let err = check(&schema, json!({"items": [{"qty": 1}, {"qty": "many"}]})).unwrap_err();

        assert_eq!(err.path(), ["items".to_string(), "1".to_string(), "qty".to_string()]);
        assert_eq!(err.key(), Some("qty"));
    }

    #[test]
    fn array_normalizes_every_element() {
        let schema = array(coerced_number());

        assert_eq!(check(&schema, json!(["1", 2, "3.5"])).unwrap(), json!([1, 2, 3.5]));
        assert!(check(&schema, json!({"0": 1})).is_err());
    }
}
