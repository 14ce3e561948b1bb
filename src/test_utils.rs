//! Shared proptest strategies for unit tests.

use proptest::prelude::*;
use serde_json::{json, Value};

/// Integers small enough to survive a round trip through a decimal string.
pub(crate) fn arb_numeric_field() -> impl Strategy<Value = i64> {
    -1_000_000i64..1_000_000
}

/// A `value` member: a number, a numeric string, or garbage.
pub(crate) fn arb_value_member() -> impl Strategy<Value = Value> {
    prop_oneof![
        arb_numeric_field().prop_map(|n| json!(n)),
        arb_numeric_field().prop_map(|n| json!(n.to_string())),
        (-1.0e6f64..1.0e6).prop_map(|f| json!(f)),
        "[a-z]{1,8}".prop_map(Value::String),
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
    ]
}

/// An item body `{id, value, comment?, other?}`, valid or not.
pub(crate) fn arb_item_body() -> impl Strategy<Value = Value> {
    (
        prop_oneof!["[a-z0-9]{1,12}".prop_map(Value::String), Just(json!(42))],
        arb_value_member(),
        prop::option::of("[ -~]{0,20}"),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(id, value, comment, other)| {
            let mut body = json!({"id": id, "value": value});
            if let Some(comment) = comment {
                body["comment"] = Value::String(comment);
            }
            if let Some(other) = other {
                body["other"] = Value::Bool(other);
            }
            body
        })
}
