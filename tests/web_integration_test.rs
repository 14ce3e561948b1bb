//! Integration tests driving full pipeline runs.
//!
//! Each scenario is run for both calling conventions: a single aspect key
//! with a schema, and a key-to-schema mapping.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use request_validator::web::{error_handler_fn, handler_fn, Pipeline};
use request_validator::{
    catch_validation_error, schema, validate, validate_fields, FieldMap, PipelineError, Request,
    RequestField, Response, ValidationHandler,
};
use serde_json::{json, Value};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn item() -> schema::Object {
    schema::object()
        .field("id", schema::string())
        .field("value", schema::coerced_number())
        .field("comment", schema::optional(schema::string()))
        .field("other", schema::defaulted(schema::boolean(), json!(false)))
}

fn conventions() -> Vec<(&'static str, ValidationHandler)> {
    vec![
        ("key", validate("body", item()).expect("valid key declaration")),
        (
            "mapping",
            validate_fields(FieldMap::new().field("body", item())).expect("valid mapping"),
        ),
    ]
}

struct Harness {
    pipeline: Pipeline,
    failures: Arc<AtomicUsize>,
    successes: Arc<AtomicUsize>,
}

impl Harness {
    fn new(validator: ValidationHandler) -> Self {
        let failures = Arc::new(AtomicUsize::new(0));
        let successes = Arc::new(AtomicUsize::new(0));
        let on_failure = Arc::clone(&failures);
        let on_success = Arc::clone(&successes);

        let pipeline = Pipeline::new()
            .handler(validator)
            .error_handler(catch_validation_error(move |_err, _req, res, _next| {
                on_failure.fetch_add(1, Ordering::SeqCst);
                res.send_status(501);
                Ok(())
            }))
            .handler(handler_fn(move |_req, res, _next| {
                on_success.fetch_add(1, Ordering::SeqCst);
                res.send_status(200);
                Ok(())
            }));

        Self {
            pipeline,
            failures,
            successes,
        }
    }

    fn post(&self, body: Value) -> (Request, Response) {
        let mut req = Request::new("req-it").with_field(RequestField::Body, body);
        let mut res = Response::new();
        self.pipeline
            .run(&mut req, &mut res)
            .expect("pipeline consumes every error");
        (req, res)
    }

    fn failures(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }

    fn successes(&self) -> usize {
        self.successes.load(Ordering::SeqCst)
    }
}

#[test]
fn passes_validation() {
    init_tracing();
    for (name, validator) in conventions() {
        let harness = Harness::new(validator);
        let (req, res) = harness.post(json!({"id": "abc", "value": 4}));

        assert_eq!(res.status(), Some(200), "{name}");
        assert_eq!(harness.failures(), 0, "{name}");
        assert_eq!(harness.successes(), 1, "{name}");
        assert_eq!(req.body().unwrap()["value"], json!(4), "{name}");
    }
}

#[test]
fn coerces_values_to_match_type() {
    init_tracing();
    for (name, validator) in conventions() {
        let harness = Harness::new(validator);
        let (req, res) = harness.post(json!({"id": "abc", "value": "4"}));

        assert_eq!(res.status(), Some(200), "{name}");
        assert_eq!(harness.failures(), 0, "{name}");
        assert_eq!(harness.successes(), 1, "{name}");
        assert_eq!(
            req.body(),
            Some(&json!({"id": "abc", "value": 4, "other": false})),
            "{name}"
        );
        assert_eq!(
            req.get_by_name("_body"),
            Some(&json!({"id": "abc", "value": "4"})),
            "{name}"
        );
    }
}

#[test]
fn fails_validation() {
    init_tracing();
    for (name, validator) in conventions() {
        let harness = Harness::new(validator);
        let (req, res) = harness.post(json!({"id": "abc", "value": "nope"}));

        assert_eq!(res.status(), Some(501), "{name}");
        assert_eq!(harness.failures(), 1, "{name}");
        assert_eq!(harness.successes(), 0, "{name}");
        assert_eq!(req.original(RequestField::Body), None, "{name}");
    }
}

#[test]
fn reports_failing_key_to_catcher() {
    let keys = Arc::new(std::sync::Mutex::new(Vec::new()));
    let seen = Arc::clone(&keys);
    let pipeline = Pipeline::new()
        .handler(validate("body", item()).expect("valid declaration"))
        .error_handler(catch_validation_error(move |err, _req, res, _next| {
            seen.lock()
                .expect("lock")
                .push((err.field().to_string(), err.key().map(str::to_string)));
            res.json(422, err.to_json());
            Ok(())
        }));

    let mut req = Request::new("req-key")
        .with_field(RequestField::Body, json!({"id": "abc", "value": "nope"}));
    let mut res = Response::new();
    pipeline.run(&mut req, &mut res).expect("handled");

    assert_eq!(
        *keys.lock().expect("lock"),
        vec![("body".to_string(), Some("value".to_string()))]
    );
    assert_eq!(res.status(), Some(422));
    assert_eq!(res.body().unwrap()["issues"][0]["path"], "value");
}

#[test]
fn mapping_reports_later_field_and_keeps_earlier_commit() {
    init_tracing();
    let validator = validate_fields(
        FieldMap::new()
            .field("body", item())
            .field("query", schema::object().field("limit", schema::coerced_number())),
    )
    .expect("valid mapping");

    let reported = Arc::new(std::sync::Mutex::new(None));
    let slot = Arc::clone(&reported);
    let reached = Arc::new(AtomicUsize::new(0));
    let on_reached = Arc::clone(&reached);

    let pipeline = Pipeline::new()
        .handler(validator)
        .error_handler(catch_validation_error(move |err, _req, res, _next| {
            *slot.lock().expect("lock") =
                Some((err.field().to_string(), err.key().map(str::to_string)));
            res.send_status(400);
            Ok(())
        }))
        .handler(handler_fn(move |_req, _res, _next| {
            on_reached.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));

    let mut req = Request::new("req-multi")
        .with_field(RequestField::Body, json!({"id": "abc", "value": "4"}))
        .with_field(RequestField::Query, json!({"limit": "lots"}));
    let mut res = Response::new();
    pipeline.run(&mut req, &mut res).expect("handled");

    assert_eq!(res.status(), Some(400));
    assert_eq!(reached.load(Ordering::SeqCst), 0);
    // Units before the failing one have already committed
    assert_eq!(req.body(), Some(&json!({"id": "abc", "value": 4, "other": false})));
    assert_eq!(req.get_by_name("_body"), Some(&json!({"id": "abc", "value": "4"})));
    assert_eq!(req.query(), Some(&json!({"limit": "lots"})));
    assert_eq!(req.original(RequestField::Query), None);
    assert_eq!(
        *reported.lock().expect("lock"),
        Some(("query".to_string(), Some("limit".to_string())))
    );
}

#[test]
fn unrelated_errors_bypass_the_catcher() {
    let caught = Arc::new(AtomicUsize::new(0));
    let generic = Arc::new(AtomicUsize::new(0));
    let on_caught = Arc::clone(&caught);
    let on_generic = Arc::clone(&generic);

    let pipeline = Pipeline::new()
        .handler(handler_fn(|_req, _res, _next| {
            Err(PipelineError::other("upstream timed out"))
        }))
        .handler(validate("body", item()).expect("valid declaration"))
        .error_handler(catch_validation_error(move |_err, _req, _res, _next| {
            on_caught.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }))
        .error_handler(error_handler_fn(move |err, _req, res, _next| {
            on_generic.fetch_add(1, Ordering::SeqCst);
            assert_eq!(err.to_string(), "upstream timed out");
            res.send_status(500);
            Ok(())
        }));

    let mut res = Response::new();
    pipeline
        .run(&mut Request::new("req-unrelated"), &mut res)
        .expect("generic handler consumes the error");

    assert_eq!(caught.load(Ordering::SeqCst), 0);
    assert_eq!(generic.load(Ordering::SeqCst), 1);
    assert_eq!(res.status(), Some(500));
}

#[test]
fn validation_error_without_catcher_reaches_the_host() {
    let pipeline = Pipeline::new().handler(validate("body", item()).expect("valid declaration"));

    let err = pipeline
        .run(
            &mut Request::new("req-host").with_field(RequestField::Body, json!({"value": 1})),
            &mut Response::new(),
        )
        .unwrap_err();

    assert_eq!(err.as_validation().and_then(|e| e.key()), Some("id"));
}

#[test]
fn one_pipeline_serves_concurrent_requests() {
    let harness = Harness::new(validate("body", item()).expect("valid declaration"));

    std::thread::scope(|scope| {
        for n in 0..8 {
            let harness = &harness;
            scope.spawn(move || {
                let value = if n % 2 == 0 { json!(n.to_string()) } else { json!("bad") };
                let (req, res) = harness.post(json!({"id": format!("item-{n}"), "value": value}));
                if n % 2 == 0 {
                    assert_eq!(res.status(), Some(200));
                    assert_eq!(req.body().unwrap()["value"], json!(n));
                } else {
                    assert_eq!(res.status(), Some(501));
                }
            });
        }
    });

    assert_eq!(harness.successes(), 4);
    assert_eq!(harness.failures(), 4);
}
