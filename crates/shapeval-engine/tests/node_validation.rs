//! Integration test: validate literal values against a model loaded from the
//! JSON AST, through the cached validator index.
//!
//! Each test names one observable rule (bounds, nullability, unions, map
//! keys, timestamps) and asserts the exact diagnostics a caller would see.

use std::sync::Arc;

use proptest::prelude::*;
use serde_json::json;
use shapeval_engine::{
    validate_value, Feature, NullabilityMode, Severity, ValidationEvent, ValidationOptions,
    ValidatorIndex,
};
use shapeval_model::{ast, Model, Node, ShapeId};
use tracing_subscriber::EnvFilter;

/// Route index-construction logs to the test output. Only the first call
/// installs the subscriber.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .with_target(false)
        .try_init();
}

fn id(s: &str) -> ShapeId {
    s.parse().unwrap()
}

fn model() -> Model {
    ast::from_value(&json!({
        "smithy": "2.0",
        "shapes": {
            "ex#Bounded": {
                "type": "integer",
                "traits": {"smithy.api#range": {"min": 10, "max": 20}}
            },
            "ex#Tiny": {"type": "byte"},
            "ex#Big": {"type": "bigInteger"},
            "ex#Data": {"type": "blob"},
            "ex#Tags": {
                "type": "list",
                "member": {"target": "smithy.api#String"}
            },
            "ex#Person": {
                "type": "structure",
                "members": {
                    "name": {"target": "smithy.api#String", "traits": {"smithy.api#required": {}}},
                    "age": {"target": "ex#Bounded"},
                    "tags": {"target": "ex#Tags"}
                }
            },
            "ex#Choice": {
                "type": "union",
                "members": {
                    "text": {"target": "smithy.api#String"},
                    "count": {"target": "ex#Bounded"}
                }
            },
            "ex#LabelKey": {
                "type": "string",
                "traits": {"smithy.api#length": {"min": 3}}
            },
            "ex#Labels": {
                "type": "map",
                "key": {"target": "ex#LabelKey"},
                "value": {"target": "smithy.api#String"}
            },
            "ex#Instant": {
                "type": "timestamp",
                "traits": {"smithy.api#timestampFormat": "date-time"}
            },
            "ex#Event": {
                "type": "structure",
                "members": {
                    "at": {"target": "ex#Instant"},
                    "epoch": {
                        "target": "ex#Instant",
                        "traits": {"smithy.api#timestampFormat": "epoch-seconds"}
                    }
                }
            },
            "ex#Chain": {
                "type": "structure",
                "members": {"next": {"target": "ex#Chain"}}
            }
        }
    }))
    .unwrap()
}

fn run(model: &Model, shape: &str, value: serde_json::Value, options: &ValidationOptions) -> Vec<ValidationEvent> {
    validate_value(model, &id(shape), &Node::from(value), options).unwrap()
}

fn messages(events: &[ValidationEvent]) -> Vec<&str> {
    events.iter().map(|e| e.message.as_str()).collect()
}

fn defaults() -> ValidationOptions {
    ValidationOptions::default()
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

#[test]
fn test_range_trait_on_integer() {
    let model = model();
    let options = defaults();

    assert_eq!(
        messages(&run(&model, "ex#Bounded", json!(9), &options)),
        ["Value provided for `ex#Bounded` must be greater than or equal to 10, but found 9"]
    );
    assert_eq!(
        messages(&run(&model, "ex#Bounded", json!(21), &options)),
        ["Value provided for `ex#Bounded` must be less than or equal to 20, but found 21"]
    );
    assert_eq!(
        messages(&run(&model, "ex#Bounded", json!(10.2), &options)),
        ["integer shapes must not have floating point values, but found `10.2` provided for `ex#Bounded`"]
    );
    assert_eq!(
        messages(&run(&model, "ex#Bounded", json!(true), &options)),
        ["Expected number value for integer shape, `ex#Bounded`; found boolean value, `true`"]
    );
    assert!(run(&model, "ex#Bounded", json!(15), &options).is_empty());
    assert!(run(&model, "ex#Bounded", json!(10), &options).is_empty());
    assert!(run(&model, "ex#Bounded", json!(20), &options).is_empty());
}

#[test]
fn test_range_violation_is_a_warning_when_constraint_errors_are_allowed() {
    let model = model();
    let options = defaults().with_feature(Feature::AllowConstraintErrors);
    let events = run(&model, "ex#Bounded", json!(21), &options);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].severity, Severity::Warning);
}

/// The built-in bounds accept their limits even though the diagnostic
/// wording reads as an exclusive comparison.
#[test]
fn test_byte_bounds_are_inclusive_despite_wording() {
    let model = model();
    let options = defaults();

    assert!(run(&model, "ex#Tiny", json!(127), &options).is_empty());
    assert!(run(&model, "ex#Tiny", json!(-128), &options).is_empty());
    assert_eq!(
        messages(&run(&model, "ex#Tiny", json!(128), &options)),
        ["byte value must be < 127, but found 128"]
    );
    assert_eq!(
        messages(&run(&model, "ex#Tiny", json!(-129), &options)),
        ["byte value must be > -128, but found -129"]
    );
}

#[test]
fn test_big_integer_beyond_u64_is_integral() {
    let model = model();
    let value = Node::parse("1180591620717411303424").unwrap();
    let events = validate_value(&model, &id("ex#Big"), &value, &defaults()).unwrap();
    assert!(events.is_empty());

    let negative = Node::parse("-1180591620717411303424").unwrap();
    assert!(validate_value(&model, &id("ex#Big"), &negative, &defaults()).unwrap().is_empty());

    let fraction = Node::parse("1180591620717411303424.5").unwrap();
    assert_eq!(
        messages(&validate_value(&model, &id("ex#Big"), &fraction, &defaults()).unwrap()),
        ["bigInteger shapes must not have floating point values, but found `1180591620717411303424.5` provided for `ex#Big`"]
    );
}

#[test]
fn test_integer_beyond_i128_on_a_fixed_width_shape() {
    let model = model();
    let huge = Node::parse("1000000000000000000000000000000000000000000").unwrap();
    assert_eq!(
        messages(&validate_value(&model, &id("ex#Tiny"), &huge, &defaults()).unwrap()),
        ["byte value must be < 127, but found 1000000000000000000000000000000000000000000"]
    );
}

// ---------------------------------------------------------------------------
// Structures and nullability
// ---------------------------------------------------------------------------

#[test]
fn test_unknown_member_is_a_warning() {
    let model = model();
    let events = run(&model, "ex#Person", json!({"name": "a", "nickname": "b"}), &defaults());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].severity, Severity::Warning);
    assert_eq!(events[0].id, "Model.UnknownMember.ex#Person.nickname");
    assert_eq!(events[0].message, "Member `nickname` does not exist in `ex#Person`");
}

#[test]
fn test_missing_required_member() {
    let model = model();

    let strict = run(&model, "ex#Person", json!({}), &defaults());
    assert_eq!(messages(&strict), ["Missing required structure member `name` for `ex#Person`"]);
    assert_eq!(strict[0].severity, Severity::Error);

    let relaxed = run(
        &model,
        "ex#Person",
        json!({}),
        &defaults().with_feature(Feature::AllowConstraintErrors),
    );
    assert_eq!(relaxed.len(), 1);
    assert_eq!(relaxed[0].severity, Severity::Warning);
}

#[test]
fn test_member_errors_carry_the_member_path() {
    let model = model();
    let events = run(&model, "ex#Person", json!({"name": "a", "age": 30, "tags": ["ok", 4]}), &defaults());
    assert_eq!(
        messages(&events),
        [
            "age: Value provided for `ex#Bounded` must be less than or equal to 20, but found 30",
            "tags.1: Expected string value for string shape, `smithy.api#String`; found number value, `4`",
        ]
    );
}

#[test]
fn test_null_required_member() {
    let model = model();
    let value = json!({"name": null});

    let enforced = run(&model, "ex#Person", value.clone(), &defaults());
    assert_eq!(
        messages(&enforced),
        [
            "name: Required structure member `name` for `ex#Person` cannot be null",
            "name: Expected string value for string shape, `smithy.api#String`; found null value",
        ]
    );

    let optional_nulls = run(
        &model,
        "ex#Person",
        value.clone(),
        &defaults().with_feature(Feature::AllowOptionalNulls),
    );
    assert_eq!(
        messages(&optional_nulls),
        ["name: Required structure member `name` for `ex#Person` cannot be null"]
    );

    let legacy = run(
        &model,
        "ex#Person",
        value.clone(),
        &defaults()
            .with_nullability(NullabilityMode::Legacy)
            .with_feature(Feature::AllowOptionalNulls),
    );
    assert!(legacy.is_empty());
}

#[test]
fn test_null_optional_member() {
    let model = model();
    let value = json!({"name": "a", "age": null});

    assert_eq!(
        messages(&run(&model, "ex#Person", value.clone(), &defaults())),
        ["age: Expected number value for integer shape, `ex#Bounded`; found null value"]
    );
    assert!(run(
        &model,
        "ex#Person",
        value,
        &defaults().with_feature(Feature::AllowOptionalNulls)
    )
    .is_empty());
}

#[test]
fn test_null_in_dense_list() {
    let model = model();
    let events = run(
        &model,
        "ex#Person",
        json!({"name": "a", "tags": ["x", null]}),
        &defaults().with_feature(Feature::AllowOptionalNulls),
    );
    assert_eq!(
        messages(&events),
        ["tags.1: Non-sparse list shape `ex#Tags` cannot contain null values"]
    );
}

// ---------------------------------------------------------------------------
// Unions, blobs and maps
// ---------------------------------------------------------------------------

#[test]
fn test_union_with_several_members_reports_once() {
    let model = model();
    let events = run(&model, "ex#Choice", json!({"text": 1, "count": true}), &defaults());
    assert_eq!(messages(&events), ["union values can contain a value for only a single member"]);
}

#[test]
fn test_empty_union_has_no_member_diagnostics() {
    let model = model();
    assert!(run(&model, "ex#Choice", json!({}), &defaults()).is_empty());
}

#[test]
fn test_union_with_unknown_member_warns() {
    let model = model();
    let events = run(&model, "ex#Choice", json!({"bogus": 1}), &defaults());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].severity, Severity::Warning);
    assert_eq!(events[0].id, "Model.UnknownMember.ex#Choice.bogus");
    assert!(!events.iter().any(ValidationEvent::is_error));
}

#[test]
fn test_union_member_is_validated() {
    let model = model();
    assert!(run(&model, "ex#Choice", json!({"text": "hi"}), &defaults()).is_empty());
    assert_eq!(
        messages(&run(&model, "ex#Choice", json!({"count": 30}), &defaults())),
        ["count: Value provided for `ex#Bounded` must be less than or equal to 20, but found 30"]
    );
}

#[test]
fn test_blob_base64_is_opt_in() {
    let model = model();
    let strict = defaults().with_feature(Feature::RequireBase64BlobValues);

    assert!(run(&model, "ex#Data", json!("not base64!"), &defaults()).is_empty());
    assert!(run(&model, "ex#Data", json!("aGVsbG8="), &strict).is_empty());
    assert_eq!(
        messages(&run(&model, "ex#Data", json!("not base64!"), &strict)),
        ["Blob value must be a valid base64 string"]
    );
}

#[test]
fn test_unpadded_base64_is_accepted() {
    let model = model();
    let strict = defaults().with_feature(Feature::RequireBase64BlobValues);
    assert!(run(&model, "ex#Data", json!("YQ"), &strict).is_empty());
    assert!(run(&model, "ex#Data", json!("YQ=="), &strict).is_empty());
    assert!(run(&model, "ex#Data", json!("aGVsbG8"), &strict).is_empty());
}

#[test]
fn test_map_keys_are_validated_under_a_key_path() {
    let model = model();
    let events = run(&model, "ex#Labels", json!({"ab": "x", "abc": 1}), &defaults());
    assert_eq!(
        messages(&events),
        [
            "ab (map-key): String value provided for `ex#LabelKey` must be >= 3 characters, but the provided value is only 2 characters.",
            "abc: Expected string value for string shape, `smithy.api#String`; found number value, `1`",
        ]
    );
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

#[test]
fn test_member_timestamp_format_overrides_target() {
    let model = model();

    assert!(run(
        &model,
        "ex#Event",
        json!({"at": "1985-04-12T23:20:50.52Z", "epoch": 482196050}),
        &defaults()
    )
    .is_empty());

    assert_eq!(
        messages(&run(&model, "ex#Event", json!({"epoch": "1985-04-12T23:20:50.52Z"}), &defaults())),
        ["epoch: Invalid string value provided for timestamp, `ex#Event$epoch`. Expected a number that contains epoch seconds with optional millisecond precision"]
    );

    assert_eq!(
        messages(&run(&model, "ex#Event", json!({"at": 482196050}), &defaults())),
        ["at: Expected a string value for a date-time timestamp (e.g., \"1985-04-12T23:20:50.52Z\")"]
    );
}

// ---------------------------------------------------------------------------
// Index sharing
// ---------------------------------------------------------------------------

#[test]
fn test_concurrent_first_access_builds_one_index() {
    let model = model();
    let indexes: Vec<Arc<ValidatorIndex>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8).map(|_| scope.spawn(|| ValidatorIndex::of(&model))).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for index in &indexes[1..] {
        assert!(Arc::ptr_eq(&indexes[0], index));
    }
}

#[test]
fn test_referring_member_is_cleared_after_a_walk() {
    let model = model();
    let index = ValidatorIndex::of(&model);
    let mut ctx = defaults().context();
    let value = Node::from(json!({"name": "a", "tags": ["x"]}));
    let events = index.validate(&model, &id("ex#Person"), &value, &mut ctx).unwrap();
    assert!(events.is_empty());
    assert!(ctx.referring_member().is_none());
}

#[test]
fn test_dangling_target_is_logged_and_skipped() {
    init_tracing();
    let model = ast::from_value(&json!({
        "shapes": {
            "ex#Holder": {
                "type": "structure",
                "members": {"ghost": {"target": "ex#Nowhere"}}
            }
        }
    }))
    .unwrap();
    let events = run(&model, "ex#Holder", json!({"ghost": {"anything": [1, 2]}}), &defaults());
    assert!(events.is_empty());
}

#[test]
fn test_unknown_shape_is_an_error() {
    let model = model();
    let err = validate_value(&model, &id("ex#Nope"), &Node::null(), &defaults()).unwrap_err();
    assert_eq!(err.to_string(), "shape `ex#Nope` is not defined in the model");
}

// ---------------------------------------------------------------------------
// Property tests
// ---------------------------------------------------------------------------

fn chain(depth: usize) -> serde_json::Value {
    (0..depth).fold(json!({}), |inner, _| json!({"next": inner}))
}

proptest! {
    #[test]
    fn validation_is_idempotent(n in any::<i64>()) {
        let model = model();
        let first = run(&model, "ex#Bounded", json!(n), &defaults());
        let second = run(&model, "ex#Bounded", json!(n), &defaults());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn conforming_values_produce_no_events(n in 10i64..=20, name in "[a-z]{1,8}") {
        let model = model();
        let events = run(&model, "ex#Person", json!({"name": name, "age": n}), &defaults());
        prop_assert!(events.is_empty());
    }

    #[test]
    fn recursive_shapes_terminate_on_finite_values(depth in 0usize..64) {
        let model = model();
        let events = run(&model, "ex#Chain", chain(depth), &defaults());
        prop_assert!(events.is_empty());
    }
}
