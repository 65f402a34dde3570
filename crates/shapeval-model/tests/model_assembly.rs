//! Integration test: assemble models from the JSON AST and the builder, and
//! query them through the knowledge cache.
//!
//! Covers recursive definitions (a structure reachable from its own member
//! targets), which must load without any ordering constraints.

use std::sync::Arc;

use serde_json::json;
use shapeval_model::{ast, CheckMode, Model, NullableIndex, ShapeId, ShapeKind};

fn id(s: &str) -> ShapeId {
    s.parse().unwrap()
}

fn recursive_model() -> Model {
    ast::from_value(&json!({
        "smithy": "2.0",
        "shapes": {
            "example#Tree": {
                "type": "structure",
                "members": {
                    "value": {"target": "smithy.api#Integer", "traits": {"smithy.api#required": {}}},
                    "children": {"target": "example#Forest"}
                }
            },
            "example#Forest": {
                "type": "list",
                "member": {"target": "example#Tree"}
            }
        }
    }))
    .unwrap()
}

#[test]
fn test_recursive_shapes_load_in_any_order() {
    let model = recursive_model();
    let forest = model.get_shape(&id("example#Forest")).unwrap();
    let ShapeKind::List { member } = forest.kind() else {
        panic!("expected a list");
    };
    let member = model.get_shape(member).unwrap();
    assert_eq!(member.as_member().unwrap().target, id("example#Tree"));
    assert!(model.contains_shape(&id("example#Tree$children")));
}

#[test]
fn test_nullable_index_is_shared_across_threads() {
    let model = Arc::new(recursive_model());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let model = Arc::clone(&model);
            std::thread::spawn(move || {
                let index = NullableIndex::of(&model);
                let value = model.get_shape(&id("example#Tree$value")).unwrap();
                let children = model.get_shape(&id("example#Tree$children")).unwrap();
                (
                    index.is_member_nullable(&model, value, CheckMode::Server),
                    index.is_member_nullable(&model, children, CheckMode::Server),
                )
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), (false, true));
    }
}

#[test]
fn test_shape_ids_round_trip_through_serde() {
    let parsed: ShapeId = serde_json::from_value(json!("example#Tree$value")).unwrap();
    assert_eq!(parsed.member(), Some("value"));
    assert_eq!(serde_json::to_value(&parsed).unwrap(), json!("example#Tree$value"));
    assert!(serde_json::from_value::<ShapeId>(json!("not an id")).is_err());
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any well-formed absolute id parses and prints back unchanged.
        #[test]
        fn shape_id_display_round_trips(
            namespace in "[a-z][a-z0-9_]{0,8}(\\.[a-z][a-z0-9_]{0,8}){0,2}",
            name in "[A-Z][A-Za-z0-9_]{0,12}",
            member in proptest::option::of("[a-z_][A-Za-z0-9_]{0,8}"),
        ) {
            let text = match &member {
                Some(m) => format!("{namespace}#{name}${m}"),
                None => format!("{namespace}#{name}"),
            };
            let parsed: ShapeId = text.parse().unwrap();
            prop_assert_eq!(parsed.to_string(), text);
            prop_assert_eq!(parsed.namespace(), namespace.as_str());
        }

        /// Lists of arbitrary names build, one member shape each.
        #[test]
        fn builder_creates_one_member_per_declaration(
            names in prop::collection::btree_set("[a-z][a-z0-9]{0,6}", 0..8)
        ) {
            let members = names
                .iter()
                .map(|n| shapeval_model::MemberDef::new(n, "smithy.api#String"));
            let model = Model::builder().structure("ns#S", members).build().unwrap();
            let shape = model.get_shape(&id("ns#S")).unwrap();
            prop_assert_eq!(shape.members().count(), names.len());
            for name in &names {
                let member_id = format!("ns#S${name}");
                prop_assert!(model.contains_shape(&id(&member_id)));
            }
        }
    }
}
