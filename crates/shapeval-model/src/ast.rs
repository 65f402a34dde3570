//! # JSON AST Loader
//!
//! Builds a [`Model`] from the JSON AST form of a model:
//!
//! ```json
//! {
//!   "smithy": "2.0",
//!   "metadata": { "key": "value" },
//!   "shapes": {
//!     "example#Person": {
//!       "type": "structure",
//!       "members": {
//!         "name": { "target": "smithy.api#String", "traits": { "smithy.api#required": {} } }
//!       },
//!       "traits": { "smithy.api#documentation": "A person." }
//!     },
//!     "example#Names": { "type": "list", "member": { "target": "smithy.api#String" } }
//!   }
//! }
//! ```
//!
//! `apply` entries add traits to shapes defined elsewhere in the document.
//! The loader checks only shape-id syntax and shape types; it performs no
//! semantic validation of the model.

use serde_json::{Map, Value};

use crate::error::ModelError;
use crate::model::{MemberDef, Model, ModelBuilder};
use crate::node::Node;
use crate::shape::{Shape, ShapeKind, ShapeType};

/// Parse JSON AST text into a model.
///
/// # Errors
///
/// Returns `ModelError::Json` for invalid JSON, and any error of
/// [`from_value`] for a malformed document.
pub fn parse(text: &str) -> Result<Model, ModelError> {
    let value: Value = serde_json::from_str(text)?;
    from_value(&value)
}

/// Build a model from an already parsed JSON AST document.
///
/// # Errors
///
/// Returns `ModelError::MalformedAst` when the document structure is wrong,
/// `ModelError::UnknownShapeType` for an unrecognized `type`, and the
/// builder's errors for bad shape ids, duplicates or dangling `apply`s.
pub fn from_value(document: &Value) -> Result<Model, ModelError> {
    let root = as_object(document, "$")?;

    if let Some(version) = root.get("smithy") {
        if !version.is_string() {
            return Err(malformed("$.smithy", "expected a version string"));
        }
    }

    let mut builder = Model::builder();

    if let Some(metadata) = root.get("metadata") {
        for (key, value) in as_object(metadata, "$.metadata")? {
            builder = builder.metadata(key, Node::from_json(value));
        }
    }

    if let Some(shapes) = root.get("shapes") {
        for (id, definition) in as_object(shapes, "$.shapes")? {
            builder = load_shape(builder, id, definition)?;
        }
    }

    builder.build()
}

fn load_shape(builder: ModelBuilder, id: &str, definition: &Value) -> Result<ModelBuilder, ModelError> {
    let path = format!("$.shapes.{id}");
    let definition = as_object(definition, &path)?;
    let type_name = definition
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(&path, "missing `type`"))?;

    let mut builder = if type_name == "apply" {
        builder
    } else {
        let shape_type =
            ShapeType::from_name(type_name).ok_or_else(|| ModelError::UnknownShapeType {
                shape: id.to_string(),
                type_name: type_name.to_string(),
            })?;
        define(builder, id, shape_type, definition, &path)?
    };

    if let Some(traits) = definition.get("traits") {
        for (trait_id, value) in as_object(traits, &format!("{path}.traits"))? {
            builder = builder.apply_trait(id, trait_id, Node::from_json(value));
        }
    }
    Ok(builder)
}

fn define(
    builder: ModelBuilder,
    id: &str,
    shape_type: ShapeType,
    definition: &Map<String, Value>,
    path: &str,
) -> Result<ModelBuilder, ModelError> {
    let builder = match shape_type {
        ShapeType::List => builder.list(id, member(definition, "member", path)?),
        ShapeType::Map => builder.map(
            id,
            member(definition, "key", path)?,
            member(definition, "value", path)?,
        ),
        ShapeType::Structure | ShapeType::Union => {
            let mut members = Vec::new();
            if let Some(declared) = definition.get("members") {
                let members_path = format!("{path}.members");
                for (name, value) in as_object(declared, &members_path)? {
                    members.push(member_def(name, value, &format!("{members_path}.{name}"))?);
                }
            }
            if shape_type == ShapeType::Structure {
                builder.structure(id, members)
            } else {
                builder.union(id, members)
            }
        }
        ShapeType::Member => return Err(malformed(path, "members cannot be top-level shapes")),
        simple => match ShapeKind::simple(simple) {
            Some(kind) => {
                let shape_id = id.parse()?;
                builder.add_shape(Shape::new(shape_id, kind))
            }
            None => return Err(malformed(path, "unsupported shape type")),
        },
    };
    Ok(builder)
}

fn member(definition: &Map<String, Value>, name: &str, path: &str) -> Result<MemberDef, ModelError> {
    let value = definition
        .get(name)
        .ok_or_else(|| malformed(path, &format!("missing `{name}`")))?;
    member_def(name, value, &format!("{path}.{name}"))
}

fn member_def(name: &str, value: &Value, path: &str) -> Result<MemberDef, ModelError> {
    let object = as_object(value, path)?;
    let target = object
        .get("target")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(path, "missing `target`"))?;

    let mut def = MemberDef::new(name, target);
    if let Some(traits) = object.get("traits") {
        for (trait_id, value) in as_object(traits, &format!("{path}.traits"))? {
            def = def.with_trait(trait_id, Node::from_json(value));
        }
    }
    Ok(def)
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, ModelError> {
    value
        .as_object()
        .ok_or_else(|| malformed(path, "expected an object"))
}

fn malformed(path: &str, reason: &str) -> ModelError {
    ModelError::MalformedAst {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude;
    use crate::shape_id::ShapeId;
    use serde_json::json;

    fn id(s: &str) -> ShapeId {
        s.parse().unwrap()
    }

    #[test]
    fn test_loads_aggregates_and_traits() {
        let model = from_value(&json!({
            "smithy": "2.0",
            "metadata": {"suppressions": []},
            "shapes": {
                "ns#Person": {
                    "type": "structure",
                    "members": {
                        "name": {"target": "smithy.api#String", "traits": {"smithy.api#required": {}}},
                        "tags": {"target": "ns#Tags"}
                    }
                },
                "ns#Tags": {
                    "type": "map",
                    "key": {"target": "smithy.api#String"},
                    "value": {"target": "smithy.api#String"},
                    "traits": {"smithy.api#sparse": {}}
                },
                "ns#Age": {"type": "integer", "traits": {"smithy.api#range": {"min": 0}}}
            }
        }))
        .unwrap();

        assert!(model.get_shape(&id("ns#Person$name")).unwrap().is_required());
        assert!(model.get_shape(&id("ns#Tags")).unwrap().has_trait(prelude::SPARSE));
        assert_eq!(model.get_shape(&id("ns#Age")).unwrap().shape_type(), ShapeType::Integer);
        assert!(model.metadata("suppressions").is_some());
    }

    #[test]
    fn test_apply_adds_traits() {
        let model = from_value(&json!({
            "shapes": {
                "ns#Name": {"type": "string"},
                "ns#NameApply": {"type": "apply"}
            }
        }));
        assert!(model.is_ok());

        let model = from_value(&json!({
            "shapes": {
                "ns#Name": {"type": "string"},
                "ns#Name$x": {"type": "apply", "traits": {"smithy.api#pattern": "^a"}}
            }
        }));
        assert!(matches!(model, Err(ModelError::UnknownTraitTarget { .. })));
    }

    #[test]
    fn test_unknown_type_is_reported() {
        let err = from_value(&json!({"shapes": {"ns#E": {"type": "enumish"}}})).unwrap_err();
        assert_eq!(
            err,
            ModelError::UnknownShapeType {
                shape: "ns#E".to_string(),
                type_name: "enumish".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_member_target_is_malformed() {
        let err = from_value(&json!({
            "shapes": {"ns#L": {"type": "list", "member": {}}}
        }))
        .unwrap_err();
        assert!(matches!(err, ModelError::MalformedAst { ref path, .. } if path == "$.shapes.ns#L.member"));
    }

    #[test]
    fn test_invalid_json_text() {
        assert!(matches!(parse("{"), Err(ModelError::Json(_))));
    }
}
