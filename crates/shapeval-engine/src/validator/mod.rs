//! # Per-Kind Validators
//!
//! One [`ShapeValidator`] exists per shape id. Its [`ValidatorKind`] is
//! chosen by an exhaustive match over [`ShapeKind`], so adding a shape kind
//! fails to compile here until it is given a validator.
//!
//! Validators never own each other. Children (a list member, map key and
//! value, structure and union members, a member's target) are stored as
//! [`Slot`]s: positions in the owning [`ValidatorIndex`](crate::ValidatorIndex)
//! that are filled in only after every validator exists. This is what lets
//! a validator refer to itself through a cycle.
//!
//! ## Shared Rules
//!
//! - Every validator runs the timestamp strategy and its applicable plugins
//!   on the value it accepts. Plugin diagnostics and structural diagnostics
//!   are independent.
//! - A node of the wrong type yields a single invalid-shape error listing
//!   the accepted node types.
//! - Descending into an element, entry or member pushes a path segment
//!   that is popped on return.

mod blob;
mod invalid;
mod list;
mod map;
mod member;
mod number;
mod simple;
mod structure;
mod union;

use indexmap::IndexMap;
use shapeval_model::{
    CheckMode, Model, Node, NodeType, NullableIndex, Shape, ShapeId, ShapeKind, ShapeType,
};

use crate::context::{Feature, ValidationContext};
use crate::event::{Severity, ValidationEvent};
use crate::index::ValidatorIndex;
use crate::plugin::Emitter;

/// Position of a child validator in the index, once resolved. `None` until
/// resolution, and afterwards for children whose shape is absent.
pub(crate) type Slot = Option<usize>;

/// Node types accepted by simple kinds, in the order they are listed in
/// diagnostics.
const BOOLEAN: &[NodeType] = &[NodeType::Boolean];
const STRING: &[NodeType] = &[NodeType::String];
const FLOATING: &[NodeType] = &[NodeType::Number, NodeType::String];
const ANY: &[NodeType] = &[
    NodeType::Object,
    NodeType::Array,
    NodeType::String,
    NodeType::Number,
    NodeType::Boolean,
    NodeType::Null,
];

/// Kind-specific validation state.
#[derive(Debug, Clone)]
pub(crate) enum ValidatorKind {
    /// Accepts any of a fixed set of node types.
    Simple { accepts: &'static [NodeType] },
    /// Integral numbers within inclusive bounds.
    Number { min: Option<i128>, max: Option<i128> },
    Blob,
    List { member: Slot },
    Map { key: Slot, value: Slot },
    Structure { members: IndexMap<String, Slot> },
    Union { members: IndexMap<String, Slot> },
    Member {
        target: Slot,
        /// Type of the declaring aggregate, if it exists.
        container: Option<ShapeType>,
    },
    /// A shape kind that cannot describe a value.
    Invalid,
}

impl ValidatorKind {
    /// Phase one: pick the validator for a shape. Children stay unresolved.
    fn for_shape(shape: &Shape) -> Self {
        let unresolved = |members: &IndexMap<String, ShapeId>| -> IndexMap<String, Slot> {
            members.keys().map(|name| (name.clone(), None)).collect()
        };
        match shape.kind() {
            ShapeKind::Boolean => Self::Simple { accepts: BOOLEAN },
            ShapeKind::String => Self::Simple { accepts: STRING },
            ShapeKind::Float | ShapeKind::Double | ShapeKind::BigDecimal => {
                Self::Simple { accepts: FLOATING }
            }
            ShapeKind::Timestamp | ShapeKind::Document => Self::Simple { accepts: ANY },
            ShapeKind::Byte => bounded(i8::MIN.into(), i8::MAX.into()),
            ShapeKind::Short => bounded(i16::MIN.into(), i16::MAX.into()),
            ShapeKind::Integer => bounded(i32::MIN.into(), i32::MAX.into()),
            ShapeKind::Long => bounded(i64::MIN.into(), i64::MAX.into()),
            ShapeKind::BigInteger => Self::Number { min: None, max: None },
            ShapeKind::Blob => Self::Blob,
            ShapeKind::List { .. } => Self::List { member: None },
            ShapeKind::Map { .. } => Self::Map { key: None, value: None },
            ShapeKind::Structure { members } => Self::Structure {
                members: unresolved(members),
            },
            ShapeKind::Union { members } => Self::Union {
                members: unresolved(members),
            },
            ShapeKind::Member(_) => Self::Member {
                target: None,
                container: None,
            },
            ShapeKind::Operation | ShapeKind::Resource | ShapeKind::Service => Self::Invalid,
        }
    }
}

fn bounded(min: i128, max: i128) -> ValidatorKind {
    ValidatorKind::Number {
        min: Some(min),
        max: Some(max),
    }
}

/// The validator of one shape.
#[derive(Debug, Clone)]
pub struct ShapeValidator {
    shape: Shape,
    /// Positions of the applicable plugins in the index's registry.
    plugins: Vec<usize>,
    /// Whether a null value is acceptable for this shape. Always true for
    /// non-members.
    nullable: bool,
    pub(crate) kind: ValidatorKind,
}

impl ShapeValidator {
    /// Phase one: create the validator for `shape` without resolving its
    /// children.
    pub(crate) fn create(model: &Model, shape: &Shape, plugins: Vec<usize>) -> Self {
        let nullable = NullableIndex::of(model).is_member_nullable(model, shape, CheckMode::Client);
        let mut kind = ValidatorKind::for_shape(shape);
        if let (ValidatorKind::Member { container, .. }, Some(def)) = (&mut kind, shape.as_member()) {
            *container = model.get_shape(&def.container).map(Shape::shape_type);
        }
        Self {
            shape: shape.clone(),
            plugins,
            nullable,
            kind,
        }
    }

    /// Phase two: look up every child validator by shape id.
    pub(crate) fn resolve(&mut self, lookup: impl Fn(&ShapeId) -> Slot) {
        let shape = &self.shape;
        match (&mut self.kind, shape.kind()) {
            (ValidatorKind::List { member }, ShapeKind::List { member: id }) => {
                *member = lookup(id);
            }
            (ValidatorKind::Map { key, value }, ShapeKind::Map { key: k, value: v }) => {
                *key = lookup(k);
                *value = lookup(v);
            }
            (ValidatorKind::Structure { members }, ShapeKind::Structure { members: ids })
            | (ValidatorKind::Union { members }, ShapeKind::Union { members: ids }) => {
                for (name, slot) in members.iter_mut() {
                    *slot = ids.get(name).and_then(&lookup);
                }
            }
            (ValidatorKind::Member { target, .. }, ShapeKind::Member(def)) => {
                *target = lookup(&def.target);
            }
            _ => {}
        }
    }

    /// Child shape ids that resolution could not find.
    pub(crate) fn dangling(&self) -> Vec<&ShapeId> {
        let shape = &self.shape;
        let mut missing = Vec::new();
        match (&self.kind, shape.kind()) {
            (ValidatorKind::List { member: None }, ShapeKind::List { member }) => missing.push(member),
            (ValidatorKind::Map { key, value }, ShapeKind::Map { key: k, value: v }) => {
                if key.is_none() {
                    missing.push(k);
                }
                if value.is_none() {
                    missing.push(v);
                }
            }
            (ValidatorKind::Structure { members }, ShapeKind::Structure { members: ids })
            | (ValidatorKind::Union { members }, ShapeKind::Union { members: ids }) => {
                for (name, slot) in members {
                    if let (None, Some(id)) = (slot, ids.get(name)) {
                        missing.push(id);
                    }
                }
            }
            (ValidatorKind::Member { target: None, .. }, ShapeKind::Member(def)) => {
                missing.push(&def.target)
            }
            _ => {}
        }
        missing
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Validate `value` against this validator's shape.
    pub(crate) fn validate(
        &self,
        walk: &Walk<'_>,
        value: &Node,
        ctx: &mut ValidationContext,
    ) -> Vec<ValidationEvent> {
        match &self.kind {
            ValidatorKind::Simple { accepts } => simple::validate(self, walk, accepts, value, ctx),
            ValidatorKind::Number { min, max } => number::validate(self, walk, *min, *max, value, ctx),
            ValidatorKind::Blob => blob::validate(self, walk, value, ctx),
            ValidatorKind::List { member } => list::validate(self, walk, *member, value, ctx),
            ValidatorKind::Map { key, value: val } => map::validate(self, walk, *key, *val, value, ctx),
            ValidatorKind::Structure { members } => structure::validate(self, walk, members, value, ctx),
            ValidatorKind::Union { members } => union::validate(self, walk, members, value, ctx),
            ValidatorKind::Member { target, container } => {
                member::validate(self, walk, *target, *container, value, ctx)
            }
            ValidatorKind::Invalid => invalid::validate(self, value, ctx),
        }
    }

    // -----------------------------------------------------------------------
    // Helpers shared by the per-kind rules
    // -----------------------------------------------------------------------

    /// Run the timestamp strategy and every applicable plugin.
    fn apply_plugins(&self, walk: &Walk<'_>, value: &Node, ctx: &ValidationContext) -> Vec<ValidationEvent> {
        let mut emitter = Emitter::new();
        {
            let plugin_ctx = ctx.plugin_context(walk.model);
            ctx.timestamp_strategy()
                .apply(&self.shape, value, &plugin_ctx, &mut emitter);
            let registry = walk.index.plugins();
            for plugin in self.plugins.iter().filter_map(|&i| registry.plugins().get(i)) {
                plugin.apply(&self.shape, value, &plugin_ctx, &mut emitter);
            }
        }

        emitter
            .into_emissions()
            .into_iter()
            .map(|emission| {
                let parts: Vec<&str> = emission.id_parts.iter().map(String::as_str).collect();
                ctx.event(&emission.message, emission.severity, &emission.location, &parts)
            })
            .collect()
    }

    /// Validate `value` with the child in `slot` under the path `segment`.
    fn traverse(
        walk: &Walk<'_>,
        slot: Slot,
        segment: String,
        value: &Node,
        ctx: &mut ValidationContext,
    ) -> Vec<ValidationEvent> {
        let Some(child) = slot.and_then(|i| walk.index.validator_at(i)) else {
            return Vec::new();
        };
        ctx.push_prefix(segment);
        let events = child.validate(walk, value, ctx);
        ctx.pop_prefix();
        events
    }

    /// The diagnostic for a node of the wrong type.
    fn invalid_shape(&self, value: &Node, expected: &[NodeType], ctx: &ValidationContext) -> Vec<ValidationEvent> {
        if value.is_null() && ctx.has_feature(Feature::AllowOptionalNulls) && self.nullable {
            return Vec::new();
        }

        let expected: Vec<&str> = expected.iter().map(NodeType::as_str).collect();
        let mut message = format!(
            "Expected {} value for {} shape, `{}`; found {} value",
            expected.join(" or "),
            self.shape.shape_type(),
            self.shape.id(),
            value.node_type()
        );
        if let Some(literal) = value.scalar_literal() {
            message.push_str(&format!(", `{literal}`"));
        }
        vec![ctx.error(&message, value.location())]
    }

    /// Warning for an object key that names no member of this shape.
    fn unknown_member(&self, object: &Node, name: &str, ctx: &ValidationContext) -> ValidationEvent {
        let shape_id = self.shape.id().to_string();
        ctx.event(
            &format!("Member `{name}` does not exist in `{shape_id}`"),
            Severity::Warning,
            object.location(),
            &["UnknownMember", &shape_id, name],
        )
    }

    /// Validate a single object entry as a member of this structure or
    /// union.
    fn member_entry(
        &self,
        walk: &Walk<'_>,
        members: &IndexMap<String, Slot>,
        object: &Node,
        name: &str,
        value: &Node,
        ctx: &mut ValidationContext,
    ) -> Vec<ValidationEvent> {
        match members.get(name) {
            Some(slot) => Self::traverse(walk, *slot, name.to_string(), value, ctx),
            None => vec![self.unknown_member(object, name, ctx)],
        }
    }
}

/// Read-only state of one traversal: the model and the index validating it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Walk<'a> {
    pub(crate) model: &'a Model,
    pub(crate) index: &'a ValidatorIndex,
}

impl<'a> Walk<'a> {
    pub(crate) fn new(model: &'a Model, index: &'a ValidatorIndex) -> Self {
        Self { model, index }
    }
}
