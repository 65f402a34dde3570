//! # Node Validator Plugins
//!
//! Cross-cutting checks that every validator runs in addition to its own
//! structural rule. A plugin declares which shapes it applies to and a
//! check that may emit any number of diagnostics; it never aborts
//! traversal.
//!
//! Applicability is evaluated once per shape when the
//! [`ValidatorIndex`](crate::ValidatorIndex) is built, so `applies_to` may be
//! comparatively expensive.
//!
//! ## Built-in Plugins
//!
//! | Plugin | Applies to |
//! |---|---|
//! | [`RangePlugin`] | numeric shapes, and members targeting them, with `range` |
//! | [`LengthPlugin`] | string, blob, list and map shapes, and members targeting them, with `length` |
//! | [`PatternPlugin`] | string shapes, and members targeting them, with `pattern` |
//! | [`NonNumericFloatValuesPlugin`] | float and double shapes |
//!
//! The built-in registry is created once per process by
//! [`PluginRegistry::builtin`].

mod float_values;
mod length;
mod pattern;
mod range;

use std::sync::{Arc, OnceLock};

use shapeval_model::{Model, Node, Shape, ShapeType, SourceLocation};

use crate::context::PluginContext;
use crate::event::Severity;

pub use float_values::NonNumericFloatValuesPlugin;
pub use length::LengthPlugin;
pub use pattern::PatternPlugin;
pub use range::RangePlugin;

/// A shape-applicability-gated check over node values.
pub trait NodeValidatorPlugin: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Returns true if [`apply`](Self::apply) should run for values of
    /// `shape`.
    fn applies_to(&self, model: &Model, shape: &Shape) -> bool;

    /// Check `value` against `shape`, reporting problems through `emitter`.
    fn apply(&self, shape: &Shape, value: &Node, ctx: &PluginContext<'_>, emitter: &mut Emitter);
}

/// One diagnostic reported by a plugin, before it is turned into an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission {
    pub location: SourceLocation,
    pub severity: Severity,
    pub message: String,
    /// Appended to the call's event id.
    pub id_parts: Vec<String>,
}

/// Collects a plugin's diagnostics.
#[derive(Debug, Default)]
pub struct Emitter {
    emissions: Vec<Emission>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `message` about `value`.
    pub fn emit(&mut self, value: &Node, severity: Severity, message: impl Into<String>) {
        self.emit_with_id(value, severity, message, &[]);
    }

    /// Report `message` about `value`, extending the event id with `id_parts`.
    pub fn emit_with_id(
        &mut self,
        value: &Node,
        severity: Severity,
        message: impl Into<String>,
        id_parts: &[&str],
    ) {
        self.emissions.push(Emission {
            location: value.location().clone(),
            severity,
            message: message.into(),
            id_parts: id_parts.iter().map(|p| p.to_string()).collect(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.emissions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.emissions.len()
    }

    pub fn into_emissions(self) -> Vec<Emission> {
        self.emissions
    }
}

/// An ordered set of plugins.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn NodeValidatorPlugin>>,
}

static BUILTIN: OnceLock<Arc<PluginRegistry>> = OnceLock::new();

impl PluginRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry of built-in plugins.
    pub fn builtin() -> Arc<PluginRegistry> {
        Arc::clone(BUILTIN.get_or_init(|| Arc::new(Self::with_builtins())))
    }

    /// A new registry holding the built-in plugins, ready to be extended.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(RangePlugin);
        registry.register(LengthPlugin);
        registry.register(PatternPlugin::default());
        registry.register(NonNumericFloatValuesPlugin);
        registry
    }

    pub fn register(&mut self, plugin: impl NodeValidatorPlugin + 'static) {
        self.plugins.push(Arc::new(plugin));
    }

    pub fn plugins(&self) -> &[Arc<dyn NodeValidatorPlugin>] {
        &self.plugins
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Positions of the plugins that apply to `shape`.
    pub(crate) fn applicable(&self, model: &Model, shape: &Shape) -> Vec<usize> {
        self.plugins
            .iter()
            .enumerate()
            .filter(|(_, plugin)| plugin.applies_to(model, shape))
            .map(|(i, _)| i)
            .collect()
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.plugins.iter().map(|p| p.name()))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Shared applicability rules
// ---------------------------------------------------------------------------

/// Resolves the trait a member-or-shape plugin checks.
///
/// Returns the value of `trait_id` when `shape` is of an accepted type and
/// carries the trait, or when `shape` is a member carrying the trait whose
/// target is of an accepted type.
pub fn member_or_shape_trait<'a>(
    model: &Model,
    shape: &'a Shape,
    trait_id: &str,
    accepts: impl Fn(ShapeType) -> bool,
) -> Option<&'a Node> {
    let value = shape.get_trait(trait_id)?;
    let shape_type = match shape.as_member() {
        Some(member) => model.get_shape(&member.target)?.shape_type(),
        None => shape.shape_type(),
    };
    accepts(shape_type).then_some(value)
}

/// Returns the type of the value `shape` describes: the target's type for
/// members.
pub(crate) fn value_type(model: &Model, shape: &Shape) -> Option<ShapeType> {
    match shape.as_member() {
        Some(member) => model.get_shape(&member.target).map(Shape::shape_type),
        None => Some(shape.shape_type()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapeval_model::{prelude, MemberDef, ShapeId};
    use serde_json::json;

    struct Always;

    impl NodeValidatorPlugin for Always {
        fn name(&self) -> &'static str {
            "always"
        }

        fn applies_to(&self, _model: &Model, _shape: &Shape) -> bool {
            true
        }

        fn apply(&self, _shape: &Shape, value: &Node, _ctx: &PluginContext<'_>, emitter: &mut Emitter) {
            emitter.emit_with_id(value, Severity::Note, "seen", &["Always"]);
        }
    }

    fn id(s: &str) -> ShapeId {
        s.parse().unwrap()
    }

    #[test]
    fn test_builtin_registry_is_shared() {
        let a = PluginRegistry::builtin();
        let b = PluginRegistry::builtin();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), 4);
    }

    #[test]
    fn test_registry_extension() {
        let mut registry = PluginRegistry::with_builtins();
        registry.register(Always);
        assert_eq!(registry.len(), 5);
        assert_eq!(format!("{registry:?}"), r#"["range", "length", "pattern", "non_numeric_float_values", "always"]"#);
    }

    #[test]
    fn test_emitter_records_location_and_id_parts() {
        let model = Model::builder().build().unwrap();
        let features = Default::default();
        let ctx = PluginContext::new(&model, &features);
        let string = model.get_shape(&id("smithy.api#String")).unwrap();
        let value = Node::string("x").with_location(SourceLocation::new("a.json", 1, 2));

        let mut emitter = Emitter::new();
        Always.apply(string, &value, &ctx, &mut emitter);
        let emissions = emitter.into_emissions();
        assert_eq!(emissions.len(), 1);
        assert_eq!(emissions[0].location.line, 1);
        assert_eq!(emissions[0].id_parts, vec!["Always".to_string()]);
    }

    #[test]
    fn test_member_or_shape_trait_follows_member_target() {
        let model = Model::builder()
            .structure(
                "ns#S",
                [
                    MemberDef::new("name", "smithy.api#String")
                        .with_trait(prelude::LENGTH, Node::from(json!({"max": 3}))),
                    MemberDef::new("count", "smithy.api#Integer")
                        .with_trait(prelude::LENGTH, Node::from(json!({"max": 3}))),
                ],
            )
            .build()
            .unwrap();
        let is_string = |t: ShapeType| t == ShapeType::String;

        let name = model.get_shape(&id("ns#S$name")).unwrap();
        assert!(member_or_shape_trait(&model, name, prelude::LENGTH, is_string).is_some());

        let count = model.get_shape(&id("ns#S$count")).unwrap();
        assert!(member_or_shape_trait(&model, count, prelude::LENGTH, is_string).is_none());
    }
}
