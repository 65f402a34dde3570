//! # Validation Context
//!
//! [`ValidationOptions`] is the serializable configuration of a validation
//! call. Each top-level call turns it into a fresh [`ValidationContext`],
//! the mutable state threaded through the recursive descent:
//!
//! - a path-prefix stack, pushed when descending into an element, entry or
//!   member and popped on the way back; it is empty again when the call
//!   returns;
//! - the active [`Feature`] flags;
//! - a single referring-member slot, set by a member validator while its
//!   target validates the value.
//!
//! A context is never shared between concurrent or re-entrant calls.
//!
//! Plugins see a read-only [`PluginContext`] view of the same state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use shapeval_model::{Model, Shape, ShapeId, SourceLocation};

use crate::error::EngineError;
use crate::event::{Severity, ValidationEvent};

/// Optional behaviors of a validation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Report constraint violations (missing required members, range,
    /// length, pattern) as warnings instead of errors.
    AllowConstraintErrors,
    /// Accept null for shapes and members that may be null.
    AllowOptionalNulls,
    /// Report a range violation by the value zero as a warning.
    RangeTraitZeroValueWarning,
    /// Require blob string values to be valid base64.
    RequireBase64BlobValues,
}

/// How null member values are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullabilityMode {
    /// Null is rejected for members that are not nullable.
    #[default]
    Enforced,
    /// Null is accepted for every member.
    Legacy,
}

/// How timestamp values are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampValidationStrategy {
    /// Honor the `timestampFormat` trait of the referring member, then the
    /// shape.
    #[default]
    Format,
    /// Require every timestamp to be a number of epoch seconds.
    EpochSeconds,
}

const DEFAULT_EVENT_ID: &str = "Model";

fn default_event_id() -> String {
    DEFAULT_EVENT_ID.to_string()
}

/// Configuration of a validation call.
///
/// ```json
/// {
///   "event_id": "DefaultTrait",
///   "event_shape_id": "example#Config$timeout",
///   "starting_context": "Error validating @default trait",
///   "features": ["range_trait_zero_value_warning"],
///   "timestamp_strategy": "format",
///   "nullability": "enforced"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    pub event_id: String,
    pub event_shape_id: Option<ShapeId>,
    /// Text prepended to every message path.
    pub starting_context: String,
    pub features: BTreeSet<Feature>,
    pub timestamp_strategy: TimestampValidationStrategy,
    pub nullability: NullabilityMode,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            event_id: default_event_id(),
            event_shape_id: None,
            starting_context: String::new(),
            features: BTreeSet::new(),
            timestamp_strategy: TimestampValidationStrategy::default(),
            nullability: NullabilityMode::default(),
        }
    }
}

impl ValidationOptions {
    /// Load options from JSON text. Absent fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidOptions` if the text is not valid JSON
    /// or names an unknown feature or strategy.
    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        serde_json::from_str(text).map_err(|err| EngineError::InvalidOptions(err.to_string()))
    }

    pub fn with_event_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = event_id.into();
        self
    }

    pub fn with_event_shape_id(mut self, shape_id: ShapeId) -> Self {
        self.event_shape_id = Some(shape_id);
        self
    }

    pub fn with_starting_context(mut self, context: impl Into<String>) -> Self {
        self.starting_context = context.into();
        self
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.insert(feature);
        self
    }

    pub fn with_timestamp_strategy(mut self, strategy: TimestampValidationStrategy) -> Self {
        self.timestamp_strategy = strategy;
        self
    }

    pub fn with_nullability(mut self, mode: NullabilityMode) -> Self {
        self.nullability = mode;
        self
    }

    /// A fresh context for one top-level validation call.
    pub fn context(&self) -> ValidationContext {
        ValidationContext::new(self.clone())
    }
}

/// Per-call mutable validation state.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    options: ValidationOptions,
    prefix: Vec<String>,
    referring_member: Option<ShapeId>,
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new(ValidationOptions::default())
    }
}

impl ValidationContext {
    pub fn new(options: ValidationOptions) -> Self {
        Self {
            options,
            prefix: Vec::new(),
            referring_member: None,
        }
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    pub fn has_feature(&self, feature: Feature) -> bool {
        self.options.features.contains(&feature)
    }

    pub fn features(&self) -> &BTreeSet<Feature> {
        &self.options.features
    }

    pub fn timestamp_strategy(&self) -> TimestampValidationStrategy {
        self.options.timestamp_strategy
    }

    pub fn nullability(&self) -> NullabilityMode {
        self.options.nullability
    }

    pub fn push_prefix(&mut self, segment: impl Into<String>) {
        self.prefix.push(segment.into());
    }

    pub fn pop_prefix(&mut self) {
        self.prefix.pop();
    }

    /// Number of path segments currently pushed.
    pub fn depth(&self) -> usize {
        self.prefix.len()
    }

    pub fn referring_member(&self) -> Option<&ShapeId> {
        self.referring_member.as_ref()
    }

    pub(crate) fn set_referring_member(&mut self, member: Option<ShapeId>) {
        self.referring_member = member;
    }

    /// Build an event at the current path with the configured id and shape.
    /// Extra `id_parts` are appended to the event id with `.`.
    pub fn event(
        &self,
        message: &str,
        severity: Severity,
        location: &SourceLocation,
        id_parts: &[&str],
    ) -> ValidationEvent {
        let mut id = self.options.event_id.clone();
        for part in id_parts {
            id.push('.');
            id.push_str(part);
        }

        let path: Vec<&str> = std::iter::once(self.options.starting_context.as_str())
            .filter(|s| !s.is_empty())
            .chain(self.prefix.iter().map(String::as_str))
            .collect();
        let message = if path.is_empty() {
            message.to_string()
        } else {
            format!("{}: {message}", path.join("."))
        };

        ValidationEvent {
            id,
            severity,
            shape_id: self.options.event_shape_id.clone(),
            message,
            source_location: location.clone(),
            suppressible: true,
        }
    }

    /// Shorthand for an [`Severity::Error`] event with no extra id parts.
    pub fn error(&self, message: &str, location: &SourceLocation) -> ValidationEvent {
        self.event(message, Severity::Error, location, &[])
    }

    pub(crate) fn plugin_context<'a>(&'a self, model: &'a Model) -> PluginContext<'a> {
        PluginContext {
            model,
            features: &self.options.features,
            referring_member: self.referring_member.as_ref().and_then(|id| model.get_shape(id)),
        }
    }
}

/// What a plugin may read about the current call.
#[derive(Debug, Clone, Copy)]
pub struct PluginContext<'a> {
    model: &'a Model,
    features: &'a BTreeSet<Feature>,
    referring_member: Option<&'a Shape>,
}

impl<'a> PluginContext<'a> {
    pub fn new(model: &'a Model, features: &'a BTreeSet<Feature>) -> Self {
        Self {
            model,
            features,
            referring_member: None,
        }
    }

    pub fn with_referring_member(mut self, member: &'a Shape) -> Self {
        self.referring_member = Some(member);
        self
    }

    pub fn model(&self) -> &'a Model {
        self.model
    }

    pub fn has_feature(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    /// The member through which the value being checked was reached, if
    /// the shape under validation is a member target.
    pub fn referring_member(&self) -> Option<&'a Shape> {
        self.referring_member
    }

    /// Severity for a constraint violation: a warning when constraint
    /// errors are allowed.
    pub fn constraint_severity(&self) -> Severity {
        if self.has_feature(Feature::AllowConstraintErrors) {
            Severity::Warning
        } else {
            Severity::Error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ValidationOptions::default();
        assert_eq!(options.event_id, "Model");
        assert!(options.features.is_empty());
        assert_eq!(options.timestamp_strategy, TimestampValidationStrategy::Format);
        assert_eq!(options.nullability, NullabilityMode::Enforced);
    }

    #[test]
    fn test_options_from_json() {
        let options = ValidationOptions::from_json(
            r#"{"event_id": "DefaultTrait", "features": ["allow_constraint_errors"], "timestamp_strategy": "epoch_seconds"}"#,
        )
        .unwrap();
        assert_eq!(options.event_id, "DefaultTrait");
        assert!(options.features.contains(&Feature::AllowConstraintErrors));
        assert_eq!(options.timestamp_strategy, TimestampValidationStrategy::EpochSeconds);
        assert_eq!(options.starting_context, "");
    }

    #[test]
    fn test_options_reject_unknown_feature() {
        let err = ValidationOptions::from_json(r#"{"features": ["fly"]}"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidOptions(_)));
    }

    #[test]
    fn test_event_id_parts_and_prefix() {
        let mut ctx = ValidationOptions::default().context();
        let location = SourceLocation::none();

        let bare = ctx.error("boom", &location);
        assert_eq!(bare.id, "Model");
        assert_eq!(bare.message, "boom");

        ctx.push_prefix("a");
        ctx.push_prefix("0");
        let nested = ctx.event("boom", Severity::Warning, &location, &["UnknownMember", "ns#S", "x"]);
        assert_eq!(nested.id, "Model.UnknownMember.ns#S.x");
        assert_eq!(nested.message, "a.0: boom");

        ctx.pop_prefix();
        ctx.pop_prefix();
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_starting_context_leads_the_path() {
        let mut ctx = ValidationOptions::default()
            .with_starting_context("Error validating @default trait")
            .with_event_shape_id("ns#S".parse().unwrap())
            .context();
        ctx.push_prefix("items");
        let event = ctx.error("boom", &SourceLocation::none());
        assert_eq!(event.message, "Error validating @default trait.items: boom");
        assert_eq!(event.shape_id.unwrap().to_string(), "ns#S");
    }
}
