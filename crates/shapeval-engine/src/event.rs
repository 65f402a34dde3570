//! # Validation Events
//!
//! The output record of every check: an id, a severity, the shape the event
//! is about, a message and a source location. Events are immutable and
//! serializable so a reporting layer can emit them as JSON.

use std::fmt;

use serde::{Deserialize, Serialize};
use shapeval_model::{ShapeId, SourceLocation};

/// How serious a diagnostic is. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Note,
    Warning,
    Danger,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Note => "NOTE",
            Severity::Warning => "WARNING",
            Severity::Danger => "DANGER",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationEvent {
    /// Event id, e.g. `Model` or `Model.UnknownMember.ns#S.extra`.
    pub id: String,
    pub severity: Severity,
    /// The shape the event is reported against, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_id: Option<ShapeId>,
    /// Human readable message, already prefixed with the value path.
    pub message: String,
    pub source_location: SourceLocation,
    /// Whether a suppression layer may filter this event. Only authoring
    /// defects (a malformed condition expression) are not suppressible.
    #[serde(default = "suppressible_default")]
    pub suppressible: bool,
}

fn suppressible_default() -> bool {
    true
}

impl ValidationEvent {
    /// Returns true if this event is an [`Severity::Error`].
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.severity)?;
        if let Some(shape) = &self.shape_id {
            write!(f, "{shape}: ")?;
        }
        write!(f, "{} | {} {}", self.message, self.id, self.source_location)
    }
}
