//! # Shape Identifiers
//!
//! A [`ShapeId`] names a shape in a model: `namespace#Name` for top-level
//! shapes and `namespace#Name$member` for member shapes. Namespaces are one
//! or more identifiers joined by `.`.
//!
//! Shape ids are validated at construction time, so every id held by a
//! [`Model`](crate::Model) is syntactically well formed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Absolute identifier of a shape, optionally qualified by a member name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId {
    namespace: String,
    name: String,
    member: Option<String>,
}

impl ShapeId {
    /// Build a top-level shape id from its parts.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidShapeId` if the namespace or name is not
    /// a valid identifier sequence.
    pub fn new(namespace: &str, name: &str) -> Result<Self, ModelError> {
        let rendered = format!("{namespace}#{name}");
        validate_namespace(namespace, &rendered)?;
        validate_identifier(name, &rendered)?;
        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            member: None,
        })
    }

    /// Returns the namespace, e.g. `smithy.api`.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the shape name without namespace or member.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the member name, if this id names a member.
    pub fn member(&self) -> Option<&str> {
        self.member.as_deref()
    }

    /// Returns a copy of this id qualified by `member`.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidShapeId` if `member` is not an identifier.
    pub fn with_member(&self, member: &str) -> Result<Self, ModelError> {
        let rendered = format!("{}#{}${member}", self.namespace, self.name);
        validate_identifier(member, &rendered)?;
        Ok(Self {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            member: Some(member.to_string()),
        })
    }

    /// Returns the id with any member qualifier removed.
    pub fn without_member(&self) -> Self {
        Self {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            member: None,
        }
    }
}

impl FromStr for ShapeId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, rest) = s.split_once('#').ok_or_else(|| ModelError::InvalidShapeId {
            input: s.to_string(),
            reason: "missing `#` between namespace and name".to_string(),
        })?;
        let (name, member) = match rest.split_once('$') {
            Some((name, member)) => (name, Some(member)),
            None => (rest, None),
        };

        let id = Self::new(namespace, name).map_err(|_| ModelError::InvalidShapeId {
            input: s.to_string(),
            reason: "namespace and name must be identifiers".to_string(),
        })?;
        match member {
            Some(member) => id.with_member(member).map_err(|_| ModelError::InvalidShapeId {
                input: s.to_string(),
                reason: "member name must be an identifier".to_string(),
            }),
            None => Ok(id),
        }
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.namespace, self.name)?;
        if let Some(member) = &self.member {
            write!(f, "${member}")?;
        }
        Ok(())
    }
}

impl Serialize for ShapeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ShapeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

fn validate_namespace(namespace: &str, rendered: &str) -> Result<(), ModelError> {
    if namespace.is_empty() {
        return Err(ModelError::InvalidShapeId {
            input: rendered.to_string(),
            reason: "namespace is empty".to_string(),
        });
    }
    namespace
        .split('.')
        .try_for_each(|segment| validate_identifier(segment, rendered))
}

fn validate_identifier(ident: &str, rendered: &str) -> Result<(), ModelError> {
    let mut chars = ident.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ModelError::InvalidShapeId {
            input: rendered.to_string(),
            reason: format!("`{ident}` is not a valid identifier"),
        })
    }
}
