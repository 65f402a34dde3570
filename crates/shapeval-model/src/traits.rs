//! # Traits
//!
//! Traits are annotations applied to shapes, stored as absolute trait id to
//! [`Node`] value. Trait schemas are not enforced here; the typed views in
//! this module ([`RangeTrait`], [`LengthTrait`], [`TimestampFormat`]) parse
//! the values they understand and return `None` for anything malformed, so
//! consumers can skip rather than fail.

use indexmap::IndexMap;
use serde_json::Number;

use crate::node::Node;

/// Ordered map of trait id to trait value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Traits(IndexMap<String, Node>);

impl Traits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a trait, replacing any previous value.
    pub fn insert(&mut self, trait_id: &str, value: Node) {
        self.0.insert(trait_id.to_string(), value);
    }

    pub fn get(&self, trait_id: &str) -> Option<&Node> {
        self.0.get(trait_id)
    }

    pub fn contains(&self, trait_id: &str) -> bool {
        self.0.contains_key(trait_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Inclusive numeric bounds from the `range` trait.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeTrait {
    pub min: Option<Number>,
    pub max: Option<Number>,
}

impl RangeTrait {
    /// Parse `{"min": n?, "max": n?}`.
    pub fn from_node(node: &Node) -> Option<Self> {
        let members = node.as_object()?;
        let bound = |name: &str| -> Option<Option<Number>> {
            match members.get(name) {
                None => Some(None),
                Some(value) => value.as_number().cloned().map(Some),
            }
        };
        Some(Self {
            min: bound("min")?,
            max: bound("max")?,
        })
    }

    pub fn min_f64(&self) -> Option<f64> {
        self.min.as_ref().and_then(Number::as_f64)
    }

    pub fn max_f64(&self) -> Option<f64> {
        self.max.as_ref().and_then(Number::as_f64)
    }
}

/// Inclusive size bounds from the `length` trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthTrait {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl LengthTrait {
    /// Parse `{"min": i?, "max": i?}`. Floating point bounds are rejected.
    pub fn from_node(node: &Node) -> Option<Self> {
        let members = node.as_object()?;
        let bound = |name: &str| -> Option<Option<i64>> {
            match members.get(name) {
                None => Some(None),
                Some(value) => value.as_number().and_then(Number::as_i64).map(Some),
            }
        };
        Some(Self {
            min: bound("min")?,
            max: bound("max")?,
        })
    }
}

/// Serialization format named by the `timestampFormat` trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// RFC 3339 `date-time`, UTC with a `Z` offset.
    DateTime,
    /// RFC 7231 IMF-fixdate.
    HttpDate,
    /// Seconds since the Unix epoch, optionally fractional.
    EpochSeconds,
}

impl TimestampFormat {
    pub fn from_node(node: &Node) -> Option<Self> {
        match node.as_str()? {
            "date-time" => Some(TimestampFormat::DateTime),
            "http-date" => Some(TimestampFormat::HttpDate),
            "epoch-seconds" => Some(TimestampFormat::EpochSeconds),
            _ => None,
        }
    }
}
