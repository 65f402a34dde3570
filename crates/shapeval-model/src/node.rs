//! # Literal Nodes
//!
//! A [`Node`] is a parsed literal value (null, boolean, number, string,
//! array or object) together with the [`SourceLocation`] it came from.
//! Nodes are finite trees; validating one against a possibly cyclic shape
//! graph always terminates because recursion follows the node, not the
//! shapes.
//!
//! Object members keep their source order. Numbers keep whether they were
//! written as floating point literals (`10.0` is floating point, `10` is
//! not), which the bounded numeric validator depends on.

use std::fmt;

use indexmap::IndexMap;
use serde_json::{Number, Value};

use crate::error::ModelError;
use crate::location::SourceLocation;

/// The kind of a node, as used in diagnostics (`found boolean value`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeType {
    /// An array of nodes.
    Array,
    /// `true` or `false`.
    Boolean,
    /// `null`.
    Null,
    /// An integral or floating point number.
    Number,
    /// An ordered map of string keys to nodes.
    Object,
    /// A string.
    String,
}

impl NodeType {
    /// Every node type, in declaration order.
    pub const ALL: [NodeType; 6] = [
        NodeType::Array,
        NodeType::Boolean,
        NodeType::Null,
        NodeType::Number,
        NodeType::Object,
        NodeType::String,
    ];

    /// Lowercase name used in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Array => "array",
            NodeType::Boolean => "boolean",
            NodeType::Null => "null",
            NodeType::Number => "number",
            NodeType::Object => "object",
            NodeType::String => "string",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Null,
    Boolean(bool),
    Number(Number),
    String(String),
    Array(Vec<Node>),
    Object(IndexMap<String, Node>),
}

/// A literal value with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    value: NodeValue,
    location: SourceLocation,
}

impl Node {
    /// Wrap a payload with an unknown location.
    pub fn new(value: NodeValue) -> Self {
        Self {
            value,
            location: SourceLocation::none(),
        }
    }

    pub fn null() -> Self {
        Self::new(NodeValue::Null)
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(NodeValue::Boolean(value))
    }

    pub fn integer(value: i64) -> Self {
        Self::new(NodeValue::Number(Number::from(value)))
    }

    /// A floating point number. Returns a null node for NaN or infinities,
    /// which have no literal form.
    pub fn float(value: f64) -> Self {
        match Number::from_f64(value) {
            Some(number) => Self::new(NodeValue::Number(number)),
            None => Self::null(),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(NodeValue::String(value.into()))
    }

    pub fn array(elements: Vec<Node>) -> Self {
        Self::new(NodeValue::Array(elements))
    }

    pub fn object(members: IndexMap<String, Node>) -> Self {
        Self::new(NodeValue::Object(members))
    }

    /// Returns this node relocated to `location`.
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    /// Parse JSON text into a node tree. Locations are unknown.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Json` if `text` is not valid JSON.
    pub fn parse(text: &str) -> Result<Self, ModelError> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_json(&value))
    }

    /// Convert a `serde_json` value, preserving object member order.
    pub fn from_json(value: &Value) -> Self {
        let payload = match value {
            Value::Null => NodeValue::Null,
            Value::Bool(b) => NodeValue::Boolean(*b),
            Value::Number(n) => NodeValue::Number(n.clone()),
            Value::String(s) => NodeValue::String(s.clone()),
            Value::Array(items) => NodeValue::Array(items.iter().map(Self::from_json).collect()),
            Value::Object(map) => NodeValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        };
        Self::new(payload)
    }

    /// Convert back to a `serde_json` value, dropping locations.
    pub fn to_json(&self) -> Value {
        match &self.value {
            NodeValue::Null => Value::Null,
            NodeValue::Boolean(b) => Value::Bool(*b),
            NodeValue::Number(n) => Value::Number(n.clone()),
            NodeValue::String(s) => Value::String(s.clone()),
            NodeValue::Array(items) => Value::Array(items.iter().map(Node::to_json).collect()),
            NodeValue::Object(members) => Value::Object(
                members
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    pub fn value(&self) -> &NodeValue {
        &self.value
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn node_type(&self) -> NodeType {
        match &self.value {
            NodeValue::Null => NodeType::Null,
            NodeValue::Boolean(_) => NodeType::Boolean,
            NodeValue::Number(_) => NodeType::Number,
            NodeValue::String(_) => NodeType::String,
            NodeValue::Array(_) => NodeType::Array,
            NodeValue::Object(_) => NodeType::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, NodeValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            NodeValue::Boolean(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match &self.value {
            NodeValue::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            NodeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Node]> {
        match &self.value {
            NodeValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Node>> {
        match &self.value {
            NodeValue::Object(members) => Some(members),
            _ => None,
        }
    }

    /// Look up an object member by name.
    pub fn member(&self, name: &str) -> Option<&Node> {
        self.as_object().and_then(|members| members.get(name))
    }

    /// Renders the scalar literal appended to type-mismatch diagnostics:
    /// the raw text of strings, numbers and booleans, nothing otherwise.
    pub fn scalar_literal(&self) -> Option<String> {
        match &self.value {
            NodeValue::String(s) => Some(s.clone()),
            NodeValue::Number(n) => Some(n.to_string()),
            NodeValue::Boolean(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Self::from_json(&value)
    }
}

/// Compact JSON rendering.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

/// Returns true if the number was written as a floating point literal:
/// its text has a fraction or an exponent. `10.0` and `1e3` are floating
/// point; `1180591620717411303424` is not.
pub fn is_floating_point(number: &Number) -> bool {
    number
        .to_string()
        .contains(|c: char| matches!(c, '.' | 'e' | 'E'))
}

/// Returns the exact value of an integral literal, or `None` for floating
/// point literals and integers outside the `i128` range.
pub fn integral_value(number: &Number) -> Option<i128> {
    if is_floating_point(number) {
        return None;
    }
    number.to_string().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_member_order_is_preserved() {
        let node = Node::from(json!({"z": 1, "a": 2, "m": 3}));
        let keys: Vec<_> = node.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_floating_point_detection() {
        let whole = Node::parse("10").unwrap();
        let fractional = Node::parse("10.2").unwrap();
        let dotted = Node::parse("10.0").unwrap();
        assert!(!is_floating_point(whole.as_number().unwrap()));
        assert!(is_floating_point(fractional.as_number().unwrap()));
        assert!(is_floating_point(dotted.as_number().unwrap()));
    }

    #[test]
    fn test_integral_value_covers_u64() {
        let big = Node::parse("18446744073709551615").unwrap();
        assert_eq!(
            integral_value(big.as_number().unwrap()),
            Some(u64::MAX as i128)
        );
        let negative = Node::integer(-256);
        assert_eq!(integral_value(negative.as_number().unwrap()), Some(-256));
    }

    #[test]
    fn test_integers_beyond_u64_stay_integral() {
        let big = Node::parse("1180591620717411303424").unwrap();
        let number = big.as_number().unwrap();
        assert!(!is_floating_point(number));
        assert_eq!(integral_value(number), Some(1_180_591_620_717_411_303_424));
        assert_eq!(big.to_string(), "1180591620717411303424");

        let huge = Node::parse("-1000000000000000000000000000000000000000000").unwrap();
        assert!(!is_floating_point(huge.as_number().unwrap()));
        assert_eq!(integral_value(huge.as_number().unwrap()), None);

        assert!(is_floating_point(Node::parse("1e3").unwrap().as_number().unwrap()));
    }

    #[test]
    fn test_node_types_and_literals() {
        assert_eq!(Node::boolean(true).node_type(), NodeType::Boolean);
        assert_eq!(Node::null().node_type().to_string(), "null");
        assert_eq!(Node::boolean(true).scalar_literal().as_deref(), Some("true"));
        assert_eq!(Node::string("x").scalar_literal().as_deref(), Some("x"));
        assert_eq!(Node::array(vec![]).scalar_literal(), None);
    }

    #[test]
    fn test_display_is_compact_json() {
        let node = Node::from(json!({"a": [1, "two", null]}));
        assert_eq!(node.to_string(), r#"{"a":[1,"two",null]}"#);
    }

    #[test]
    fn test_location_is_carried() {
        let loc = SourceLocation::new("model.json", 3, 7);
        let node = Node::string("x").with_location(loc.clone());
        assert_eq!(node.location(), &loc);
    }
}
