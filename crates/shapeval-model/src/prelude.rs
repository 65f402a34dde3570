//! # Prelude
//!
//! Well-known trait ids and the simple shapes every model contains.

use crate::shape::{Shape, ShapeKind};
use crate::shape_id::ShapeId;

/// Namespace of the prelude.
pub const NAMESPACE: &str = "smithy.api";

pub const REQUIRED: &str = "smithy.api#required";
pub const SPARSE: &str = "smithy.api#sparse";
pub const DEFAULT: &str = "smithy.api#default";
pub const CLIENT_OPTIONAL: &str = "smithy.api#clientOptional";
pub const INPUT: &str = "smithy.api#input";
pub const RANGE: &str = "smithy.api#range";
pub const LENGTH: &str = "smithy.api#length";
pub const PATTERN: &str = "smithy.api#pattern";
pub const TIMESTAMP_FORMAT: &str = "smithy.api#timestampFormat";

const SIMPLE_SHAPES: [(&str, ShapeKind); 13] = [
    ("Blob", ShapeKind::Blob),
    ("Boolean", ShapeKind::Boolean),
    ("String", ShapeKind::String),
    ("Timestamp", ShapeKind::Timestamp),
    ("Byte", ShapeKind::Byte),
    ("Short", ShapeKind::Short),
    ("Integer", ShapeKind::Integer),
    ("Long", ShapeKind::Long),
    ("BigInteger", ShapeKind::BigInteger),
    ("BigDecimal", ShapeKind::BigDecimal),
    ("Float", ShapeKind::Float),
    ("Double", ShapeKind::Double),
    ("Document", ShapeKind::Document),
];

/// The prelude's simple shapes (`smithy.api#String`, ...).
pub fn shapes() -> Vec<Shape> {
    SIMPLE_SHAPES
        .iter()
        .filter_map(|(name, kind)| {
            ShapeId::new(NAMESPACE, name)
                .ok()
                .map(|id| Shape::new(id, kind.clone()))
        })
        .collect()
}

/// Returns true if `id` lives in the prelude namespace.
pub fn is_prelude_shape(id: &ShapeId) -> bool {
    id.namespace() == NAMESPACE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_contains_all_simple_shapes() {
        let shapes = shapes();
        assert_eq!(shapes.len(), SIMPLE_SHAPES.len());
        assert!(shapes
            .iter()
            .any(|s| s.id().to_string() == "smithy.api#BigInteger"));
        assert!(shapes.iter().all(|s| is_prelude_shape(s.id())));
    }
}
