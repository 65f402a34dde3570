//! # Shapes
//!
//! A [`Shape`] is one node of the shape graph: an id, a closed
//! [`ShapeKind`], its [`Traits`], and where it was defined.
//!
//! Aggregate kinds (list, map, structure, union) reference their members by
//! [`ShapeId`]; the member shapes are separate entries in the model that in
//! turn reference their targets by id. No shape ever owns another, which is
//! what makes recursive definitions representable.

use std::fmt;

use indexmap::IndexMap;

use crate::location::SourceLocation;
use crate::node::Node;
use crate::prelude;
use crate::shape_id::ShapeId;
use crate::traits::Traits;

/// The type of a shape, spelled as in the IDL (`bigInteger`, `structure`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeType {
    Blob,
    Boolean,
    String,
    Timestamp,
    Byte,
    Short,
    Integer,
    Long,
    BigInteger,
    BigDecimal,
    Float,
    Double,
    Document,
    List,
    Map,
    Structure,
    Union,
    Member,
    Operation,
    Resource,
    Service,
}

impl ShapeType {
    /// IDL spelling of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeType::Blob => "blob",
            ShapeType::Boolean => "boolean",
            ShapeType::String => "string",
            ShapeType::Timestamp => "timestamp",
            ShapeType::Byte => "byte",
            ShapeType::Short => "short",
            ShapeType::Integer => "integer",
            ShapeType::Long => "long",
            ShapeType::BigInteger => "bigInteger",
            ShapeType::BigDecimal => "bigDecimal",
            ShapeType::Float => "float",
            ShapeType::Double => "double",
            ShapeType::Document => "document",
            ShapeType::List => "list",
            ShapeType::Map => "map",
            ShapeType::Structure => "structure",
            ShapeType::Union => "union",
            ShapeType::Member => "member",
            ShapeType::Operation => "operation",
            ShapeType::Resource => "resource",
            ShapeType::Service => "service",
        }
    }

    /// Parse the IDL spelling of a type.
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name {
            "blob" => ShapeType::Blob,
            "boolean" => ShapeType::Boolean,
            "string" => ShapeType::String,
            "timestamp" => ShapeType::Timestamp,
            "byte" => ShapeType::Byte,
            "short" => ShapeType::Short,
            "integer" => ShapeType::Integer,
            "long" => ShapeType::Long,
            "bigInteger" => ShapeType::BigInteger,
            "bigDecimal" => ShapeType::BigDecimal,
            "float" => ShapeType::Float,
            "double" => ShapeType::Double,
            "document" => ShapeType::Document,
            "list" => ShapeType::List,
            "map" => ShapeType::Map,
            "structure" => ShapeType::Structure,
            "union" => ShapeType::Union,
            "member" => ShapeType::Member,
            "operation" => ShapeType::Operation,
            "resource" => ShapeType::Resource,
            "service" => ShapeType::Service,
            _ => return None,
        };
        Some(ty)
    }

    /// Returns true for every numeric type, integral or not.
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            ShapeType::Byte
                | ShapeType::Short
                | ShapeType::Integer
                | ShapeType::Long
                | ShapeType::BigInteger
                | ShapeType::BigDecimal
                | ShapeType::Float
                | ShapeType::Double
        )
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A member of a list, map, structure or union.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberShape {
    /// The aggregate shape that declares this member.
    pub container: ShapeId,
    /// The shape this member's values conform to.
    pub target: ShapeId,
    /// Member name (`member` for lists, `key`/`value` for maps).
    pub name: String,
}

/// Kind-specific shape data.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Blob,
    Boolean,
    String,
    Timestamp,
    Byte,
    Short,
    Integer,
    Long,
    BigInteger,
    BigDecimal,
    Float,
    Double,
    Document,
    List { member: ShapeId },
    Map { key: ShapeId, value: ShapeId },
    Structure { members: IndexMap<String, ShapeId> },
    Union { members: IndexMap<String, ShapeId> },
    Member(MemberShape),
    Operation,
    Resource,
    Service,
}

impl ShapeKind {
    /// Build a kind with no child references from its type. Returns `None`
    /// for aggregates and members, which need their children named.
    pub fn simple(shape_type: ShapeType) -> Option<Self> {
        let kind = match shape_type {
            ShapeType::Blob => ShapeKind::Blob,
            ShapeType::Boolean => ShapeKind::Boolean,
            ShapeType::String => ShapeKind::String,
            ShapeType::Timestamp => ShapeKind::Timestamp,
            ShapeType::Byte => ShapeKind::Byte,
            ShapeType::Short => ShapeKind::Short,
            ShapeType::Integer => ShapeKind::Integer,
            ShapeType::Long => ShapeKind::Long,
            ShapeType::BigInteger => ShapeKind::BigInteger,
            ShapeType::BigDecimal => ShapeKind::BigDecimal,
            ShapeType::Float => ShapeKind::Float,
            ShapeType::Double => ShapeKind::Double,
            ShapeType::Document => ShapeKind::Document,
            ShapeType::Operation => ShapeKind::Operation,
            ShapeType::Resource => ShapeKind::Resource,
            ShapeType::Service => ShapeKind::Service,
            ShapeType::List
            | ShapeType::Map
            | ShapeType::Structure
            | ShapeType::Union
            | ShapeType::Member => return None,
        };
        Some(kind)
    }

    pub fn shape_type(&self) -> ShapeType {
        match self {
            ShapeKind::Blob => ShapeType::Blob,
            ShapeKind::Boolean => ShapeType::Boolean,
            ShapeKind::String => ShapeType::String,
            ShapeKind::Timestamp => ShapeType::Timestamp,
            ShapeKind::Byte => ShapeType::Byte,
            ShapeKind::Short => ShapeType::Short,
            ShapeKind::Integer => ShapeType::Integer,
            ShapeKind::Long => ShapeType::Long,
            ShapeKind::BigInteger => ShapeType::BigInteger,
            ShapeKind::BigDecimal => ShapeType::BigDecimal,
            ShapeKind::Float => ShapeType::Float,
            ShapeKind::Double => ShapeType::Double,
            ShapeKind::Document => ShapeType::Document,
            ShapeKind::List { .. } => ShapeType::List,
            ShapeKind::Map { .. } => ShapeType::Map,
            ShapeKind::Structure { .. } => ShapeType::Structure,
            ShapeKind::Union { .. } => ShapeType::Union,
            ShapeKind::Member(_) => ShapeType::Member,
            ShapeKind::Operation => ShapeType::Operation,
            ShapeKind::Resource => ShapeType::Resource,
            ShapeKind::Service => ShapeType::Service,
        }
    }
}

/// A single shape definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    id: ShapeId,
    kind: ShapeKind,
    traits: Traits,
    location: SourceLocation,
}

impl Shape {
    pub fn new(id: ShapeId, kind: ShapeKind) -> Self {
        Self {
            id,
            kind,
            traits: Traits::default(),
            location: SourceLocation::none(),
        }
    }

    /// Returns this shape with `trait_id` applied. A previous value for the
    /// same trait is replaced.
    pub fn with_trait(mut self, trait_id: &str, value: Node) -> Self {
        self.traits.insert(trait_id, value);
        self
    }

    pub fn with_traits(mut self, traits: Traits) -> Self {
        self.traits = traits;
        self
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn shape_type(&self) -> ShapeType {
        self.kind.shape_type()
    }

    pub fn traits(&self) -> &Traits {
        &self.traits
    }

    pub(crate) fn traits_mut(&mut self) -> &mut Traits {
        &mut self.traits
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn has_trait(&self, trait_id: &str) -> bool {
        self.traits.contains(trait_id)
    }

    pub fn get_trait(&self, trait_id: &str) -> Option<&Node> {
        self.traits.get(trait_id)
    }

    pub fn as_member(&self) -> Option<&MemberShape> {
        match &self.kind {
            ShapeKind::Member(member) => Some(member),
            _ => None,
        }
    }

    pub fn is_member(&self) -> bool {
        matches!(self.kind, ShapeKind::Member(_))
    }

    /// Returns true for a member carrying the `required` trait.
    pub fn is_required(&self) -> bool {
        self.is_member() && self.has_trait(prelude::REQUIRED)
    }

    /// Returns true if a `default` trait with a non-null value is applied.
    pub fn has_non_null_default(&self) -> bool {
        self.get_trait(prelude::DEFAULT)
            .is_some_and(|value| !value.is_null())
    }

    /// Named member ids of a structure or union, in declaration order.
    /// Empty for every other kind.
    pub fn members(&self) -> impl Iterator<Item = (&str, &ShapeId)> {
        let members = match &self.kind {
            ShapeKind::Structure { members } | ShapeKind::Union { members } => Some(members),
            _ => None,
        };
        members
            .into_iter()
            .flat_map(|m| m.iter().map(|(name, id)| (name.as_str(), id)))
    }

    /// Every shape id this shape references directly: aggregate members, or
    /// a member's target.
    pub fn references(&self) -> Vec<&ShapeId> {
        match &self.kind {
            ShapeKind::List { member } => vec![member],
            ShapeKind::Map { key, value } => vec![key, value],
            ShapeKind::Structure { members } | ShapeKind::Union { members } => {
                members.values().collect()
            }
            ShapeKind::Member(member) => vec![&member.target],
            _ => Vec::new(),
        }
    }
}
