//! # shapeval-model — Shape Graph Primitives
//!
//! The leaf crate of the workspace. It defines the immutable inputs of node
//! validation: the shape graph ([`Model`]) and the literal values checked
//! against it ([`Node`]).
//!
//! ## Key Design Principles
//!
//! 1. **Arena addressed by [`ShapeId`].** Aggregate shapes never contain
//!    their children; they name them. A model may therefore contain
//!    recursive type definitions without any special construction order.
//!
//! 2. **Closed shape kinds.** [`ShapeKind`] is an exhaustive enum. Adding a
//!    kind is a compile error in every consumer that matches on it.
//!
//! 3. **Per-model knowledge cache.** Derived indexes ([`NullableIndex`] and
//!    the engine's validator index) are computed at most once per model via
//!    [`Model::knowledge`] and published only when fully built.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `shapeval-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod ast;
pub mod error;
pub mod knowledge;
pub mod location;
pub mod model;
pub mod node;
pub mod nullable;
pub mod prelude;
pub mod shape;
pub mod shape_id;
pub mod traits;

// Re-export primary types for ergonomic imports.
pub use error::ModelError;
pub use knowledge::KnowledgeIndex;
pub use location::SourceLocation;
pub use model::{MemberDef, Model, ModelBuilder};
pub use node::{Node, NodeType, NodeValue};
pub use nullable::{CheckMode, NullableIndex};
pub use shape::{MemberShape, Shape, ShapeKind, ShapeType};
pub use shape_id::ShapeId;
pub use traits::Traits;
