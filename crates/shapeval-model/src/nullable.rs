//! # Member Nullability
//!
//! Answers whether a member may legally hold `null`. The answer depends on
//! the member's container:
//!
//! - **structure**: optional unless `required` or a non-null `default` is
//!   applied; in [`CheckMode::Client`] a `clientOptional` member or a member
//!   of an `input` structure is always optional;
//! - **union**: never nullable;
//! - **list / map value**: nullable only when the container is `sparse`;
//! - **map key**: never nullable.
//!
//! Members whose container or target is missing from the model are treated
//! as nullable.

use crate::knowledge::KnowledgeIndex;
use crate::model::Model;
use crate::prelude;
use crate::shape::{Shape, ShapeKind};

/// Which consumer's view of nullability to apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CheckMode {
    /// Clients honor `clientOptional` and `input` relaxations.
    #[default]
    Client,
    /// Servers enforce `required` strictly.
    Server,
}

/// Nullability queries over a model. Cached via [`Model::knowledge`].
#[derive(Debug, Default)]
pub struct NullableIndex {
    _private: (),
}

impl KnowledgeIndex for NullableIndex {
    fn build(_model: &Model) -> Self {
        Self::default()
    }
}

impl NullableIndex {
    /// Returns the model's cached index.
    pub fn of(model: &Model) -> std::sync::Arc<Self> {
        model.knowledge::<Self>()
    }

    /// Returns true if `member` may hold null. Non-member shapes are
    /// always nullable.
    pub fn is_member_nullable(&self, model: &Model, member: &Shape, mode: CheckMode) -> bool {
        let Some(def) = member.as_member() else {
            return true;
        };
        let (Some(container), Some(_target)) =
            (model.get_shape(&def.container), model.get_shape(&def.target))
        else {
            return true;
        };

        match container.kind() {
            ShapeKind::Structure { .. } => {
                if mode == CheckMode::Client
                    && (member.has_trait(prelude::CLIENT_OPTIONAL)
                        || container.has_trait(prelude::INPUT))
                {
                    return true;
                }
                !(member.has_trait(prelude::REQUIRED) || member.has_non_null_default())
            }
            ShapeKind::Union { .. } => false,
            ShapeKind::Map { key, .. } if key == member.id() => false,
            ShapeKind::Map { .. } | ShapeKind::List { .. } => {
                container.has_trait(prelude::SPARSE)
            }
            _ => true,
        }
    }
}
