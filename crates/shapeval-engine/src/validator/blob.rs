//! Blob values are strings, optionally required to be base64.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use shapeval_model::{Node, NodeType};

use super::{ShapeValidator, Walk};
use crate::context::{Feature, ValidationContext};
use crate::event::ValidationEvent;

/// Standard alphabet; `=` padding is optional.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

pub(super) fn validate(
    validator: &ShapeValidator,
    walk: &Walk<'_>,
    value: &Node,
    ctx: &mut ValidationContext,
) -> Vec<ValidationEvent> {
    let Some(text) = value.as_str() else {
        return validator.invalid_shape(value, &[NodeType::String], ctx);
    };

    if ctx.has_feature(Feature::RequireBase64BlobValues) && BASE64.decode(text).is_err() {
        return vec![ctx.error("Blob value must be a valid base64 string", value.location())];
    }

    validator.apply_plugins(walk, value, ctx)
}
