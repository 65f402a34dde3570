//! # Timestamp Validation Strategies
//!
//! Timestamp values are checked by a strategy selected per call (see
//! [`TimestampValidationStrategy`]). Strategies have the plugin call shape
//! and run in every validator, but only act on timestamp shapes and on
//! members that target them.
//!
//! - **Format** honors the `timestampFormat` trait. When a member carrying
//!   the trait refers to a timestamp, the member's format wins and the
//!   target does not check again. Without any format, numbers and RFC 3339
//!   strings are both accepted.
//! - **EpochSeconds** requires a number.

use chrono::{DateTime, NaiveDateTime};
use shapeval_model::prelude;
use shapeval_model::traits::TimestampFormat;
use shapeval_model::{Node, NodeValue, Shape, ShapeType};

use crate::context::{PluginContext, TimestampValidationStrategy};
use crate::event::Severity;
use crate::plugin::{value_type, Emitter};

/// `Sun, 06 Nov 1994 08:49:37 GMT`
const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";
const IMF_FIXDATE_LEN: usize = 29;

impl TimestampValidationStrategy {
    /// Check `value` against `shape` according to this strategy.
    pub fn apply(&self, shape: &Shape, value: &Node, ctx: &PluginContext<'_>, emitter: &mut Emitter) {
        match self {
            TimestampValidationStrategy::Format => apply_format(shape, value, ctx, emitter),
            TimestampValidationStrategy::EpochSeconds => {
                if shape.shape_type() == ShapeType::Timestamp && !is_number(value) {
                    emitter.emit(value, Severity::Error, epoch_seconds_message(shape, value));
                }
            }
        }
    }
}

fn apply_format(shape: &Shape, value: &Node, ctx: &PluginContext<'_>, emitter: &mut Emitter) {
    if shape.shape_type() == ShapeType::Timestamp {
        let member_has_format = ctx
            .referring_member()
            .is_some_and(|member| member.has_trait(prelude::TIMESTAMP_FORMAT));
        if !member_has_format {
            let format = shape.get_trait(prelude::TIMESTAMP_FORMAT);
            check(shape, format, value, emitter);
        }
    } else if shape.is_member()
        && value_type(ctx.model(), shape) == Some(ShapeType::Timestamp)
    {
        if let Some(format) = shape.get_trait(prelude::TIMESTAMP_FORMAT) {
            check(shape, Some(format), value, emitter);
        }
    }
}

fn check(shape: &Shape, format: Option<&Node>, value: &Node, emitter: &mut Emitter) {
    let Some(format) = format else {
        default_check(shape, value, emitter);
        return;
    };
    match TimestampFormat::from_node(format) {
        Some(TimestampFormat::DateTime) => check_date_time(shape, value, emitter),
        Some(TimestampFormat::EpochSeconds) => {
            if !is_number(value) {
                emitter.emit(value, Severity::Error, epoch_seconds_message(shape, value));
            }
        }
        Some(TimestampFormat::HttpDate) => check_http_date(value, emitter),
        None => {
            tracing::debug!(shape = %shape.id(), "skipping unknown timestamp format");
        }
    }
}

fn default_check(shape: &Shape, value: &Node, emitter: &mut Emitter) {
    match value.value() {
        NodeValue::Number(_) => {}
        NodeValue::String(_) => check_date_time(shape, value, emitter),
        _ => emitter.emit(
            value,
            Severity::Error,
            format!(
                "Invalid {} value provided for timestamp, `{}`. Expected a number that contains epoch \
                 seconds with optional millisecond precision, or a string that contains an RFC 3339 \
                 formatted timestamp (e.g., \"1985-04-12T23:20:50.52Z\")",
                value.node_type(),
                shape.id()
            ),
        ),
    }
}

fn check_date_time(shape: &Shape, value: &Node, emitter: &mut Emitter) {
    let Some(text) = value.as_str() else {
        emitter.emit(
            value,
            Severity::Error,
            "Expected a string value for a date-time timestamp (e.g., \"1985-04-12T23:20:50.52Z\")",
        );
        return;
    };
    if !is_rfc3339_utc(text) {
        emitter.emit(
            value,
            Severity::Error,
            format!(
                "Invalid string value, `{text}`, provided for timestamp, `{}`. Expected an RFC 3339 \
                 formatted timestamp (e.g., \"1985-04-12T23:20:50.52Z\")",
                shape.id()
            ),
        );
    }
}

fn check_http_date(value: &Node, emitter: &mut Emitter) {
    let found = match value.as_str() {
        Some(text) if is_imf_fixdate(text) => return,
        Some(text) => text.to_string(),
        None => value.node_type().to_string(),
    };
    emitter.emit(
        value,
        Severity::Error,
        format!(
            "Invalid value provided for http-date formatted timestamp. Expected a string value that \
             matches the IMF-fixdate production of RFC 7231 section-7.1.1.1. Found: {found}"
        ),
    );
}

fn epoch_seconds_message(shape: &Shape, value: &Node) -> String {
    format!(
        "Invalid {} value provided for timestamp, `{}`. Expected a number that contains epoch \
         seconds with optional millisecond precision",
        value.node_type(),
        shape.id()
    )
}

fn is_number(value: &Node) -> bool {
    matches!(value.value(), NodeValue::Number(_))
}

/// RFC 3339 with a `Z` offset. Numeric offsets are rejected.
fn is_rfc3339_utc(text: &str) -> bool {
    text.ends_with('Z') && DateTime::parse_from_rfc3339(text).is_ok()
}

fn is_imf_fixdate(text: &str) -> bool {
    text.len() == IMF_FIXDATE_LEN && NaiveDateTime::parse_from_str(text, IMF_FIXDATE).is_ok()
}
