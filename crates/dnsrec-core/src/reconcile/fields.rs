//! Create-time field selection

use crate::model::{DesiredRecord, SELECTABLE_FIELDS};
use serde_json::{Map, Value};

/// Optional fields to send along with a create call
///
/// Only fields that are set (and not JSON null) are included, so the
/// provider's defaults apply to everything else. Falsy values such as
/// `false` or an empty list are still sent.
pub fn selectable_fields(desired: &DesiredRecord) -> Map<String, Value> {
    SELECTABLE_FIELDS
        .iter()
        .filter_map(|&field| match desired.field(field) {
            Some(Value::Null) | None => None,
            Some(value) => Some((field.to_string(), value)),
        })
        .collect()
}
