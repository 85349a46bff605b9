//! JSON shapes exchanged with the domain service.
//!
//! These mirror the service's keys exactly. Conversion to and from the
//! model lives in [`crate::convert`].

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use designer_model::{LockState, PhiLevel};

// =============================================================================
// DOMAIN
// =============================================================================

/// A domain design as sent and received by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDomain {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<i64>,
    #[serde(rename = "domainURI", skip_serializing_if = "Option::is_none")]
    pub domain_uri: Option<String>,
    pub name: Option<String>,
    pub container: Option<String>,
    pub description: Option<String>,
    pub allow_file_link_properties: bool,
    pub allow_attachment_properties: bool,
    pub allow_flag_properties: bool,
    /// Read on load, never written back.
    #[serde(skip_serializing)]
    pub mandatory_field_names: Vec<String>,
    pub fields: Vec<RawField>,
    pub indices: Vec<RawIndex>,
}

impl Default for RawDomain {
    fn default() -> Self {
        Self {
            domain_id: None,
            domain_uri: None,
            name: None,
            container: None,
            description: None,
            allow_file_link_properties: false,
            allow_attachment_properties: false,
            allow_flag_properties: true,
            mandatory_field_names: Vec::new(),
            fields: Vec::new(),
            indices: Vec::new(),
        }
    }
}

/// Database index over domain columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawIndex {
    pub column_names: Vec<String>,
    pub unique: bool,
}

// =============================================================================
// FIELD
// =============================================================================

/// One field of a [`RawDomain`].
///
/// Lookup keys are always written, as `null` when the field's type has no
/// lookup target. `URL` and `PHI` are accepted in either case on load and
/// written lowercase. Unrecognized `lockType` and `PHI` values read as
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawField {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<i64>,
    pub name: Option<String>,
    #[serde(rename = "propertyURI", skip_serializing_if = "Option::is_none")]
    pub property_uri: Option<String>,
    #[serde(rename = "rangeURI")]
    pub range_uri: Option<String>,
    #[serde(rename = "conceptURI")]
    pub concept_uri: Option<String>,
    pub required: Option<bool>,
    pub primary_key: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub lock_type: Option<LockState>,
    pub lookup_schema: Option<String>,
    pub lookup_query: Option<String>,
    pub lookup_container: Option<String>,
    pub property_validators: Vec<RawValidator>,
    pub conditional_formats: Vec<RawConditionalFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(deserialize_with = "lenient_scale")]
    pub scale: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_aliases: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "url", alias = "URL", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "phi", alias = "PHI", deserialize_with = "lenient")]
    pub phi: Option<PhiLevel>,
    pub measure: Option<bool>,
    pub dimension: Option<bool>,
    pub hidden: Option<bool>,
    pub mv_enabled: Option<bool>,
    pub shown_in_insert_view: Option<bool>,
    pub shown_in_update_view: Option<bool>,
    pub shown_in_details_view: Option<bool>,
    pub exclude_from_shifting: Option<bool>,
    pub recommended_variable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_scale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value_type: Option<String>,
}

/// Validator entry of [`RawField::property_validators`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawValidator {
    /// `Range`, `RegEx`, `Lookup`, or any other kind the service defines.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    /// Extra settings such as `failOnMatch`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Value>,
}

/// Conditional format entry of [`RawField::conditional_formats`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawConditionalFormat {
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
}

// =============================================================================
// ERRORS
// =============================================================================

/// Body of a failed save.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawExceptionPayload {
    pub exception: String,
    pub success: bool,
    pub errors: Option<Vec<RawPayloadError>>,
}

/// Entry of [`RawExceptionPayload::errors`].
///
/// `id` is a property id (number or numeric string) or the literal `"form"`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPayloadError {
    pub id: Value,
    pub field: Option<String>,
    pub message: String,
    pub extra_info: Option<Value>,
    pub severity: Option<String>,
}

/// Scale arrives as a number, a numeric string, or something else entirely;
/// anything non-numeric reads as absent.
fn lenient_scale<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scale_from_value))
}

/// Enum-valued keys: an unknown spelling is logged and read as absent
/// instead of failing the whole domain.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .filter(|value| !value.is_null())
        .and_then(|value| match serde_json::from_value(value.clone()) {
            Ok(parsed) => Some(parsed),
            Err(error) => {
                warn!(%value, %error, "ignoring unrecognized field setting");
                None
            }
        }))
}

pub(crate) fn scale_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
