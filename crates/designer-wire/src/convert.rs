//! Conversion between wire shapes and model types.
//!
//! Loading goes raw -> config, then through the model factories so every
//! default and derived value is computed in one place. Saving goes straight
//! from the model to the raw shape, applying the service's conventions.

use serde_json::Value;
use tracing::warn;

use designer_model::property_type::{INT_RANGE_URI, USER_RANGE_URI};
use designer_model::{
    ConditionalFormat, Domain, DomainConfig, ErrorId, ExceptionPayload, Field, FieldConfig,
    FormatFilter, Index, MAX_TEXT_LENGTH, PayloadError, PropertyValidator, UNLIMITED_TEXT_LENGTH,
    ValidatorKind,
};

use crate::types::{
    RawConditionalFormat, RawDomain, RawExceptionPayload, RawField, RawIndex, RawPayloadError,
    RawValidator,
};

const FAIL_ON_MATCH: &str = "failOnMatch";

// =============================================================================
// LOAD
// =============================================================================

impl From<RawDomain> for DomainConfig {
    fn from(raw: RawDomain) -> Self {
        DomainConfig {
            domain_id: raw.domain_id,
            domain_uri: raw.domain_uri,
            name: raw.name,
            container: raw.container,
            description: raw.description,
            fields: raw.fields.into_iter().map(FieldConfig::from).collect(),
            indices: raw.indices.into_iter().map(Index::from).collect(),
            mandatory_field_names: raw.mandatory_field_names,
            allow_file_link_properties: raw.allow_file_link_properties,
            allow_attachment_properties: raw.allow_attachment_properties,
            allow_flag_properties: raw.allow_flag_properties,
        }
    }
}

impl From<RawIndex> for Index {
    fn from(raw: RawIndex) -> Self {
        Index {
            column_names: raw.column_names,
            unique: raw.unique,
        }
    }
}

impl From<RawField> for FieldConfig {
    fn from(raw: RawField) -> Self {
        FieldConfig {
            property_id: raw.property_id,
            name: raw.name,
            property_uri: raw.property_uri,
            range_uri: raw.range_uri,
            concept_uri: raw.concept_uri,
            data_type: None,
            required: raw.required,
            primary_key: raw.primary_key,
            lock_type: raw.lock_type,
            lookup_schema: raw.lookup_schema,
            lookup_query: raw.lookup_query,
            lookup_container: raw.lookup_container,
            property_validators: raw
                .property_validators
                .into_iter()
                .map(PropertyValidator::from)
                .collect(),
            conditional_formats: raw
                .conditional_formats
                .into_iter()
                .map(ConditionalFormat::from)
                .collect(),
            format: raw.format,
            scale: raw.scale,
            import_aliases: raw.import_aliases,
            description: raw.description,
            label: raw.label,
            url: raw.url,
            phi: raw.phi,
            measure: raw.measure,
            dimension: raw.dimension,
            hidden: raw.hidden,
            mv_enabled: raw.mv_enabled,
            shown_in_insert_view: raw.shown_in_insert_view,
            shown_in_update_view: raw.shown_in_update_view,
            shown_in_details_view: raw.shown_in_details_view,
            exclude_from_shifting: raw.exclude_from_shifting,
            recommended_variable: raw.recommended_variable,
            default_scale: raw.default_scale,
            default_value_type: raw.default_value_type,
            disable_phi_level: None,
        }
    }
}

impl From<RawValidator> for PropertyValidator {
    fn from(raw: RawValidator) -> Self {
        let mut properties = raw.properties;
        let fail_on_match = properties
            .remove(FAIL_ON_MATCH)
            .is_some_and(|value| truthy(&value));
        PropertyValidator {
            kind: ValidatorKind::parse(&raw.kind),
            row_id: raw.row_id,
            name: raw.name,
            description: raw.description,
            error_message: raw.error_message,
            expression: raw.expression,
            fail_on_match,
            properties,
        }
    }
}

impl From<RawConditionalFormat> for ConditionalFormat {
    fn from(raw: RawConditionalFormat) -> Self {
        ConditionalFormat {
            filter: FormatFilter::from_wire(raw.filter.as_deref()),
            text_color: raw.text_color,
            background_color: raw.background_color,
            bold: raw.bold,
            italic: raw.italic,
            strikethrough: raw.strikethrough,
        }
    }
}

impl From<RawExceptionPayload> for ExceptionPayload {
    fn from(raw: RawExceptionPayload) -> Self {
        ExceptionPayload {
            exception: raw.exception,
            success: raw.success,
            errors: raw
                .errors
                .unwrap_or_default()
                .into_iter()
                .map(PayloadError::from)
                .collect(),
        }
    }
}

impl From<RawPayloadError> for PayloadError {
    fn from(raw: RawPayloadError) -> Self {
        PayloadError {
            id: error_id(&raw.id),
            field: raw.field,
            message: raw.message,
            extra_info: raw.extra_info.as_ref().map(value_text),
            severity: raw.severity,
        }
    }
}

fn error_id(id: &Value) -> ErrorId {
    match id {
        Value::Number(number) => number.as_i64().map_or(ErrorId::Unknown, ErrorId::Property),
        Value::String(text) if text == "form" => ErrorId::Form,
        Value::String(text) => text
            .trim()
            .parse()
            .map_or(ErrorId::Unknown, ErrorId::Property),
        Value::Null => ErrorId::Unknown,
        other => {
            warn!(id = %other, "unexpected server error id");
            ErrorId::Unknown
        }
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) => text.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// =============================================================================
// SAVE
// =============================================================================

impl From<&Domain> for RawDomain {
    fn from(domain: &Domain) -> Self {
        RawDomain {
            domain_id: domain.domain_id,
            domain_uri: domain.domain_uri.clone(),
            name: Some(domain.name.clone()),
            container: domain.container.clone(),
            description: domain.description.clone(),
            allow_file_link_properties: domain.allow_file_link_properties,
            allow_attachment_properties: domain.allow_attachment_properties,
            allow_flag_properties: domain.allow_flag_properties,
            mandatory_field_names: Vec::new(),
            fields: domain.fields.iter().map(RawField::from).collect(),
            indices: domain.indices.iter().map(RawIndex::from).collect(),
        }
    }
}

impl From<&Index> for RawIndex {
    fn from(index: &Index) -> Self {
        RawIndex {
            column_names: index.column_names.clone(),
            unique: index.unique,
        }
    }
}

impl From<&Field> for RawField {
    fn from(field: &Field) -> Self {
        let keeps_lookup = field.data_type.carries_lookup_target();
        let range_uri = if field.range_uri == USER_RANGE_URI {
            INT_RANGE_URI.to_string()
        } else {
            field.range_uri.clone()
        };
        RawField {
            property_id: field.property_id,
            name: Some(field.name.clone()),
            property_uri: field.property_uri.clone(),
            range_uri: Some(range_uri),
            concept_uri: field.concept_uri.clone(),
            required: Some(field.required),
            primary_key: Some(field.primary_key),
            lock_type: Some(field.lock_type),
            lookup_schema: field.lookup.schema.clone().filter(|_| keeps_lookup),
            lookup_query: field.lookup.query.clone().filter(|_| keeps_lookup),
            lookup_container: field.lookup.container.clone().filter(|_| keeps_lookup),
            property_validators: field
                .validators
                .flatten()
                .iter()
                .map(RawValidator::from)
                .collect(),
            conditional_formats: field
                .conditional_formats
                .iter()
                .map(RawConditionalFormat::from)
                .collect(),
            format: field.format.clone(),
            scale: Some(clamp_scale(field.scale)),
            import_aliases: field.import_aliases.clone(),
            description: field.description.clone(),
            label: field.label.clone(),
            url: field.url.clone(),
            phi: Some(field.phi),
            measure: Some(field.measure),
            dimension: Some(field.dimension),
            hidden: Some(field.hidden),
            mv_enabled: Some(field.mv_enabled),
            shown_in_insert_view: Some(field.shown_in_insert_view),
            shown_in_update_view: Some(field.shown_in_update_view),
            shown_in_details_view: Some(field.shown_in_details_view),
            exclude_from_shifting: Some(field.exclude_from_shifting),
            recommended_variable: Some(field.recommended_variable),
            default_scale: field.default_scale.clone(),
            default_value_type: field.default_value_type.clone(),
        }
    }
}

impl From<&PropertyValidator> for RawValidator {
    fn from(validator: &PropertyValidator) -> Self {
        let mut properties = validator.properties.clone();
        if validator.kind == ValidatorKind::Regex || validator.fail_on_match {
            properties.insert(FAIL_ON_MATCH.to_string(), Value::Bool(validator.fail_on_match));
        }
        RawValidator {
            kind: validator.kind.as_str().to_string(),
            row_id: validator.row_id,
            name: validator.name.clone(),
            description: validator.description.clone(),
            error_message: validator.error_message.clone(),
            expression: validator.expression.clone(),
            properties,
        }
    }
}

impl From<&ConditionalFormat> for RawConditionalFormat {
    fn from(format: &ConditionalFormat) -> Self {
        RawConditionalFormat {
            filter: Some(format.filter.to_wire().to_string()),
            text_color: format.text_color.clone(),
            background_color: format.background_color.clone(),
            bold: format.bold,
            italic: format.italic,
            strikethrough: format.strikethrough,
        }
    }
}

/// Scale as the service accepts it: a text length up to
/// [`MAX_TEXT_LENGTH`], or [`UNLIMITED_TEXT_LENGTH`] for anything else.
pub fn clamp_scale(scale: Option<i64>) -> i64 {
    match scale {
        Some(scale) if (0..=MAX_TEXT_LENGTH).contains(&scale) => scale,
        _ => UNLIMITED_TEXT_LENGTH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scale_clamping() {
        assert_eq!(clamp_scale(Some(255)), 255);
        assert_eq!(clamp_scale(Some(MAX_TEXT_LENGTH)), MAX_TEXT_LENGTH);
        assert_eq!(clamp_scale(Some(MAX_TEXT_LENGTH + 1)), UNLIMITED_TEXT_LENGTH);
        assert_eq!(clamp_scale(Some(-1)), UNLIMITED_TEXT_LENGTH);
        assert_eq!(clamp_scale(None), UNLIMITED_TEXT_LENGTH);
        assert_eq!(clamp_scale(Some(UNLIMITED_TEXT_LENGTH)), UNLIMITED_TEXT_LENGTH);
    }

    #[test]
    fn error_ids() {
        assert_eq!(error_id(&json!(12)), ErrorId::Property(12));
        assert_eq!(error_id(&json!("12")), ErrorId::Property(12));
        assert_eq!(error_id(&json!("form")), ErrorId::Form);
        assert_eq!(error_id(&json!(null)), ErrorId::Unknown);
        assert_eq!(error_id(&json!([1])), ErrorId::Unknown);
        assert_eq!(error_id(&json!(0)).property_id(), None);
    }

    #[test]
    fn fail_on_match_moves_between_flag_and_properties() {
        let raw: RawValidator = serde_json::from_value(json!({
            "type": "RegEx",
            "expression": "^x",
            "properties": {"failOnMatch": "true", "flags": 2}
        }))
        .unwrap();
        let validator = PropertyValidator::from(raw);
        assert!(validator.fail_on_match);
        assert_eq!(validator.properties.get("flags"), Some(&json!(2)));

        let back = RawValidator::from(&validator);
        assert_eq!(back.kind, "RegEx");
        assert_eq!(back.properties.get(FAIL_ON_MATCH), Some(&json!(true)));
        assert_eq!(back.properties.get("flags"), Some(&json!(2)));
    }
}
