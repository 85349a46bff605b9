//! Property type resolution.
//!
//! [`resolve_data_type`] maps raw field data (possibly using legacy range
//! URIs) to a catalog entry. [`resolve_available_types`] decides which types
//! a field may be switched to.

use tracing::debug;

use crate::field::{Field, FieldConfig};
use crate::property_type::{
    INT_RANGE_URI, PropertyType, SAMPLE_TYPE_CONCEPT_URI, USERS_LOOKUP_QUERY, is_lookup_range,
    is_numeric_range, is_string_range,
};

/// Caller context for [`resolve_available_types`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeOptions {
    /// Restrict to the types supported by application-managed domains.
    pub app_properties_only: bool,
    /// Offer the file type when `app_properties_only` is set.
    pub show_file_property: bool,
}

impl Default for TypeOptions {
    fn default() -> Self {
        Self {
            app_properties_only: false,
            show_file_property: true,
        }
    }
}

/// Resolve the canonical type of raw field data.
///
/// Order matters: the sample concept wins over everything, an already
/// resolved type is trusted, lookups are recognized by their target query,
/// then creatable types are matched on range + concept, then legacy types on
/// range alone. Anything else is text.
pub fn resolve_data_type(raw: &FieldConfig) -> PropertyType {
    let concept_uri = raw.concept_uri.as_deref().filter(|uri| !uri.is_empty());
    if concept_uri == Some(SAMPLE_TYPE_CONCEPT_URI) {
        return PropertyType::Sample;
    }
    if let Some(data_type) = raw.data_type {
        return data_type;
    }

    let range_uri = raw.range_uri.as_deref().unwrap_or_default();
    if let Some(query) = raw.lookup_query.as_deref().filter(|q| !q.is_empty()) {
        if query != USERS_LOOKUP_QUERY {
            return PropertyType::Lookup;
        }
        if range_uri == INT_RANGE_URI {
            return PropertyType::Users;
        }
    }

    let creatable = PropertyType::CREATABLE
        .iter()
        .filter(|ty| !matches!(ty, PropertyType::Lookup | PropertyType::Sample))
        .find(|ty| ty.range_uri() == range_uri && ty.concept_uri() == concept_uri);
    if let Some(ty) = creatable {
        return *ty;
    }

    if let Some(ty) = PropertyType::READ_ONLY
        .iter()
        .find(|ty| ty.range_uri() == range_uri)
    {
        debug!(range_uri, data_type = ty.name(), "resolved legacy property type");
        return *ty;
    }

    PropertyType::Text
}

/// Whether a saved field whose original range is `original_range_uri` may be
/// switched to `data_type`.
pub fn acceptable_property_type(data_type: PropertyType, original_range_uri: &str) -> bool {
    match data_type {
        PropertyType::Lookup | PropertyType::Users => is_lookup_range(original_range_uri),
        PropertyType::Sample => original_range_uri == INT_RANGE_URI,
        _ if is_numeric_range(original_range_uri) => data_type.is_numeric(),
        _ if is_string_range(original_range_uri) => data_type.is_string(),
        _ => data_type.range_uri() == original_range_uri,
    }
}

/// Types offered to application-managed domains.
pub fn is_app_property_type(data_type: PropertyType, show_file_property: bool) -> bool {
    match data_type {
        PropertyType::Lookup
        | PropertyType::Participant
        | PropertyType::Flag
        | PropertyType::Attachment => false,
        PropertyType::File => show_file_property,
        _ => true,
    }
}

/// Types `field` may be switched to, drawn from `catalog` in catalog order.
///
/// New fields get the whole (optionally app-filtered) catalog. Saved fields
/// only get types acceptable for their original range, plus their current
/// type wherever it sits in the catalog; if the catalog lacks it (legacy
/// types) it is appended.
pub fn resolve_available_types(
    field: &Field,
    catalog: &[PropertyType],
    options: TypeOptions,
) -> Vec<PropertyType> {
    let app_allowed = |ty: PropertyType| {
        !options.app_properties_only || is_app_property_type(ty, options.show_file_property)
    };
    let current = field.data_type;
    let original_range = field.original().range_uri.as_str();

    let mut types: Vec<PropertyType> = catalog
        .iter()
        .copied()
        .filter(|ty| {
            if field.is_new() {
                app_allowed(*ty)
            } else {
                *ty == current || (app_allowed(*ty) && acceptable_property_type(*ty, original_range))
            }
        })
        .collect();

    if !field.is_new() && !types.contains(&current) {
        types.push(current);
    }
    types
}
