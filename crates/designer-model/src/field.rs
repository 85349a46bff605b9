//! Design-time state of a single field.
//!
//! A [`Field`] is a value: editing operations take `&self` and return the
//! edited copy. Error state is never stored; [`Field::errors`] derives it
//! from the current attributes on every call.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::names::{CaseInsensitiveSet, names_match};
use crate::property_type::{
    INT_RANGE_URI, MAX_TEXT_LENGTH, PropertyType, STRING_RANGE_URI, USER_RANGE_URI,
    is_lookup_range,
};
use crate::resolve::resolve_data_type;
use crate::validator::{ConditionalFormat, FieldValidators, PropertyValidator};

/// Name that turns a brand-new field into a required sample reference.
pub const SAMPLE_ID_FIELD_NAME: &str = "SampleId";

/// Shown when a field name is legal but awkward to use from code.
pub const FIELD_NAME_WARNING: &str = "SQL queries, R scripts, and other code are easiest to write when field names only contain a combination of letters, numbers, and underscores, and start with a letter or underscore.";

/// Which attributes of a field the user may still edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LockState {
    #[default]
    NotLocked,
    /// Name and type are fixed; other attributes are editable.
    PartiallyLocked,
    FullyLocked,
    #[serde(rename = "PKLocked")]
    PrimaryKeyLocked,
}

impl LockState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockState::NotLocked => "NotLocked",
            LockState::PartiallyLocked => "PartiallyLocked",
            LockState::FullyLocked => "FullyLocked",
            LockState::PrimaryKeyLocked => "PKLocked",
        }
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LockState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "NotLocked" => Ok(LockState::NotLocked),
            "PartiallyLocked" => Ok(LockState::PartiallyLocked),
            "FullyLocked" => Ok(LockState::FullyLocked),
            "PKLocked" => Ok(LockState::PrimaryKeyLocked),
            _ => Err(format!("Unknown lock type: {s}")),
        }
    }
}

/// Protected health information level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PhiLevel {
    #[default]
    #[serde(rename = "NotPHI")]
    NotPhi,
    Limited,
    #[serde(rename = "PHI")]
    Phi,
    Restricted,
}

impl PhiLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhiLevel::NotPhi => "NotPHI",
            PhiLevel::Limited => "Limited",
            PhiLevel::Phi => "PHI",
            PhiLevel::Restricted => "Restricted",
        }
    }
}

impl FromStr for PhiLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "NotPHI" => Ok(PhiLevel::NotPhi),
            "Limited" => Ok(PhiLevel::Limited),
            "PHI" => Ok(PhiLevel::Phi),
            "Restricted" => Ok(PhiLevel::Restricted),
            _ => Err(format!("Unknown PHI level: {s}")),
        }
    }
}

/// Structural problem with a field, in reporting priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldErrors {
    None,
    MissingSchemaQuery,
    MissingDataType,
    MissingFieldName,
}

impl FieldErrors {
    pub fn is_none(&self) -> bool {
        matches!(self, FieldErrors::None)
    }

    pub fn message(&self) -> &'static str {
        match self {
            FieldErrors::None => "",
            FieldErrors::MissingSchemaQuery => {
                "Missing required lookup target schema or table property."
            }
            FieldErrors::MissingDataType => "Please provide a data type for each field.",
            FieldErrors::MissingFieldName => "Please provide a name for each field.",
        }
    }
}

/// Target of a lookup field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lookup {
    pub schema: Option<String>,
    pub query: Option<String>,
    /// Container holding the target; `None` means the current one.
    pub container: Option<String>,
}

impl Lookup {
    pub fn new(schema: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            query: Some(query.into()),
            container: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        !is_blank(self.schema.as_deref()) && !is_blank(self.query.as_deref())
    }
}

/// Type information captured when the field was loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalType {
    pub data_type: PropertyType,
    pub concept_uri: Option<String>,
    pub range_uri: String,
}

/// Raw or partial field data accepted by [`Field::create`].
///
/// Every attribute is optional; missing values get the defaults a new field
/// would have.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldConfig {
    pub property_id: Option<i64>,
    pub name: Option<String>,
    pub property_uri: Option<String>,
    pub range_uri: Option<String>,
    pub concept_uri: Option<String>,
    /// Already resolved type; trusted over range/concept matching.
    pub data_type: Option<PropertyType>,
    pub required: Option<bool>,
    pub primary_key: Option<bool>,
    pub lock_type: Option<LockState>,
    pub lookup_schema: Option<String>,
    pub lookup_query: Option<String>,
    pub lookup_container: Option<String>,
    pub property_validators: Vec<PropertyValidator>,
    pub conditional_formats: Vec<ConditionalFormat>,
    pub format: Option<String>,
    pub scale: Option<i64>,
    pub import_aliases: Option<String>,
    pub description: Option<String>,
    pub label: Option<String>,
    pub url: Option<String>,
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
    pub default_scale: Option<String>,
    pub default_value_type: Option<String>,
    pub disable_phi_level: Option<bool>,
}

impl FieldConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_type(mut self, data_type: PropertyType) -> Self {
        self.data_type = Some(data_type);
        self
    }
}

/// One column of a domain.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Server id; `None` (or zero) until the field has been saved.
    pub property_id: Option<i64>,
    pub name: String,
    pub property_uri: Option<String>,
    pub range_uri: String,
    pub concept_uri: Option<String>,
    pub data_type: PropertyType,
    pub required: bool,
    pub primary_key: bool,
    pub lock_type: LockState,
    pub lookup: Lookup,
    pub validators: FieldValidators,
    pub conditional_formats: Vec<ConditionalFormat>,
    pub format: Option<String>,
    pub scale: Option<i64>,
    pub import_aliases: Option<String>,
    pub description: Option<String>,
    pub label: Option<String>,
    pub url: Option<String>,
    pub phi: PhiLevel,
    pub measure: bool,
    pub dimension: bool,
    pub hidden: bool,
    pub mv_enabled: bool,
    pub shown_in_insert_view: bool,
    pub shown_in_update_view: bool,
    pub shown_in_details_view: bool,
    pub exclude_from_shifting: bool,
    pub recommended_variable: bool,
    pub default_scale: Option<String>,
    pub default_value_type: Option<String>,
    // Client-only state, never written to the wire.
    pub disable_phi_level: bool,
    pub updated: bool,
    pub visible: bool,
    original: OriginalType,
}

impl Field {
    /// Build a field from raw data.
    ///
    /// `apply_defaults` recomputes measure/dimension (and text scale) from the
    /// resolved type, as for a field the user just added. `mandatory` names
    /// promote unlocked fields to [`LockState::PartiallyLocked`].
    pub fn create(
        config: FieldConfig,
        apply_defaults: bool,
        mandatory: Option<&CaseInsensitiveSet>,
    ) -> Field {
        let resolved = resolve_data_type(&config);
        let explicit_type = config.data_type;
        let name = config.name.unwrap_or_default();
        let is_new = config.property_id.is_none_or(|id| id == 0);

        let mut data_type = resolved;
        let mut required = config.required.unwrap_or(false);
        let mut range_uri = config
            .range_uri
            .unwrap_or_else(|| resolved.range_uri().to_string());
        let mut concept_uri = config
            .concept_uri
            .filter(|uri| !uri.is_empty())
            .or_else(|| explicit_type.and_then(|ty| ty.concept_uri()).map(String::from));

        if is_new && names_match(&name, SAMPLE_ID_FIELD_NAME) {
            data_type = PropertyType::Sample;
            required = true;
            range_uri = PropertyType::Sample.range_uri().to_string();
            concept_uri = PropertyType::Sample.concept_uri().map(String::from);
        }

        let mut lookup = Lookup {
            schema: config.lookup_schema,
            query: config.lookup_query,
            container: config.lookup_container,
        };
        if explicit_type.is_some() {
            if lookup.schema.is_none() {
                lookup.schema = data_type.lookup_schema().map(String::from);
            }
            if lookup.query.is_none() {
                lookup.query = data_type.lookup_query().map(String::from);
            }
        }

        let is_mandatory = mandatory.is_some_and(|names| names.contains(&name));
        let lock_type = match config.lock_type {
            Some(explicit) if explicit != LockState::NotLocked => explicit,
            _ if is_mandatory => LockState::PartiallyLocked,
            _ => LockState::NotLocked,
        };

        let (measure, dimension) = if apply_defaults {
            (data_type.is_measure(), data_type.is_dimension())
        } else {
            (
                config.measure.unwrap_or(false),
                config.dimension.unwrap_or(false),
            )
        };
        let scale = match config.scale {
            None if apply_defaults && data_type.is_string() => Some(MAX_TEXT_LENGTH),
            other => other,
        };

        let original = OriginalType {
            data_type,
            concept_uri: concept_uri.clone(),
            range_uri: range_uri.clone(),
        };
        // Stored user references are plain ints.
        if data_type == PropertyType::Users && range_uri == INT_RANGE_URI {
            range_uri = USER_RANGE_URI.to_string();
        }

        Field {
            property_id: config.property_id,
            name,
            property_uri: config.property_uri,
            range_uri,
            concept_uri,
            data_type,
            required,
            primary_key: config.primary_key.unwrap_or(false),
            lock_type,
            lookup,
            validators: FieldValidators::from_flat(config.property_validators),
            conditional_formats: config.conditional_formats,
            format: config.format,
            scale,
            import_aliases: config.import_aliases,
            description: config.description,
            label: config.label,
            url: config.url,
            phi: config.phi.unwrap_or_default(),
            measure,
            dimension,
            hidden: config.hidden.unwrap_or(false),
            mv_enabled: config.mv_enabled.unwrap_or(false),
            shown_in_insert_view: config.shown_in_insert_view.unwrap_or(true),
            shown_in_update_view: config.shown_in_update_view.unwrap_or(true),
            shown_in_details_view: config.shown_in_details_view.unwrap_or(true),
            exclude_from_shifting: config.exclude_from_shifting.unwrap_or(false),
            recommended_variable: config.recommended_variable.unwrap_or(false),
            default_scale: config.default_scale,
            default_value_type: config.default_value_type,
            disable_phi_level: config.disable_phi_level.unwrap_or(false),
            updated: false,
            visible: true,
            original,
        }
    }

    /// Type information as loaded; anchors which type changes stay legal.
    pub fn original(&self) -> &OriginalType {
        &self.original
    }

    /// True until the server has assigned an id.
    pub fn is_new(&self) -> bool {
        !self.is_saved()
    }

    pub fn is_saved(&self) -> bool {
        self.property_id.is_some_and(|id| id != 0)
    }

    /// Current structural error, highest priority first.
    pub fn errors(&self) -> FieldErrors {
        if self.data_type.is_lookup() && !self.lookup.is_complete() {
            return FieldErrors::MissingSchemaQuery;
        }
        if self.range_uri.trim().is_empty() {
            return FieldErrors::MissingDataType;
        }
        if self.name.trim().is_empty() {
            return FieldErrors::MissingFieldName;
        }
        FieldErrors::None
    }

    pub fn has_errors(&self) -> bool {
        !self.errors().is_none()
    }

    /// Soft warning for names that are legal but awkward to reference.
    pub fn name_warning(&self) -> Option<&'static str> {
        let name = self.name.as_str();
        let mut chars = name.chars();
        let first = chars.next()?;
        let starts_well = first.is_alphabetic() || first == '_';
        let rest_ok = name
            .chars()
            .all(|ch| ch.is_alphanumeric() || ch == '_' || ch == ' ');
        if starts_well && rest_ok {
            None
        } else {
            Some(FIELD_NAME_WARNING)
        }
    }

    pub fn is_fully_locked(&self) -> bool {
        self.lock_type == LockState::FullyLocked
    }

    pub fn is_partially_locked(&self) -> bool {
        self.lock_type == LockState::PartiallyLocked
    }

    pub fn is_primary_key_locked(&self) -> bool {
        self.lock_type == LockState::PrimaryKeyLocked
    }

    /// Only unlocked fields may be deleted from a domain.
    pub fn can_remove(&self) -> bool {
        self.lock_type == LockState::NotLocked
    }

    /// `"<query>|<rangeURI>"` selector value for the lookup target picker.
    pub fn lookup_query_value(&self) -> Option<String> {
        if !self.data_type.carries_lookup_target() {
            return None;
        }
        let query = self.lookup.query.as_deref().filter(|q| !q.is_empty())?;
        Some(format!("{query}|{}", self.range_uri))
    }

    /// Type of the lookup key column.
    pub fn lookup_type(&self) -> Option<PropertyType> {
        if !self.data_type.carries_lookup_target() {
            return None;
        }
        match self.range_uri.as_str() {
            STRING_RANGE_URI => Some(PropertyType::Text),
            _ => Some(PropertyType::Integer),
        }
    }

    #[must_use]
    pub fn with_name(&self, name: impl Into<String>) -> Field {
        let mut next = self.clone();
        next.name = name.into();
        next.updated = true;
        next
    }

    #[must_use]
    pub fn with_required(&self, required: bool) -> Field {
        let mut next = self.clone();
        next.required = required;
        next.updated = true;
        next
    }

    /// Change the field's type, resetting everything that depends on it.
    ///
    /// Legality of the change is checked by
    /// [`crate::Domain::change_field_type`]; this only applies it.
    #[must_use]
    pub fn with_data_type(&self, data_type: PropertyType) -> Field {
        if data_type == self.data_type {
            return self.clone();
        }
        let mut next = self.clone();
        next.data_type = data_type;
        next.range_uri = data_type.range_uri().to_string();
        next.concept_uri = data_type.concept_uri().map(String::from);
        next.lookup = match (data_type.lookup_schema(), data_type.lookup_query()) {
            (Some(schema), Some(query)) => Lookup::new(schema, query),
            _ => Lookup::default(),
        };
        if !data_type.is_lookup() {
            next.validators.lookup = None;
        }
        next.scale = if data_type.is_string() {
            Some(MAX_TEXT_LENGTH)
        } else {
            None
        };
        next.measure = data_type.is_measure();
        next.dimension = data_type.is_dimension();
        if !data_type.is_mv_enableable() {
            next.mv_enabled = false;
        }
        next.updated = true;
        next
    }

    #[must_use]
    pub fn with_lookup(&self, lookup: Lookup) -> Field {
        let mut next = self.clone();
        next.lookup = lookup;
        next.updated = true;
        next
    }

    /// Apply a `"<query>|<rangeURI>"` selection from the lookup target picker.
    ///
    /// The key range becomes the field's range when it is a valid lookup
    /// key kind; otherwise the integer range is used.
    #[must_use]
    pub fn with_lookup_query_value(&self, value: &str) -> Field {
        let (query, range) = value.split_once('|').unwrap_or((value, INT_RANGE_URI));
        let mut next = self.clone();
        next.lookup.query = Some(query.to_string()).filter(|q| !q.is_empty());
        next.range_uri = if is_lookup_range(range) {
            range.to_string()
        } else {
            INT_RANGE_URI.to_string()
        };
        next.updated = true;
        next
    }

    #[must_use]
    pub fn with_validators(&self, validators: FieldValidators) -> Field {
        let mut next = self.clone();
        next.validators = validators;
        next.updated = true;
        next
    }

    #[must_use]
    pub fn with_conditional_formats(&self, formats: Vec<ConditionalFormat>) -> Field {
        let mut next = self.clone();
        next.conditional_formats = formats;
        next.updated = true;
        next
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}
