//! The domain aggregate: an ordered list of fields plus domain metadata.
//!
//! Every editing operation returns a new [`Domain`]. Operations that change
//! field order or remove fields renumber the row references of any attached
//! [`ValidationException`] in the same call.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::error::{ModelError, Result};
use crate::exception::{FieldError, Severity, ValidationException, merge_warnings};
use crate::field::{FIELD_NAME_WARNING, Field, FieldConfig};
use crate::names::{CaseInsensitiveSet, names_match};
use crate::property_type::PropertyType;
use crate::reindex::{ReindexMap, apply_reindex, compute_reindex_map, permute, removal_map};
use crate::resolve::{TypeOptions, resolve_available_types};

/// Message of the exception attached by [`Domain::validate`].
pub const MISSING_PROPERTIES_MESSAGE: &str = "Missing required field properties";

/// Message of the exception attached by [`Domain::check_field_names`] when
/// the domain had none.
pub const NAME_WARNINGS_MESSAGE: &str = "Some field names may be hard to use from code";

/// A database index over one or more fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    pub column_names: Vec<String>,
    pub unique: bool,
}

/// Raw domain data accepted by [`Domain::create`].
#[derive(Debug, Clone, PartialEq)]
pub struct DomainConfig {
    pub domain_id: Option<i64>,
    pub domain_uri: Option<String>,
    pub name: Option<String>,
    pub container: Option<String>,
    pub description: Option<String>,
    pub fields: Vec<FieldConfig>,
    pub indices: Vec<Index>,
    pub mandatory_field_names: Vec<String>,
    pub allow_file_link_properties: bool,
    pub allow_attachment_properties: bool,
    pub allow_flag_properties: bool,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            domain_id: None,
            domain_uri: None,
            name: None,
            container: None,
            description: None,
            fields: Vec::new(),
            indices: Vec::new(),
            mandatory_field_names: Vec::new(),
            allow_file_link_properties: false,
            allow_attachment_properties: false,
            allow_flag_properties: true,
        }
    }
}

/// A domain being designed.
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    pub domain_id: Option<i64>,
    pub domain_uri: Option<String>,
    pub name: String,
    /// Container the domain is defined in.
    pub container: Option<String>,
    pub description: Option<String>,
    /// Canonical row order; error row references index into this list.
    pub fields: Vec<Field>,
    pub indices: Vec<Index>,
    pub exception: Option<ValidationException>,
    pub mandatory_field_names: CaseInsensitiveSet,
    pub allow_file_link_properties: bool,
    pub allow_attachment_properties: bool,
    pub allow_flag_properties: bool,
}

/// Result of [`Domain::reorder`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reordered {
    pub domain: Domain,
    /// New position of the previously expanded row.
    pub expanded: Option<usize>,
}

impl Domain {
    /// Build a domain from raw data. Fields are created as loaded, without
    /// recomputing defaults.
    pub fn create(config: DomainConfig) -> Domain {
        let mandatory_field_names = CaseInsensitiveSet::new(&config.mandatory_field_names);
        let fields = config
            .fields
            .into_iter()
            .map(|field| Field::create(field, false, Some(&mandatory_field_names)))
            .collect();
        Domain {
            domain_id: config.domain_id,
            domain_uri: config.domain_uri,
            name: config.name.unwrap_or_default(),
            container: config.container,
            description: config.description,
            fields,
            indices: config.indices,
            exception: None,
            mandatory_field_names,
            allow_file_link_properties: config.allow_file_link_properties,
            allow_attachment_properties: config.allow_attachment_properties,
            allow_flag_properties: config.allow_flag_properties,
        }
    }

    /// Creatable types this domain permits.
    pub fn available_types(&self) -> Vec<PropertyType> {
        PropertyType::CREATABLE
            .iter()
            .copied()
            .filter(|ty| match ty {
                PropertyType::File => self.allow_file_link_properties,
                PropertyType::Attachment => self.allow_attachment_properties,
                PropertyType::Flag => self.allow_flag_properties,
                _ => true,
            })
            .collect()
    }

    /// Types the field at `index` may be switched to.
    pub fn field_type_options(&self, index: usize, options: TypeOptions) -> Result<Vec<PropertyType>> {
        let field = self.field(index)?;
        Ok(resolve_available_types(field, &self.available_types(), options))
    }

    pub fn field(&self, index: usize) -> Result<&Field> {
        self.fields.get(index).ok_or(ModelError::RowOutOfRange {
            index,
            len: self.fields.len(),
        })
    }

    /// Row of the field named `name`, ignoring case.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|field| names_match(&field.name, name))
    }

    /// Append a new field, seeded by `config` when given.
    #[must_use]
    pub fn add_field(&self, config: Option<FieldConfig>) -> Domain {
        let field = Field::create(
            config.unwrap_or_default(),
            true,
            Some(&self.mandatory_field_names),
        );
        debug!(domain = %self.name, field = %field.name, "added field");
        let mut next = self.clone();
        next.fields.push(field);
        next
    }

    /// Remove the field at `index`.
    ///
    /// Error rows after the removed row shift down by one. References to the
    /// removed row are dropped, as are errors left with no rows. The
    /// exception is cleared once it has no errors and drops to a warning once
    /// only warnings remain.
    pub fn remove_field(&self, index: usize) -> Result<Domain> {
        let map = removal_map(self.fields.len(), index)?;
        let mut next = self.clone();
        let removed = next.fields.remove(index);
        next.exception = self.exception.as_ref().and_then(|exception| {
            let errors: Vec<FieldError> = apply_reindex(&exception.errors, &map)
                .into_iter()
                .zip(&exception.errors)
                .filter(|(after, before)| before.row_indexes.is_empty() || !after.row_indexes.is_empty())
                .map(|(after, _)| after)
                .collect();
            exception.with_errors(errors)
        });
        debug!(domain = %self.name, field = %removed.name, index, "removed field");
        Ok(next)
    }

    /// Replace the whole field list. Any attached exception is cleared.
    #[must_use]
    pub fn set_fields(&self, fields: Vec<Field>) -> Domain {
        let mut next = self.clone();
        next.fields = fields;
        next.exception = None;
        next
    }

    pub fn replace_field(&self, index: usize, field: Field) -> Result<Domain> {
        self.field(index)?;
        let mut next = self.clone();
        next.fields[index] = field;
        Ok(next)
    }

    /// Change the type of the field at `index`, if that type is offered.
    pub fn change_field_type(
        &self,
        index: usize,
        data_type: PropertyType,
        options: TypeOptions,
    ) -> Result<Domain> {
        let field = self.field(index)?;
        if !self.field_type_options(index, options)?.contains(&data_type) {
            return Err(ModelError::IllegalTypeChange {
                field: field.name.clone(),
                from: field.data_type,
                to: data_type,
            });
        }
        self.replace_field(index, field.with_data_type(data_type))
    }

    /// Fields with a structural error, keyed by row.
    pub fn invalid_fields(&self) -> BTreeMap<usize, &Field> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.has_errors())
            .collect()
    }

    /// Attach a client-side exception listing every invalid field, keeping
    /// prior warnings; clear the exception when every field is valid.
    #[must_use]
    pub fn validate(&self) -> Domain {
        let invalid = self.invalid_fields();
        let mut next = self.clone();
        if invalid.is_empty() {
            next.exception = None;
            info!(domain = %self.name, fields = self.fields.len(), "domain is valid");
            return next;
        }

        let errors = invalid
            .iter()
            .map(|(row, field)| {
                FieldError::new(field.errors().message(), Severity::Error)
                    .for_field(field.name.clone())
                    .with_property_id(field.property_id)
                    .at_rows(vec![*row])
            })
            .collect();
        let exception = ValidationException::new(MISSING_PROPERTIES_MESSAGE, Severity::Error, errors);
        next.exception = Some(merge_warnings(self, exception));
        info!(
            domain = %self.name,
            invalid = invalid.len(),
            "domain has invalid fields"
        );
        next
    }

    /// Refresh the soft warnings for awkward field names.
    #[must_use]
    pub fn check_field_names(&self) -> Domain {
        let warnings: Vec<FieldError> = self
            .fields
            .iter()
            .enumerate()
            .filter_map(|(row, field)| {
                field.name_warning().map(|message| {
                    FieldError::new(message, Severity::Warn)
                        .for_field(field.name.clone())
                        .with_property_id(field.property_id)
                        .at_rows(vec![row])
                })
            })
            .collect();

        let mut next = self.clone();
        next.exception = match self.exception.clone() {
            Some(mut exception) => {
                exception
                    .errors
                    .retain(|error| error.message != FIELD_NAME_WARNING);
                exception.errors.extend(warnings);
                (!exception.errors.is_empty()).then_some(exception)
            }
            None if warnings.is_empty() => None,
            None => Some(ValidationException::new(
                NAME_WARNINGS_MESSAGE,
                Severity::Warn,
                warnings,
            )),
        };
        next
    }

    /// Move the field at `source` to `dest`.
    ///
    /// Error row references and the `expanded` row follow their fields.
    pub fn reorder(&self, source: usize, dest: usize, expanded: Option<usize>) -> Result<Reordered> {
        let map = compute_reindex_map(self.fields.len(), source, dest)?;
        let mut domain = self.clone();
        domain.fields = permute(&self.fields, &map);
        domain.exception = self
            .exception
            .as_ref()
            .map(|exception| reindex_exception(exception, &map));
        let expanded = expanded.map(|row| map.get(&row).copied().unwrap_or(row));
        debug!(domain = %self.name, source, dest, ?expanded, "reordered fields");
        Ok(Reordered { domain, expanded })
    }

    /// Attach a server exception: rows are attributed against this domain
    /// and existing warnings are kept.
    #[must_use]
    pub fn attach_server_exception(&self, exception: &ValidationException) -> Domain {
        let attributed = exception.add_row_indexes_to_errors(self);
        let mut next = self.clone();
        next.exception = Some(merge_warnings(self, attributed));
        next
    }

    /// Drop the attached exception, e.g. after a successful save.
    #[must_use]
    pub fn clear_exception(&self) -> Domain {
        let mut next = self.clone();
        next.exception = None;
        next
    }

    pub fn has_exception(&self) -> bool {
        self.exception.is_some()
    }

    pub fn error_count(&self) -> usize {
        self.exception
            .as_ref()
            .map_or(0, ValidationException::error_count)
    }

    pub fn warning_count(&self) -> usize {
        self.exception
            .as_ref()
            .map_or(0, ValidationException::warning_count)
    }

    /// Whether the domain lives in a container other than `current_container`.
    pub fn is_shared(&self, current_container: &str) -> bool {
        self.container
            .as_deref()
            .is_some_and(|container| container != current_container)
    }
}

/// Attach `exception` to the domain it names, or to the first domain.
///
/// Assay designs save several domains at once; the server prefixes its
/// message with the name of the domain that failed.
pub fn route_exception(domains: &[Domain], exception: &ValidationException) -> Vec<Domain> {
    let target = exception
        .domain_name
        .as_deref()
        .and_then(|name| domains.iter().position(|domain| names_match(&domain.name, name)))
        .unwrap_or(0);
    debug!(
        domain_name = ?exception.domain_name,
        target,
        "routing server exception"
    );
    domains
        .iter()
        .enumerate()
        .map(|(row, domain)| {
            if row == target {
                domain.attach_server_exception(exception)
            } else {
                domain.clone()
            }
        })
        .collect()
}

fn reindex_exception(exception: &ValidationException, map: &ReindexMap) -> ValidationException {
    ValidationException {
        errors: apply_reindex(&exception.errors, map),
        ..exception.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain(names: &[&str]) -> Domain {
        Domain::create(DomainConfig {
            name: Some("Results".into()),
            fields: names.iter().map(|name| FieldConfig::named(*name)).collect(),
            ..DomainConfig::default()
        })
    }

    #[test]
    fn available_types_follow_allow_flags() {
        let mut d = domain(&[]);
        assert!(!d.available_types().contains(&PropertyType::File));
        assert!(d.available_types().contains(&PropertyType::Flag));
        d.allow_file_link_properties = true;
        d.allow_flag_properties = false;
        assert!(d.available_types().contains(&PropertyType::File));
        assert!(!d.available_types().contains(&PropertyType::Flag));
    }

    #[test]
    fn shared_domains_live_elsewhere() {
        let mut d = domain(&["a"]);
        assert!(!d.is_shared("/home"));
        d.container = Some("/shared".into());
        assert!(d.is_shared("/home"));
        assert!(!d.is_shared("/shared"));
    }

    #[test]
    fn name_warnings_replace_previous_ones() {
        let d = domain(&["ok", "bad-name"]).check_field_names();
        let exception = d.exception.as_ref().unwrap();
        assert_eq!(exception.severity, Severity::Warn);
        assert_eq!(exception.errors.len(), 1);
        assert_eq!(exception.errors[0].row_indexes, vec![1]);

        let fixed = d
            .replace_field(1, d.fields[1].with_name("good_name"))
            .unwrap()
            .check_field_names();
        assert!(fixed.exception.is_none());
    }

    #[test]
    fn change_field_type_rejects_illegal_transitions() {
        let d = Domain::create(DomainConfig {
            fields: vec![FieldConfig {
                property_id: Some(7),
                ..FieldConfig::named("Weight").with_type(PropertyType::Double)
            }],
            ..DomainConfig::default()
        });
        let err = d
            .change_field_type(0, PropertyType::Text, TypeOptions::default())
            .unwrap_err();
        assert!(matches!(err, ModelError::IllegalTypeChange { .. }));
        let changed = d
            .change_field_type(0, PropertyType::Integer, TypeOptions::default())
            .unwrap();
        assert_eq!(changed.fields[0].data_type, PropertyType::Integer);
        assert_eq!(d.fields[0].data_type, PropertyType::Double);
    }

    #[test]
    fn field_index_ignores_case() {
        let d = domain(&["Alpha", "Beta"]);
        assert_eq!(d.field_index("BETA"), Some(1));
        assert_eq!(d.field_index("gamma"), None);
    }
}
