//! Validation exceptions and per-field error records.
//!
//! A [`ValidationException`] is either produced by client-side checks
//! ([`crate::Domain::validate`]) or parsed from a failed save
//! ([`ValidationException::create`]). Field errors reference fields by row
//! position in the owning domain's current field order.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::Domain;
use crate::names::names_match;

/// Separator between an assay sub-domain name and the message proper.
pub const DOMAIN_NAME_SEPARATOR: &str = " -- ";

/// Issue severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Severity {
    /// Blocks saving.
    #[default]
    Error,
    /// Shown to the user, does not block saving.
    #[serde(rename = "Warning")]
    Warn,
}

impl Severity {
    /// Parse severity from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" | "fatal" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warn => "Warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One error or warning about a field (or the whole domain).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub message: String,
    pub field_name: Option<String>,
    /// Server property id; only set for saved fields.
    pub property_id: Option<i64>,
    pub severity: Severity,
    /// Rows (positions in the domain's field list) this error applies to.
    pub row_indexes: Vec<usize>,
}

impl FieldError {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            field_name: None,
            property_id: None,
            severity,
            row_indexes: Vec::new(),
        }
    }

    #[must_use]
    pub fn for_field(mut self, name: impl Into<String>) -> Self {
        self.field_name = Some(name.into()).filter(|n: &String| !n.is_empty());
        self
    }

    #[must_use]
    pub fn with_property_id(mut self, property_id: Option<i64>) -> Self {
        self.property_id = property_id.filter(|id| *id >= 1);
        self
    }

    #[must_use]
    pub fn at_rows(mut self, rows: Vec<usize>) -> Self {
        self.row_indexes = rows;
        self
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warn
    }

    /// Neither a name nor a property id; matches fields that have neither.
    fn is_anonymous(&self) -> bool {
        self.property_id.is_none() && self.field_name.as_deref().is_none_or(str::is_empty)
    }
}

/// Aggregate error/warning report for a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationException {
    pub exception: String,
    pub severity: Severity,
    /// Sub-domain the exception belongs to, when the server prefixed one.
    pub domain_name: Option<String>,
    pub errors: Vec<FieldError>,
}

/// Identifier reported by the server for an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ErrorId {
    /// Numeric property id.
    Property(i64),
    /// The literal `"form"`: a whole-domain error.
    Form,
    /// Anything else, including absent.
    #[default]
    Unknown,
}

impl ErrorId {
    /// Property id, treating ids below 1 and `"form"` as absent.
    pub fn property_id(&self) -> Option<i64> {
        match self {
            ErrorId::Property(id) if *id >= 1 => Some(*id),
            _ => None,
        }
    }
}

/// One entry of a server error payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PayloadError {
    pub id: ErrorId,
    pub field: Option<String>,
    pub message: String,
    pub extra_info: Option<String>,
    pub severity: Option<String>,
}

/// Server response to a failed save.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExceptionPayload {
    pub exception: String,
    pub success: bool,
    pub errors: Vec<PayloadError>,
}

impl ValidationException {
    /// Client-side exception with the given errors.
    pub fn new(exception: impl Into<String>, severity: Severity, errors: Vec<FieldError>) -> Self {
        Self {
            exception: exception.into(),
            severity,
            domain_name: None,
            errors,
        }
    }

    /// Build an exception from a server payload.
    ///
    /// The overall severity drops to [`Severity::Warn`] when every contained
    /// error is a warning. A `"<domain> -- "` prefix on the exception message
    /// is recorded as [`ValidationException::domain_name`] and stripped from
    /// the exception and each error message.
    pub fn create(payload: &ExceptionPayload, default_severity: Severity) -> Self {
        let domain_name = payload
            .exception
            .split_once(DOMAIN_NAME_SEPARATOR)
            .map(|(prefix, _)| prefix.trim().to_string())
            .filter(|prefix| !prefix.is_empty());

        let errors: Vec<FieldError> = payload
            .errors
            .iter()
            .map(|raw| {
                let severity = match raw.severity.as_deref() {
                    None => default_severity,
                    Some(value) => Severity::parse(value).unwrap_or_else(|| {
                        warn!(severity = value, "unrecognized server error severity");
                        default_severity
                    }),
                };
                FieldError {
                    message: strip_domain_prefix(&raw.message, domain_name.as_deref()),
                    field_name: raw.field.clone().filter(|f| !f.is_empty()),
                    property_id: raw.id.property_id(),
                    severity,
                    row_indexes: Vec::new(),
                }
            })
            .collect();

        let severity = if !errors.is_empty() && errors.iter().all(FieldError::is_warning) {
            Severity::Warn
        } else {
            default_severity
        };

        Self {
            exception: strip_domain_prefix(&payload.exception, domain_name.as_deref()),
            severity,
            domain_name,
            errors,
        }
    }

    /// The same exception holding `errors` instead, or `None` when there are
    /// none left. An exception holding only warnings drops to
    /// [`Severity::Warn`].
    pub fn with_errors(&self, errors: Vec<FieldError>) -> Option<Self> {
        if errors.is_empty() {
            return None;
        }
        let severity = if errors.iter().all(FieldError::is_warning) {
            Severity::Warn
        } else {
            self.severity
        };
        Some(Self {
            severity,
            errors,
            ..self.clone()
        })
    }

    pub fn warnings(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter().filter(|error| error.is_warning())
    }

    pub fn error_count(&self) -> usize {
        self.errors.iter().filter(|error| !error.is_warning()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn has_errors(&self) -> bool {
        self.severity == Severity::Error || self.error_count() > 0
    }

    /// Errors attached to the field at `row`.
    pub fn errors_for_row(&self, row: usize) -> impl Iterator<Item = &FieldError> {
        self.errors
            .iter()
            .filter(move |error| error.row_indexes.contains(&row))
    }

    /// Resolve each error's rows against `domain`'s field list.
    ///
    /// A field matches an error when both carry the same saved property id,
    /// when their names are equal ignoring case, or when neither has a name
    /// or id (a freshly added field).
    #[must_use]
    pub fn add_row_indexes_to_errors(&self, domain: &Domain) -> Self {
        let mut next = self.clone();
        for error in &mut next.errors {
            error.row_indexes.clear();
        }
        for (row, field) in domain.fields.iter().enumerate() {
            let field_id = field.property_id.filter(|_| field.is_saved());
            let field_anonymous = field.name.is_empty() && field_id.is_none();
            for error in &mut next.errors {
                let id_match = field_id.is_some() && error.property_id == field_id;
                let name_match = !field.name.is_empty()
                    && error
                        .field_name
                        .as_deref()
                        .is_some_and(|name| names_match(name, &field.name));
                let anonymous_match = field_anonymous && error.is_anonymous();
                if id_match || name_match || anonymous_match {
                    error.row_indexes.push(row);
                }
            }
        }
        debug!(
            domain = %domain.name,
            errors = next.errors.len(),
            "attributed exception rows"
        );
        next
    }
}

/// Append `domain`'s existing warnings to `incoming`, skipping duplicates.
///
/// Server round trips only report what the server knows about; this keeps
/// client-side warnings alive across revalidation.
pub fn merge_warnings(domain: &Domain, incoming: ValidationException) -> ValidationException {
    let Some(existing) = domain.exception.as_ref() else {
        return incoming;
    };
    let mut merged = incoming;
    for warning in existing.warnings() {
        if !merged.errors.contains(warning) {
            merged.errors.push(warning.clone());
        }
    }
    merged
}

fn strip_domain_prefix(message: &str, domain_name: Option<&str>) -> String {
    let Some(domain_name) = domain_name else {
        return message.to_string();
    };
    message
        .split_once(DOMAIN_NAME_SEPARATOR)
        .filter(|(prefix, _)| prefix.trim() == domain_name)
        .map_or_else(|| message.to_string(), |(_, rest)| rest.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_error(id: ErrorId, field: &str, message: &str, severity: Option<&str>) -> PayloadError {
        PayloadError {
            id,
            field: Some(field.to_string()),
            message: message.to_string(),
            extra_info: None,
            severity: severity.map(String::from),
        }
    }

    #[test]
    fn warnings_only_payload_downgrades_severity() {
        let payload = ExceptionPayload {
            exception: "Check your fields".into(),
            success: false,
            errors: vec![
                payload_error(ErrorId::Property(3), "a", "odd", Some("Warning")),
                payload_error(ErrorId::Form, "b", "odder", Some("warn")),
            ],
        };
        let exception = ValidationException::create(&payload, Severity::Error);
        assert_eq!(exception.severity, Severity::Warn);
        assert_eq!(exception.errors[0].property_id, Some(3));
        assert_eq!(exception.errors[1].property_id, None);
        assert!(!exception.has_errors());
    }

    #[test]
    fn mixed_payload_keeps_default_severity() {
        let payload = ExceptionPayload {
            exception: "Bad".into(),
            success: false,
            errors: vec![
                payload_error(ErrorId::Property(0), "a", "odd", Some("Warning")),
                payload_error(ErrorId::Unknown, "b", "broken", None),
            ],
        };
        let exception = ValidationException::create(&payload, Severity::Error);
        assert_eq!(exception.severity, Severity::Error);
        assert_eq!(exception.errors[0].property_id, None);
        assert_eq!(exception.error_count(), 1);
        assert_eq!(exception.warning_count(), 1);
    }

    #[test]
    fn domain_prefix_is_stripped() {
        let payload = ExceptionPayload {
            exception: "Run Fields -- Duplicate field name 'x'".into(),
            success: false,
            errors: vec![payload_error(
                ErrorId::Form,
                "x",
                "Run Fields -- Duplicate field name 'x'",
                None,
            )],
        };
        let exception = ValidationException::create(&payload, Severity::Error);
        assert_eq!(exception.domain_name.as_deref(), Some("Run Fields"));
        assert_eq!(exception.exception, "Duplicate field name 'x'");
        assert_eq!(exception.errors[0].message, "Duplicate field name 'x'");
    }

    #[test]
    fn severity_parse_accepts_aliases() {
        assert_eq!(Severity::parse("WARNING"), Some(Severity::Warn));
        assert_eq!(Severity::parse("error"), Some(Severity::Error));
        assert_eq!(Severity::parse("info"), None);
    }
}
