//! Property validators and conditional formats attached to a field.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use tracing::warn;

/// Validator kind, as spelled by the service.
///
/// Kinds the editor has no panel for are kept as [`ValidatorKind::Other`]
/// and passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValidatorKind {
    Range,
    Regex,
    Lookup,
    Other(String),
}

impl ValidatorKind {
    /// Parse a wire `type`, ignoring case for the known kinds.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "range" => ValidatorKind::Range,
            "regex" => ValidatorKind::Regex,
            "lookup" => ValidatorKind::Lookup,
            _ => ValidatorKind::Other(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ValidatorKind::Range => "Range",
            ValidatorKind::Regex => "RegEx",
            ValidatorKind::Lookup => "Lookup",
            ValidatorKind::Other(kind) => kind,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ValidatorKind::Other(_))
    }
}

impl fmt::Display for ValidatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single value constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyValidator {
    pub kind: ValidatorKind,
    /// Server row id; `None` for validators created in this session.
    pub row_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub error_message: Option<String>,
    /// Range or pattern expression. Unused by lookup validators.
    pub expression: Option<String>,
    /// Regex validators: fail when the value matches instead of when it doesn't.
    pub fail_on_match: bool,
    /// Remaining validator properties, passed through untouched.
    pub properties: BTreeMap<String, Value>,
}

impl PropertyValidator {
    pub fn new(kind: ValidatorKind) -> Self {
        Self {
            kind,
            row_id: None,
            name: None,
            description: None,
            error_message: None,
            expression: None,
            fail_on_match: false,
            properties: BTreeMap::new(),
        }
    }

    /// Range validator with the given expression.
    pub fn range(expression: impl Into<String>) -> Self {
        Self {
            expression: Some(expression.into()),
            ..Self::new(ValidatorKind::Range)
        }
    }

    /// Pattern validator with the given expression.
    pub fn regex(expression: impl Into<String>) -> Self {
        Self {
            expression: Some(expression.into()),
            ..Self::new(ValidatorKind::Regex)
        }
    }

    /// "Value must exist in the lookup target" validator.
    pub fn lookup() -> Self {
        Self::new(ValidatorKind::Lookup)
    }
}

/// Validators grouped by kind, as the editor presents them.
///
/// The wire format carries one flat list; [`FieldValidators::from_flat`] and
/// [`FieldValidators::flatten`] convert between the two. Flattening emits
/// range validators, then pattern validators, then the lookup validator,
/// then validators of other kinds in their original order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValidators {
    pub range: Vec<PropertyValidator>,
    pub regex: Vec<PropertyValidator>,
    pub lookup: Option<PropertyValidator>,
    /// Kinds without an editor panel.
    pub other: Vec<PropertyValidator>,
}

impl FieldValidators {
    /// Split a flat list by kind. A field has at most one lookup validator;
    /// later ones are dropped with a warning.
    pub fn from_flat(validators: impl IntoIterator<Item = PropertyValidator>) -> Self {
        let mut grouped = FieldValidators::default();
        for validator in validators {
            match validator.kind {
                ValidatorKind::Range => grouped.range.push(validator),
                ValidatorKind::Regex => grouped.regex.push(validator),
                ValidatorKind::Lookup if grouped.lookup.is_some() => {
                    warn!(
                        name = ?validator.name,
                        row_id = ?validator.row_id,
                        "dropping extra lookup validator"
                    );
                }
                ValidatorKind::Lookup => grouped.lookup = Some(validator),
                ValidatorKind::Other(_) => grouped.other.push(validator),
            }
        }
        grouped
    }

    pub fn flatten(&self) -> Vec<PropertyValidator> {
        self.range
            .iter()
            .chain(self.regex.iter())
            .chain(self.lookup.iter())
            .chain(self.other.iter())
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.range.len() + self.regex.len() + usize::from(self.lookup.is_some()) + self.other.len()
    }
}

/// Row filter a conditional format applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormatFilter {
    /// Applies to every non-empty value; written as an empty filter.
    #[default]
    AnyValue,
    /// Encoded filter expression, e.g. `format.column~gt=10`.
    Expression(String),
}

impl FormatFilter {
    /// Parse the wire filter string; blank means [`FormatFilter::AnyValue`].
    pub fn from_wire(filter: Option<&str>) -> Self {
        match filter.map(str::trim) {
            Some(expression) if !expression.is_empty() => {
                FormatFilter::Expression(expression.to_string())
            }
            _ => FormatFilter::AnyValue,
        }
    }

    pub fn to_wire(&self) -> &str {
        match self {
            FormatFilter::AnyValue => "",
            FormatFilter::Expression(expression) => expression,
        }
    }
}

/// Display style applied when a value matches a filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionalFormat {
    pub filter: FormatFilter,
    pub text_color: Option<String>,
    pub background_color: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
}
