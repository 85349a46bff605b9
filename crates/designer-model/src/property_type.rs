//! Catalog of field property types.
//!
//! Every field resolves to exactly one [`PropertyType`]. The catalog has two
//! parts: the types a user may pick for a new field ([`PropertyType::CREATABLE`])
//! and legacy storage types that can arrive from the server but cannot be
//! chosen anymore ([`PropertyType::READ_ONLY`]).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Range URIs (storage kinds) understood by the remote service.
pub const STRING_RANGE_URI: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const MULTILINE_RANGE_URI: &str = "http://www.w3.org/2001/XMLSchema#multiLine";
pub const BOOLEAN_RANGE_URI: &str = "http://www.w3.org/2001/XMLSchema#boolean";
pub const INT_RANGE_URI: &str = "http://www.w3.org/2001/XMLSchema#int";
pub const DOUBLE_RANGE_URI: &str = "http://www.w3.org/2001/XMLSchema#double";
pub const DATETIME_RANGE_URI: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
pub const DATE_RANGE_URI: &str = "http://www.w3.org/2001/XMLSchema#date";
pub const TIME_RANGE_URI: &str = "http://www.w3.org/2001/XMLSchema#time";
pub const DECIMAL_RANGE_URI: &str = "http://www.w3.org/2001/XMLSchema#decimal";
pub const FLOAT_RANGE_URI: &str = "http://www.w3.org/2001/XMLSchema#float";
pub const LONG_RANGE_URI: &str = "http://www.w3.org/2001/XMLSchema#long";
pub const BINARY_RANGE_URI: &str = "http://www.w3.org/2001/XMLSchema#base64Binary";
pub const FILELINK_RANGE_URI: &str = "http://cpas.fhcrc.org/exp/xml#fileLink";
pub const ATTACHMENT_RANGE_URI: &str = "http://www.labkey.org/exp/xml#attachment";

/// Client-side range for user lookups; written back as [`INT_RANGE_URI`] on save.
pub const USER_RANGE_URI: &str = "http://www.labkey.org/exp/xml#int";

// Concept URIs distinguishing types that share a range.
pub const PARTICIPANTID_CONCEPT_URI: &str = "http://cpas.labkey.com/Study#ParticipantId";
pub const FLAG_CONCEPT_URI: &str = "http://www.labkey.org/exp/xml#flag";
pub const SAMPLE_TYPE_CONCEPT_URI: &str = "http://www.labkey.org/types#sample";

/// Default maximum length for new text fields.
pub const MAX_TEXT_LENGTH: i64 = 4000;
/// Scale value meaning "no length limit".
pub const UNLIMITED_TEXT_LENGTH: i64 = 2_147_483_647;

/// Fixed lookup target of the users type.
pub const USERS_LOOKUP_SCHEMA: &str = "core";
pub const USERS_LOOKUP_QUERY: &str = "users";

/// A field's storage kind.
///
/// Identity is the variant itself; [`PropertyType::name`] is the stable
/// catalog key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PropertyType {
    /// Single-line text.
    Text,
    /// Multi-line text.
    Multiline,
    Boolean,
    Integer,
    /// Double precision number (shown to users as "Decimal").
    Double,
    DateTime,
    /// Text flag column.
    Flag,
    /// Link to a file on the server file system.
    File,
    /// Uploaded attachment.
    Attachment,
    /// Lookup into the user table.
    Users,
    /// Study subject identifier.
    Participant,
    /// Lookup into an arbitrary schema/query.
    Lookup,
    /// Reference to a sample.
    Sample,

    // Legacy storage kinds, display only.
    Binary,
    Date,
    Time,
    /// Fixed-point decimal storage.
    LegacyDecimal,
    Float,
    Long,
}

impl PropertyType {
    /// Types offered when choosing the type of a field, in display order.
    pub const CREATABLE: &'static [PropertyType] = &[
        PropertyType::Text,
        PropertyType::Multiline,
        PropertyType::Boolean,
        PropertyType::Integer,
        PropertyType::Double,
        PropertyType::DateTime,
        PropertyType::Flag,
        PropertyType::File,
        PropertyType::Attachment,
        PropertyType::Users,
        PropertyType::Participant,
        PropertyType::Lookup,
        PropertyType::Sample,
    ];

    /// Types that may be loaded and displayed but never newly chosen.
    pub const READ_ONLY: &'static [PropertyType] = &[
        PropertyType::Binary,
        PropertyType::Date,
        PropertyType::Time,
        PropertyType::LegacyDecimal,
        PropertyType::Float,
        PropertyType::Long,
    ];

    /// Catalog key.
    pub fn name(&self) -> &'static str {
        match self {
            PropertyType::Text => "string",
            PropertyType::Multiline => "multiLine",
            PropertyType::Boolean => "boolean",
            PropertyType::Integer => "int",
            PropertyType::Double => "double",
            PropertyType::DateTime => "dateTime",
            PropertyType::Flag => "flag",
            PropertyType::File => "fileLink",
            PropertyType::Attachment => "attachment",
            PropertyType::Users => "users",
            PropertyType::Participant => "ParticipantId",
            PropertyType::Lookup => "lookup",
            PropertyType::Sample => "sample",
            PropertyType::Binary => "binary",
            PropertyType::Date => "date",
            PropertyType::Time => "time",
            PropertyType::LegacyDecimal => "decimal",
            PropertyType::Float => "float",
            PropertyType::Long => "long",
        }
    }

    /// Human-readable label.
    pub fn display(&self) -> &'static str {
        match self {
            PropertyType::Text => "Text",
            PropertyType::Multiline => "Multi-Line Text",
            PropertyType::Boolean => "Boolean",
            PropertyType::Integer => "Integer",
            PropertyType::Double => "Decimal",
            PropertyType::DateTime => "Date Time",
            PropertyType::Flag => "Flag",
            PropertyType::File => "File",
            PropertyType::Attachment => "Attachment",
            PropertyType::Users => "User",
            PropertyType::Participant => "Subject/Participant",
            PropertyType::Lookup => "Lookup",
            PropertyType::Sample => "Sample",
            PropertyType::Binary => "Binary",
            PropertyType::Date => "Date",
            PropertyType::Time => "Time",
            PropertyType::LegacyDecimal => "Decimal (legacy)",
            PropertyType::Float => "Float",
            PropertyType::Long => "Long Integer",
        }
    }

    pub fn range_uri(&self) -> &'static str {
        match self {
            PropertyType::Text | PropertyType::Flag | PropertyType::Participant => {
                STRING_RANGE_URI
            }
            PropertyType::Multiline => MULTILINE_RANGE_URI,
            PropertyType::Boolean => BOOLEAN_RANGE_URI,
            PropertyType::Integer | PropertyType::Lookup | PropertyType::Sample => INT_RANGE_URI,
            PropertyType::Double => DOUBLE_RANGE_URI,
            PropertyType::DateTime => DATETIME_RANGE_URI,
            PropertyType::File => FILELINK_RANGE_URI,
            PropertyType::Attachment => ATTACHMENT_RANGE_URI,
            PropertyType::Users => USER_RANGE_URI,
            PropertyType::Binary => BINARY_RANGE_URI,
            PropertyType::Date => DATE_RANGE_URI,
            PropertyType::Time => TIME_RANGE_URI,
            PropertyType::LegacyDecimal => DECIMAL_RANGE_URI,
            PropertyType::Float => FLOAT_RANGE_URI,
            PropertyType::Long => LONG_RANGE_URI,
        }
    }

    pub fn concept_uri(&self) -> Option<&'static str> {
        match self {
            PropertyType::Flag => Some(FLAG_CONCEPT_URI),
            PropertyType::Participant => Some(PARTICIPANTID_CONCEPT_URI),
            PropertyType::Sample => Some(SAMPLE_TYPE_CONCEPT_URI),
            _ => None,
        }
    }

    /// Second range a type may be stored with (lookups and samples keyed by text).
    pub fn alternate_range_uri(&self) -> Option<&'static str> {
        match self {
            PropertyType::Lookup | PropertyType::Sample => Some(STRING_RANGE_URI),
            _ => None,
        }
    }

    pub fn lookup_schema(&self) -> Option<&'static str> {
        match self {
            PropertyType::Users => Some(USERS_LOOKUP_SCHEMA),
            _ => None,
        }
    }

    pub fn lookup_query(&self) -> Option<&'static str> {
        match self {
            PropertyType::Users => Some(USERS_LOOKUP_QUERY),
            _ => None,
        }
    }

    /// Returns true for the user-chosen lookup type.
    pub fn is_lookup(&self) -> bool {
        matches!(self, PropertyType::Lookup)
    }

    /// Returns true for types that keep lookup schema/query/container on save.
    pub fn carries_lookup_target(&self) -> bool {
        matches!(
            self,
            PropertyType::Lookup | PropertyType::Users | PropertyType::Sample
        )
    }

    pub fn is_numeric(&self) -> bool {
        is_numeric_range(self.range_uri())
    }

    pub fn is_string(&self) -> bool {
        is_string_range(self.range_uri())
    }

    /// Default for the measure flag of a new field.
    pub fn is_measure(&self) -> bool {
        matches!(self, PropertyType::Integer | PropertyType::Double)
    }

    /// Default for the dimension flag of a new field.
    pub fn is_dimension(&self) -> bool {
        matches!(
            self,
            PropertyType::Lookup | PropertyType::Users | PropertyType::Sample
        )
    }

    /// Whether missing-value indicators may be enabled for this type.
    pub fn is_mv_enableable(&self) -> bool {
        !matches!(
            self,
            PropertyType::Flag
                | PropertyType::File
                | PropertyType::Attachment
                | PropertyType::Users
                | PropertyType::Sample
                | PropertyType::Binary
        )
    }

    pub fn is_file(&self) -> bool {
        matches!(self, PropertyType::File | PropertyType::Attachment)
    }

    pub fn is_creatable(&self) -> bool {
        Self::CREATABLE.contains(self)
    }

    /// Parse a catalog key (exact match first, then case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        let all = || Self::CREATABLE.iter().chain(Self::READ_ONLY).copied();
        all()
            .find(|ty| ty.name() == trimmed)
            .or_else(|| all().find(|ty| ty.name().eq_ignore_ascii_case(trimmed)))
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("Unknown property type: {s}"))
    }
}

impl TryFrom<String> for PropertyType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PropertyType> for String {
    fn from(value: PropertyType) -> Self {
        value.name().to_string()
    }
}

/// Integer, floating point and decimal storage kinds.
pub fn is_numeric_range(range_uri: &str) -> bool {
    matches!(
        range_uri,
        INT_RANGE_URI
            | DOUBLE_RANGE_URI
            | DECIMAL_RANGE_URI
            | FLOAT_RANGE_URI
            | LONG_RANGE_URI
    )
}

/// Single and multi-line text storage kinds.
pub fn is_string_range(range_uri: &str) -> bool {
    matches!(range_uri, STRING_RANGE_URI | MULTILINE_RANGE_URI)
}

/// Storage kinds a lookup can be keyed by.
pub fn is_lookup_range(range_uri: &str) -> bool {
    matches!(range_uri, INT_RANGE_URI | STRING_RANGE_URI)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for ty in PropertyType::CREATABLE.iter().chain(PropertyType::READ_ONLY) {
            assert_eq!(ty.name().parse::<PropertyType>().unwrap(), *ty);
        }
        assert_eq!(
            "MULTILINE".parse::<PropertyType>().unwrap(),
            PropertyType::Multiline
        );
        assert!("nope".parse::<PropertyType>().is_err());
    }

    #[test]
    fn catalogs_are_disjoint() {
        for ty in PropertyType::READ_ONLY {
            assert!(!ty.is_creatable());
        }
        assert_eq!(PropertyType::CREATABLE.len(), 13);
    }

    #[test]
    fn string_range_is_shared() {
        assert_eq!(PropertyType::Text.range_uri(), PropertyType::Flag.range_uri());
        assert_eq!(
            PropertyType::Text.range_uri(),
            PropertyType::Participant.range_uri()
        );
        assert_ne!(
            PropertyType::Flag.concept_uri(),
            PropertyType::Participant.concept_uri()
        );
    }

    #[test]
    fn measure_and_dimension_defaults() {
        assert!(PropertyType::Integer.is_measure());
        assert!(PropertyType::Double.is_measure());
        assert!(!PropertyType::Text.is_measure());
        assert!(PropertyType::Lookup.is_dimension());
        assert!(PropertyType::Users.is_dimension());
        assert!(PropertyType::Sample.is_dimension());
        assert!(!PropertyType::Integer.is_dimension());
    }
}
