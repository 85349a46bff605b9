//! Domain designer model.
//!
//! Holds an in-progress domain design and the rules around it:
//!
//! - [`PropertyType`]: the closed catalog of field storage kinds
//! - [`resolve_data_type`] / [`resolve_available_types`]: which type a field
//!   has and which types it may change into
//! - [`Field`] and [`Domain`]: immutable design state with editing operations
//! - [`ValidationException`]: client and server errors keyed to field rows,
//!   renumbered when fields move ([`compute_reindex_map`], [`apply_reindex`])
//!
//! Nothing here performs I/O; see the `designer-wire` crate for the JSON
//! shapes.

pub mod domain;
pub mod error;
pub mod exception;
pub mod field;
pub mod names;
pub mod property_type;
pub mod reindex;
pub mod resolve;
pub mod validator;

pub use domain::{
    Domain, DomainConfig, Index, MISSING_PROPERTIES_MESSAGE, NAME_WARNINGS_MESSAGE, Reordered,
    route_exception,
};
pub use error::{ModelError, Result};
pub use exception::{
    ErrorId, ExceptionPayload, FieldError, PayloadError, Severity, ValidationException,
    merge_warnings,
};
pub use field::{
    FIELD_NAME_WARNING, Field, FieldConfig, FieldErrors, LockState, Lookup, OriginalType,
    PhiLevel, SAMPLE_ID_FIELD_NAME,
};
pub use names::{CaseInsensitiveSet, names_match, normalize_name};
pub use property_type::{MAX_TEXT_LENGTH, PropertyType, UNLIMITED_TEXT_LENGTH};
pub use reindex::{ReindexMap, apply_reindex, compute_reindex_map, move_item, removal_map};
pub use resolve::{
    TypeOptions, acceptable_property_type, is_app_property_type, resolve_available_types,
    resolve_data_type,
};
pub use validator::{
    ConditionalFormat, FieldValidators, FormatFilter, PropertyValidator, ValidatorKind,
};
