//! Entry points for turning service JSON into model values and back.

use serde_json::Value;
use tracing::debug;

use designer_model::{Domain, ExceptionPayload, Field, Severity, ValidationException};

use crate::error::Result;
use crate::types::{RawDomain, RawExceptionPayload, RawField};

/// Build a [`Domain`] from a service payload.
///
/// This is the only way service data becomes a domain; a domain returned by
/// a successful save must come back through here too.
pub fn create_domain(value: Value) -> Result<Domain> {
    let raw: RawDomain = serde_json::from_value(value)?;
    let domain = Domain::create(raw.into());
    debug!(
        domain = %domain.name,
        fields = domain.fields.len(),
        "loaded domain"
    );
    Ok(domain)
}

/// [`create_domain`] over JSON text.
pub fn create_domain_from_str(json: &str) -> Result<Domain> {
    let raw: RawDomain = serde_json::from_str(json)?;
    Ok(Domain::create(raw.into()))
}

/// Service payload for `domain`. The attached exception is never written.
pub fn serialize_domain(domain: &Domain) -> Result<Value> {
    Ok(serde_json::to_value(RawDomain::from(domain))?)
}

/// Service payload for a single field.
pub fn serialize_field(field: &Field) -> Result<Value> {
    Ok(serde_json::to_value(RawField::from(field))?)
}

/// Parse the body of a failed save into a [`ValidationException`].
///
/// Rows are not attributed yet; see
/// [`ValidationException::add_row_indexes_to_errors`] or
/// [`designer_model::route_exception`].
pub fn create_exception(value: Value, default_severity: Severity) -> Result<ValidationException> {
    let raw: RawExceptionPayload = serde_json::from_value(value)?;
    let payload = ExceptionPayload::from(raw);
    let exception = ValidationException::create(&payload, default_severity);
    debug!(
        errors = exception.errors.len(),
        severity = %exception.severity,
        domain_name = ?exception.domain_name,
        "parsed server exception"
    );
    Ok(exception)
}
