//! Server exception parsing, attribution and warning persistence.

use designer_model::{
    Domain, DomainConfig, ErrorId, ExceptionPayload, FieldConfig, FieldError, PayloadError,
    Severity, ValidationException, merge_warnings, route_exception,
};

fn payload(exception: &str, errors: Vec<PayloadError>) -> ExceptionPayload {
    ExceptionPayload {
        exception: exception.to_string(),
        success: false,
        errors,
    }
}

fn error_for(id: ErrorId, field: Option<&str>, message: &str) -> PayloadError {
    PayloadError {
        id,
        field: field.map(String::from),
        message: message.to_string(),
        ..PayloadError::default()
    }
}

fn saved_domain(name: &str) -> Domain {
    Domain::create(DomainConfig {
        name: Some(name.to_string()),
        fields: vec![
            FieldConfig {
                property_id: Some(10),
                ..FieldConfig::named("Weight")
            },
            FieldConfig {
                property_id: Some(11),
                ..FieldConfig::named("Height")
            },
        ],
        ..DomainConfig::default()
    })
}

#[test]
fn merge_keeps_client_warnings() {
    let mut domain = saved_domain("Results");
    let warning = FieldError::new("name has spaces", Severity::Warn)
        .for_field("Weight")
        .at_rows(vec![0]);
    domain.exception = Some(ValidationException::new(
        "warned",
        Severity::Warn,
        vec![warning.clone()],
    ));

    let incoming = ValidationException::create(
        &payload("Save failed", vec![error_for(ErrorId::Property(11), None, "too tall")]),
        Severity::Error,
    );
    let merged = merge_warnings(&domain, incoming);
    assert_eq!(merged.severity, Severity::Error);
    assert_eq!(merged.errors.len(), 2);
    assert_eq!(merged.errors[0].message, "too tall");
    assert_eq!(merged.errors[1], warning);
}

#[test]
fn merge_without_existing_exception_passes_through() {
    let domain = saved_domain("Results");
    let incoming = ValidationException::new("x", Severity::Error, vec![]);
    assert_eq!(merge_warnings(&domain, incoming.clone()), incoming);
}

#[test]
fn rows_are_attributed_by_id_name_and_anonymity() {
    let domain = saved_domain("Results").add_field(None);
    let exception = ValidationException::create(
        &payload(
            "Save failed",
            vec![
                error_for(ErrorId::Property(11), None, "by id"),
                error_for(ErrorId::Form, Some("WEIGHT"), "by name"),
                error_for(ErrorId::Property(0), None, "anonymous"),
                error_for(ErrorId::Property(99), Some("missing"), "unmatched"),
            ],
        ),
        Severity::Error,
    );
    let attributed = exception.add_row_indexes_to_errors(&domain);
    let rows: Vec<Vec<usize>> = attributed
        .errors
        .iter()
        .map(|error| error.row_indexes.clone())
        .collect();
    assert_eq!(rows, vec![vec![1], vec![0], vec![2], vec![]]);
    assert_eq!(attributed.errors_for_row(2).count(), 1);
}

#[test]
fn new_fields_never_match_by_id() {
    let domain = Domain::create(DomainConfig {
        fields: vec![FieldConfig {
            property_id: Some(0),
            ..FieldConfig::named("Draft")
        }],
        ..DomainConfig::default()
    });
    let exception = ValidationException::create(
        &payload("bad", vec![error_for(ErrorId::Property(0), Some("other"), "x")]),
        Severity::Error,
    );
    let attributed = exception.add_row_indexes_to_errors(&domain);
    assert!(attributed.errors[0].row_indexes.is_empty());
}

#[test]
fn routing_targets_the_named_sub_domain() {
    let domains = vec![saved_domain("Batch Fields"), saved_domain("Run Fields")];
    let exception = ValidationException::create(
        &payload(
            "Run Fields -- Field 'Height' is invalid",
            vec![error_for(
                ErrorId::Property(11),
                Some("Height"),
                "Run Fields -- Field 'Height' is invalid",
            )],
        ),
        Severity::Error,
    );

    let routed = route_exception(&domains, &exception);
    assert!(routed[0].exception.is_none());
    let attached = routed[1].exception.as_ref().unwrap();
    assert_eq!(attached.exception, "Field 'Height' is invalid");
    assert_eq!(attached.errors[0].message, "Field 'Height' is invalid");
    assert_eq!(attached.errors[0].row_indexes, vec![1]);
}

#[test]
fn routing_falls_back_to_the_first_domain() {
    let domains = vec![saved_domain("Batch Fields"), saved_domain("Run Fields")];
    let exception = ValidationException::create(
        &payload("Something went wrong", vec![]),
        Severity::Error,
    );
    let routed = route_exception(&domains, &exception);
    assert!(routed[0].has_exception());
    assert!(!routed[1].has_exception());
    assert!(route_exception(&[], &exception).is_empty());
}
