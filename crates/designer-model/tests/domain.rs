//! Domain editing, locking and validation.

use designer_model::{
    Domain, DomainConfig, FieldConfig, FieldError, LockState, MISSING_PROPERTIES_MESSAGE,
    ModelError, PropertyType, Severity, ValidationException,
};

fn named_domain(names: &[&str], mandatory: &[&str]) -> Domain {
    Domain::create(DomainConfig {
        name: Some("Results".to_string()),
        fields: names.iter().map(|name| FieldConfig::named(*name)).collect(),
        mandatory_field_names: mandatory.iter().map(|name| name.to_string()).collect(),
        ..DomainConfig::default()
    })
}

#[test]
fn mandatory_names_lock_fields_regardless_of_case() {
    let domain = named_domain(&["abc", "def"], &["abc", "DEF"]);
    assert!(
        domain
            .fields
            .iter()
            .all(|field| field.lock_type == LockState::PartiallyLocked)
    );

    let domain = named_domain(&["abc", "def"], &[]);
    assert!(
        domain
            .fields
            .iter()
            .all(|field| field.lock_type == LockState::NotLocked)
    );
}

#[test]
fn added_fields_pick_up_mandatory_locks() {
    let domain = named_domain(&[], &["Visit"]).add_field(Some(FieldConfig::named("VISIT")));
    assert_eq!(domain.fields[0].lock_type, LockState::PartiallyLocked);
    assert!(!domain.fields[0].can_remove());
}

#[test]
fn add_field_applies_defaults() {
    let domain = named_domain(&["a"], &[])
        .add_field(None)
        .add_field(Some(FieldConfig::named("Count").with_type(PropertyType::Integer)));
    assert_eq!(domain.fields.len(), 3);
    assert_eq!(domain.fields[1].data_type, PropertyType::Text);
    assert!(domain.fields[1].name.is_empty());
    assert!(domain.fields[2].measure);
    assert!(!domain.fields[2].dimension);
}

#[test]
fn validate_reports_invalid_rows() {
    let domain = named_domain(&["a", "", "c"], &[]).validate();
    let exception = domain.exception.as_ref().expect("exception attached");
    assert_eq!(exception.exception, MISSING_PROPERTIES_MESSAGE);
    assert_eq!(exception.severity, Severity::Error);
    assert_eq!(exception.errors.len(), 1);
    assert_eq!(exception.errors[0].row_indexes, vec![1]);
    assert_eq!(domain.invalid_fields().keys().copied().collect::<Vec<_>>(), vec![1]);
}

#[test]
fn validate_is_idempotent() {
    let mut domain = named_domain(&["a", "", "c"], &[]);
    domain.exception = Some(ValidationException::new(
        "warned",
        Severity::Warn,
        vec![FieldError::new("odd name", Severity::Warn).for_field("a").at_rows(vec![0])],
    ));
    let once = domain.validate();
    let twice = once.validate();
    assert_eq!(once.exception, twice.exception);
    assert_eq!(once.error_count(), 1);
    assert_eq!(once.warning_count(), 1);
}

#[test]
fn validate_clears_exception_when_fields_are_valid() {
    let domain = named_domain(&["a", ""], &[]).validate();
    assert!(domain.has_exception());
    let fixed = domain
        .replace_field(1, domain.fields[1].with_name("b"))
        .unwrap()
        .validate();
    assert!(!fixed.has_exception());
}

#[test]
fn remove_field_renumbers_errors() {
    let mut domain = named_domain(&["a", "b", "c", "d"], &[]);
    domain.exception = Some(ValidationException::new(
        "bad",
        Severity::Error,
        vec![
            FieldError::new("on b", Severity::Error).at_rows(vec![1]),
            FieldError::new("on d", Severity::Error).at_rows(vec![3]),
            FieldError::new("domain-wide", Severity::Error),
        ],
    ));

    let removed = domain.remove_field(1).unwrap();
    let names: Vec<_> = removed.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a", "c", "d"]);
    let exception = removed.exception.as_ref().unwrap();
    assert_eq!(exception.errors.len(), 2);
    assert_eq!(exception.errors[0].message, "on d");
    assert_eq!(exception.errors[0].row_indexes, vec![2]);
    assert!(exception.errors[1].row_indexes.is_empty());
}

#[test]
fn removing_the_last_erroring_field_clears_exception() {
    let mut domain = named_domain(&["a", "b"], &[]);
    domain.exception = Some(ValidationException::new(
        "bad",
        Severity::Error,
        vec![FieldError::new("on a", Severity::Error).at_rows(vec![0])],
    ));
    let removed = domain.remove_field(0).unwrap();
    assert!(removed.exception.is_none());
    assert_eq!(
        domain.remove_field(2),
        Err(ModelError::RowOutOfRange { index: 2, len: 2 })
    );
}

#[test]
fn removing_the_only_error_leaves_a_warning_exception() {
    let mut domain = named_domain(&["a", "b"], &[]);
    domain.exception = Some(ValidationException::new(
        "bad",
        Severity::Error,
        vec![
            FieldError::new("odd name", Severity::Warn).at_rows(vec![0]),
            FieldError::new("on b", Severity::Error).at_rows(vec![1]),
        ],
    ));
    assert_eq!(domain.error_count(), 1);

    let removed = domain.remove_field(1).unwrap();
    let exception = removed.exception.as_ref().unwrap();
    assert_eq!(exception.severity, Severity::Warn);
    assert_eq!(exception.errors.len(), 1);
    assert!(!exception.has_errors());
    assert_eq!(removed.error_count(), 0);
    assert_eq!(removed.warning_count(), 1);
}

#[test]
fn set_fields_clears_exception() {
    let domain = named_domain(&["a", ""], &[]).validate();
    let replaced = domain.set_fields(named_domain(&["x"], &[]).fields);
    assert!(replaced.exception.is_none());
    assert_eq!(replaced.fields[0].name, "x");
}

#[test]
fn operations_leave_input_untouched() {
    let domain = named_domain(&["a", "b"], &[]);
    let before = domain.clone();
    let _ = domain.add_field(None);
    let _ = domain.remove_field(0);
    let _ = domain.reorder(0, 1, None);
    let _ = domain.validate();
    assert_eq!(domain, before);
}
