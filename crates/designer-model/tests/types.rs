//! Type resolution and type-change legality.

use designer_model::property_type::{
    FILELINK_RANGE_URI, FLAG_CONCEPT_URI, INT_RANGE_URI, PARTICIPANTID_CONCEPT_URI,
    SAMPLE_TYPE_CONCEPT_URI, STRING_RANGE_URI,
};
use designer_model::{
    Field, FieldConfig, PropertyType, TypeOptions, resolve_available_types, resolve_data_type,
};

fn saved(config: FieldConfig) -> Field {
    Field::create(
        FieldConfig {
            property_id: Some(42),
            ..config
        },
        false,
        None,
    )
}

fn app_only() -> TypeOptions {
    TypeOptions {
        app_properties_only: true,
        show_file_property: true,
    }
}

#[test]
fn every_catalog_entry_resolves_back_to_itself() {
    for ty in PropertyType::CREATABLE.iter().chain(PropertyType::READ_ONLY) {
        let config = FieldConfig {
            range_uri: Some(ty.range_uri().to_string()),
            concept_uri: ty.concept_uri().map(String::from),
            lookup_query: match ty {
                PropertyType::Lookup => Some("Colors".to_string()),
                _ => ty.lookup_query().map(String::from),
            },
            ..FieldConfig::default()
        };
        assert_eq!(resolve_data_type(&config), *ty, "resolving {}", ty.name());
    }
}

#[test]
fn unmatched_combinations_fall_back_to_text() {
    let uris = [None, Some(STRING_RANGE_URI), Some("urn:custom")];
    for range in uris {
        for concept in [None, Some("urn:concept")] {
            let config = FieldConfig {
                range_uri: range.map(String::from),
                concept_uri: concept.map(String::from),
                ..FieldConfig::default()
            };
            assert_eq!(resolve_data_type(&config), PropertyType::Text);
        }
    }
}

#[test]
fn shared_string_range_is_split_by_concept() {
    let text = FieldConfig {
        range_uri: Some(STRING_RANGE_URI.to_string()),
        ..FieldConfig::default()
    };
    let participant = FieldConfig {
        concept_uri: Some(PARTICIPANTID_CONCEPT_URI.to_string()),
        ..text.clone()
    };
    let flag = FieldConfig {
        concept_uri: Some(FLAG_CONCEPT_URI.to_string()),
        ..text.clone()
    };
    assert_eq!(resolve_data_type(&text), PropertyType::Text);
    assert_eq!(resolve_data_type(&participant), PropertyType::Participant);
    assert_eq!(resolve_data_type(&flag), PropertyType::Flag);
}

#[test]
fn new_fields_get_the_whole_catalog() {
    let field = Field::create(FieldConfig::named("x"), true, None);
    let all = resolve_available_types(&field, PropertyType::CREATABLE, TypeOptions::default());
    assert_eq!(all, PropertyType::CREATABLE.to_vec());

    let app = resolve_available_types(&field, PropertyType::CREATABLE, app_only());
    for excluded in [
        PropertyType::Lookup,
        PropertyType::Participant,
        PropertyType::Flag,
        PropertyType::Attachment,
    ] {
        assert!(!app.contains(&excluded));
    }
    assert!(app.contains(&PropertyType::File));

    let no_file = TypeOptions {
        show_file_property: false,
        ..app_only()
    };
    let app = resolve_available_types(&field, PropertyType::CREATABLE, no_file);
    assert!(!app.contains(&PropertyType::File));
}

#[test]
fn saved_int_lookup_transitions() {
    let field = saved(FieldConfig {
        range_uri: Some(INT_RANGE_URI.to_string()),
        lookup_schema: Some("lists".to_string()),
        lookup_query: Some("Colors".to_string()),
        ..FieldConfig::named("Color")
    });
    assert_eq!(field.data_type, PropertyType::Lookup);
    let types = resolve_available_types(&field, PropertyType::CREATABLE, app_only());
    assert_eq!(
        types,
        vec![
            PropertyType::Integer,
            PropertyType::Double,
            PropertyType::Users,
            PropertyType::Lookup,
            PropertyType::Sample,
        ]
    );
}

#[test]
fn saved_string_lookup_transitions() {
    let field = saved(FieldConfig {
        range_uri: Some(STRING_RANGE_URI.to_string()),
        lookup_schema: Some("lists".to_string()),
        lookup_query: Some("Colors".to_string()),
        ..FieldConfig::named("Color")
    });
    let types = resolve_available_types(&field, PropertyType::CREATABLE, app_only());
    assert!(types.contains(&PropertyType::Text));
    assert!(types.contains(&PropertyType::Multiline));
    assert!(types.contains(&PropertyType::Users));
    assert!(types.contains(&PropertyType::Lookup));
    assert!(!types.contains(&PropertyType::Sample));
    assert!(!types.contains(&PropertyType::File));
    assert!(!types.contains(&PropertyType::Integer));
}

#[test]
fn saved_int_field_transitions() {
    let field = saved(FieldConfig {
        range_uri: Some(INT_RANGE_URI.to_string()),
        ..FieldConfig::named("Count")
    });
    let types = resolve_available_types(&field, PropertyType::CREATABLE, TypeOptions::default());
    assert_eq!(
        types,
        vec![
            PropertyType::Integer,
            PropertyType::Double,
            PropertyType::Users,
            PropertyType::Lookup,
            PropertyType::Sample,
        ]
    );
}

#[test]
fn original_range_anchors_transitions_after_a_change() {
    let field = saved(FieldConfig {
        range_uri: Some(INT_RANGE_URI.to_string()),
        ..FieldConfig::named("Count")
    })
    .with_data_type(PropertyType::Double);
    let types = resolve_available_types(&field, PropertyType::CREATABLE, TypeOptions::default());
    assert!(types.contains(&PropertyType::Sample));
    assert!(!types.contains(&PropertyType::Text));
}

#[test]
fn current_type_is_always_offered() {
    let legacy = saved(FieldConfig {
        range_uri: Some(designer_model::property_type::DATE_RANGE_URI.to_string()),
        ..FieldConfig::named("Visit Date")
    });
    assert_eq!(legacy.data_type, PropertyType::Date);
    let types = resolve_available_types(&legacy, PropertyType::CREATABLE, TypeOptions::default());
    assert_eq!(types.last(), Some(&PropertyType::Date));

    let file = saved(FieldConfig {
        range_uri: Some(FILELINK_RANGE_URI.to_string()),
        ..FieldConfig::named("Report")
    });
    let hidden = TypeOptions {
        show_file_property: false,
        ..app_only()
    };
    let types = resolve_available_types(&file, PropertyType::CREATABLE, hidden);
    assert_eq!(types, vec![PropertyType::File]);
}

#[test]
fn sample_concept_overrides_lookup_detection() {
    let config = FieldConfig {
        range_uri: Some(INT_RANGE_URI.to_string()),
        concept_uri: Some(SAMPLE_TYPE_CONCEPT_URI.to_string()),
        lookup_query: Some("Blood".to_string()),
        ..FieldConfig::default()
    };
    assert_eq!(resolve_data_type(&config), PropertyType::Sample);
}
