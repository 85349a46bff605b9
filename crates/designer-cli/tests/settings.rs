//! Settings files as users write them.

use designer_cli::settings::DesignerSettings;
use std::io::Write;

#[test]
fn reads_a_full_settings_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
app_properties_only = true
show_file_property = false
current_container = "/home/project"
mandatory_field_names = ["ParticipantID", "Date"]
"#
    )
    .unwrap();

    let settings = DesignerSettings::load(file.path()).unwrap();
    assert!(settings.app_properties_only);
    assert!(!settings.show_file_property);
    assert_eq!(settings.current_container.as_deref(), Some("/home/project"));
    assert_eq!(settings.mandatory_field_names, vec!["ParticipantID", "Date"]);
}

#[test]
fn missing_keys_take_defaults() {
    let settings = DesignerSettings::from_toml_str("app_properties_only = true").unwrap();
    assert!(settings.app_properties_only);
    assert!(settings.show_file_property);
    assert!(settings.current_container.is_none());
    assert!(settings.mandatory_field_names.is_empty());
}

#[test]
fn no_path_means_defaults() {
    let settings = DesignerSettings::load_or_default(None).unwrap();
    assert_eq!(settings, DesignerSettings::default());
}

#[test]
fn bad_files_report_the_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "app_properties_only = \"sometimes\"").unwrap();
    let error = DesignerSettings::load(file.path()).unwrap_err();
    assert!(format!("{error:#}").contains(&file.path().display().to_string()));

    let missing = file.path().with_extension("absent");
    assert!(DesignerSettings::load_or_default(Some(&missing)).is_err());
}
