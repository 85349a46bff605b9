//! Log file output. Kept in its own test binary since the subscriber is global.

use designer_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

#[test]
fn json_log_file_receives_workspace_events() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("designer.log");
    let config = LogConfig {
        use_env_filter: false,
        with_ansi: false,
        ..LogConfig::default()
    }
    .with_level(LevelFilter::DEBUG)
    .with_format(LogFormat::Json)
    .with_log_file(Some(path.clone()));
    init_logging(&config).unwrap();

    designer_wire::create_domain(serde_json::json!({"name": "Run Fields"})).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let line = content
        .lines()
        .find(|line| line.contains("loaded domain"))
        .unwrap();
    let event: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(event["level"], "DEBUG");
    assert_eq!(event["fields"]["domain"], "Run Fields");
}
