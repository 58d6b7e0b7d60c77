//! File-based configuration round trips

use panel_charts_config::{ConfigError, ConfigParser, ConfigSerializer, TransformConfig};
use panel_charts_shared::{DisplayConfig, FieldMapping, UnitPosition};
use std::fs;
use tempfile::TempDir;

fn sample_config() -> TransformConfig {
    let mapping = FieldMapping::new("__timestamp", "requests").with_series_field("region");
    TransformConfig::with_mapping(mapping).with_display(DisplayConfig {
        unit: Some("$".to_string()),
        decimals: Some(2),
        label: Some("Revenue".to_string()),
        unit_position: UnitPosition::Prefix,
    })
}

#[test]
fn test_round_trip_every_format() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = TempDir::new().unwrap();
    let config = sample_config();

    for name in ["panel.yaml", "panel.yml", "panel.json", "panel.toml"] {
        let path = dir.path().join(name);
        ConfigSerializer::serialize_file(&config, &path).unwrap();
        let loaded = ConfigParser::parse_file(&path).unwrap();
        assert_eq!(loaded, config, "round trip through {name}");
    }
}

#[test]
fn test_hand_written_json_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("panel.json");
    fs::write(
        &path,
        r#"{ "mapping": { "yField": "latency_ms" }, "display": { "unit": "ms" } }"#,
    )
    .unwrap();

    let config = ConfigParser::parse_file(&path).unwrap();
    assert!(config.mapping.x_field.is_none());
    assert_eq!(config.mapping.y_field.as_deref(), Some("latency_ms"));
    assert_eq!(config.display.unit_position, UnitPosition::Suffix);
}

#[test]
fn test_invalid_file_contents_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("panel.toml");
    fs::write(&path, "[mapping]\nxField = \"t\"\nseriesField = \"t\"\n").unwrap();

    match ConfigParser::parse_file(&path) {
        Err(ConfigError::Validation { field, .. }) => {
            assert_eq!(field.as_deref(), Some("seriesField"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_missing_and_unsupported_files() {
    let dir = TempDir::new().unwrap();

    let missing = dir.path().join("absent.yaml");
    assert!(matches!(
        ConfigParser::parse_file(&missing),
        Err(ConfigError::Io(_))
    ));

    let ini = dir.path().join("panel.ini");
    fs::write(&ini, "x=1").unwrap();
    assert!(matches!(
        ConfigParser::parse_file(&ini),
        Err(ConfigError::UnsupportedFormat(_))
    ));
}
