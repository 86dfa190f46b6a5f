// Configuration module unit tests

use slidemark::config::*;
use slidemark::logging::LogFormat;
use slidemark::watermark::{Margin, WatermarkPosition};

#[test]
fn test_can_deserialize_minimal_valid_yaml_config() {
    let yaml = r#"
watermark:
  position: center
"#;
    let config = Config::from_yaml_with_env(yaml).expect("Failed to load YAML");
    assert_eq!(config.watermark.position, WatermarkPosition::Center);
    assert!(config.validate().is_ok());
}

#[test]
fn test_defaults_match_documented_values() {
    let config = Config::default();
    assert_eq!(config.watermark.opacity, 0.5);
    assert_eq!(config.watermark.size_percentage, 0.3);
    assert!(config.watermark.on_top);
    assert_eq!(config.placement.margin_fraction, 0.05);
    assert_eq!(config.placement.wide_aspect_threshold, 2.5);
    assert_eq!(config.placement.wide_ribbon_fraction, 0.20);
    assert_eq!(config.placement.standard_ribbon_fraction, 0.35);
    assert_eq!(config.limits.max_pixels, 100_000_000);
    assert_eq!(config.limits.max_file_size, 50 * 1024 * 1024);
    assert_eq!(config.package.max_part_size, 256 * 1024 * 1024);
    assert_eq!(config.package.max_package_size, 1024 * 1024 * 1024);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, LogFormat::Text);
}

#[test]
fn test_config_deserialization_fails_with_invalid_yaml() {
    let yaml = r#"
watermark:
  opacity: [invalid syntax here}
"#;
    let result = Config::from_yaml_with_env(yaml);
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_unknown_position_fails_to_parse() {
    let yaml = "watermark:\n  position: middle\n";
    assert!(matches!(
        Config::from_yaml_with_env(yaml),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_env_var_substitution() {
    std::env::set_var("SLIDEMARK_TEST_POSITION", "vertical-ribbon");
    std::env::set_var("SLIDEMARK_TEST_OPACITY", "0.15");

    let yaml = r#"
watermark:
  position: ${SLIDEMARK_TEST_POSITION}
  opacity: ${SLIDEMARK_TEST_OPACITY}
"#;
    let config = Config::from_yaml_with_env(yaml).unwrap();
    assert_eq!(config.watermark.position, WatermarkPosition::VerticalRibbon);
    assert_eq!(config.watermark.opacity, 0.15);

    std::env::remove_var("SLIDEMARK_TEST_POSITION");
    std::env::remove_var("SLIDEMARK_TEST_OPACITY");
}

#[test]
fn test_missing_env_var_is_reported_by_name() {
    let yaml = "watermark:\n  opacity: ${SLIDEMARK_TEST_NEVER_SET}\n";
    let err = Config::from_yaml_with_env(yaml).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Environment variable 'SLIDEMARK_TEST_NEVER_SET' is referenced but not set"
    );
}

#[test]
fn test_lowercase_placeholders_are_left_alone() {
    // Only upper-case names are substituted
    let yaml = "logging:\n  level: \"${not_a_var}\"\n";
    let config = Config::from_yaml_with_env(yaml).unwrap();
    assert_eq!(config.logging.level, "${not_a_var}");
}

#[test]
fn test_validate_rejects_bad_watermark_values() {
    let yaml = "watermark:\n  opacity: 1.5\n";
    let config = Config::from_yaml_with_env(yaml).unwrap();
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains("opacity"));

    let yaml = "watermark:\n  size_percentage: 0\n";
    let config = Config::from_yaml_with_env(yaml).unwrap();
    assert!(config.validate().unwrap_err().to_string().contains("size_percentage"));
}

#[test]
fn test_validate_rejects_bad_placement_values() {
    for yaml in [
        "placement:\n  margin_fraction: 0.5\n",
        "placement:\n  margin_emu: -1\n",
        "placement:\n  wide_aspect_threshold: 0\n",
        "placement:\n  standard_ribbon_fraction: 1.5\n",
    ] {
        let config = Config::from_yaml_with_env(yaml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("placement"), "{}", yaml);
    }
}

#[test]
fn test_validate_rejects_zero_limits() {
    let yaml = "limits:\n  max_width: 0\n";
    let config = Config::from_yaml_with_env(yaml).unwrap();
    assert!(config.validate().unwrap_err().to_string().contains("limits"));
}

#[test]
fn test_validate_rejects_zero_package_limits() {
    let yaml = "package:\n  max_part_size: 0\n";
    let config = Config::from_yaml_with_env(yaml).unwrap();
    assert!(config.validate().unwrap_err().to_string().contains("package"));
}

#[test]
fn test_margin_emu_becomes_absolute_margin() {
    let yaml = "placement:\n  margin_emu: 457200\n";
    let config = Config::from_yaml_with_env(yaml).unwrap();
    assert_eq!(config.to_placement_rules().margin, Margin::Absolute(457_200.0));
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slidemark.yaml");
    std::fs::write(&path, "watermark:\n  on_top: false\nlogging:\n  format: json\n").unwrap();

    let config = Config::from_file(&path).unwrap();
    assert!(!config.watermark.on_top);
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_from_file_missing() {
    let err = Config::from_file("/nonexistent/slidemark.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}
