use std::io::Write;
use std::time::Duration;

use nft_frame::config::{Configuration, IndexerConfig, Speed};

#[test]
fn empty_document_uses_defaults() {
    let cfg = Configuration::from_yaml_str("").unwrap().validated().unwrap();
    assert_eq!(cfg.indexer.base_url, IndexerConfig::DEFAULT_BASE_URL);
    assert_eq!(cfg.indexer.api_key_env, "ALCHEMY_API_KEY");
    assert_eq!(cfg.indexer.api_key, None);
    assert_eq!(cfg.indexer.request_timeout, Duration::from_secs(15));
    assert!(cfg.slideshow.autoplay);
    assert_eq!(cfg.slideshow.initial_speed, Speed::Normal);
    assert_eq!(cfg.slideshow.controls_hide_delay, Duration::from_millis(2500));
    assert_eq!(cfg.slideshow.settings_arm_delay, Duration::from_millis(100));
    assert_eq!(cfg.slideshow.gallery_header_threshold, 50);
}

#[test]
fn parse_kebab_case_config() {
    let yaml = r#"
indexer:
  base-url: "http://localhost:8080/nft/v2"
  api-key: "abc123"
  request-timeout: 3s
slideshow:
  autoplay: false
  initial-speed: very-fast
  controls-hide-delay: 4s
  settings-arm-delay: 250ms
  gallery-header-threshold: 80
"#;
    let cfg = Configuration::from_yaml_str(yaml)
        .unwrap()
        .validated()
        .unwrap();
    assert_eq!(cfg.indexer.base_url, "http://localhost:8080/nft/v2");
    assert_eq!(cfg.indexer.resolve_api_key().unwrap(), "abc123");
    assert_eq!(cfg.indexer.request_timeout, Duration::from_secs(3));
    assert!(!cfg.slideshow.autoplay);
    assert_eq!(cfg.slideshow.initial_speed, Speed::VeryFast);
    assert_eq!(cfg.slideshow.controls_hide_delay, Duration::from_secs(4));
    assert_eq!(cfg.slideshow.settings_arm_delay, Duration::from_millis(250));
    assert_eq!(cfg.slideshow.gallery_header_threshold, 80);
}

#[test]
fn speed_presets_have_fixed_intervals() {
    let expected = [
        (Speed::Slow, 8000, "Slow"),
        (Speed::Normal, 5000, "Normal"),
        (Speed::Fast, 3000, "Fast"),
        (Speed::VeryFast, 1500, "Very Fast"),
    ];
    for (speed, ms, label) in expected {
        assert_eq!(speed.interval(), Duration::from_millis(ms));
        assert_eq!(speed.label(), label);
        assert_eq!(speed.as_str().parse::<Speed>().unwrap(), speed);
    }
}

#[test]
fn rejects_unknown_keys() {
    let yaml = r#"
slideshow:
  autoplay: true
  shuffle: true
"#;
    let err = Configuration::from_yaml_str(yaml).unwrap_err();
    assert!(err.to_string().contains("unknown field"), "{err}");
}

#[test]
fn rejects_unknown_speed() {
    let yaml = r#"
slideshow:
  initial-speed: ludicrous
"#;
    let err = Configuration::from_yaml_str(yaml).unwrap_err();
    assert!(err.to_string().contains("unknown variant"), "{err}");
}

#[test]
fn validation_rejects_bad_values() {
    let yaml = r#"
indexer:
  base-url: "ftp://example.com"
"#;
    let err = Configuration::from_yaml_str(yaml)
        .unwrap()
        .validated()
        .unwrap_err();
    assert!(format!("{err:#}").contains("base-url"), "{err:#}");

    let yaml = r#"
slideshow:
  controls-hide-delay: 0s
"#;
    let err = Configuration::from_yaml_str(yaml)
        .unwrap()
        .validated()
        .unwrap_err();
    assert!(format!("{err:#}").contains("controls-hide-delay"), "{err:#}");
}

#[test]
fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "slideshow:\n  initial-speed: slow").unwrap();
    let cfg = Configuration::from_yaml_file(file.path()).unwrap();
    assert_eq!(cfg.slideshow.initial_speed, Speed::Slow);
    assert!(cfg.slideshow.autoplay);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    let err = Configuration::from_yaml_file(&path).unwrap_err();
    assert!(err.to_string().contains("absent.yaml"), "{err}");
}
