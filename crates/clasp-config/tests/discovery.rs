//! Tests for module config discovery and loading

use clasp_config::{ConfigDiscovery, ConfigError, load_from};
use std::fs;
use tempfile::TempDir;

const CONFIG: &str = r#"{
  "outputPath": "build/",
  "productionUri": "/js/",
  "modules": {
    "root": { "inputs": ["src/root.js"] },
    "child": { "deps": "root", "inputs": "src/child.js", "wrapper": "%source%" }
  }
}"#;

#[test]
fn discovers_clasp_modules_json() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("clasp.modules.json"), CONFIG).unwrap();

    let discovery = ConfigDiscovery::new(dir.path());
    let found = discovery.find().unwrap();
    assert_eq!(found.file_name().unwrap(), "clasp.modules.json");

    let config = discovery.load().unwrap();
    assert_eq!(config.modules.len(), 2);
    assert_eq!(config.modules[1].deps, ["root"]);
}

#[test]
fn clasp_modules_json_wins_over_modules_json() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("modules.json"), "{}").unwrap();
    fs::write(dir.path().join("clasp.modules.json"), CONFIG).unwrap();

    let found = ConfigDiscovery::new(dir.path()).find().unwrap();
    assert_eq!(found.file_name().unwrap(), "clasp.modules.json");
}

#[test]
fn missing_config_reports_root() {
    let dir = TempDir::new().unwrap();
    match ConfigDiscovery::new(dir.path()).load() {
        Err(ConfigError::NotFound { root }) => assert_eq!(root, dir.path()),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn inputs_resolve_against_config_directory() {
    let dir = TempDir::new().unwrap();
    let conf_dir = dir.path().join("conf");
    fs::create_dir(&conf_dir).unwrap();
    let path = conf_dir.join("modules.json");
    fs::write(&path, CONFIG).unwrap();

    let config = load_from(&path).unwrap();
    let root_input = &config.modules[0].inputs[0];
    assert!(root_input.is_absolute());
    assert!(root_input.ends_with("conf/src/root.js"));
    assert!(config.output_path.unwrap().contains("build"));
}

#[test]
fn invalid_json_names_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("clasp.modules.json");
    fs::write(&path, "{ not json").unwrap();

    match load_from(&path) {
        Err(ConfigError::InvalidJson { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected InvalidJson, got {other:?}"),
    }
}
