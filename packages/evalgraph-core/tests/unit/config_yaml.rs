//! YAML configuration loading

use std::io::Write;

use evalgraph_core::config::{ConfigError, FlowGraphConfig, Preset};
use evalgraph_core::{DataFlowGraph, FlowGraphError, Parser, TreeSitterParser};
use tempfile::NamedTempFile;

fn write_yaml(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_yaml(
        "version: 1
preset: precise
overrides:
  short_circuit_edges: false
",
    );
    let config = FlowGraphConfig::from_yaml(file.path()).unwrap();

    assert_eq!(config.preset, Preset::Precise);
    assert!(!config.short_circuit_edges);
    assert!(config.exception_edges);
    assert_eq!(config.max_resolution_depth, 65_536);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = FlowGraphConfig::from_yaml(dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_missing_version() {
    let result = FlowGraphConfig::from_yaml_str("preset: standard\n");
    assert!(matches!(result, Err(ConfigError::MissingVersion)));
}

#[test]
fn test_unsupported_version() {
    let result = FlowGraphConfig::from_yaml_str("version: 2\npreset: standard\n");
    match result {
        Err(ConfigError::UnsupportedVersion { found, supported }) => {
            assert_eq!(found, 2);
            assert_eq!(supported, vec![1]);
        }
        other => panic!("expected UnsupportedVersion, got {other:?}"),
    }
}

#[test]
fn test_unknown_preset() {
    let result = FlowGraphConfig::from_yaml_str("version: 1\npreset: turbo\n");
    assert!(matches!(result, Err(ConfigError::UnknownPreset(name)) if name == "turbo"));
}

#[test]
fn test_unknown_override_field_rejected() {
    let yaml = "version: 1\npreset: standard\noverrides:\n  follow_lambdas: true\n";
    assert!(matches!(
        FlowGraphConfig::from_yaml_str(yaml),
        Err(ConfigError::Yaml(_))
    ));
}

#[test]
fn test_depth_override_validated() {
    let yaml = "version: 1\npreset: minimal\noverrides:\n  max_resolution_depth: 2\n";
    assert!(matches!(
        FlowGraphConfig::from_yaml_str(yaml),
        Err(ConfigError::Range { .. })
    ));
}

#[test]
fn test_yaml_round_trip() {
    let config = FlowGraphConfig::preset(Preset::Minimal)
        .with_cache_results(true)
        .with_max_resolution_depth(512);
    let yaml = config.to_yaml().unwrap();

    let file = write_yaml(&yaml);
    assert_eq!(FlowGraphConfig::from_yaml(file.path()).unwrap(), config);
}

#[test]
fn test_preset_names() {
    for name in ["minimal", "standard", "precise"] {
        let preset = Preset::from_str(name).unwrap();
        assert_eq!(preset.as_str(), name);
    }
    assert!(Preset::from_str("fast").is_err());
}

#[test]
fn test_invalid_config_rejected_by_graph() {
    let tree = TreeSitterParser::java()
        .parse("class A {}", "A.java")
        .unwrap();
    let config = FlowGraphConfig::default().with_max_resolution_depth(0);

    let err = DataFlowGraph::with_config(&tree, config).err().unwrap();
    assert!(matches!(err, FlowGraphError::Config(ConfigError::Range { .. })));
}

#[test]
fn test_depth_limit_surfaces_as_error() {
    // every nested block adds a level on the way up to the method
    let source = format!(
        "class D {{ void m() {{ {} x(); {} }} }}",
        "{".repeat(24),
        "}".repeat(24)
    );
    let tree = TreeSitterParser::java().parse(&source, "D.java").unwrap();
    let config = FlowGraphConfig::default()
        .with_cache_results(false)
        .with_max_resolution_depth(16);
    let graph = DataFlowGraph::with_config(&tree, config).unwrap();

    let call = tree.find_program_point("x()").unwrap();
    let err = graph.previous_in(call, evalgraph_core::Phase::Entry).unwrap_err();
    assert!(matches!(err, FlowGraphError::ResolutionDepthExceeded { limit: 16 }));
}
