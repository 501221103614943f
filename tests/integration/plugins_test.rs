//! Integration tests for plugin discovery through the host binary.

mod helpers;

#[test]
fn test_custom_integration_is_activated() {
    let host = helpers::TestHost::new();
    host.add_package("custom_integration", "");

    let output = host.run(&["--format", "json", "plugins"]);
    assert!(output.success, "{}", output.stderr);

    let body = output.json();
    assert_eq!(body["plugins"][0]["id"], "custom_integration");
    assert_eq!(body["plugins"][0]["version"], "1.0.0");

    let apps: Vec<&str> = body["installed_apps"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert_eq!(apps.first(), Some(&"karrio.server.core"));
    assert_eq!(apps.last(), Some(&"plugins.custom_integration"));
}

#[test]
fn test_invalid_candidate_is_reported_not_fatal() {
    let host = helpers::TestHost::new();
    host.add_package("custom_integration", "")
        .add_package("unknown", "entry = \"missing\"");
    std::fs::create_dir(host.plugins_dir().join("assets")).unwrap();

    let output = host.run(&["--format", "json", "plugins"]);
    assert!(output.success, "{}", output.stderr);

    let body = output.json();
    assert_eq!(body["plugins"].as_array().unwrap().len(), 1);
    assert_eq!(body["failures"][0]["candidate"], "unknown");
    assert_eq!(body["failures"][0]["kind"], "unresolved");
    assert_eq!(body["skipped"][0]["candidate"], "assets");
    assert_eq!(body["skipped"][0]["reason"], "no_manifest");
}

#[test]
fn test_text_output_lists_skipped_entries() {
    let host = helpers::TestHost::new();
    host.add_package("custom_integration", "");
    std::fs::create_dir(host.plugins_dir().join("assets")).unwrap();

    let output = host.run_with_env(
        &["plugins"],
        &[("SHIPDECK_PLUGINS__DISABLED", "custom_integration")],
    );
    assert!(output.success, "{}", output.stderr);
    assert!(output.stdout.contains("Skipped entries:"), "{}", output.stdout);
    assert!(output.stdout.contains("assets [no_manifest]"), "{}", output.stdout);
    assert!(
        output.stdout.contains("custom_integration [disabled_by_config]"),
        "{}",
        output.stdout
    );
}

#[test]
fn test_missing_plugin_directory() {
    let host = helpers::TestHost::new();
    std::fs::remove_dir(host.plugins_dir()).unwrap();

    let output = host.run(&["--format", "json", "plugins"]);
    assert!(output.success, "{}", output.stderr);
    assert_eq!(output.json()["plugins"].as_array().unwrap().len(), 0);
}

#[test]
fn test_duplicate_identifier_aborts_startup() {
    let host = helpers::TestHost::new();
    host.add_package("a_custom", "entry = \"custom_integration\"")
        .add_package("b_custom", "entry = \"custom_integration\"");

    let output = host.run(&["plugins"]);
    assert!(!output.success);
    assert!(output.stderr.contains("CONFLICT"), "{}", output.stderr);
}

#[test]
fn test_duplicate_identifier_skip_policy() {
    let host = helpers::TestHost::new();
    host.add_package("a_custom", "entry = \"custom_integration\"")
        .add_package("b_custom", "entry = \"custom_integration\"")
        .write_config("[plugins]\non_duplicate = \"skip\"\n");

    let output = host.run(&["--format", "json", "plugins"]);
    assert!(output.success, "{}", output.stderr);

    let body = output.json();
    assert_eq!(body["plugins"].as_array().unwrap().len(), 1);
    assert_eq!(body["failures"][0]["candidate"], "b_custom");
    assert_eq!(body["failures"][0]["kind"], "duplicate_identifier");
}

#[test]
fn test_plugin_disabled_by_environment() {
    let host = helpers::TestHost::new();
    host.add_package("custom_integration", "");

    let output = host.run_with_env(
        &["--format", "json", "plugins"],
        &[("SHIPDECK_PLUGINS__DISABLED", "custom_integration")],
    );
    assert!(output.success, "{}", output.stderr);

    let body = output.json();
    assert_eq!(body["plugins"].as_array().unwrap().len(), 0);
    assert_eq!(body["skipped"][0]["reason"], "disabled_by_config");
}
