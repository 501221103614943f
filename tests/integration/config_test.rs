//! Integration tests for configuration loading.

mod helpers;

#[test]
fn test_defaults_without_config_files() {
    let host = helpers::TestHost::new();

    let output = host.run(&["config"]);
    assert!(output.success, "{}", output.stderr);

    let body = output.json();
    assert_eq!(body["server"]["secret_key"], "********");
    assert_eq!(body["worker"]["workers"], 2);
    assert_eq!(body["plugins"]["on_duplicate"], "abort");
    assert_eq!(body["host"]["installed_apps"][0], "karrio.server.core");
}

#[test]
fn test_environment_overrides_file() {
    let host = helpers::TestHost::new();
    host.write_config("[database]\nname = \"from_file\"\npassword = \"hunter2\"\n");

    let output = host.run_with_env(&["config"], &[("SHIPDECK_DATABASE__NAME", "from_env")]);
    assert!(output.success, "{}", output.stderr);

    let body = output.json();
    assert_eq!(body["database"]["name"], "from_env");
    assert_eq!(body["database"]["password"], "********");
}

#[test]
fn test_environment_overlay_file() {
    let host = helpers::TestHost::new();
    host.write_config("[logging]\nlevel = \"info\"\n");
    std::fs::write(
        host.dir.path().join("config/production.toml"),
        "[security]\nuse_https = true\n",
    )
    .unwrap();

    let output = host.run_with_env(&["config"], &[("SHIPDECK_ENV", "production")]);
    assert!(output.success, "{}", output.stderr);
    assert_eq!(output.json()["security"]["use_https"], true);
}
