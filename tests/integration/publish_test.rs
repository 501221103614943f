//! Integration tests for event publishing through the host binary.

mod helpers;

#[test]
fn test_shipment_created_reaches_plugin() {
    let host = helpers::TestHost::new();
    host.add_package("custom_integration", "");

    let output = host.run(&[
        "--format",
        "json",
        "publish",
        "shipment.created",
        "--payload",
        r#"{"id": "SHP-1"}"#,
    ]);
    assert!(output.success, "{}", output.stderr);

    let report = output.json();
    assert_eq!(report["event"], "shipment.created");
    assert_eq!(report["invoked"], 1);
    assert_eq!(report["failures"].as_array().unwrap().len(), 0);
}

#[test]
fn test_event_without_subscribers_is_noop() {
    let host = helpers::TestHost::new();

    let output = host.run(&["--format", "json", "publish", "order.cancelled"]);
    assert!(output.success, "{}", output.stderr);
    assert_eq!(output.json()["invoked"], 0);
}

#[test]
fn test_handler_failure_is_reported() {
    let host = helpers::TestHost::new();
    host.add_package("custom_integration", "");

    let output = host.run(&["--format", "json", "publish", "tracking.updated"]);
    assert!(output.success, "{}", output.stderr);

    let report = output.json();
    assert_eq!(report["invoked"], 1);
    assert_eq!(report["failures"][0]["plugin_id"], "custom_integration");
}

#[test]
fn test_strict_dispatch_fails_command() {
    let host = helpers::TestHost::new();
    host.add_package("custom_integration", "")
        .write_config("[plugins]\nstrict_dispatch = true\n");

    let output = host.run(&["publish", "tracking.updated"]);
    assert!(!output.success);
    assert!(output.stderr.contains("HANDLER"), "{}", output.stderr);
}

#[test]
fn test_invalid_payload_is_rejected() {
    let host = helpers::TestHost::new();

    let output = host.run(&["publish", "shipment.created", "--payload", "{not json"]);
    assert!(!output.success);
    assert!(output.stderr.contains("Invalid --payload JSON"), "{}", output.stderr);
}
