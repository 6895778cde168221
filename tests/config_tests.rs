use std::io::Write;

use serde_json::json;
use tempfile::NamedTempFile;
use voxflow::{DeployConfig, Flow, NodeKind, SchedulingProvider, VoxFlowError, WebhookMethod};

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn deploy_config_loads_from_file() -> anyhow::Result<()> {
    std::env::set_var("VOXFLOW_TEST_REMOTE_KEY", "key_from_env_123");
    let file = write_temp(
        &json!({
            "remote": {
                "base_url": "https://api.voice.example.com/v2",
                "api_key": "${VOXFLOW_TEST_REMOTE_KEY}"
            },
            "integration_base_url": "https://portal.example.com/api",
            "push_timeout_ms": 30000
        })
        .to_string(),
    );

    let config = DeployConfig::from_json_file(file.path())?;

    assert_eq!(config.remote.base_url, "https://api.voice.example.com/v2");
    assert_eq!(config.api_key()?, "key_from_env_123");
    assert_eq!(config.push_timeout_ms, 30_000);
    assert_eq!(config.discovery_timeout_ms, 5_000);
    assert_eq!(config.webhook_timeout_ms, 10_000);
    Ok(())
}

#[test]
fn invalid_config_file_is_a_config_error() {
    let file = write_temp(
        r#"{ "remote": { "base_url": "ftp://nope" }, "integration_base_url": "https://x" }"#,
    );
    let err = DeployConfig::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, VoxFlowError::Config(_)));

    let missing = DeployConfig::from_json_file("/definitely/not/here.json").unwrap_err();
    assert!(matches!(missing, VoxFlowError::Config(_)));
}

#[test]
fn zero_timeouts_are_rejected() {
    let err = DeployConfig::default().with_timeouts(0, 1_000).validate().unwrap_err();
    assert!(matches!(err, VoxFlowError::Config(_)));
}

#[test]
fn flow_file_round_trips_through_disk() -> anyhow::Result<()> {
    let file = write_temp(
        &json!({
            "id": "f1",
            "client_id": "c1",
            "name": "Booking line",
            "agent_id": "ag_1",
            "version": 3,
            "active": true,
            "nodes": [
                { "id": "a", "type": "check_availability", "data": { "provider": "google_calendar" } },
                { "id": "b", "type": "book_appointment", "data": {} },
                { "id": "c", "type": "webhook", "data": { "webhookUrl": "https://hooks.example.com", "webhookMethod": "GET" } }
            ],
            "edges": [ { "id": "e1", "source": "a", "target": "b" } ]
        })
        .to_string(),
    );

    let raw = std::fs::read_to_string(file.path())?;
    let flow: Flow = serde_json::from_str(&raw)?;

    assert_eq!(flow.version, 3);
    assert_eq!(flow.linked_agent(), Some("ag_1"));
    assert_eq!(flow.branch_link_count(), 1);
    assert!(matches!(
        flow.nodes[0].kind,
        NodeKind::CheckAvailability {
            provider: Some(SchedulingProvider::GoogleCalendar),
            ..
        }
    ));
    assert!(matches!(
        flow.nodes[1].kind,
        NodeKind::BookAppointment { provider: None, .. }
    ));
    assert_eq!(
        flow.nodes[2].webhook_target(),
        Some(("https://hooks.example.com", WebhookMethod::Get))
    );

    std::fs::write(file.path(), serde_json::to_string_pretty(&flow)?)?;
    let reread: Flow = serde_json::from_str(&std::fs::read_to_string(file.path())?)?;
    assert_eq!(reread, flow);
    Ok(())
}
