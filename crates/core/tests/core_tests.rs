//! Integration tests for the core crate.

use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

use deploy_gate_core::{
    ConfigError, DeploymentConfig, DeploymentProperties, ExecutionResult, ModelError, RunId,
    RunStatus,
};

#[test]
fn test_execution_result_decodes_with_missing_optionals() {
    let json = r#"{
        "executions": [
            {"status": "queued", "success": true},
            {"status": "failed", "status_cause": "assertion failed", "success": false,
             "start_time": 1700000000000, "stop_time": 1700000060000,
             "output_refs": ["https://app.example/plan/1"]}
        ]
    }"#;
    let result: ExecutionResult = serde_json::from_str(json).unwrap();
    assert_eq!(result.executions.len(), 2);
    assert_eq!(result.executions[0].status_cause, "");
    assert_eq!(result.executions[0].start_time, None);

    let latest = result.latest().unwrap();
    assert_eq!(latest.run_status(), RunStatus::Failed);
    assert!(latest.is_terminal());
    assert!(!latest.success);
    assert_eq!(latest.stop_time, Some(1_700_000_060_000));
}

#[test]
fn test_empty_execution_result_has_no_latest() {
    let result: ExecutionResult = serde_json::from_str("{}").unwrap();
    assert!(result.is_empty());
    assert!(result.latest().is_none());
}

#[test]
fn test_run_id_serde_is_transparent() {
    let id = RunId::new("evt-42").unwrap();
    assert_eq!(serde_json::to_string(&id).unwrap(), r#""evt-42""#);
    let back: RunId = serde_json::from_str(r#""evt-42""#).unwrap();
    assert_eq!(back, id);
    assert!(serde_json::from_str::<RunId>(r#""""#).is_err());
    assert_eq!(RunId::new(""), Err(ModelError::EmptyRunId));
}

#[test]
fn test_config_load_applies_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
environment_id = "env-e"
application_id = "app-a"
continue_on_system_error = true
"#
    )
    .unwrap();

    let cfg = DeploymentConfig::load_from(file.path()).unwrap();
    assert_eq!(cfg.environment_id, "env-e");
    assert!(!cfg.continue_on_plan_failure);
    assert!(cfg.override_flags().continue_on_system_error);
    assert_eq!(cfg.poll_interval(), Duration::from_secs(10));
    assert_eq!(cfg.max_poll_interval(), Duration::from_secs(10));
    assert_eq!(cfg.poll_timeout(), Duration::from_secs(3600));
}

#[test]
fn test_config_load_reads_polling_table() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
environment_id = "env-e"
application_id = "app-a"

[polling]
interval_ms = 500
max_interval_ms = 4000
timeout_ms = 60000
"#
    )
    .unwrap();

    let cfg = DeploymentConfig::load_from(file.path()).unwrap();
    assert_eq!(cfg.poll_interval(), Duration::from_millis(500));
    assert_eq!(cfg.max_poll_interval(), Duration::from_secs(4));
    assert_eq!(cfg.poll_timeout(), Duration::from_secs(60));
}

#[test]
fn test_config_load_rejects_blank_ids() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "environment_id = \"\"\napplication_id = \"app-a\"").unwrap();
    let err = DeploymentConfig::load_from(file.path()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ConfigError>(),
        Some(&ConfigError::MissingField {
            field: "environment_id"
        })
    );
}

#[test]
fn test_config_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(DeploymentConfig::load_from(&dir.path().join("nope.toml")).is_err());
}

#[test]
fn test_config_validate() {
    let mut cfg = DeploymentConfig::new("env-e", "app-a");
    assert_eq!(cfg.validate(), Ok(()));

    cfg.application_id = "  ".into();
    assert_eq!(
        cfg.validate(),
        Err(ConfigError::MissingField {
            field: "application_id"
        })
    );

    cfg.application_id = "app-a".into();
    cfg.polling.interval_ms = 0;
    assert_eq!(
        cfg.validate(),
        Err(ConfigError::ZeroDuration {
            field: "interval_ms"
        })
    );

    cfg.polling.interval_ms = 10;
    cfg.polling.timeout_ms = 0;
    assert_eq!(
        cfg.validate(),
        Err(ConfigError::ZeroDuration { field: "timeout_ms" })
    );
}

fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_properties_from_git_vars() {
    let props = DeploymentProperties::from_vars(&vars(&[
        ("GIT_BRANCH", "origin/main"),
        ("GIT_COMMIT", "abc123"),
        ("GIT_PREVIOUS_COMMIT", "abc122"),
        ("GIT_URL", "https://github.com/acme/widget.git"),
        ("JOB_NAME", "widget-deploy"),
        ("BUILD_NUMBER", "17"),
        ("RUN_DISPLAY_URL", "https://ci.acme.io/job/widget-deploy/17/display"),
        ("SVN_REVISION", "999"),
    ]));

    assert_eq!(props.repository_branch_name.as_deref(), Some("origin/main"));
    assert_eq!(props.repository_revision_number.as_deref(), Some("abc123"));
    assert_eq!(
        props.repository_previous_revision_number.as_deref(),
        Some("abc122")
    );
    assert_eq!(props.repository_name.as_deref(), Some("widget"));
    assert_eq!(props.build_plan_id.as_deref(), Some("widget-deploy"));
    assert_eq!(props.build_plan_name.as_deref(), Some("widget-deploy"));
    assert_eq!(props.build_plan_number.as_deref(), Some("17"));
    assert!(props.build_plan_result_url.is_some());
}

#[test]
fn test_properties_fall_back_to_svn() {
    let props = DeploymentProperties::from_vars(&vars(&[
        ("SVN_REVISION", "1234"),
        ("SVN_URL", "https://svn.acme.io/repos/widget/trunk"),
    ]));
    assert_eq!(props.repository_revision_number.as_deref(), Some("1234"));
    assert_eq!(props.repository_name.as_deref(), Some("trunk"));
    assert_eq!(props.repository_branch_name, None);
    assert_eq!(props.build_plan_id, None);
}

#[test]
fn test_properties_serialize_skips_absent_fields() {
    let props = DeploymentProperties::from_vars(&vars(&[("BUILD_NUMBER", "3")]));
    let json = serde_json::to_string(&props).unwrap();
    assert_eq!(json, r#"{"build_plan_number":"3"}"#);
}

#[cfg(unix)]
#[test]
fn test_properties_from_process_env_skips_non_utf8_vars() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    std::env::set_var("DEPLOY_GATE_TEST_BINARY", OsStr::from_bytes(b"\xff\xfe"));
    std::env::set_var("GIT_BRANCH", "main");

    let props = DeploymentProperties::from_process_env();

    std::env::remove_var("DEPLOY_GATE_TEST_BINARY");
    std::env::remove_var("GIT_BRANCH");
    assert_eq!(props.repository_branch_name.as_deref(), Some("main"));
}
