use std::io::Write;

use tally_runner::{Runner, RunnerConfig, TallyError, WorkItem};

#[test]
fn load_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "max_workers = 3\nthread_name_prefix = \"bench\"\nslow_task_threshold_ms = 250"
    )
    .unwrap();

    let config = RunnerConfig::from_file(file.path()).unwrap();
    assert_eq!(config.max_workers, 3);
    assert_eq!(config.thread_name_prefix, "bench");
    assert_eq!(config.slow_task_threshold_ms, Some(250));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = RunnerConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, TallyError::Io(_)));
}

#[test]
fn malformed_toml_is_parse_error() {
    let err = RunnerConfig::from_toml("max_workers = [").unwrap_err();
    assert!(matches!(err, TallyError::ConfigParse(_)));
}

#[test]
fn blank_prefix_fails_validation() {
    let err = RunnerConfig::from_toml("thread_name_prefix = \"\"").unwrap_err();
    assert!(matches!(err, TallyError::Config(_)));
}

#[test]
fn nul_in_prefix_fails_validation() {
    let err = RunnerConfig::from_toml("thread_name_prefix = \"a\\u0000b\"").unwrap_err();
    assert!(matches!(err, TallyError::Config(_)));
}

#[test]
fn invalid_config_built_in_code_errors_instead_of_panicking() {
    let config = RunnerConfig {
        thread_name_prefix: "worker\0".to_string(),
        ..RunnerConfig::default()
    };
    let err = Runner::new(config)
        .run(vec![WorkItem::new(|| {})])
        .unwrap_err();
    assert!(matches!(err, TallyError::Config(_)));
}
