// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn env(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn default_config_uses_shared_script_timeout() {
    let config = ShellConfig::default();
    assert_eq!(config.shell, "sh");
    assert_eq!(config.timeout, DEFAULT_SCRIPT_TIMEOUT);
}

#[tokio::test]
async fn runs_script_and_captures_stdout() {
    let adapter = ShellExecutionAdapter::default();

    let out = adapter.run("echo hello", &BTreeMap::new()).await.unwrap();

    assert_eq!(out.output, "hello\n");
}

#[tokio::test]
async fn injects_environment() {
    let adapter = ShellExecutionAdapter::default();

    let out = adapter
        .run(
            r#"printf '{"tenant":"%s","tier":"%s"}' "$tenantId" "$tier""#,
            &env(&[("tenantId", "t1"), ("tier", "premium")]),
        )
        .await
        .unwrap();

    assert_eq!(out.output, r#"{"tenant":"t1","tier":"premium"}"#);
}

#[tokio::test]
async fn nonzero_exit_is_an_error_with_stderr() {
    let adapter = ShellExecutionAdapter::default();

    let err = adapter
        .run("echo 'permission denied' >&2; exit 3", &BTreeMap::new())
        .await
        .unwrap_err();

    match err {
        ExecutionError::NonZeroExit { code, stderr } => {
            assert_eq!(code, 3);
            assert_eq!(stderr, "permission denied");
        }
        other => panic!("Expected NonZeroExit, got {:?}", other),
    }
}

#[tokio::test]
async fn timeout_is_an_error() {
    let adapter = ShellExecutionAdapter::new(ShellConfig {
        timeout: Duration::from_millis(100),
        ..ShellConfig::default()
    });

    let err = adapter.run("sleep 5", &BTreeMap::new()).await.unwrap_err();

    assert!(matches!(err, ExecutionError::Timeout(_)));
}

#[tokio::test]
async fn runs_in_configured_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("marker.txt"), "found").unwrap();
    let adapter = ShellExecutionAdapter::new(ShellConfig {
        cwd: Some(dir.path().to_path_buf()),
        ..ShellConfig::default()
    });

    let out = adapter.run("cat marker.txt", &BTreeMap::new()).await.unwrap();

    assert_eq!(out.output, "found");
}

#[tokio::test]
async fn missing_shell_is_a_spawn_error() {
    let adapter = ShellExecutionAdapter::new(ShellConfig {
        shell: "/nonexistent/shell".to_string(),
        ..ShellConfig::default()
    });

    let err = adapter.run("echo", &BTreeMap::new()).await.unwrap_err();

    assert!(matches!(err, ExecutionError::Spawn(_)));
}
