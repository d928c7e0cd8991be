// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn fake_execution_consumes_outcomes_in_order() {
    let adapter = FakeExecutionAdapter::new();
    adapter.push_output("first");
    adapter.push_error("boom");

    let env = BTreeMap::from([("tenantId".to_string(), "t1".to_string())]);
    let first = adapter.run("script", &env).await.unwrap();
    let second = adapter.run("script", &env).await.unwrap_err();
    let third = adapter.run("script", &env).await.unwrap();

    assert_eq!(first.output, "first");
    assert_eq!(second.to_string(), "backend error: boom");
    assert_eq!(third.output, "");
}

#[tokio::test]
async fn fake_execution_records_calls() {
    let adapter = FakeExecutionAdapter::new();
    let env = BTreeMap::from([("tier".to_string(), "premium".to_string())]);

    adapter.run("./provision.sh", &env).await.unwrap();

    let calls = adapter.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].script, "./provision.sh");
    assert_eq!(calls[0].env, env);
}

#[tokio::test]
async fn fake_execution_fallback_repeats() {
    let adapter = FakeExecutionAdapter::new();
    adapter.always_error("unavailable");

    for _ in 0..3 {
        assert!(adapter.run("s", &BTreeMap::new()).await.is_err());
    }
}
