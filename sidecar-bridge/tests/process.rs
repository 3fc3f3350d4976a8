//! Process-layer tests against a minimal shell stand-in plugin.

#![cfg(unix)]

use std::collections::HashMap;

use sidecar_bridge::{MessageEvent, PluginConfig, PluginProcess};

fn shell_plugin(script: &str) -> PluginConfig {
    PluginConfig {
        command: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string()],
        cwd: None,
        env: HashMap::new(),
    }
}

// Answers every request with a canned `matches` result, echoing a growing
// numeric id the way the real plugin echoes the request id.
const MATCHES_LOOP: &str = r#"
i=0
while read line; do
  i=$((i+1))
  printf '{"jsonrpc":"2.0","result":{"matches":true},"id":%d}\n' "$i"
done
"#;

#[tokio::test]
async fn test_matches_roundtrip_and_id_sequencing() {
    let process = PluginProcess::spawn(&shell_plugin(MATCHES_LOOP)).unwrap();
    let event = MessageEvent::private("/ping", 42);

    assert!(process.call_matches(&event).await.unwrap());
    assert!(process.call_matches(&event).await.unwrap());

    process.kill().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_calls_do_not_cross_responses() {
    // The stand-in plugin answers strictly in arrival order with sequential
    // ids, so every call only succeeds if its request id matches its
    // position on the wire — interleaved write/read pairs would surface as
    // id mismatches.
    let process = std::sync::Arc::new(PluginProcess::spawn(&shell_plugin(MATCHES_LOOP)).unwrap());

    let mut calls = Vec::new();
    for user_id in 0..8 {
        let process = process.clone();
        calls.push(tokio::spawn(async move {
            let event = MessageEvent::private("/ping", user_id);
            process.call_matches(&event).await
        }));
    }

    for call in calls {
        assert!(call.await.unwrap().unwrap());
    }

    if let Ok(process) = std::sync::Arc::try_unwrap(process) {
        process.kill().await.unwrap();
    }
}

#[tokio::test]
async fn test_wrong_response_id_is_an_error() {
    // Always answers with id 999, which can never match the request id.
    let script = r#"while read line; do echo '{"jsonrpc":"2.0","result":{"matches":true},"id":999}'; done"#;
    let process = PluginProcess::spawn(&shell_plugin(script)).unwrap();
    let event = MessageEvent::private("/ping", 42);

    let err = process.call_matches(&event).await.unwrap_err();
    assert!(err.to_string().contains("id mismatch"));

    process.kill().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_to_dead_plugin_is_best_effort() {
    let process = PluginProcess::spawn(&shell_plugin("exit 0")).unwrap();

    // The child exits immediately; the shutdown call fails internally but
    // send_shutdown swallows it.
    process.send_shutdown().await.unwrap();
}

#[tokio::test]
async fn test_rpc_error_response_surfaces_as_error() {
    let script = r#"
i=0
while read line; do
  i=$((i+1))
  printf '{"jsonrpc":"2.0","error":{"code":-32601,"message":"Method not found: matches"},"id":%d}\n' "$i"
done
"#;
    let process = PluginProcess::spawn(&shell_plugin(script)).unwrap();
    let event = MessageEvent::private("/ping", 42);

    let err = process.call_matches(&event).await.unwrap_err();
    assert!(err.to_string().contains("-32601"));

    process.kill().await.unwrap();
}
