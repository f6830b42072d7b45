//! Runner integration tests.
//!
//! Tests the path from a JSON payload to a running handler.

use super::common::test_script_config;
use async_trait::async_trait;
use kakapo_script::{run, Environment, KakapoError, OnDuplicate, ScriptHandler, Value};
use std::sync::Mutex;

/// Checks the environment it receives and counts the tables it can see.
#[derive(Default)]
struct Inspect {
    observed: Mutex<Option<(String, usize, bool)>>,
}

#[async_trait]
impl ScriptHandler for Inspect {
    async fn handler(&self, env: &Environment) -> anyhow::Result<()> {
        let insert_failed = env
            .scripts()
            .insert("copy", OnDuplicate::Update)
            .is_err();
        *self.observed.lock().unwrap() = Some((
            env.script_name().to_string(),
            env.tables().iter().count(),
            insert_failed,
        ));
        Ok(())
    }
}

/// Reads one value from the database and stores it.
#[derive(Default)]
struct SelectOne {
    value: Mutex<Option<Value>>,
}

#[async_trait]
impl ScriptHandler for SelectOne {
    async fn handler(&self, env: &Environment) -> anyhow::Result<()> {
        let mut conn = env.connect().await?;
        let frame = conn.query("SELECT 41 + 1 AS answer").await?;
        *self.value.lock().unwrap() = frame.get(0, "answer").cloned();
        Ok(())
    }
}

/// Tries to reach a database that is not there.
struct Unreachable;

#[async_trait]
impl ScriptHandler for Unreachable {
    async fn handler(&self, env: &Environment) -> anyhow::Result<()> {
        env.connect().await?;
        Ok(())
    }
}

#[tokio::test]
async fn test_runner_passes_environment() {
    let payload = r#"{
        "username": "kakapo",
        "password": "secret",
        "host": "localhost",
        "port": "5432",
        "database": "kakapo_db",
        "script_name": "inspector"
    }"#;

    let script = Inspect::default();
    run(&script, payload).await.unwrap();

    let observed = script.observed.lock().unwrap().clone();
    assert_eq!(observed, Some(("inspector".to_string(), 0, true)));
}

#[tokio::test]
async fn test_runner_rejects_missing_keys_before_handler() {
    let script = Inspect::default();
    for missing in ["username", "host", "port", "database", "script_name"] {
        let mut payload = serde_json::json!({
            "username": "kakapo",
            "password": "secret",
            "host": "localhost",
            "port": 5432,
            "database": "kakapo_db",
            "script_name": "inspector"
        });
        payload.as_object_mut().unwrap().remove(missing);

        let err = run(&script, &payload.to_string()).await.unwrap_err();
        assert!(matches!(err, KakapoError::Config(_)), "missing {missing}");
    }
    assert!(script.observed.lock().unwrap().is_none());
}

#[tokio::test(flavor = "current_thread")]
async fn test_handler_connection_failure_propagates() {
    let payload = serde_json::json!({
        "username": "kakapo",
        "password": "secret",
        "host": "127.0.0.1",
        "port": 59999,
        "database": "kakapo_db",
        "script_name": "unreachable",
        "engine": {"acquire_timeout_secs": 1}
    });

    let err = run(&Unreachable, &payload.to_string()).await.unwrap_err();
    assert!(
        matches!(err, KakapoError::Connection(_)),
        "expected connection error, got {err:?}"
    );
}

#[tokio::test]
async fn test_runner_against_database() {
    let Some(config) = test_script_config("select_one") else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let script = SelectOne::default();
    run(&script, &config.to_json().unwrap()).await.unwrap();

    assert_eq!(*script.value.lock().unwrap(), Some(Value::Int(42)));
}
