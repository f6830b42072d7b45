//! Connection integration tests.
//!
//! Tests connection checkout, release and error mapping.

use super::common::test_environment;
use kakapo_script::db::EngineSettings;
use kakapo_script::{DatabaseInfo, Environment, KakapoError, Value};
use std::time::Duration;

fn short_timeouts() -> EngineSettings {
    EngineSettings {
        max_connections: 1,
        acquire_timeout: Duration::from_secs(1),
        ..EngineSettings::default()
    }
}

#[tokio::test]
async fn test_connect_with_valid_credentials() {
    let Some(env) = test_environment() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let conn = env.connect().await.unwrap();
    conn.release();
    env.database_info().close().await;
}

#[tokio::test]
async fn test_each_connect_checks_out_a_new_connection() {
    let Some(env) = test_environment() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let mut first = env.connect().await.unwrap();
    let mut second = env.connect().await.unwrap();

    let a = first.query("SELECT pg_backend_pid()::int8 AS pid").await.unwrap();
    let b = second.query("SELECT pg_backend_pid()::int8 AS pid").await.unwrap();
    assert_ne!(a.get(0, "pid"), b.get(0, "pid"));

    drop(first);
    drop(second);
    env.database_info().close().await;
}

#[tokio::test]
async fn test_dropped_connection_returns_to_engine() {
    let Some(env) = test_environment() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let info = env.database_info().clone().with_settings(short_timeouts());
    let env = Environment::new(info, env.script_name());

    // Only one connection fits in the engine; a leak would time out here
    for _ in 0..3 {
        let mut conn = env.connect().await.unwrap();
        conn.query("SELECT 1").await.unwrap();
    }

    let failing = async {
        let mut conn = env.connect().await?;
        conn.query("SELECT * FROM nonexistent_table_xyz").await
    };
    assert!(failing.await.is_err());

    let conn = env.connect().await;
    assert!(conn.is_ok(), "connection leaked on the error path");
    drop(conn);
    env.database_info().close().await;
}

#[tokio::test]
async fn test_reserved_characters_in_password_reach_the_server() {
    let Some(env) = test_environment() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let role = format!("kakapo_pct_{}", std::process::id());
    let password = "pa%41ss:@/";
    let mut admin = env.connect().await.unwrap();
    if let Err(e) = admin
        .execute(&format!("CREATE ROLE {role} LOGIN PASSWORD '{password}'"))
        .await
    {
        eprintln!("Skipping test: cannot create role: {e}");
        return;
    }

    let source = env.database_info();
    let info = DatabaseInfo::new(&role, password, source.host(), source.port(), source.database())
        .unwrap()
        .with_settings(short_timeouts());
    let result = async {
        let mut conn = info.connect().await?;
        conn.query("SELECT current_user::text AS who").await
    }
    .await;
    info.close().await;

    admin.execute(&format!("DROP ROLE {role}")).await.unwrap();
    admin.release();
    env.database_info().close().await;

    let frame = result.unwrap();
    assert_eq!(frame.get(0, "who"), Some(&Value::from(role.as_str())));
}

#[tokio::test(flavor = "current_thread")]
async fn test_connect_with_invalid_port() {
    let info = DatabaseInfo::new("testuser", "testpass", "127.0.0.1", 59999, "testdb")
        .unwrap()
        .with_settings(short_timeouts());

    let result = info.connect().await;
    assert!(matches!(result, Err(KakapoError::Connection(_))));
}

#[tokio::test(flavor = "current_thread")]
async fn test_connect_with_invalid_host() {
    let info = DatabaseInfo::new(
        "testuser",
        "testpass",
        "invalid.host.that.does.not.exist.local",
        5432,
        "testdb",
    )
    .unwrap()
    .with_settings(short_timeouts());

    let error = info.connect().await.unwrap_err();
    assert_eq!(error.category(), "Connection Error");
}

#[tokio::test]
async fn test_construction_is_lazy() {
    let info = DatabaseInfo::new("u", "p", "127.0.0.1", 59999, "db").unwrap();
    let env = Environment::new(info, "lazy");

    // Nothing is contacted until a connection is requested
    assert!(!env.database_info().has_engine());
    assert!(env.tables().is_empty());
    assert!(!env.database_info().has_engine());
}
