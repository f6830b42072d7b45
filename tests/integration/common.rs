//! Shared helpers for integration tests.

use kakapo_script::config::{ConnectionConfig, EngineConfig};
use kakapo_script::{Environment, ScriptConfig};

/// Runner payload for the database in DATABASE_URL, if set.
pub fn test_script_config(script_name: &str) -> Option<ScriptConfig> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let connection = ConnectionConfig::from_connection_string(&url).ok()?;
    connection
        .to_script_config(script_name, EngineConfig::default())
        .ok()
}

/// Environment for the database in DATABASE_URL, if set.
pub fn test_environment() -> Option<Environment> {
    let config = test_script_config("integration")?;
    Environment::from_config(&config).ok()
}
