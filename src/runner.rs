//! Entry point that turns a JSON payload into an `Environment` and hands it
//! to a script.

use crate::config::ScriptConfig;
use crate::env::Environment;
use crate::error::{KakapoError, Result};
use async_trait::async_trait;
use tracing::info;

/// A user-supplied script.
#[async_trait]
pub trait ScriptHandler: Send + Sync {
    /// Runs the script against the environment it was invoked with.
    async fn handler(&self, env: &Environment) -> anyhow::Result<()>;
}

/// Decodes `json_config` and invokes `script` with the resulting environment.
///
/// A payload that does not decode, or lacks a required key such as
/// `script_name`, fails before the handler runs. Errors raised by the
/// handler come back unchanged: a `KakapoError` as itself, anything else
/// as [`KakapoError::Handler`].
pub async fn run<S>(script: &S, json_config: &str) -> Result<()>
where
    S: ScriptHandler + ?Sized,
{
    let config = ScriptConfig::from_json(json_config)?;
    run_with_config(script, &config).await
}

/// Same as [`run`] for callers that already hold a decoded configuration.
pub async fn run_with_config<S>(script: &S, config: &ScriptConfig) -> Result<()>
where
    S: ScriptHandler + ?Sized,
{
    let env = Environment::from_config(config)?;
    info!(
        "Running script '{}' against {}",
        env.script_name(),
        env.database_info().display_string()
    );

    script.handler(&env).await.map_err(into_kakapo_error)?;

    info!("Script '{}' finished", env.script_name());
    Ok(())
}

fn into_kakapo_error(error: anyhow::Error) -> KakapoError {
    match error.downcast::<KakapoError>() {
        Ok(error) => error,
        Err(error) => KakapoError::Handler(error),
    }
}
