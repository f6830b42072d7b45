//! kakapo - run scripts against a kakapo database from the command line.

mod cli;

use cli::{Cli, Command};
use kakapo_script::builtin::{DumpTable, ListEntities, RunQuery};
use kakapo_script::config::{Config, ConnectionConfig};
use kakapo_script::logging;
use kakapo_script::runner::{self, ScriptHandler};
use kakapo_script::{KakapoError, Result};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    logging::init_stderr_logging(logging::filter_for_verbosity(cli.verbose));

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let connection = resolve_connection(&cli, &config)?;
    info!("Connection: {}", connection.display_string());

    let script_config = connection.to_script_config(&cli.script_name, config.engine)?;
    let format = cli.parse_output_format().map_err(KakapoError::config)?;

    let script: Box<dyn ScriptHandler> = match cli.command {
        Command::List { kind } => Box::new(ListEntities {
            kind: kind.into(),
            format,
        }),
        Command::Query { sql } => Box::new(RunQuery { sql, format }),
        Command::Table { name } => Box::new(DumpTable {
            table: name,
            format,
        }),
    };

    runner::run_with_config(script.as_ref(), &script_config).await
}

/// Resolves the final connection configuration from CLI args, config file, and environment.
///
/// The named (or default) connection from the config file is the base, CLI
/// arguments override it, and PG* environment variables fill what is left.
fn resolve_connection(cli: &Cli, config: &Config) -> Result<ConnectionConfig> {
    let mut connection = match cli.connection_name() {
        Some(name) => config.get_connection(Some(name)).cloned().ok_or_else(|| {
            KakapoError::config(format!("Connection '{}' not found in config file", name))
        })?,
        None => config.get_connection(None).cloned().unwrap_or_default(),
    };

    if let Some(overrides) = cli.to_connection_config()? {
        connection.merge(&overrides);
    }
    if cli.password.is_some() {
        connection.password = cli.password.clone();
    }
    connection.apply_env_defaults();

    Ok(connection)
}
