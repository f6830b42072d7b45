//! Scripts shipped with the command line tool.

use crate::db::DataFrame;
use crate::entity::{Entity, TableData};
use crate::env::Environment;
use crate::error::{KakapoError, Result};
use crate::runner::ScriptHandler;
use async_trait::async_trait;
use serde::Serialize;

/// How built-in scripts print their results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {s}. Expected: text or json")),
        }
    }
}

/// Which collection `ListEntities` prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Scripts,
    Queries,
    Tables,
}

/// Prints the names in one of the environment's collections.
pub struct ListEntities {
    pub kind: EntityKind,
    pub format: OutputFormat,
}

/// Runs an ad-hoc statement and prints the frame.
pub struct RunQuery {
    pub sql: String,
    pub format: OutputFormat,
}

/// Fetches a whole table and prints the frame.
pub struct DumpTable {
    pub table: String,
    pub format: OutputFormat,
}

#[async_trait]
impl ScriptHandler for ListEntities {
    async fn handler(&self, env: &Environment) -> anyhow::Result<()> {
        let names = list_names(env, self.kind);
        println!("{}", render_names(&names, self.format)?);
        Ok(())
    }
}

#[async_trait]
impl ScriptHandler for RunQuery {
    async fn handler(&self, env: &Environment) -> anyhow::Result<()> {
        let frame = env.query(&self.sql).await?;
        println!("{}", render_frame(&frame, self.format)?);
        Ok(())
    }
}

#[async_trait]
impl ScriptHandler for DumpTable {
    async fn handler(&self, env: &Environment) -> anyhow::Result<()> {
        let frame = TableData::new(&self.table).df(env).await?;
        println!("{}", render_frame(&frame, self.format)?);
        Ok(())
    }
}

/// Names in the requested collection, in iteration order.
pub fn list_names(env: &Environment, kind: EntityKind) -> Vec<String> {
    fn names<'a, T: Entity + 'a>(items: impl IntoIterator<Item = &'a T>) -> Vec<String> {
        items.into_iter().map(|e| e.name().to_string()).collect()
    }

    match kind {
        EntityKind::Scripts => names(&env.scripts()),
        EntityKind::Queries => names(&env.queries()),
        EntityKind::Tables => names(&env.tables()),
    }
}

pub fn render_names(names: &[String], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text if names.is_empty() => Ok("(none)".to_string()),
        OutputFormat::Text => Ok(names.join("\n")),
        OutputFormat::Json => to_json(&names),
    }
}

pub fn render_frame(frame: &DataFrame, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(frame.to_string()),
        OutputFormat::Json => to_json(&frame.to_records()),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| KakapoError::query(format!("Cannot encode output: {e}")))
}
