//! The per-invocation context handed to a script.

use crate::collection::{EntityList, QueryList, ScriptList, TableDataList};
use crate::config::ScriptConfig;
use crate::db::{Connection, DataFrame, DatabaseInfo};
use crate::error::Result;

/// Database connectivity plus the identity of the running script.
///
/// Built once per invocation and dropped when the script returns.
#[derive(Debug)]
pub struct Environment {
    database_info: DatabaseInfo,
    script_name: String,
}

impl Environment {
    pub fn new(database_info: DatabaseInfo, script_name: impl Into<String>) -> Self {
        Self {
            database_info,
            script_name: script_name.into(),
        }
    }

    /// Builds an environment from a decoded runner payload.
    pub fn from_config(config: &ScriptConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.database_info()?, &config.script_name))
    }

    pub fn database_info(&self) -> &DatabaseInfo {
        &self.database_info
    }

    pub fn script_name(&self) -> &str {
        &self.script_name
    }

    /// Checks out a new connection; it goes back to the engine when dropped.
    ///
    /// ```no_run
    /// # async fn demo(env: &kakapo_script::Environment) -> kakapo_script::Result<()> {
    /// let mut conn = env.connect().await?;
    /// let frame = conn.query("SELECT * FROM stuff").await?;
    /// for row in &frame.rows {
    ///     println!("{row:?}");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(&self) -> Result<Connection> {
        self.database_info.connect().await
    }

    /// Runs one statement on a fresh connection and returns its rows.
    pub async fn query(&self, sql: &str) -> Result<DataFrame> {
        let mut conn = self.connect().await?;
        conn.query(sql).await
    }

    /// Scripts visible to this script. Discovery is not available yet, so
    /// this is always empty.
    pub fn scripts(&self) -> ScriptList {
        ScriptList::new(EntityList::empty(), &self.script_name)
    }

    /// Stored queries visible to this script. Always empty for now.
    pub fn queries(&self) -> QueryList {
        QueryList::empty()
    }

    /// Tables visible to this script. Always empty for now.
    pub fn tables(&self) -> TableDataList {
        TableDataList::empty()
    }
}
