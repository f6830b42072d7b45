//! Named server-side objects a script can see.

use crate::db::{quote_identifier, DataFrame};
use crate::env::Environment;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Anything stored on the server under a name.
pub trait Entity {
    fn name(&self) -> &str;
}

/// A stored script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub name: String,
}

impl Script {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Entity for Script {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A stored query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub name: String,
}

impl Query {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Entity for Query {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A table whose rows can be fetched as a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableData {
    pub name: String,
}

impl TableData {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The statement `df` runs.
    pub fn select_statement(&self) -> String {
        format!("SELECT * FROM {}", quote_identifier(&self.name))
    }

    /// Fetches the whole table.
    pub async fn df(&self, env: &Environment) -> Result<DataFrame> {
        env.query(&self.select_statement()).await
    }
}

impl Entity for TableData {
    fn name(&self) -> &str {
        &self.name
    }
}
