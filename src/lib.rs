//! kakapo-script - the environment kakapo scripts run in.
//!
//! A script receives an [`Environment`] from the [`runner`]: connection
//! info for the kakapo database, read-only views of stored scripts, queries
//! and tables, and helpers that return rows as [`DataFrame`]s.

pub mod builtin;
pub mod collection;
pub mod config;
pub mod db;
pub mod entity;
pub mod env;
pub mod error;
pub mod logging;
pub mod runner;

pub use collection::{EntityList, OnDuplicate, QueryList, ScriptList, TableDataList};
pub use config::ScriptConfig;
pub use db::{Connection, DataFrame, DatabaseInfo, Driver, Value};
pub use entity::{Entity, Query, Script, TableData};
pub use env::Environment;
pub use error::{KakapoError, Result};
pub use runner::{run, ScriptHandler};
