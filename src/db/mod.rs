//! Database access layer.
//!
//! `DatabaseInfo` holds credentials and owns the engine, `Connection` is a
//! checked-out handle, and `DataFrame` is the tabular result type.

mod connection;
mod frame;
mod info;

pub use connection::{quote_identifier, Connection};
pub use frame::{ColumnInfo, DataFrame, Row, Value};
pub use info::{DatabaseInfo, EngineSettings};

use serde::{Deserialize, Deserializer, Serialize};

/// Supported SQL drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    #[default]
    Postgresql,
}

impl Driver {
    /// Returns the driver name as used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgresql => "postgresql",
        }
    }

    /// Parses a driver from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Some(Self::Postgresql),
            _ => None,
        }
    }

    /// Returns the default port for this driver.
    pub fn default_port(&self) -> u16 {
        match self {
            Self::Postgresql => 5432,
        }
    }

    /// Returns the URL scheme for this driver.
    pub fn url_scheme(&self) -> &'static str {
        match self {
            Self::Postgresql => "postgresql",
        }
    }
}

impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Driver {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unsupported driver '{s}'. Expected 'postgresql'"))
    }
}

impl<'de> Deserialize<'de> for Driver {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
