// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration loaded from environment variables.

use std::str::FromStr;

use lod_lite_core::DEFAULT_JOIN_KEY;
use lod_lite_processing::DEFAULT_CATEGORY_COLUMN;

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn,lod_lite=info,lod_lite_processing=info";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Discriminator column for combined input.
    pub category_column: String,
    /// Column joined between roofs and gutters.
    pub join_key: String,
    pub log_format: LogFormat,
    /// `tracing_subscriber::EnvFilter` directives.
    pub log_filter: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        Self {
            category_column: non_empty("LOD_CATEGORY_COLUMN")
                .unwrap_or_else(|| DEFAULT_CATEGORY_COLUMN.into()),
            join_key: non_empty("LOD_JOIN_KEY").unwrap_or_else(|| DEFAULT_JOIN_KEY.into()),
            log_format: non_empty("LOD_LOG_FORMAT")
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            log_filter: non_empty("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.into()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
