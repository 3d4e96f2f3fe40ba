// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Run report: per-category counts and skip reasons.

use std::fmt;
use std::path::{Path, PathBuf};

use lod_lite_core::{Category, ClassificationResult, Tier};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::input::InputMode;

/// What happened to one category during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryStatus {
    Classified,
    /// No dataset for this category was found.
    MissingInput,
    /// The companion dataset needed for the join was absent; rows were
    /// passed through unclassified.
    MissingCompanion,
}

impl fmt::Display for CategoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CategoryStatus::Classified => "classified",
            CategoryStatus::MissingInput => "missing input",
            CategoryStatus::MissingCompanion => "missing companion",
        })
    }
}

/// Summary for one classified category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    pub source: &'static str,
    pub status: CategoryStatus,
    pub records: usize,
    pub lod_100: usize,
    pub lod_200: usize,
    pub lod_300: usize,
    /// Profile columns absent from the dataset.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub absent_columns: Vec<String>,
}

impl CategorySummary {
    pub fn new(category: Category, status: CategoryStatus) -> Self {
        Self {
            category,
            source: category.source_label(),
            status,
            records: 0,
            lod_100: 0,
            lod_200: 0,
            lod_300: 0,
            absent_columns: Vec::new(),
        }
    }

    /// Count one classification result.
    pub fn record(&mut self, result: &ClassificationResult) {
        self.records += 1;
        match result.tier {
            Tier::Lod100 => self.lod_100 += 1,
            Tier::Lod200 => self.lod_200 += 1,
            Tier::Lod300 => self.lod_300 += 1,
        }
    }

    pub fn count(&self, tier: Tier) -> usize {
        match tier {
            Tier::Lod100 => self.lod_100,
            Tier::Lod200 => self.lod_200,
            Tier::Lod300 => self.lod_300,
        }
    }
}

/// Outcome of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub mode: InputMode,
    pub input: PathBuf,
    pub output: PathBuf,
    /// One entry per classified category, in processing order.
    pub categories: Vec<CategorySummary>,
    pub passthrough_rows: usize,
    pub total_rows: usize,
}

impl RunReport {
    pub fn classified_rows(&self) -> usize {
        self.categories.iter().map(|c| c.lod_100 + c.lod_200 + c.lod_300).sum()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| Error::io(path, e))
    }
}
