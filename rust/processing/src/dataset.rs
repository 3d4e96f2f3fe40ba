// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tabular datasets: normalized columns plus one [`Record`] per row.

use std::path::Path;

use lod_lite_core::{normalize_column_name, parse_csv, AttributeValue, CsvTable, Record};
use rustc_hash::FxHashSet;

use crate::error::{Error, Result};

/// One loaded table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Normalized, unique column names in file order.
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    /// Build from a parsed table, normalizing headers.
    ///
    /// Headers that collide after normalization get `.1`, `.2`, ... suffixes
    /// so no cell is silently dropped.
    pub fn from_table(table: CsvTable) -> Self {
        let columns = unique_columns(table.headers.iter().map(|h| normalize_column_name(h)));

        let records = table
            .rows
            .into_iter()
            .map(|row| {
                columns
                    .iter()
                    .zip(row.iter())
                    .map(|(column, cell)| (column.clone(), AttributeValue::from_cell(cell)))
                    .collect::<Record>()
            })
            .collect();

        Self { columns, records }
    }

    /// Parse CSV text.
    pub fn parse(content: &str) -> lod_lite_core::Result<Self> {
        parse_csv(content).map(Self::from_table)
    }

    /// Read and parse a CSV file.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;

        let content = String::from_utf8(bytes).map_err(|e| {
            let valid = e.utf8_error().valid_up_to();
            let line = 1 + e.as_bytes()[..valid].iter().filter(|b| **b == b'\n').count();
            Error::malformed(
                path,
                lod_lite_core::Error::malformed(line, "input is not valid UTF-8"),
            )
        })?;

        let dataset = Self::parse(&content).map_err(|e| Error::malformed(path, e))?;
        tracing::debug!(
            path = %path.display(),
            columns = dataset.columns.len(),
            records = dataset.records.len(),
            "Loaded dataset"
        );
        Ok(dataset)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Names from `names` that are not columns of this dataset.
    pub fn absent_columns<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        names.into_iter().filter(|name| !self.has_column(name)).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn unique_columns(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = FxHashSet::default();
    let mut columns = Vec::new();

    for name in names {
        let mut candidate = name.clone();
        let mut n = 1;
        while !seen.insert(candidate.clone()) {
            candidate = format!("{}.{}", name, n);
            n += 1;
        }
        columns.push(candidate);
    }

    columns
}
