// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Input discovery: per-category export directory or one combined table.

use std::path::{Path, PathBuf};

use lod_lite_core::{Category, Record};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::BatchConfig;

/// How the input was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// A directory holding one export file per category.
    Directory,
    /// One table with a category discriminator column.
    Combined,
}

/// A row that is written through without classification.
#[derive(Debug, Clone, PartialEq)]
pub struct PassthroughRow {
    /// Value for the `Source` column.
    pub source: String,
    pub record: Record,
    /// Row position in the input file, used to keep passthrough rows in input order.
    pub position: usize,
}

/// Everything loaded for one run, grouped by category.
#[derive(Debug, Clone)]
pub struct CategoryInputs {
    pub mode: InputMode,
    /// Datasets for known categories, including secondary ones (gutters).
    pub datasets: FxHashMap<Category, Dataset>,
    /// Rows of unrecognized categories, in input order. In combined mode this
    /// also holds the secondary-category rows.
    pub unsupported: Vec<PassthroughRow>,
    /// Columns of the unsupported rows.
    pub unsupported_columns: Vec<String>,
    /// Input row positions of each dataset's records. Combined mode only;
    /// in directory mode a record's position is its index in its own file.
    pub positions: FxHashMap<Category, Vec<usize>>,
}

impl CategoryInputs {
    /// Input position of the `index`-th record of `category`.
    pub fn position(&self, category: Category, index: usize) -> usize {
        self.positions
            .get(&category)
            .and_then(|positions| positions.get(index))
            .copied()
            .unwrap_or(index)
    }
}

/// Load inputs from a directory or a combined file.
pub fn load_inputs(path: &Path, config: &BatchConfig) -> Result<CategoryInputs> {
    if !path.exists() {
        return Err(Error::MissingInput(path.to_path_buf()));
    }

    if path.is_dir() {
        load_directory(path)
    } else {
        load_combined(path, &config.category_column)
    }
}

/// Load per-category export files from a directory.
///
/// A category whose file is absent is left out; the batch runner reports it
/// as skipped.
pub fn load_directory(dir: &Path) -> Result<CategoryInputs> {
    let mut datasets = FxHashMap::default();

    for category in Category::ALL {
        match find_category_file(dir, category) {
            Some(path) => {
                let dataset = Dataset::load(&path)?;
                tracing::debug!(
                    category = %category,
                    path = %path.display(),
                    records = dataset.len(),
                    "Loaded category export"
                );
                datasets.insert(category, dataset);
            }
            None => {
                tracing::warn!(
                    category = %category,
                    expected = ?category.file_names(),
                    dir = %dir.display(),
                    "Category export not found"
                );
            }
        }
    }

    Ok(CategoryInputs {
        mode: InputMode::Directory,
        datasets,
        unsupported: Vec::new(),
        unsupported_columns: Vec::new(),
        positions: FxHashMap::default(),
    })
}

fn find_category_file(dir: &Path, category: Category) -> Option<PathBuf> {
    category
        .file_names()
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Load one table and split it by the discriminator column.
pub fn load_combined(path: &Path, category_column: &str) -> Result<CategoryInputs> {
    let dataset = Dataset::load(path)?;

    if !dataset.has_column(category_column) {
        return Err(Error::MissingDiscriminator {
            path: path.to_path_buf(),
            column: category_column.to_string(),
        });
    }

    Ok(split_by_category(dataset, category_column))
}

/// Partition a combined dataset by category, keeping row order within each part.
pub fn split_by_category(dataset: Dataset, category_column: &str) -> CategoryInputs {
    let Dataset { columns, records } = dataset;
    let mut datasets: FxHashMap<Category, Dataset> = FxHashMap::default();
    let mut positions: FxHashMap<Category, Vec<usize>> = FxHashMap::default();
    let mut unsupported = Vec::new();
    let mut unknown_labels: FxHashMap<String, usize> = FxHashMap::default();

    for (position, record) in records.into_iter().enumerate() {
        let label = record
            .get(category_column)
            .map(|value| value.to_string().trim().to_string())
            .unwrap_or_default();

        match Category::from_label(&label) {
            Some(category) => {
                let part = datasets.entry(category).or_insert_with(|| Dataset {
                    columns: columns.clone(),
                    records: Vec::new(),
                });
                positions.entry(category).or_default().push(position);
                if category.profile().is_some() {
                    part.records.push(record);
                } else {
                    // Secondary rows feed the join and are still written out.
                    part.records.push(record.clone());
                    unsupported.push(PassthroughRow {
                        source: label,
                        record,
                        position,
                    });
                }
            }
            None => {
                *unknown_labels.entry(label.clone()).or_default() += 1;
                unsupported.push(PassthroughRow {
                    source: label,
                    record,
                    position,
                });
            }
        }
    }

    for (label, rows) in &unknown_labels {
        tracing::warn!(category = %label, rows, "Unsupported category; rows passed through");
    }

    CategoryInputs {
        mode: InputMode::Combined,
        datasets,
        unsupported,
        unsupported_columns: columns,
        positions,
    }
}
