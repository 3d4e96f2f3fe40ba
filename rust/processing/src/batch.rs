// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Batch runner: classify every category and assemble the output table.

use lod_lite_core::{
    classify, compute_relationship_flag, Category, CategoryProfile, ClassificationResult, Flagged,
    Tier,
};

use crate::dataset::Dataset;
use crate::input::{CategoryInputs, InputMode, PassthroughRow};
use crate::output::{OutputRow, OutputTable};
use crate::report::{CategoryStatus, CategorySummary};
use crate::BatchConfig;

/// Result of a batch run, before anything is written.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub table: OutputTable,
    /// One entry per classified category, in processing order.
    pub categories: Vec<CategorySummary>,
    pub passthrough_rows: usize,
}

/// Classify every record of `dataset`.
///
/// When the profile carries a companion flag and `companion` is given, the
/// flag is computed by joining on `join_key` and overlaid on each record.
/// Without a companion dataset the flag is simply absent, so it shows up as
/// missing.
pub fn classify_dataset(
    dataset: &Dataset,
    profile: &CategoryProfile,
    companion: Option<&Dataset>,
    join_key: &str,
) -> Vec<ClassificationResult> {
    match (profile.companion_flag(), companion) {
        (Some(flag), Some(secondary)) => {
            let flags = compute_relationship_flag(&dataset.records, &secondary.records, join_key);
            dataset
                .records
                .iter()
                .zip(flags)
                .map(|(record, present)| classify(&Flagged::new(record, flag, present), profile))
                .collect()
        }
        _ => dataset
            .records
            .iter()
            .map(|record| classify(record, profile))
            .collect(),
    }
}

/// Classify all categories in processing order, then append passthrough rows.
///
/// Passthrough rows (unsupported categories, secondary rows, and categories
/// skipped for a missing companion) follow every classified row, in input order.
pub fn run_batch(mut inputs: CategoryInputs, config: &BatchConfig) -> BatchOutcome {
    let mut table = OutputTable::new();
    let mut categories = Vec::with_capacity(Category::CLASSIFIED.len());
    let mut deferred: Vec<PassthroughRow> = Vec::new();

    for category in Category::CLASSIFIED {
        let Some(profile) = category.profile() else {
            continue;
        };

        let Some(dataset) = inputs.datasets.remove(&category) else {
            if inputs.mode == InputMode::Directory {
                tracing::warn!(category = %category, "No export for category; skipped");
            } else {
                tracing::debug!(category = %category, "No rows for category");
            }
            categories.push(CategorySummary::new(category, CategoryStatus::MissingInput));
            continue;
        };

        table.add_columns(&dataset.columns);

        let companion = match profile.companion {
            Some(secondary) => match inputs.datasets.get(&secondary) {
                Some(found) => Some(found),
                None => {
                    tracing::warn!(
                        category = %category,
                        companion = %secondary,
                        rows = dataset.len(),
                        "Companion data missing; rows passed through unclassified"
                    );
                    let mut summary =
                        CategorySummary::new(category, CategoryStatus::MissingCompanion);
                    summary.records = dataset.len();
                    for (index, record) in dataset.records.into_iter().enumerate() {
                        deferred.push(PassthroughRow {
                            source: category.source_label().to_string(),
                            record,
                            position: inputs.position(category, index),
                        });
                    }
                    categories.push(summary);
                    continue;
                }
            },
            None => None,
        };

        let mut summary = CategorySummary::new(category, CategoryStatus::Classified);
        summary.absent_columns = absent_columns(&dataset, profile, companion, &config.join_key);
        if !summary.absent_columns.is_empty() {
            tracing::warn!(
                category = %category,
                columns = ?summary.absent_columns,
                "Profile columns absent from dataset; treated as missing"
            );
        }

        let results = classify_dataset(&dataset, profile, companion, &config.join_key);
        for (record, result) in dataset.records.into_iter().zip(results) {
            summary.record(&result);
            table.push(OutputRow {
                record,
                classification: Some(result),
                source: category.source_label().to_string(),
            });
        }

        tracing::debug!(
            category = %category,
            records = summary.records,
            lod_100 = summary.count(Tier::Lod100),
            lod_200 = summary.count(Tier::Lod200),
            lod_300 = summary.count(Tier::Lod300),
            "Classified category"
        );
        categories.push(summary);
    }

    if !inputs.unsupported.is_empty() {
        table.add_columns(&inputs.unsupported_columns);
        deferred.append(&mut inputs.unsupported);
    }

    // Stable: rows sharing a position keep their push order.
    deferred.sort_by_key(|row| row.position);
    let passthrough_rows = deferred.len();
    for row in deferred {
        table.push(OutputRow {
            record: row.record,
            classification: None,
            source: row.source,
        });
    }

    BatchOutcome {
        table,
        categories,
        passthrough_rows,
    }
}

/// Profile columns (and the join key, for joined categories) missing from
/// the datasets involved.
fn absent_columns(
    dataset: &Dataset,
    profile: &CategoryProfile,
    companion: Option<&Dataset>,
    join_key: &str,
) -> Vec<String> {
    let mut absent: Vec<String> = dataset
        .absent_columns(profile.required_columns())
        .into_iter()
        .map(str::to_string)
        .collect();

    if let Some(secondary) = companion {
        if !dataset.has_column(join_key) || !secondary.has_column(join_key) {
            absent.push(join_key.to_string());
        }
    }

    absent
}
