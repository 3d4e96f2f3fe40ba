// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # LOD-Lite Processing
//!
//! Batch pipeline around [`lod_lite_core`]: load schedule exports, classify
//! every supported category, and write one combined table plus a
//! [`RunReport`].
//!
//! ```no_run
//! use lod_lite_processing::{run, BatchConfig, RunRequest};
//!
//! let request = RunRequest {
//!     input: "exports/".into(),
//!     output: "lod.csv".into(),
//!     config: BatchConfig::default(),
//! };
//! let report = run(&request)?;
//! println!("{} rows written", report.total_rows);
//! # Ok::<(), lod_lite_processing::Error>(())
//! ```

use std::path::PathBuf;
use std::time::Instant;

use lod_lite_core::{normalize_column_name, DEFAULT_JOIN_KEY};

pub mod batch;
pub mod dataset;
pub mod error;
pub mod input;
pub mod output;
pub mod report;

pub use batch::{classify_dataset, run_batch, BatchOutcome};
pub use dataset::Dataset;
pub use error::{Error, Result};
pub use input::{load_inputs, CategoryInputs, InputMode, PassthroughRow};
pub use output::{OutputRow, OutputTable, DERIVED_COLUMNS};
pub use report::{CategoryStatus, CategorySummary, RunReport};

/// Default discriminator column for combined input.
pub const DEFAULT_CATEGORY_COLUMN: &str = "Category";

/// Options that shape how inputs are read and joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Discriminator column in combined mode.
    pub category_column: String,
    /// Column matched between roofs and gutters.
    pub join_key: String,
}

impl BatchConfig {
    /// Build a config from user-supplied column names.
    ///
    /// Names are normalized like input headers, so `"Category "` still
    /// finds the `Category` column.
    pub fn new(category_column: &str, join_key: &str) -> Self {
        Self {
            category_column: normalize_column_name(category_column),
            join_key: normalize_column_name(join_key),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            category_column: DEFAULT_CATEGORY_COLUMN.to_string(),
            join_key: DEFAULT_JOIN_KEY.to_string(),
        }
    }
}

/// One classification run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Export directory or combined CSV file.
    pub input: PathBuf,
    pub output: PathBuf,
    pub config: BatchConfig,
}

/// Load, classify and write. The output file is only replaced on success.
pub fn run(request: &RunRequest) -> Result<RunReport> {
    let start = Instant::now();
    tracing::info!(
        input = %request.input.display(),
        output = %request.output.display(),
        "Starting LOD classification"
    );

    let inputs = load_inputs(&request.input, &request.config)?;
    let mode = inputs.mode;
    let BatchOutcome {
        table,
        categories,
        passthrough_rows,
    } = run_batch(inputs, &request.config);

    table.write_file(&request.output)?;

    let report = RunReport {
        mode,
        input: request.input.clone(),
        output: request.output.clone(),
        categories,
        passthrough_rows,
        total_rows: table.len(),
    };

    tracing::info!(
        mode = ?mode,
        rows = report.total_rows,
        classified = report.classified_rows(),
        passthrough = report.passthrough_rows,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "LOD classification complete"
    );

    Ok(report)
}
