// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the batch pipeline.

use std::path::{Path, PathBuf};

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal pipeline errors.
///
/// Missing per-category files and absent profile columns are not errors; they
/// are logged and recorded in the run report instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input path itself does not exist.
    #[error("input not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// Combined input without the category discriminator column.
    #[error("{}: missing category column {column:?}", path.display())]
    MissingDiscriminator { path: PathBuf, column: String },

    /// Unparseable tabular data.
    #[error("{}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: lod_lite_core::Error,
    },

    /// Filesystem failure while reading input or writing output.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Run report serialization failed.
    #[error("failed to serialize run report: {0}")]
    Report(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn malformed(path: &Path, source: lod_lite_core::Error) -> Self {
        Error::Malformed {
            path: path.to_path_buf(),
            source,
        }
    }
}
