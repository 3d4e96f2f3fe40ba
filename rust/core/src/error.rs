// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for LOD classification inputs.

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading tabular input or resolving categories.
///
/// Classification itself never fails: absent attributes and absent columns
/// are reported as missing properties, not as errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Tabular data could not be tokenized.
    #[error("malformed input at line {line}: {message}")]
    MalformedInput { line: usize, message: String },

    /// A category label did not resolve to any known element category.
    #[error("unknown element category: {0:?}")]
    UnknownCategory(String),
}

impl Error {
    /// Create a malformed input error at a 1-based line number.
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Error::MalformedInput {
            line,
            message: message.into(),
        }
    }
}
