// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Combined output table.
//!
//! Columns are the union of all input columns in first-seen order, followed
//! by the derived LOD columns and `Source`.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use lod_lite_core::{write_record, ClassificationResult, Record};
use rustc_hash::FxHashSet;

use crate::error::{Error, Result};

pub const LOD_COLUMN: &str = "LOD";
pub const MISSING_COLUMN: &str = "Missing_Properties";
pub const LOD_100_COLUMN: &str = "LOD_100";
pub const LOD_200_COLUMN: &str = "LOD_200";
pub const LOD_300_COLUMN: &str = "LOD_300";
pub const SOURCE_COLUMN: &str = "Source";

/// Derived columns appended after the input columns, in output order.
pub const DERIVED_COLUMNS: [&str; 6] = [
    LOD_COLUMN,
    MISSING_COLUMN,
    LOD_100_COLUMN,
    LOD_200_COLUMN,
    LOD_300_COLUMN,
    SOURCE_COLUMN,
];

/// One output row.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    pub record: Record,
    /// `None` for rows passed through unclassified.
    pub classification: Option<ClassificationResult>,
    pub source: String,
}

impl OutputRow {
    /// Cells for the LOD columns (everything in [`DERIVED_COLUMNS`] but `Source`).
    ///
    /// Unclassified rows keep whatever the record already carried, which is
    /// empty unless the input was itself a previous output.
    fn lod_cells(&self) -> [String; 5] {
        match &self.classification {
            Some(result) => {
                let [is_100, is_200, is_300] = result.indicators();
                [
                    result.tier.to_string(),
                    result.missing_properties(),
                    indicator(is_100),
                    indicator(is_200),
                    indicator(is_300),
                ]
            }
            None => [
                LOD_COLUMN,
                MISSING_COLUMN,
                LOD_100_COLUMN,
                LOD_200_COLUMN,
                LOD_300_COLUMN,
            ]
            .map(|column| {
                self.record
                    .get(column)
                    .map(ToString::to_string)
                    .unwrap_or_default()
            }),
        }
    }
}

#[inline]
fn indicator(flag: bool) -> String {
    String::from(if flag { "1" } else { "0" })
}

/// Accumulates rows and the column union.
#[derive(Debug, Clone, Default)]
pub struct OutputTable {
    columns: Vec<String>,
    seen: FxHashSet<String>,
    rows: Vec<OutputRow>,
}

impl OutputTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add input columns not yet present. Names that collide with derived
    /// columns are skipped; those cells are recomputed.
    pub fn add_columns(&mut self, columns: &[String]) {
        for column in columns {
            if DERIVED_COLUMNS.contains(&column.as_str()) {
                continue;
            }
            if self.seen.insert(column.clone()) {
                self.columns.push(column.clone());
            }
        }
    }

    pub fn push(&mut self, row: OutputRow) {
        self.rows.push(row);
    }

    /// Input columns (without the derived ones).
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[OutputRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Full header: input columns then derived columns.
    pub fn header(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .map(String::as_str)
            .chain(DERIVED_COLUMNS.iter().copied())
    }

    /// Cells of one row, aligned with [`OutputTable::header`].
    pub fn cells(&self, row: &OutputRow) -> Vec<String> {
        let mut cells: Vec<String> = self
            .columns
            .iter()
            .map(|column| {
                row.record
                    .get(column)
                    .map(ToString::to_string)
                    .unwrap_or_default()
            })
            .collect();
        cells.extend(row.lod_cells());
        cells.push(row.source.clone());
        cells
    }

    /// Write the table as CSV.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write_record(out, self.header())?;
        for row in &self.rows {
            write_record(out, self.cells(row))?;
        }
        out.flush()
    }

    /// Write the table to `path`.
    ///
    /// Writes a sibling temp file first and renames it over `path`, so a
    /// failed run never leaves a truncated output behind.
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut tmp = path.as_os_str().to_os_string();
        tmp.push(".tmp");
        let tmp = Path::new(&tmp);

        let file = File::create(tmp).map_err(|e| Error::io(tmp, e))?;
        let mut writer = BufWriter::new(file);
        if let Err(e) = self.write_to(&mut writer) {
            let _ = std::fs::remove_file(tmp);
            return Err(Error::io(tmp, e));
        }
        drop(writer);

        std::fs::rename(tmp, path).map_err(|e| Error::io(path, e))?;
        tracing::debug!(
            path = %path.display(),
            rows = self.rows.len(),
            columns = self.columns.len() + DERIVED_COLUMNS.len(),
            "Wrote output table"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lod_lite_core::Tier;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn render(table: &OutputTable) -> String {
        let mut out = Vec::new();
        table.write_to(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_column_union_keeps_first_seen_order() {
        let mut table = OutputTable::new();
        table.add_columns(&columns(&["Element Area", "Element Id"]));
        table.add_columns(&columns(&["Element Slope", "Element Area", "LOD"]));
        assert_eq!(table.columns(), &["Element Area", "Element Id", "Element Slope"]);

        let header: Vec<&str> = table.header().collect();
        assert_eq!(header.len(), 9);
        assert_eq!(&header[3..], &DERIVED_COLUMNS);
    }

    #[test]
    fn test_classified_row_cells() {
        let mut table = OutputTable::new();
        table.add_columns(&columns(&["Element Slope"]));
        table.push(OutputRow {
            record: Record::new().with("Element Slope", "15"),
            classification: Some(ClassificationResult {
                tier: Tier::Lod200,
                missing: vec!["Gutter".to_string()],
            }),
            source: "Roof".to_string(),
        });

        assert_eq!(
            render(&table),
            "Element Slope,LOD,Missing_Properties,LOD_100,LOD_200,LOD_300,Source\n\
             15,200,Gutter,0,1,0,Roof\n"
        );
    }

    #[test]
    fn test_passthrough_row_has_empty_lod_cells() {
        let mut table = OutputTable::new();
        table.add_columns(&columns(&["Category", "Mark"]));
        table.push(OutputRow {
            record: Record::new().with("Category", "Doors").with("Mark", "D-01"),
            classification: None,
            source: "Doors".to_string(),
        });

        assert_eq!(
            render(&table),
            "Category,Mark,LOD,Missing_Properties,LOD_100,LOD_200,LOD_300,Source\n\
             Doors,D-01,,,,,,Doors\n"
        );
    }

    #[test]
    fn test_passthrough_keeps_prior_lod_values() {
        let mut table = OutputTable::new();
        table.add_columns(&columns(&["Mark", "LOD", "LOD_100"]));
        table.push(OutputRow {
            record: Record::new()
                .with("Mark", "D-01")
                .with("LOD", "100")
                .with("LOD_100", "1"),
            classification: None,
            source: "Doors".to_string(),
        });

        assert_eq!(
            render(&table),
            "Mark,LOD,Missing_Properties,LOD_100,LOD_200,LOD_300,Source\n\
             D-01,100,,1,,,Doors\n"
        );
    }

    #[test]
    fn test_missing_properties_are_quoted() {
        let mut table = OutputTable::new();
        table.push(OutputRow {
            record: Record::new(),
            classification: Some(ClassificationResult {
                tier: Tier::Lod100,
                missing: vec!["Element Type".to_string(), "Element Area".to_string()],
            }),
            source: "Floors".to_string(),
        });

        let text = render(&table);
        assert!(text.ends_with("100,\"Element Type, Element Area\",1,0,0,Floors\n"));
    }

    #[test]
    fn test_write_file_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale").unwrap();

        let mut table = OutputTable::new();
        table.add_columns(&columns(&["Mark"]));
        table.write_file(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "Mark,LOD,Missing_Properties,LOD_100,LOD_200,LOD_300,Source\n");
        assert!(!dir.path().join("out.csv.tmp").exists());
    }
}
