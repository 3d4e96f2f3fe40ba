// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # LOD-Lite Core
//!
//! Level of Development (LOD) classification for building elements exported
//! from a BIM authoring tool as schedule tables.
//!
//! ## Overview
//!
//! - **Presence check**: [`is_missing`] decides whether one attribute counts
//!   as populated. Blank text and absent values are missing; `0` and `false`
//!   are not.
//! - **Tiered classifier**: [`classify`] assigns LOD 100, 200 or 300 and lists
//!   the attributes blocking promotion to the next tier.
//! - **Profile registry**: [`Category::profile`] holds the static tier
//!   requirements per element category.
//! - **Cross-category join**: [`compute_relationship_flag`] derives the
//!   roof -> gutter companion flag.
//! - **CSV**: a nom tokenizer for schedule exports and a minimal writer.
//!
//! ## Quick Start
//!
//! ```rust
//! use lod_lite_core::{classify, Category, Record, Tier};
//!
//! let wall = Record::new()
//!     .with("Revit Type Width", "200")
//!     .with("Revit Type AUR_MATERIAL TYPE", "Concrete")
//!     .with("Item Material", "C30/37");
//!
//! let profile = Category::Wall.profile().unwrap();
//! let result = classify(&wall, profile);
//!
//! assert_eq!(result.tier, Tier::Lod200);
//! assert_eq!(
//!     result.missing_properties(),
//!     "Element Area, Element Unconnected Height, Element Length, Element Id"
//! );
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for values and results

pub mod classifier;
pub mod csv;
pub mod error;
pub mod join;
pub mod profile;
pub mod record;
pub mod value;

pub use classifier::{classify, classify_with, ClassificationResult, Tier};
pub use csv::{parse_csv, write_record, CsvTable, RecordReader};
pub use error::{Error, Result};
pub use join::{compute_relationship_flag, DEFAULT_JOIN_KEY};
pub use profile::{lookup, Category, CategoryProfile, Requirement, GUTTER_LABEL, HAS_GUTTER};
pub use record::{normalize_column_name, Attributes, Flagged, Record};
pub use value::{is_missing, AttributeValue, NA_TOKENS};
