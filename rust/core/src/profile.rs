// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Category profile registry.
//!
//! One static [`CategoryProfile`] per supported element category. Attribute
//! names are the normalized column headers of the authoring tool's schedule
//! export (see [`crate::normalize_column_name`]).

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::record::Attributes;
use crate::value::{is_missing, AttributeValue};

/// Synthetic attribute carrying the roof -> gutter relationship.
pub const HAS_GUTTER: &str = "Has_Gutter";

/// Display label reported when the gutter relationship is missing.
pub const GUTTER_LABEL: &str = "Gutter";

/// A single requirement on a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// A raw column that must be present (see [`crate::is_missing`]).
    Attribute(&'static str),
    /// A synthetic boolean flag computed by the cross-category join. Reported
    /// under `label` instead of the flag name when false.
    Companion {
        flag: &'static str,
        label: &'static str,
    },
}

impl Requirement {
    /// Attribute name looked up on the record.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Requirement::Attribute(name) => name,
            Requirement::Companion { flag, .. } => flag,
        }
    }

    /// Name reported in the missing list.
    #[inline]
    pub fn label(&self) -> &'static str {
        match self {
            Requirement::Attribute(name) => name,
            Requirement::Companion { label, .. } => label,
        }
    }

    #[inline]
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Requirement::Companion { .. })
    }

    /// Whether the record satisfies this requirement.
    pub fn is_satisfied_by<A: Attributes + ?Sized>(&self, record: &A) -> bool {
        match self {
            Requirement::Attribute(name) => !is_missing(record.attribute(name)),
            Requirement::Companion { flag, .. } => record
                .attribute(flag)
                .is_some_and(AttributeValue::is_truthy),
        }
    }
}

/// Tier requirements for one element category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryProfile {
    /// Must all be present to reach LOD 200. Empty means no gate.
    pub tier200: &'static [Requirement],
    /// Must all be present (on top of tier 200) to reach LOD 300.
    pub tier300: &'static [Requirement],
    /// Secondary category joined in to compute the companion flag, if any.
    pub companion: Option<Category>,
}

impl CategoryProfile {
    /// Synthetic flag this profile expects the join to provide.
    pub fn companion_flag(&self) -> Option<&'static str> {
        self.requirements()
            .find(|req| req.is_synthetic())
            .map(|req| req.name())
    }

    /// All requirements in check order (tier 200 first).
    pub fn requirements(&self) -> impl Iterator<Item = &'static Requirement> {
        self.tier200.iter().chain(self.tier300.iter())
    }

    /// Raw column names this profile reads, in check order.
    pub fn required_columns(&self) -> impl Iterator<Item = &'static str> {
        self.requirements()
            .filter(|req| !req.is_synthetic())
            .map(|req| req.name())
    }
}

use self::Requirement::Attribute;

static WALL: CategoryProfile = CategoryProfile {
    tier200: &[
        Attribute("Revit Type Width"),
        Attribute("Revit Type AUR_MATERIAL TYPE"),
        Attribute("Item Material"),
    ],
    tier300: &[
        Attribute("Element Area"),
        Attribute("Element Unconnected Height"),
        Attribute("Element Length"),
        Attribute("Element Id"),
    ],
    companion: None,
};

static ROOF: CategoryProfile = CategoryProfile {
    tier200: &[Attribute("Element Thickness")],
    tier300: &[
        Attribute("Element Slope"),
        Requirement::Companion {
            flag: HAS_GUTTER,
            label: GUTTER_LABEL,
        },
    ],
    companion: Some(Category::Gutter),
};

static STRUCTURAL_FRAMING: CategoryProfile = CategoryProfile {
    tier200: &[],
    tier300: &[
        Attribute("Element Length"),
        Attribute("Element Structural Material"),
        Attribute("Element Name"),
        Attribute("Element Category"),
        Attribute("Element Family"),
        Attribute("Revit Type AUR_MATERIAL TYPE"),
    ],
    companion: None,
};

static FLOOR: CategoryProfile = CategoryProfile {
    tier200: &[
        Attribute("Element Type"),
        Attribute("Element Family"),
        Attribute("Element Area"),
    ],
    tier300: &[
        Attribute("Element Elevation at Top"),
        Attribute("Element Elevation at Bottom"),
        Attribute("Element Thickness"),
        Attribute("Revit Type Structural Material"),
    ],
    companion: None,
};

static CEILING: CategoryProfile = CategoryProfile {
    tier200: &[Attribute("Element Category"), Attribute("Element Family")],
    tier300: &[
        Attribute("Element Area"),
        Attribute("Element Length"),
        Attribute("Element Thickness"),
    ],
    companion: None,
};

/// Element categories known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    Wall,
    Roof,
    StructuralFraming,
    Floor,
    Ceiling,
    /// Secondary only: joined against roofs, never classified.
    Gutter,
}

impl Category {
    /// Classified categories, in processing (and output) order.
    pub const CLASSIFIED: [Category; 5] = [
        Category::Wall,
        Category::Roof,
        Category::StructuralFraming,
        Category::Floor,
        Category::Ceiling,
    ];

    /// Every known category, classified ones first.
    pub const ALL: [Category; 6] = [
        Category::Wall,
        Category::Roof,
        Category::StructuralFraming,
        Category::Floor,
        Category::Ceiling,
        Category::Gutter,
    ];

    /// Label written to the `Source` output column.
    pub fn source_label(self) -> &'static str {
        match self {
            Category::Wall => "BasicWall",
            Category::Roof => "Roof",
            Category::StructuralFraming => "StructuralFraming",
            Category::Floor => "Floors",
            Category::Ceiling => "Ceilings",
            Category::Gutter => "Gutters",
        }
    }

    /// Per-category export file names, in lookup order.
    pub fn file_names(self) -> &'static [&'static str] {
        match self {
            Category::Wall => &["AllBasicWalls.csv"],
            Category::Roof => &["Roofs.csv"],
            // The export tooling historically misspells this one.
            Category::StructuralFraming => &["StructualFraming.csv", "StructuralFraming.csv"],
            Category::Floor => &["Floors.csv"],
            Category::Ceiling => &["Ceilings.csv"],
            Category::Gutter => &["Gutters.csv"],
        }
    }

    /// Profile for this category. `None` for secondary-only categories.
    pub fn profile(self) -> Option<&'static CategoryProfile> {
        match self {
            Category::Wall => Some(&WALL),
            Category::Roof => Some(&ROOF),
            Category::StructuralFraming => Some(&STRUCTURAL_FRAMING),
            Category::Floor => Some(&FLOOR),
            Category::Ceiling => Some(&CEILING),
            Category::Gutter => None,
        }
    }

    /// Resolve a category from a discriminator value.
    ///
    /// Case-insensitive; whitespace, `_` and `-` are ignored, and singular,
    /// plural and source-label spellings are all accepted.
    pub fn from_label(label: &str) -> Option<Self> {
        let key: String = label
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        let category = match key.as_str() {
            "wall" | "walls" | "basicwall" | "basicwalls" | "allbasicwalls" => Category::Wall,
            "roof" | "roofs" => Category::Roof,
            "structuralframing" | "structualframing" | "framing" => Category::StructuralFraming,
            "floor" | "floors" => Category::Floor,
            "ceiling" | "ceilings" => Category::Ceiling,
            "gutter" | "gutters" => Category::Gutter,
            _ => return None,
        };
        Some(category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source_label())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_label(s).ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// Look up a profile by category name. Unknown names have no profile.
pub fn lookup(name: &str) -> Option<(Category, &'static CategoryProfile)> {
    let category = Category::from_label(name)?;
    category.profile().map(|profile| (category, profile))
}
