// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tiered LOD classifier.
//!
//! A record starts at LOD 100. It reaches LOD 200 when every tier-200
//! requirement is present, and LOD 300 when every tier-300 requirement is
//! present as well. Tier-300 requirements are only checked once the tier-200
//! gate has passed, so a record that fails the gate reports only its tier-200
//! gaps.

use std::fmt;

use crate::profile::{CategoryProfile, Requirement};
use crate::record::Attributes;

/// Level of Development tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tier {
    Lod100,
    Lod200,
    Lod300,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Lod100, Tier::Lod200, Tier::Lod300];

    /// Numeric LOD value (100, 200 or 300).
    #[inline]
    pub fn value(self) -> u16 {
        match self {
            Tier::Lod100 => 100,
            Tier::Lod200 => 200,
            Tier::Lod300 => 300,
        }
    }

    /// Position in [`Tier::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Outcome of classifying one record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassificationResult {
    pub tier: Tier,
    /// Missing attribute names (or companion labels) in check order.
    /// Empty exactly when `tier` is LOD 300.
    pub missing: Vec<String>,
}

impl ClassificationResult {
    /// One-hot tier indicators: `[is_100, is_200, is_300]`.
    #[inline]
    pub fn indicators(&self) -> [bool; 3] {
        let mut flags = [false; 3];
        flags[self.tier.index()] = true;
        flags
    }

    /// Missing properties joined for display, empty when nothing is missing.
    pub fn missing_properties(&self) -> String {
        self.missing.join(", ")
    }
}

/// Classify a record against a category profile.
pub fn classify<A: Attributes + ?Sized>(record: &A, profile: &CategoryProfile) -> ClassificationResult {
    classify_with(record, profile.tier300, profile.tier200)
}

/// Classify a record against explicit requirement lists.
///
/// An empty `tier200` list means there is no gate: tier 200 is reached
/// unconditionally and only `tier300` controls promotion.
pub fn classify_with<A: Attributes + ?Sized>(
    record: &A,
    tier300: &[Requirement],
    tier200: &[Requirement],
) -> ClassificationResult {
    let mut missing = Vec::new();
    let mut tier = Tier::Lod100;

    if check_tier(record, tier200, &mut missing) {
        tier = Tier::Lod200;
        if check_tier(record, tier300, &mut missing) {
            tier = Tier::Lod300;
        }
    }

    ClassificationResult { tier, missing }
}

/// Checks every requirement (no short-circuit) and records the gaps.
fn check_tier<A: Attributes + ?Sized>(
    record: &A,
    requirements: &[Requirement],
    missing: &mut Vec<String>,
) -> bool {
    let mut all_present = true;
    for req in requirements {
        if !req.is_satisfied_by(record) {
            all_present = false;
            let label = req.label();
            if !missing.iter().any(|m| m == label) {
                missing.push(label.to_string());
            }
        }
    }
    all_present
}
