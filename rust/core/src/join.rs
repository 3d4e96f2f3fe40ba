// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cross-category join: does each primary record have a companion record?

use std::borrow::Cow;

use rustc_hash::FxHashSet;

use crate::record::Attributes;

/// Default join key shared by roofs and gutters in schedule exports.
pub const DEFAULT_JOIN_KEY: &str = "Document Title";

/// For every primary record, whether some secondary record shares its key.
///
/// The result is indexed by primary row. Keys compare after trimming; a blank
/// or absent key never matches, so a key column missing from either side
/// yields all `false`.
pub fn compute_relationship_flag<P, S>(primary: &[P], secondary: &[S], join_key: &str) -> Vec<bool>
where
    P: Attributes,
    S: Attributes,
{
    let keys: FxHashSet<Cow<'_, str>> = secondary
        .iter()
        .filter_map(|record| record.attribute(join_key)?.join_key())
        .collect();

    primary
        .iter()
        .map(|record| {
            record
                .attribute(join_key)
                .and_then(|value| value.join_key())
                .is_some_and(|key| keys.contains(&*key))
        })
        .collect()
}
