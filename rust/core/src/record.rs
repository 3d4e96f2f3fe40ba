// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element records and attribute lookup.

use rustc_hash::FxHashMap;

use crate::value::AttributeValue;

/// Read access to the attributes of one element.
///
/// The classifier and the cross-category join only ever look attributes up by
/// name, so anything that can answer a lookup can be classified.
pub trait Attributes {
    /// Returns the attribute value, or `None` if the attribute does not exist.
    fn attribute(&self, name: &str) -> Option<&AttributeValue>;
}

/// One building element: attribute name -> value.
///
/// Identity is positional within the source dataset; the record itself
/// carries no id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    values: FxHashMap<String, AttributeValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute, replacing any existing value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.values.insert(name.into(), value.into());
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.values.get(name)
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Attributes for Record {
    #[inline]
    fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.values.get(name)
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A record decorated with one synthetic boolean attribute.
///
/// Used to expose a relationship-derived flag (e.g. `Has_Gutter`) to the
/// classifier without copying or mutating the underlying record.
#[derive(Debug, Clone)]
pub struct Flagged<'a, A: ?Sized> {
    inner: &'a A,
    flag: &'a str,
    value: AttributeValue,
}

impl<'a, A: Attributes + ?Sized> Flagged<'a, A> {
    pub fn new(inner: &'a A, flag: &'a str, value: bool) -> Self {
        Self {
            inner,
            flag,
            value: AttributeValue::Boolean(value),
        }
    }
}

impl<A: Attributes + ?Sized> Attributes for Flagged<'_, A> {
    #[inline]
    fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        if name == self.flag {
            Some(&self.value)
        } else {
            self.inner.attribute(name)
        }
    }
}

/// Normalize an exported column header.
///
/// Every run of carriage returns / line feeds collapses to a single space,
/// then surrounding whitespace is trimmed. `"Element\r\nArea "` becomes
/// `"Element Area"`.
pub fn normalize_column_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_break = false;

    for c in name.chars() {
        if c == '\r' || c == '\n' {
            if !in_break {
                out.push(' ');
                in_break = true;
            }
        } else {
            out.push(c);
            in_break = false;
        }
    }

    out.trim().to_string()
}
