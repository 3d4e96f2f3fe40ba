// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Attribute values and the presence check.
//!
//! Values read from CSV are kept verbatim as [`AttributeValue::Text`] so that
//! output reproduces the input cell for cell. The typed variants exist for
//! synthetic attributes (relationship flags) and for records built in code.

use std::borrow::Cow;
use std::fmt;

/// Cell texts that schedule tooling reads as "not available".
///
/// Matched against the whole cell, case-sensitively, the same set pandas
/// treats as NaN by default. The cell text itself is kept for output.
pub const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single attribute value on an element record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeValue {
    /// Absent / empty cell
    Null,
    /// Raw text
    Text(String),
    /// Integer value
    Integer(i64),
    /// Float value
    Number(f64),
    /// Boolean value
    Boolean(bool),
}

impl AttributeValue {
    /// Build a value from a raw CSV cell. Empty cells become [`AttributeValue::Null`].
    #[inline]
    pub fn from_cell(raw: &str) -> Self {
        if raw.is_empty() {
            AttributeValue::Null
        } else {
            AttributeValue::Text(raw.to_string())
        }
    }

    /// Whether this value counts as missing.
    ///
    /// Null, NaN, text that is blank after trimming and [`NA_TOKENS`] are
    /// missing. Numeric zero and `false` are present.
    #[inline]
    pub fn is_missing(&self) -> bool {
        match self {
            AttributeValue::Null => true,
            AttributeValue::Number(f) => f.is_nan(),
            AttributeValue::Text(s) => s.trim().is_empty() || NA_TOKENS.contains(&s.as_str()),
            AttributeValue::Integer(_) | AttributeValue::Boolean(_) => false,
        }
    }

    /// Boolean reading used for synthetic flags.
    ///
    /// Text is read as a spreadsheet would write a boolean: `false`, `no`,
    /// `0` and blank are false, anything else is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            AttributeValue::Null => false,
            AttributeValue::Boolean(b) => *b,
            AttributeValue::Integer(i) => *i != 0,
            AttributeValue::Number(f) => *f != 0.0 && !f.is_nan(),
            AttributeValue::Text(s) => {
                let s = s.trim();
                !(s.is_empty()
                    || s.eq_ignore_ascii_case("false")
                    || s.eq_ignore_ascii_case("no")
                    || s.eq_ignore_ascii_case("f")
                    || s.eq_ignore_ascii_case("n")
                    || s == "0")
            }
        }
    }

    /// Key used when joining records across datasets. Missing values have no key.
    pub fn join_key(&self) -> Option<Cow<'_, str>> {
        if self.is_missing() {
            return None;
        }
        match self {
            AttributeValue::Text(s) => Some(Cow::Borrowed(s.trim())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}

/// Presence check for a looked-up attribute. An attribute that does not exist
/// on the record at all is missing.
#[inline]
pub fn is_missing(value: Option<&AttributeValue>) -> bool {
    value.map_or(true, AttributeValue::is_missing)
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => Ok(()),
            AttributeValue::Text(s) => f.write_str(s),
            AttributeValue::Integer(i) => write!(f, "{}", i),
            AttributeValue::Number(n) => write!(f, "{}", n),
            AttributeValue::Boolean(true) => f.write_str("True"),
            AttributeValue::Boolean(false) => f.write_str("False"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        AttributeValue::Integer(i)
    }
}

impl From<f64> for AttributeValue {
    fn from(f: f64) -> Self {
        AttributeValue::Number(f)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Boolean(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_check() {
        assert!(is_missing(None));
        assert!(is_missing(Some(&AttributeValue::Null)));
        assert!(is_missing(Some(&AttributeValue::from(""))));
        assert!(is_missing(Some(&AttributeValue::from("  "))));
        assert!(is_missing(Some(&AttributeValue::from("\t\n"))));
        assert!(is_missing(Some(&AttributeValue::Number(f64::NAN))));

        assert!(!is_missing(Some(&AttributeValue::Integer(0))));
        assert!(!is_missing(Some(&AttributeValue::Number(0.0))));
        assert!(!is_missing(Some(&AttributeValue::Boolean(false))));
        assert!(!is_missing(Some(&AttributeValue::from("x"))));
        assert!(!is_missing(Some(&AttributeValue::from("0"))));
    }

    #[test]
    fn test_na_tokens_are_missing() {
        for token in ["N/A", "NA", "NaN", "nan", "NULL", "null", "None", "#N/A", "<NA>"] {
            assert!(is_missing(Some(&AttributeValue::from(token))), "{token}");
        }
        // Whole-cell match only, as the export reader does.
        assert!(!is_missing(Some(&AttributeValue::from("NA-01"))));
        assert!(!is_missing(Some(&AttributeValue::from("none"))));
        assert_eq!(AttributeValue::from_cell("N/A").to_string(), "N/A");
        assert_eq!(AttributeValue::from("n/a").join_key(), None);
    }

    #[test]
    fn test_from_cell() {
        assert_eq!(AttributeValue::from_cell(""), AttributeValue::Null);
        assert_eq!(AttributeValue::from_cell(" "), AttributeValue::Text(" ".into()));
        assert_eq!(AttributeValue::from_cell("12.5"), AttributeValue::Text("12.5".into()));
    }

    #[test]
    fn test_truthiness() {
        assert!(AttributeValue::Boolean(true).is_truthy());
        assert!(AttributeValue::from("True").is_truthy());
        assert!(AttributeValue::from("yes").is_truthy());
        assert!(AttributeValue::Integer(1).is_truthy());

        assert!(!AttributeValue::Null.is_truthy());
        assert!(!AttributeValue::Boolean(false).is_truthy());
        assert!(!AttributeValue::from("False").is_truthy());
        assert!(!AttributeValue::from(" 0 ").is_truthy());
        assert!(!AttributeValue::Number(f64::NAN).is_truthy());
    }

    #[test]
    fn test_display_round_trips_text() {
        assert_eq!(AttributeValue::from("  Roof A ").to_string(), "  Roof A ");
        assert_eq!(AttributeValue::Null.to_string(), "");
        assert_eq!(AttributeValue::Boolean(false).to_string(), "False");
        assert_eq!(AttributeValue::Integer(300).to_string(), "300");
    }

    #[test]
    fn test_join_key() {
        assert_eq!(AttributeValue::from(" Roof-01 ").join_key().as_deref(), Some("Roof-01"));
        assert_eq!(AttributeValue::Integer(7).join_key().as_deref(), Some("7"));
        assert_eq!(AttributeValue::from("   ").join_key(), None);
        assert_eq!(AttributeValue::Null.join_key(), None);
    }
}
