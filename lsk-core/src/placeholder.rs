//! Placeholder, Reference, and resolved-value grammar types.
//!
//! ```text
//! Placeholder := Segment ':' Segment ':' LogicalId
//! Segment     := [A-Za-z0-9_]+
//! LogicalId   := [^"\s:]+
//! Reference   := "REF:{" Placeholder "}"
//! ResolvedPK  := Segment ':' Segment ':' Segment ':' Integer
//! ```
//!
//! `Segment` and `LogicalId` are opaque, case-sensitive byte strings — no
//! case folding is applied anywhere in this crate (see `spec.md` §9's
//! "case folding of placeholder segments" note).

use std::fmt;
use std::str::FromStr;

use crate::error::ResolutionError;

fn is_segment(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

fn is_logical_id(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c != '"' && c != ':' && !c.is_whitespace())
}

/// A `Table:Column:LogicalId` token authored in the XML.
///
/// Identity is the full string; two placeholders are equal iff their
/// `table`, `column`, and `logical_id` components are all equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Placeholder {
    table: String,
    column: String,
    logical_id: String,
}

impl Placeholder {
    /// Build a placeholder from already-validated components.
    pub fn new(
        table: impl Into<String>,
        column: impl Into<String>,
        logical_id: impl Into<String>,
    ) -> Result<Self, ResolutionError> {
        let table = table.into();
        let column = column.into();
        let logical_id = logical_id.into();

        if !is_segment(&table) || !is_segment(&column) || !is_logical_id(&logical_id) {
            return Err(ResolutionError::InvalidPlaceholder(format!(
                "{table}:{column}:{logical_id}"
            )));
        }

        Ok(Self {
            table,
            column,
            logical_id,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    /// Wrap this placeholder in ASCII double quotes, matching how it
    /// appears as an attribute value in the source document.
    pub fn quoted(&self) -> String {
        format!("\"{self}\"")
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.table, self.column, self.logical_id)
    }
}

impl FromStr for Placeholder {
    type Err = ResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let table = parts.next().unwrap_or("");
        let column = parts.next().unwrap_or("");
        let logical_id = parts.next().unwrap_or("");

        Self::new(table, column, logical_id)
    }
}

/// A `REF:{Table:Column:LogicalId}` token pointing at a `Placeholder`
/// that must appear as a PK elsewhere in the same document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    raw: String,
    target: Placeholder,
}

impl Reference {
    /// The literal `REF:{...}` string, including braces.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The placeholder this reference points at.
    pub fn target(&self) -> &Placeholder {
        &self.target
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Reference {
    type Err = ResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .strip_prefix("REF:{")
            .and_then(|rest| rest.strip_suffix('}'))
            .ok_or_else(|| ResolutionError::InvalidPlaceholder(s.to_string()))?;

        if body.contains(char::is_whitespace) || body.contains('{') || body.contains('}') {
            return Err(ResolutionError::InvalidPlaceholder(s.to_string()));
        }

        let target = body.parse::<Placeholder>()?;

        Ok(Self {
            raw: s.to_string(),
            target,
        })
    }
}

/// The `Table:Column:Module:Integer` string written back into the XML in
/// place of a placeholder once it has been assigned a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlaceholder {
    pub table: String,
    pub column: String,
    pub module: String,
    pub value: i64,
}

impl fmt::Display for ResolvedPlaceholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}:{}", self.table, self.column, self.module, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_well_formed_placeholder() {
        let p: Placeholder = "T:C:x".parse().unwrap();
        assert_eq!(p.table(), "T");
        assert_eq!(p.column(), "C");
        assert_eq!(p.logical_id(), "x");
        assert_eq!(p.to_string(), "T:C:x");
    }

    #[test]
    fn logical_id_may_contain_colons_worth_of_other_punctuation() {
        let p: Placeholder = "T:C:x.y-z".parse().unwrap();
        assert_eq!(p.logical_id(), "x.y-z");
    }

    #[test]
    fn rejects_empty_segments() {
        assert!("".parse::<Placeholder>().is_err());
        assert!(":C:x".parse::<Placeholder>().is_err());
        assert!("T::x".parse::<Placeholder>().is_err());
        assert!("T:C:".parse::<Placeholder>().is_err());
    }

    #[test]
    fn segments_are_case_sensitive() {
        let a: Placeholder = "T:C:x".parse().unwrap();
        let b: Placeholder = "t:c:x".parse().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn parses_reference() {
        let r: Reference = "REF:{T:C:x}".parse().unwrap();
        assert_eq!(r.target().to_string(), "T:C:x");
        assert_eq!(r.as_str(), "REF:{T:C:x}");
    }

    #[test]
    fn reference_rejects_internal_whitespace_and_nesting() {
        assert!("REF:{T:C: x}".parse::<Reference>().is_err());
        assert!("REF:{T:C:x".parse::<Reference>().is_err());
        assert!("REF:{{T:C:x}}".parse::<Reference>().is_err());
    }

    #[test]
    fn resolved_placeholder_display() {
        let r = ResolvedPlaceholder {
            table: "T".into(),
            column: "C".into(),
            module: "M".into(),
            value: 1,
        };
        assert_eq!(r.to_string(), "T:C:M:1");
    }

    proptest::proptest! {
        #[test]
        fn well_formed_placeholders_round_trip_through_display_and_parse(
            table in "[A-Za-z0-9_]{1,12}",
            column in "[A-Za-z0-9_]{1,12}",
            logical_id in "[A-Za-z0-9_.-]{1,12}",
        ) {
            let p = Placeholder::new(table.as_str(), column.as_str(), logical_id.as_str()).unwrap();
            let rendered = p.to_string();
            let reparsed: Placeholder = rendered.parse().unwrap();
            prop_assert_eq!(p, reparsed);
        }

        #[test]
        fn segments_with_disallowed_characters_are_always_rejected(
            table in "[A-Za-z0-9_]{1,8}",
            column in "[A-Za-z0-9_]{1,8}",
        ) {
            // A colon inside what would otherwise be the logical id makes a
            // four-segment string, never a valid three-segment placeholder.
            let s = format!("{table}:{column}:a:b");
            prop_assert!(s.parse::<Placeholder>().is_err());
        }
    }
}
