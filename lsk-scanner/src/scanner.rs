//! `scanPK` and `scanFK` from the specification (§4.1).

use indexmap::IndexMap;
use lsk_core::{Placeholder, Reference, ResolutionError, ResolutionResult};

use crate::patterns::{quoted_value_pattern, tag_pattern};

/// `Placeholder → element fragments`, in first-appearance order.
pub type PkMatches = IndexMap<Placeholder, Vec<String>>;

/// `REF:{...} string → target Placeholder`, first occurrence only.
pub type FkMatches = IndexMap<String, Placeholder>;

fn is_segment_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_logical_id_char(c: char) -> bool {
    c != '"' && c != ':' && !c.is_whitespace()
}

/// Outcome of checking whether a colon-delimited quoted value is a
/// well-formed placeholder, a malformed placeholder attempt, or not a
/// placeholder at all.
enum Classified {
    /// Exactly three non-empty, correctly-charactered segments.
    Placeholder(Placeholder),
    /// Structurally a three-segment candidate (exactly two colons) with
    /// at least one zero-length segment — the spec's explicit error
    /// case.
    EmptySegment,
    /// Not a placeholder: wrong colon count, or non-empty segments using
    /// characters outside the grammar. Extra colons, in particular, are
    /// "silently ignored" per §4.1.
    NotAPlaceholder,
}

fn classify(value: &str) -> Classified {
    let parts: Vec<&str> = value.split(':').collect();
    if parts.len() != 3 {
        return Classified::NotAPlaceholder;
    }
    let (table, column, logical_id) = (parts[0], parts[1], parts[2]);

    if table.is_empty() || column.is_empty() || logical_id.is_empty() {
        return Classified::EmptySegment;
    }

    let table_ok = table.chars().all(is_segment_char);
    let column_ok = column.chars().all(is_segment_char);
    let logical_ok = logical_id.chars().all(is_logical_id_char);

    if table_ok && column_ok && logical_ok {
        match Placeholder::new(table, column, logical_id) {
            Ok(p) => Classified::Placeholder(p),
            Err(_) => Classified::NotAPlaceholder,
        }
    } else {
        Classified::NotAPlaceholder
    }
}

/// Scan `text` for PK placeholders, returning the fragments (matched tag
/// text) each distinct placeholder appeared in, in first-appearance
/// order.
///
/// Raises `InvalidPlaceholder` only for the structural "zero-length
/// segment" case (e.g. `T::x`, `:C:x`, `T:C:`); malformed shapes that
/// don't look like a three-segment placeholder at all (extra colons,
/// wrong character classes) are silently ignored, per the specification.
pub fn scan_pk(text: &str) -> ResolutionResult<PkMatches> {
    let mut matches: PkMatches = IndexMap::new();

    for tag_match in tag_pattern().find_iter(text) {
        let tag = tag_match.as_str();
        for cap in quoted_value_pattern().captures_iter(tag) {
            let value = &cap[1];
            match classify(value) {
                Classified::Placeholder(p) => {
                    matches.entry(p).or_default().push(tag.to_string());
                }
                Classified::EmptySegment => {
                    return Err(ResolutionError::InvalidPlaceholder(value.to_string()));
                }
                Classified::NotAPlaceholder => {}
            }
        }
    }

    Ok(matches)
}

/// Scan `text` for FK references of the form `REF:{Table:Column:LogicalId}`,
/// recording the first occurrence of each distinct reference string.
///
/// A missing close brace, a nested brace, or whitespace inside the braces
/// never matches and is silently ignored. A reference whose body has a
/// zero-length segment raises `InvalidPlaceholder`.
pub fn scan_fk(text: &str) -> ResolutionResult<FkMatches> {
    let mut matches: FkMatches = IndexMap::new();

    for tag_match in tag_pattern().find_iter(text) {
        let tag = tag_match.as_str();
        for cap in quoted_value_pattern().captures_iter(tag) {
            let value = &cap[1];
            let Some(body) = value.strip_prefix("REF:{").and_then(|r| r.strip_suffix('}')) else {
                continue;
            };
            if body.contains(char::is_whitespace) || body.contains('{') || body.contains('}') {
                continue;
            }

            match classify(body) {
                Classified::Placeholder(target) => {
                    matches.entry(value.to_string()).or_insert(target);
                }
                Classified::EmptySegment => {
                    return Err(ResolutionError::InvalidPlaceholder(value.to_string()));
                }
                Classified::NotAPlaceholder => {}
            }
        }
    }

    Ok(matches)
}

/// Convenience wrapper matching the grammar's `Reference` type directly,
/// used by the engine when it needs the parsed `Reference` rather than
/// the raw ref string.
pub fn parse_reference(raw: &str) -> ResolutionResult<Reference> {
    raw.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn single_pk_single_tag() {
        let m = scan_pk(r#"<D a="T:C:x"/>"#).unwrap();
        assert_eq!(m.len(), 1);
        let (p, frags) = m.get_index(0).unwrap();
        assert_eq!(p.to_string(), "T:C:x");
        assert_eq!(frags, &vec![r#"<D a="T:C:x"/>"#.to_string()]);
    }

    #[test]
    fn repeated_pk_across_tags_is_one_distinct_placeholder_with_two_fragments() {
        let m = scan_pk(r#"<A k="T:C:x"/><B k="T:C:x"/>"#).unwrap();
        assert_eq!(m.len(), 1);
        let (_, frags) = m.get_index(0).unwrap();
        assert_eq!(frags.len(), 2);
    }

    #[test]
    fn two_distinct_pks_preserve_first_seen_order() {
        let m = scan_pk(r#"<A k="T:C:x"/><A k="T:C:y"/>"#).unwrap();
        let keys: Vec<String> = m.keys().map(|p| p.to_string()).collect();
        assert_eq!(keys, vec!["T:C:x".to_string(), "T:C:y".to_string()]);
    }

    #[test]
    fn fk_resolves_target_placeholder() {
        let m = scan_fk(r#"<Q r="REF:{T:C:x}"/>"#).unwrap();
        assert_eq!(m.len(), 1);
        let (raw, target) = m.get_index(0).unwrap();
        assert_eq!(raw, "REF:{T:C:x}");
        assert_eq!(target.to_string(), "T:C:x");
    }

    #[test]
    fn fk_records_first_occurrence_only() {
        let m = scan_fk(r#"<A r="REF:{T:C:x}"/><B r="REF:{T:C:x}"/>"#).unwrap();
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn malformed_fk_shapes_are_silently_ignored() {
        assert!(scan_fk(r#"<A r="REF:{T:C:x"/>"#).unwrap().is_empty());
        assert!(scan_fk(r#"<A r="REF:{{T:C:x}}"/>"#).unwrap().is_empty());
        assert!(scan_fk(r#"<A r="REF:{T:C: x}"/>"#).unwrap().is_empty());
    }

    #[test]
    fn empty_segment_in_pk_is_an_error() {
        assert!(scan_pk(r#"<A k="T::x"/>"#).is_err());
        assert!(scan_pk(r#"<A k=":C:x"/>"#).is_err());
        assert!(scan_pk(r#"<A k="T:C:"/>"#).is_err());
    }

    #[test]
    fn extra_colons_are_silently_ignored_not_an_error() {
        let m = scan_pk(r#"<A k="T:C:D:x"/>"#).unwrap();
        assert!(m.is_empty());
    }

    #[test]
    fn no_placeholders_yields_empty_maps() {
        let text = "<A b=\"plain\"><B/></A>";
        assert!(scan_pk(text).unwrap().is_empty());
        assert!(scan_fk(text).unwrap().is_empty());
    }

    #[test]
    fn text_node_concatenations_are_ignored_since_scan_targets_tags_only() {
        let text = r#"<A>T:C:x is not inside an attribute</A>"#;
        assert!(scan_pk(text).unwrap().is_empty());
    }

    proptest::proptest! {
        #[test]
        fn distinct_logical_ids_preserve_first_seen_order(
            ids in proptest::collection::vec("[a-z][a-z0-9]{0,6}", 1..12),
        ) {
            // Dedup while preserving first-seen order, matching what the
            // scanner itself is required to do for its output map.
            let mut seen = std::collections::HashSet::new();
            let distinct: Vec<&String> = ids.iter().filter(|id| seen.insert((*id).clone())).collect();

            let text: String = distinct
                .iter()
                .map(|id| format!(r#"<Row k="T:C:{id}"/>"#))
                .collect();

            let matches = scan_pk(&text).unwrap();
            let scanned_ids: Vec<String> = matches.keys().map(|p| p.logical_id().to_string()).collect();
            let expected_ids: Vec<String> = distinct.iter().map(|s| s.to_string()).collect();
            prop_assert_eq!(scanned_ids, expected_ids);
        }

        #[test]
        fn repeated_placeholder_occurrences_all_become_fragments(
            id in "[a-z][a-z0-9]{0,6}",
            repeats in 1usize..6,
        ) {
            let text: String = (0..repeats)
                .map(|i| format!(r#"<Row{i} k="T:C:{id}"/>"#))
                .collect();

            let matches = scan_pk(&text).unwrap();
            prop_assert_eq!(matches.len(), 1);
            let (_, fragments) = matches.get_index(0).unwrap();
            prop_assert_eq!(fragments.len(), repeats);
        }
    }
}
