//! Compiled-once regex patterns backing the scanner.
//!
//! Mirrors the `OnceLock<Regex>` pattern used for path-normalization
//! regexes in the teacher's telemetry middleware: compile lazily, cache
//! forever, and surface a compile failure through `tracing` rather than
//! panicking at start-up.

use std::sync::OnceLock;

use regex::Regex;

/// Matches an XML-looking opening or self-closing tag: `<Name ...>` or
/// `<Name .../>`, excluding closing tags (`</Name>`), comments
/// (`<!--...-->`), and processing instructions (`<?...?>`).
///
/// Tag and attribute *names* are not captured structurally (we scan for
/// quoted attribute values directly), which is what makes this pattern
/// case-insensitive for names by construction — there is no literal name
/// character class to fold.
pub fn tag_pattern() -> &'static Regex {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    TAG_RE.get_or_init(|| {
        Regex::new(r"<[^/!?][^<>]*>").expect("tag_pattern is a valid regex literal")
    })
}

/// Matches one ASCII-double-quoted attribute value within a tag span.
pub fn quoted_value_pattern() -> &'static Regex {
    static QUOTED_RE: OnceLock<Regex> = OnceLock::new();
    QUOTED_RE.get_or_init(|| Regex::new(r#""([^"]*)""#).expect("quoted_value_pattern is valid"))
}
