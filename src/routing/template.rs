//! Route template parsing.
//!
//! # Responsibilities
//! - Parse template strings into a tagged segment sequence
//! - Reject malformed placeholders at registration time
//!
//! # Grammar
//! - `<name>`: a path capture; matches one or more characters other than `/`
//! - `?name=?`: the literal text `?name=` followed by a capture matching one
//!   or more lowercase ASCII letters or digits
//! - everything else is literal text that must match verbatim
//!
//! # Design Decisions
//! - Explicit parser instead of regex substitution, so each placeholder kind
//!   is independently testable
//! - Malformed `<...>` placeholders fail compilation rather than silently
//!   degrading to a literal match
//! - A `?` that does not introduce the exact `?name=?` form is an ordinary
//!   literal character

use thiserror::Error;

/// Error raised when a route template fails to compile.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("template is empty")]
    EmptyTemplate,

    #[error("unterminated capture `<{0}` in template")]
    UnterminatedCapture(String),

    #[error("capture at byte {0} has an empty name")]
    EmptyCaptureName(usize),

    #[error("invalid character {found:?} in capture name at byte {at}")]
    InvalidCaptureName { found: char, at: usize },

    #[error("method {0} is not routable (GET, POST and DELETE only)")]
    UnsupportedMethod(String),
}

/// One element of a compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text that must appear verbatim in the path.
    Literal(String),
    /// `<name>`: one or more characters excluding `/`.
    PathCapture(String),
    /// `?name=?`: one or more of `[0-9a-z]`, preceded by the literal `?name=`.
    QueryCapture(String),
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse a template string into its segment sequence.
///
/// The returned sequence alternates literals and captures; consecutive
/// literals are merged. Capture names are not checked for uniqueness within
/// the template, matching the registration contract.
pub fn parse(template: &str) -> Result<Vec<Segment>, CompileError> {
    if template.is_empty() {
        return Err(CompileError::EmptyTemplate);
    }

    fn flush(literal: &mut String, segments: &mut Vec<Segment>) {
        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(literal)));
        }
    }

    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.char_indices();

    while let Some((at, c)) = chars.next() {
        match c {
            '<' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '>')) => break,
                        Some((pos, c)) if !is_name_char(c) => {
                            return Err(CompileError::InvalidCaptureName { found: c, at: pos });
                        }
                        Some((_, c)) => name.push(c),
                        None => return Err(CompileError::UnterminatedCapture(name)),
                    }
                }
                if name.is_empty() {
                    return Err(CompileError::EmptyCaptureName(at));
                }
                flush(&mut literal, &mut segments);
                segments.push(Segment::PathCapture(name));
            }
            '?' => {
                // Only the exact `?name=?` form is a capture; otherwise the
                // question mark is literal text.
                match query_capture(&template[at..]) {
                    Some(name) => {
                        // Skip past `name=?`.
                        for _ in 0..name.len() + 2 {
                            chars.next();
                        }
                        literal.push('?');
                        literal.push_str(&name);
                        literal.push('=');
                        flush(&mut literal, &mut segments);
                        segments.push(Segment::QueryCapture(name));
                    }
                    None => literal.push('?'),
                }
            }
            c => literal.push(c),
        }
    }
    flush(&mut literal, &mut segments);

    Ok(segments)
}

/// If `rest` (starting at a `?`) begins with `?name=?`, return the name.
fn query_capture(rest: &str) -> Option<String> {
    let rest = rest.strip_prefix('?')?;
    let name: String = rest.chars().take_while(|&c| is_name_char(c)).collect();
    if name.is_empty() {
        return None;
    }
    rest[name.len()..].starts_with("=?").then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_literal_only() {
        let segs = parse("/upload/").unwrap();
        assert_eq!(segs, vec![Segment::Literal("/upload/".into())]);
    }

    #[test]
    fn parses_path_capture() {
        let segs = parse("/delete/<image_id>").unwrap();
        assert_eq!(
            segs,
            vec![
                Segment::Literal("/delete/".into()),
                Segment::PathCapture("image_id".into()),
            ]
        );
    }

    #[test]
    fn parses_query_capture_with_literal_prefix() {
        let segs = parse("/api/images/?page=?").unwrap();
        assert_eq!(
            segs,
            vec![
                Segment::Literal("/api/images/?page=".into()),
                Segment::QueryCapture("page".into()),
            ]
        );
    }

    #[test]
    fn bare_question_mark_is_literal() {
        let segs = parse("/odd?path").unwrap();
        assert_eq!(segs, vec![Segment::Literal("/odd?path".into())]);
    }

    #[test]
    fn incomplete_query_form_is_literal() {
        // `?page=` without the trailing `?` stays literal text.
        let segs = parse("/api/?page=1").unwrap();
        assert_eq!(segs, vec![Segment::Literal("/api/?page=1".into())]);
    }

    #[test]
    fn rejects_unterminated_capture() {
        assert_eq!(
            parse("/delete/<image_id"),
            Err(CompileError::UnterminatedCapture("image_id".into()))
        );
    }

    #[test]
    fn rejects_empty_capture_name() {
        assert_eq!(parse("/x/<>"), Err(CompileError::EmptyCaptureName(3)));
    }

    #[test]
    fn rejects_invalid_capture_name() {
        assert!(matches!(
            parse("/x/<image-id>"),
            Err(CompileError::InvalidCaptureName { found: '-', .. })
        ));
    }

    #[test]
    fn rejects_empty_template() {
        assert_eq!(parse(""), Err(CompileError::EmptyTemplate));
    }

    #[test]
    fn unmatched_close_bracket_is_literal() {
        let segs = parse("/a>b").unwrap();
        assert_eq!(segs, vec![Segment::Literal("/a>b".into())]);
    }
}
