//! Compiled template matching.
//!
//! # Responsibilities
//! - Match a candidate path against a compiled segment sequence
//! - Extract named captures as plain strings
//!
//! # Design Decisions
//! - Whole-string match only (anchored at both ends); partial-path matches
//!   are never accepted
//! - Captures are greedy with backtracking, so a literal following a capture
//!   behaves like an anchored regex would
//! - Captures stay strings; numeric-looking values are the handler's problem

use std::collections::HashMap;

use crate::routing::template::{self, CompileError, Segment};

/// Named captures extracted from a matched path.
pub type RouteParams = HashMap<String, String>;

/// A route template compiled into a matchable segment sequence.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl CompiledTemplate {
    /// Compile a template string. Compilation is deterministic and pure.
    pub fn compile(template: &str) -> Result<Self, CompileError> {
        Ok(Self {
            source: template.to_owned(),
            segments: template::parse(template)?,
        })
    }

    /// The template string this matcher was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Match `path` in full, returning the named captures on success.
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let mut params = RouteParams::new();
        if match_segments(&self.segments, path, &mut params) {
            Some(params)
        } else {
            None
        }
    }
}

fn capture_char_ok(segment: &Segment, c: char) -> bool {
    match segment {
        Segment::PathCapture(_) => c != '/',
        Segment::QueryCapture(_) => c.is_ascii_lowercase() || c.is_ascii_digit(),
        Segment::Literal(_) => false,
    }
}

/// Walk the segment sequence against `input`, consuming it entirely.
///
/// Captures take the maximal valid run first and give characters back one at
/// a time when the remainder fails to match.
fn match_segments(segments: &[Segment], input: &str, params: &mut RouteParams) -> bool {
    let Some((segment, rest_segments)) = segments.split_first() else {
        return input.is_empty();
    };

    match segment {
        Segment::Literal(text) => match input.strip_prefix(text.as_str()) {
            Some(rest) => match_segments(rest_segments, rest, params),
            None => false,
        },
        Segment::PathCapture(name) | Segment::QueryCapture(name) => {
            let run = input
                .char_indices()
                .take_while(|&(_, c)| capture_char_ok(segment, c))
                .map(|(i, c)| i + c.len_utf8())
                .last();
            let Some(max) = run else { return false };

            // Greedy: longest capture first, then backtrack.
            let mut end = max;
            loop {
                if match_segments(rest_segments, &input[end..], params) {
                    params.insert(name.clone(), input[..end].to_owned());
                    return true;
                }
                // Give back one character, staying on a char boundary.
                end = input[..end]
                    .char_indices()
                    .last()
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                if end == 0 {
                    return false;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled(template: &str) -> CompiledTemplate {
        CompiledTemplate::compile(template).unwrap()
    }

    #[test]
    fn literal_matches_exactly() {
        let t = compiled("/upload/");
        assert!(t.matches("/upload/").unwrap().is_empty());
        assert!(t.matches("/upload").is_none());
        assert!(t.matches("/upload/extra").is_none());
    }

    #[test]
    fn path_capture_extracts_value() {
        let t = compiled("/delete/<image_id>");
        let params = t.matches("/delete/ab12-ef").unwrap();
        assert_eq!(params["image_id"], "ab12-ef");
    }

    #[test]
    fn path_capture_requires_at_least_one_char() {
        let t = compiled("/delete/<image_id>");
        assert!(t.matches("/delete/").is_none());
    }

    #[test]
    fn path_capture_stops_at_slash() {
        let t = compiled("/delete/<image_id>");
        assert!(t.matches("/delete/a/b").is_none());
    }

    #[test]
    fn capture_backtracks_into_trailing_literal() {
        let t = compiled("/files/<name>.png");
        let params = t.matches("/files/cat.png").unwrap();
        assert_eq!(params["name"], "cat");
        // Greedy capture still honors the suffix when the value itself
        // contains the literal text.
        let params = t.matches("/files/a.png.png").unwrap();
        assert_eq!(params["name"], "a.png");
    }

    #[test]
    fn query_capture_matches_lowercase_alnum() {
        let t = compiled("/api/images/?page=?");
        let params = t.matches("/api/images/?page=2").unwrap();
        assert_eq!(params["page"], "2");
        let params = t.matches("/api/images/?page=a1b2").unwrap();
        assert_eq!(params["page"], "a1b2");
    }

    #[test]
    fn query_capture_rejects_other_characters() {
        let t = compiled("/api/images/?page=?");
        assert!(t.matches("/api/images/?page=abc!").is_none());
        assert!(t.matches("/api/images/?page=ABC").is_none());
        assert!(t.matches("/api/images/?page=").is_none());
    }

    #[test]
    fn query_capture_requires_verbatim_prefix() {
        let t = compiled("/api/images/?page=?");
        assert!(t.matches("/api/images/").is_none());
        assert!(t.matches("/api/images/?p=2").is_none());
    }

    #[test]
    fn two_captures_in_one_template() {
        let t = compiled("/img/<dir>/<file>");
        let params = t.matches("/img/cats/tabby.png").unwrap();
        assert_eq!(params["dir"], "cats");
        assert_eq!(params["file"], "tabby.png");
    }

    #[test]
    fn match_is_repeatable() {
        let t = compiled("/delete/<image_id>");
        for _ in 0..3 {
            assert_eq!(t.matches("/delete/x").unwrap()["image_id"], "x");
        }
    }
}
