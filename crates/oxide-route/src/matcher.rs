//! Segment matching of compiled patterns against request paths.

use std::ops::Range;

use crate::pattern::{Pattern, Segment};

/// How literal path text is compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PathMatch {
    /// Byte-exact comparison.
    #[default]
    Exact,
    /// Unicode case-insensitive comparison of literal text. Captured
    /// parameter values keep the casing found in the path.
    CaseInsensitive,
}

/// Matches `path` against the segments of `pattern`, pushing the byte range
/// of every captured value onto `out`.
///
/// `out` may hold partial captures when this returns `false`.
pub(crate) fn match_segments(
    pattern: &Pattern,
    path: &str,
    mode: PathMatch,
    out: &mut Vec<Range<usize>>,
) -> bool {
    let mut pos = 0;

    for segment in pattern.segments() {
        let rest = &path[pos..];
        match segment {
            Segment::Static(text) => match strip_literal(rest, text, mode) {
                Some(len) => pos += len,
                None => return false,
            },
            Segment::Named(_) => {
                if !rest.starts_with('/') {
                    return false;
                }
                let end = rest[1..].find('/').map_or(rest.len(), |i| i + 1);
                // empty captures such as `/a//c` against `/a/:b/c`
                if end == 1 {
                    return false;
                }
                out.push(pos + 1..pos + end);
                pos += end;
            }
            Segment::CatchAll(_) => {
                if !rest.starts_with('/') {
                    return false;
                }
                out.push(pos..path.len());
                return true;
            }
        }
    }

    let rest = &path[pos..];
    if pattern.has_trailing_slash() {
        rest == "/"
    } else {
        rest.is_empty()
    }
}

/// Compares two whole paths under the given mode.
pub fn path_eq(a: &str, b: &str, mode: PathMatch) -> bool {
    match mode {
        PathMatch::Exact => a == b,
        PathMatch::CaseInsensitive => strip_literal(b, a, mode) == Some(b.len()),
    }
}

/// Returns how many bytes of `path` the literal `text` covers.
fn strip_literal(path: &str, text: &str, mode: PathMatch) -> Option<usize> {
    match mode {
        PathMatch::Exact => path.starts_with(text).then_some(text.len()),
        PathMatch::CaseInsensitive => {
            let mut chars = path.char_indices();
            let mut len = 0;
            for expected in text.chars() {
                let (i, found) = chars.next()?;
                if !chars_eq_fold(expected, found) {
                    return None;
                }
                len = i + found.len_utf8();
            }
            Some(len)
        }
    }
}

fn chars_eq_fold(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}
