//! Path cleaning for fixed-path redirects.

/// Returns the canonical form of a URL path.
///
/// - a leading `/` is added when missing
/// - repeated `/` are collapsed
/// - `.` elements are removed, `..` elements remove the element before them
///   (never going above the root)
/// - a trailing `/` is kept, and added when the path ended in `.`
///
/// Cleaning an already clean path returns it unchanged.
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let mut trailing = path.len() > 2 && path.ends_with('/');
    let mut elements: Vec<&str> = Vec::new();
    let mut parts = path.split('/').peekable();

    while let Some(part) = parts.next() {
        match part {
            "" => {}
            "." => {
                if parts.peek().is_none() {
                    trailing = true;
                }
            }
            ".." => {
                elements.pop();
            }
            _ => elements.push(part),
        }
    }

    let mut cleaned = String::with_capacity(path.len() + 1);
    for element in &elements {
        cleaned.push('/');
        cleaned.push_str(element);
    }
    if cleaned.is_empty() || trailing {
        cleaned.push('/');
    }
    cleaned
}

/// Adds a trailing slash, or removes the one present.
pub(crate) fn toggle_trailing_slash(path: &str) -> String {
    match path.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => format!("{path}/"),
    }
}
