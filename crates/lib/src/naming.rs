//! Path segment naming.
//!
//! Every generated path is built from segments produced here:
//!
//! - field identifiers are converted to kebab case (`root_int_value` and
//!   `RootIntValue` both become `root-int-value`)
//! - map keys have level separators rewritten to the word separator so a
//!   key never introduces an extra hierarchy level
//! - sequence positions are written as `[i]`
//!
//! Upper-casing is applied by the caller according to its options.

/// Converts an identifier to kebab case using `word_separator`.
///
/// Underscores become word separators, and a separator is inserted before an
/// uppercase letter that starts a new word: after a lowercase letter or digit,
/// or at the end of an acronym (`HTTPServer` becomes `HTTP-Server`). A raw
/// identifier prefix (`r#`) is dropped.
///
/// ```
/// # use envtree::naming::to_kebab;
/// assert_eq!(to_kebab("RootIntValue", '-'), "Root-Int-Value");
/// assert_eq!(to_kebab("string_val", '-'), "string-val");
/// assert_eq!(to_kebab("r#type", '-'), "type");
/// ```
pub fn to_kebab(ident: &str, word_separator: char) -> String {
    let ident = ident.strip_prefix("r#").unwrap_or(ident);
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 4);

    for (idx, &c) in chars.iter().enumerate() {
        if c == '_' {
            if !out.is_empty() && !out.ends_with(word_separator) {
                out.push(word_separator);
            }
            continue;
        }

        if c.is_uppercase() && idx > 0 && !out.ends_with(word_separator) {
            let prev = chars[idx - 1];
            let next_is_lower = chars.get(idx + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                out.push(word_separator);
            }
        }
        out.push(c);
    }

    // Trailing underscores leave a dangling separator
    while out.ends_with(word_separator) {
        out.pop();
    }
    out
}

/// Rewrites a map key into a single path segment.
pub fn key_segment(key: &str, level_separator: char, word_separator: char) -> String {
    key.chars()
        .map(|c| if c == level_separator { word_separator } else { c })
        .collect()
}

/// Segment naming the element at `index` of a sequence.
pub fn index_segment(index: usize) -> String {
    format!("[{index}]")
}

/// Returns the position written in an `[i]` segment.
pub fn parse_index_segment(segment: &str) -> Option<usize> {
    let digits = segment.strip_prefix('[')?.strip_suffix(']')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Joins a segment to a prefix. The empty prefix yields the bare segment.
pub fn join(prefix: &str, segment: &str, level_separator: char) -> String {
    if prefix.is_empty() {
        return segment.to_string();
    }
    let mut path = String::with_capacity(prefix.len() + segment.len() + 1);
    path.push_str(prefix);
    path.push(level_separator);
    path.push_str(segment);
    path
}

/// Rewrites a segment into a snake-case key: lower-cased, word separators
/// replaced by underscores.
pub fn snake_key(segment: &str, word_separator: char) -> String {
    segment
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == word_separator { '_' } else { c })
        .collect()
}
