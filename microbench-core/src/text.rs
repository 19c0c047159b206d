//! Identifier Formatting
//!
//! Pure string transforms used to turn field and function identifiers into
//! report labels.

/// Insert a space at every case boundary of a mixed-case identifier.
///
/// Boundaries are evaluated between each pair of adjacent characters and never
/// consume input, so characters are preserved exactly and only spaces are added:
///
/// 1. an uppercase run followed by a titlecase word (`"ABCd"` → `"AB Cd"`)
/// 2. a non-uppercase character followed by an uppercase one (`"fooBar"` → `"foo Bar"`)
/// 3. a letter followed by a non-letter (`"Foo00"` → `"Foo 00"`)
///
/// Case classes are ASCII (`[A-Z]`, `[A-Za-z]`).
///
/// ```
/// use microbench_core::text::split_case_boundaries;
///
/// assert_eq!(split_case_boundaries("FOOBar"), "FOO Bar");
/// assert_eq!(split_case_boundaries("0Foo"), "0 Foo");
/// ```
pub fn split_case_boundaries(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + s.len() / 2);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && is_boundary(chars[i - 1], c, chars.get(i + 1).copied()) {
            out.push(' ');
        }
        out.push(c);
    }

    out
}

fn is_boundary(prev: char, cur: char, next: Option<char>) -> bool {
    let upper_then_titlecase = prev.is_ascii_uppercase()
        && cur.is_ascii_uppercase()
        && next.is_some_and(|n| n.is_ascii_lowercase());
    let lower_then_upper = !prev.is_ascii_uppercase() && cur.is_ascii_uppercase();
    let letter_then_other = prev.is_ascii_alphabetic() && !cur.is_ascii_alphabetic();

    upper_then_titlecase || lower_then_upper || letter_then_other
}

/// Uppercase the first character and lowercase everything after it.
///
/// This normalises the whole string: `"FOO"` becomes `"Foo"`.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
    }
}

/// Turn an identifier (`camelCase` or `snake_case`) into a sentence-cased label.
///
/// ```
/// use microbench_core::text::humanize;
///
/// assert_eq!(humanize("fastest_execution_ns"), "Fastest execution ns");
/// assert_eq!(humanize("warmUpIterations"), "Warm up iterations");
/// ```
pub fn humanize(identifier: &str) -> String {
    let split = split_case_boundaries(identifier);
    let words: Vec<&str> = split
        .split(|c: char| c == '_' || c == ' ')
        .filter(|w| !w.is_empty())
        .collect();
    capitalize_first(&words.join(" "))
}
