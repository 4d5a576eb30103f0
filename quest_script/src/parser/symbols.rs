//! Symbol naming grammar.
//!
//! A symbol occurrence is a prefix (`_`, `__`, `___`, `=` or `==`), a core
//! name, and a closing `_`. The plain `_core_` form names the symbol itself;
//! the other prefixes select derived variations of the same symbol.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SYMBOL_OCCURRENCE: Regex =
        Regex::new(r"(_{1,3}|={1,2})([A-Za-z0-9.\-]+(?:_[A-Za-z0-9.\-]+)*)_").expect("symbol pattern compiles");
    static ref SYMBOL_EXACT: Regex =
        Regex::new(r"^(_{1,3}|={1,2})([A-Za-z0-9.\-]+(?:_[A-Za-z0-9.\-]+)*)_$").expect("symbol pattern compiles");
    static ref CONTEXT_MACRO: Regex = Regex::new(r"%[A-Za-z0-9]+").expect("macro pattern compiles");
}

/// The base `_core_` form of any symbol variation, or `None` if `text` is not a symbol.
pub fn base_symbol(text: &str) -> Option<String> {
    SYMBOL_EXACT
        .captures(text)
        .and_then(|caps| caps.get(2))
        .map(|core| format!("_{}_", core.as_str()))
}

/// Name a parameter refers to: the base form of a symbol variation, or the
/// word itself for names outside the `_name_` convention.
pub fn symbol_key(text: &str) -> String {
    base_symbol(text).unwrap_or_else(|| text.to_string())
}

/// Variation prefix of a symbol occurrence (`_`, `__`, `=`, ...).
pub fn symbol_prefix(text: &str) -> Option<&str> {
    SYMBOL_EXACT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|prefix| &text[prefix.range()])
}

/// True for names written in the `_name_` convention.
pub fn is_conventional_name(name: &str) -> bool {
    symbol_prefix(name) == Some("_")
}

/// Symbol occurrences in free text as `(byte offset, occurrence)`.
///
/// An occurrence glued to a preceding letter or digit (`foo_bar_`) is not a reference.
pub fn find_symbol_occurrences(text: &str) -> Vec<(usize, &str)> {
    SYMBOL_OCCURRENCE
        .find_iter(text)
        .filter(|found| {
            text[..found.start()]
                .chars()
                .next_back()
                .is_none_or(|prev| !prev.is_alphanumeric())
        })
        .map(|found| (found.start(), found.as_str()))
        .collect()
}

/// `%name` context macros in free text as `(byte offset, occurrence)`.
pub fn find_macros(text: &str) -> Vec<(usize, &str)> {
    CONTEXT_MACRO
        .find_iter(text)
        .map(|found| (found.start(), found.as_str()))
        .collect()
}
