//! Item-code extraction and formatting.
//!
//! Item codes are 8-digit article numbers that appear in the wild in many
//! shapes: dotted (`111.111.11`), hyphenated, embedded in product URLs, or
//! pasted with arbitrary separator noise. This module extracts the bare
//! digit sequences and formats them back into the dotted display form.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Matches 3 digits, 3 digits, 2 digits with up to two separator characters
/// (comma, space, period, hyphen) between the groups.
static ITEM_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{3}[, .-]{0,2}\d{3}[, .-]{0,2}\d{2}").expect("static item-code regex is valid")
});

/// Error returned when no item code could be extracted from the input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("could not find any item codes in '{input}'")]
pub struct ItemCodeError {
    /// The input that yielded no codes.
    pub input: String,
}

fn digits_of(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

fn extract_into(source: &str, out: &mut Vec<String>) {
    for found in ITEM_CODE.find_iter(source) {
        let code = digits_of(found.as_str());
        if !out.contains(&code) {
            out.push(code);
        }
    }
}

/// Extracts every item code embedded in free-form text.
///
/// Duplicates are dropped; the first-seen order is preserved.
///
/// # Errors
///
/// Returns [`ItemCodeError`] if the text contains no item code at all.
///
/// # Example
///
/// ```rust
/// use ikea_api::item_code::parse_item_codes;
///
/// let codes = parse_item_codes("111. 111. 11").unwrap();
/// assert_eq!(codes, vec!["11111111"]);
/// ```
pub fn parse_item_codes(source: &str) -> Result<Vec<String>, ItemCodeError> {
    let mut codes = Vec::new();
    extract_into(source, &mut codes);
    if codes.is_empty() {
        return Err(ItemCodeError {
            input: source.to_string(),
        });
    }
    Ok(codes)
}

/// Extracts item codes from a list of inputs.
///
/// Entries yielding no code are silently dropped; the call fails only when
/// the whole result would be empty.
///
/// # Errors
///
/// Returns [`ItemCodeError`] if none of the inputs contains an item code.
pub fn parse_item_codes_list<S: AsRef<str>>(sources: &[S]) -> Result<Vec<String>, ItemCodeError> {
    let mut codes = Vec::new();
    for source in sources {
        extract_into(source.as_ref(), &mut codes);
    }
    if codes.is_empty() {
        return Err(ItemCodeError {
            input: sources
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(", "),
        });
    }
    Ok(codes)
}

/// Formats an item code into the dotted display form.
///
/// Returns `None` when the input does not contain a parsable code; an
/// unparsable input is "no result", not an error.
///
/// # Example
///
/// ```rust
/// use ikea_api::item_code::format_item_code;
///
/// assert_eq!(format_item_code("11111111").as_deref(), Some("111.111.11"));
/// assert!(format_item_code("1111").is_none());
/// ```
#[must_use]
pub fn format_item_code(code: &str) -> Option<String> {
    let found = ITEM_CODE.find(code)?;
    let digits = digits_of(found.as_str());
    Some(format!("{}.{}.{}", &digits[0..3], &digits[3..6], &digits[6..8]))
}
