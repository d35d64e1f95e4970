//! Integration tests for item-code extraction and formatting.

use ikea_api::item_code::{format_item_code, parse_item_codes, parse_item_codes_list};

#[test]
fn test_extracts_code_from_separator_noise() {
    // Comma, space, period and hyphen separators, up to two characters.
    for (raw, expected) in [
        ("111. 111. 11", "11111111"),
        ("111.111.11", "11111111"),
        ("111-111-11", "11111111"),
        ("111, 111, 11", "11111111"),
        ("11111111", "11111111"),
    ] {
        assert_eq!(parse_item_codes(raw).unwrap(), vec![expected], "input: {raw}");
    }
}

#[test]
fn test_extracts_codes_from_pasted_text_and_urls() {
    let text = "compare https://www.ikea.com/us/en/p/billy-00263850/ with 404.203.14";
    assert_eq!(
        parse_item_codes(text).unwrap(),
        vec!["00263850", "40420314"]
    );
}

#[test]
fn test_list_input_dedupes_preserving_first_seen_order() {
    let inputs = ["11111111", "1141211", "22222222", "11111111"];
    assert_eq!(
        parse_item_codes_list(&inputs).unwrap(),
        vec!["11111111", "22222222"]
    );
}

#[test]
fn test_list_input_drops_non_matching_entries_silently() {
    let inputs = ["not a code", "33333333", ""];
    assert_eq!(parse_item_codes_list(&inputs).unwrap(), vec!["33333333"]);
}

#[test]
fn test_scalar_input_without_code_is_an_error() {
    assert!(parse_item_codes("").is_err());
    assert!(parse_item_codes("1234").is_err());
}

#[test]
fn test_list_input_fails_only_when_whole_result_is_empty() {
    let inputs: [&str; 2] = ["garbage", "1111"];
    assert!(parse_item_codes_list(&inputs).is_err());
}

#[test]
fn test_format_inserts_dots_at_fixed_offsets() {
    assert_eq!(format_item_code("11111111").as_deref(), Some("111.111.11"));
    assert_eq!(format_item_code("404.203.14").as_deref(), Some("404.203.14"));
}

#[test]
fn test_format_unparsable_inputs_yield_no_result_not_an_error() {
    for raw in ["", "1111", "111.111.1"] {
        assert!(format_item_code(raw).is_none(), "input: {raw}");
    }
}
