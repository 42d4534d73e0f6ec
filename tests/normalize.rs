// tests/normalize.rs
//
// Normalizer behavior over the payload shapes the feed has actually sent:
// flat maps, renamed fields, string-wrapped numbers, nested history arrays,
// and JSON smuggled inside strings.

use draw_signal_bot::normalize;
use serde_json::json;

#[test]
fn canonical_map_is_extracted_verbatim() {
    let ev = normalize(&json!({ "number": 7, "issue": "X1" })).expect("event");
    assert_eq!(ev.issue.as_deref(), Some("X1"));
    assert_eq!(ev.number, 7);
}

#[test]
fn candidate_fields_are_probed_in_priority_order() {
    // "number" wins over "result" even when both are valid.
    let ev = normalize(&json!({ "result": 9, "number": 3 })).unwrap();
    assert_eq!(ev.number, 3);

    // Renamed fields still resolve.
    assert_eq!(normalize(&json!({ "result": 4 })).unwrap().number, 4);
    assert_eq!(normalize(&json!({ "openCode": "1,2,8" })).unwrap().number, 8);
    assert_eq!(normalize(&json!({ "lucky": 5 })).unwrap().number, 5);
    assert_eq!(
        normalize(&json!({ "lottery": { "number": 6 } })).unwrap().number,
        6
    );
    assert_eq!(
        normalize(&json!({ "data": { "number": 2 } })).unwrap().number,
        2
    );
}

#[test]
fn invalid_earlier_candidate_does_not_block_later_ones() {
    // "number" type-matches but is out of range; "result" still wins.
    let ev = normalize(&json!({ "number": 150, "result": 4 })).unwrap();
    assert_eq!(ev.number, 4);
}

#[test]
fn issue_falls_back_through_expect_and_period() {
    let ev = normalize(&json!({ "number": 1, "expect": "E9" })).unwrap();
    assert_eq!(ev.issue.as_deref(), Some("E9"));

    let ev = normalize(&json!({ "number": 1, "period": "P9" })).unwrap();
    assert_eq!(ev.issue.as_deref(), Some("P9"));

    // Empty issue is absent, not "".
    let ev = normalize(&json!({ "number": 1, "issue": "" })).unwrap();
    assert_eq!(ev.issue, None);
}

#[test]
fn plain_string_uses_trailing_digits() {
    let ev = normalize(&json!("round result: 42")).unwrap();
    assert_eq!(ev.issue, None);
    assert_eq!(ev.number, 42);

    // Last run of at most two digits, even when the prefix has digits too.
    assert_eq!(normalize(&json!("value: 123")).unwrap().number, 23);
    assert_eq!(normalize(&json!("round 12 result 7")).unwrap().number, 7);

    assert!(normalize(&json!("no digits at the end 42x")).is_none());
}

#[test]
fn bracketed_string_is_parsed_as_json() {
    let ev = normalize(&json!(r#"{"number": 5, "issue": "S1"}"#)).unwrap();
    assert_eq!(ev.issue.as_deref(), Some("S1"));
    assert_eq!(ev.number, 5);

    // Unparseable braces fall through to trailing digits (here: none).
    assert!(normalize(&json!("{not json}")).is_none());
}

#[test]
fn history_arrays_recurse_into_last_element() {
    let ev = normalize(&json!({ "list": [ { "number": 3 }, { "number": 8 } ] })).unwrap();
    assert_eq!(ev.number, 8);

    let ev = normalize(&json!([ { "number": 1 }, { "number": 2, "issue": "I2" } ])).unwrap();
    assert_eq!(ev.number, 2);
    assert_eq!(ev.issue.as_deref(), Some("I2"));

    // Collection keys are only tried when no direct candidate resolved.
    let ev = normalize(&json!({ "number": 9, "rows": [ { "number": 1 } ] })).unwrap();
    assert_eq!(ev.number, 9);
}

#[test]
fn out_of_range_and_shapeless_payloads_yield_none() {
    assert!(normalize(&json!({ "number": 150 })).is_none());
    assert!(normalize(&json!({ "number": -1 })).is_none());
    assert!(normalize(&json!({ "status": "ok", "ping": 1234 })).is_none());
    assert!(normalize(&json!(null)).is_none());
    assert!(normalize(&json!(true)).is_none());
    assert!(normalize(&json!([])).is_none());
}

#[test]
fn issue_comes_from_the_node_the_number_was_found_in() {
    // The outer object has no candidate; recursion lands on the last row,
    // and the issue is resolved there, not from the wrapper.
    let raw = json!({
        "code": 0,
        "data": [
            { "number": 4, "issue": "old" },
            { "number": 6, "issue": "new" }
        ]
    });
    let ev = normalize(&raw).unwrap();
    assert_eq!(ev.number, 6);
    assert_eq!(ev.issue.as_deref(), Some("new"));
}
