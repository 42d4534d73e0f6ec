//! Payload normalization: turn an arbitrarily-shaped feed message into a
//! canonical `(issue, number)` event.
//!
//! The feed's wire format is not under our control and has changed before,
//! so instead of a strict schema we probe a prioritized list of candidate
//! fields and fall back gracefully. A message we cannot interpret yields
//! `None`, never an error; the `[0,99]` bound is the sanity filter that
//! keeps malformed input from producing false positives.

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

/// Field paths probed, in priority order, for the draw number.
const NUMBER_CANDIDATES: &[&[&str]] = &[
    &["number"],
    &["result"],
    &["openCode"],
    &["lucky"],
    &["lottery", "number"],
    &["data", "number"],
];

/// Field names probed, in priority order, for the round identifier.
const ISSUE_CANDIDATES: &[&str] = &["issue", "expect", "period"];

/// Keys under which feeds commonly nest history arrays (freshest round last).
const COLLECTION_KEYS: &[&str] = &["list", "rows", "data", "resultList"];

/// One normalized feed event. `number` is always within `0..=99`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalEvent {
    /// Round identifier as supplied by the feed, if any.
    pub issue: Option<String>,
    pub number: u8,
    /// The payload node the number was extracted from.
    pub source: Value,
}

fn trailing_digits_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(\d{1,2})\s*$").unwrap())
}

/// Extract the last run of at most two trailing digits ("value: 123" -> 23).
/// One or two digits always fit `0..=99`, so no extra bound check is needed.
fn trailing_number(s: &str) -> Option<u8> {
    let caps = trailing_digits_re().captures(s.trim())?;
    caps[1].parse::<u8>().ok()
}

/// A candidate is valid if it is an integer in `0..=99` or a string whose
/// trailing digits parse to one. Floats and other scalars never match.
fn value_number(v: &Value) -> Option<u8> {
    match v {
        Value::Number(n) => {
            let i = n.as_i64()?;
            u8::try_from(i).ok().filter(|n| *n <= 99)
        }
        Value::String(s) => trailing_number(s),
        _ => None,
    }
}

fn get_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

/// Resolve the round identifier from the same mapping the number came from.
/// Missing or empty resolves to `None`, never to an empty string.
fn resolve_issue(map: &Value) -> Option<String> {
    for key in ISSUE_CANDIDATES {
        match map.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

/// Recursive-descent probe over an unknown payload shape.
///
/// Mappings are probed for direct number candidates first, then for nested
/// history arrays; strings are re-parsed as JSON when they look bracketed,
/// otherwise scanned for trailing digits; sequences recurse into their last
/// element (history lists put the most recent round last). Anything else is
/// "no extractable event".
pub fn normalize(raw: &Value) -> Option<CanonicalEvent> {
    match raw {
        Value::Object(_) => {
            for path in NUMBER_CANDIDATES {
                let Some(candidate) = get_path(raw, path) else {
                    continue;
                };
                if let Some(number) = value_number(candidate) {
                    return Some(CanonicalEvent {
                        issue: resolve_issue(raw),
                        number,
                        source: raw.clone(),
                    });
                }
            }
            for key in COLLECTION_KEYS {
                if let Some(Value::Array(items)) = raw.get(*key) {
                    if let Some(last) = items.last() {
                        return normalize(last);
                    }
                }
            }
            None
        }
        Value::String(s) => {
            let trimmed = s.trim();
            let looks_structured = (trimmed.starts_with('{') && trimmed.ends_with('}'))
                || (trimmed.starts_with('[') && trimmed.ends_with(']'));
            if looks_structured {
                if let Ok(parsed) = serde_json::from_str::<Value>(trimmed) {
                    return normalize(&parsed);
                }
            }
            trailing_number(trimmed).map(|number| CanonicalEvent {
                issue: None,
                number,
                source: raw.clone(),
            })
        }
        Value::Array(items) => items.last().and_then(normalize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_number_takes_last_two_digits() {
        assert_eq!(trailing_number("round result: 42"), Some(42));
        assert_eq!(trailing_number("value: 123"), Some(23));
        assert_eq!(trailing_number("7"), Some(7));
        assert_eq!(trailing_number("8  "), Some(8));
        assert_eq!(trailing_number("no digits here"), None);
        assert_eq!(trailing_number("42 then text"), None);
    }

    #[test]
    fn value_number_rejects_floats_and_bools() {
        assert_eq!(value_number(&serde_json::json!(7)), Some(7));
        assert_eq!(value_number(&serde_json::json!(7.0)), None);
        assert_eq!(value_number(&serde_json::json!(true)), None);
        assert_eq!(value_number(&serde_json::json!(150)), None);
        assert_eq!(value_number(&serde_json::json!(-3)), None);
    }

    #[test]
    fn issue_resolution_priority_and_empty_collapse() {
        let v = serde_json::json!({ "expect": "E1", "period": "P1" });
        assert_eq!(resolve_issue(&v), Some("E1".to_string()));

        let v = serde_json::json!({ "issue": "  ", "period": "P1" });
        assert_eq!(resolve_issue(&v), Some("P1".to_string()));

        let v = serde_json::json!({ "issue": 20240101 });
        assert_eq!(resolve_issue(&v), Some("20240101".to_string()));

        let v = serde_json::json!({ "other": 1 });
        assert_eq!(resolve_issue(&v), None);
    }
}
