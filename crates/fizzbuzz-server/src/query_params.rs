//! Typed lookups over a grouped query string.

use std::collections::BTreeMap;

pub type QueryValues = BTreeMap<String, Vec<String>>;

/// The value of `key` when it appears exactly once.
pub fn query_param<'a>(query: &'a QueryValues, key: &str) -> Option<&'a str> {
    match query.get(key).map(Vec::as_slice) {
        Some([value]) => Some(value.as_str()),
        _ => None,
    }
}

pub fn query_string(query: &QueryValues, key: &str, default: &str) -> String {
    query_param(query, key).unwrap_or(default).to_string()
}

/// Falls back to `default` when the value is missing, repeated or not an integer.
pub fn query_int(query: &QueryValues, key: &str, default: i64) -> i64 {
    query_param(query, key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
