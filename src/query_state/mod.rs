//! URL query-string state for dashboard pages.
//!
//! Filter state lives in the address bar. Pages decode it on navigation,
//! fold in their own defaults, and write changes back with a history
//! replace. Every function here is total: malformed input is dropped,
//! never surfaced as an error, because the URL is user-editable.

pub mod dates;
pub mod entity_ids;
pub mod navigation;

use std::fmt;

pub use dates::{
    default_date_range, is_valid_date_range, Clock, DateRange, DateRangePolicy, DateRangePreset,
    FixedClock, SystemClock,
};
pub use entity_ids::{parse_entity_ids, stringify_entity_ids, EntityId, EntityIdCandidate};
pub use navigation::{
    clear, current_query_params, merge_and_navigate, BrowsingContext, Location, MemoryHistory,
    Navigate, NavigateOptions,
};

pub const START_DATE: &str = "start_date";
pub const END_DATE: &str = "end_date";
pub const ENTITY_IDS: &str = "entity_ids";
pub const TAB: &str = "tab";
pub const PARETO: &str = "pareto";

/// Keys recognized by [`decode`], in field-contract order.
pub const FILTER_KEYS: [&str; 5] = [START_DATE, END_DATE, ENTITY_IDS, TAB, PARETO];

// =============================================================================
// Values
// =============================================================================

/// A value that can be written into the query string.
///
/// `Null` and `Undefined` both mean "no value"; they exist so partial
/// updates can say "drop this key" explicitly.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    Undefined,
}

impl QueryValue {
    /// Canonical string form, or `None` for null, undefined, and `""`.
    pub fn to_query_string(&self) -> Option<String> {
        match self {
            QueryValue::Str(s) if s.is_empty() => None,
            QueryValue::Str(s) => Some(s.clone()),
            QueryValue::Int(n) => Some(n.to_string()),
            QueryValue::Float(f) => Some(format_float(*f)),
            QueryValue::Bool(b) => Some(b.to_string()),
            QueryValue::Null | QueryValue::Undefined => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Number formatting as a browser would print it (`2.0` → `"2"`).
fn format_float(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Str(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        QueryValue::Str(value.clone())
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Int(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        QueryValue::Int(value.into())
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Int(value.into())
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(n) => QueryValue::Int(n),
            Err(_) => QueryValue::Str(value.to_string()),
        }
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Float(value)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(QueryValue::Null)
    }
}

// =============================================================================
// Params
// =============================================================================

/// Insertion-ordered map of query keys to values.
///
/// Equality ignores order: two maps are equal when they hold the same
/// keys with the same values.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    entries: Vec<(String, QueryValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or overwrite. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// String value for `key`, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(QueryValue::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for QueryParams {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

// =============================================================================
// Codec
// =============================================================================

/// Decode the filter keys out of a query string.
///
/// Accepts the string with or without a leading `?`. Absent and empty
/// keys are left out of the result, unknown keys are ignored, and `None`
/// decodes like `""`.
pub fn decode<'a>(search: impl Into<Option<&'a str>>) -> QueryParams {
    let Some(search) = search.into() else {
        return QueryParams::new();
    };
    let search = search.strip_prefix('?').unwrap_or(search);
    if search.is_empty() {
        return QueryParams::new();
    }

    let pairs: Vec<(String, String)> = url::form_urlencoded::parse(search.as_bytes())
        .into_owned()
        .collect();

    let mut params = QueryParams::new();
    for key in FILTER_KEYS {
        // First occurrence wins for repeated keys.
        if let Some((_, value)) = pairs.iter().find(|(k, _)| k == key) {
            if !value.is_empty() {
                params.insert(key, value.as_str());
            }
        }
    }
    params
}

/// Encode params into a query string without the leading `?`.
///
/// Null, undefined, and empty-string values are dropped. Keys keep the
/// order of the input map.
pub fn encode(params: &QueryParams) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in params.iter() {
        if let Some(value) = value.to_query_string() {
            serializer.append_pair(key, &value);
        }
    }
    serializer.finish()
}

/// Shallow merge: keys in `update` win, everything else is kept.
///
/// Keys already in `current` keep their position; new keys are appended
/// in the order they appear in `update`.
pub fn merge(current: &QueryParams, update: &QueryParams) -> QueryParams {
    let mut merged = current.clone();
    for (key, value) in update.iter() {
        merged.insert(key, value.clone());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_map(pairs: &[(&str, &str)]) -> QueryParams {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_decode_all_keys() {
        let params = decode(
            "?start_date=2025-01-01&end_date=2025-12-31&entity_ids=1,2,3&tab=overview&pareto=true",
        );
        assert_eq!(
            params,
            string_map(&[
                ("start_date", "2025-01-01"),
                ("end_date", "2025-12-31"),
                ("entity_ids", "1,2,3"),
                ("tab", "overview"),
                ("pareto", "true"),
            ])
        );
    }

    #[test]
    fn test_decode_empty_and_missing() {
        assert!(decode("").is_empty());
        assert!(decode("?").is_empty());
        assert!(decode(None).is_empty());
    }

    #[test]
    fn test_decode_partial_has_no_extra_keys() {
        let params = decode("start_date=2025-01-01&tab=overview");
        assert_eq!(
            params,
            string_map(&[("start_date", "2025-01-01"), ("tab", "overview")])
        );
        assert!(!params.contains_key("end_date"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_decode_leading_question_mark_is_optional() {
        let with = decode("?start_date=2025-01-01&end_date=2025-12-31");
        let without = decode("start_date=2025-01-01&end_date=2025-12-31");
        assert_eq!(with, without);
        assert_eq!(with.get_str("end_date"), Some("2025-12-31"));
    }

    #[test]
    fn test_decode_ignores_unknown_and_empty_keys() {
        let params = decode("?start=2025-01-01&entities=1,2&tab=&pareto=false&utm_source=mail");
        assert_eq!(params, string_map(&[("pareto", "false")]));
    }

    #[test]
    fn test_decode_first_occurrence_wins() {
        let params = decode("tab=scopes&tab=categories");
        assert_eq!(params.get_str("tab"), Some("scopes"));
    }

    #[test]
    fn test_decode_percent_encoded_values() {
        let params = decode("entity_ids=1%2C2%2C3&tab=by+scope");
        assert_eq!(params.get_str("entity_ids"), Some("1,2,3"));
        assert_eq!(params.get_str("tab"), Some("by scope"));
    }

    #[test]
    fn test_encode_drops_empty_values() {
        let params = QueryParams::new()
            .with("start_date", "2025-01-01")
            .with("end_date", QueryValue::Null)
            .with("entity_ids", QueryValue::Undefined)
            .with("tab", "")
            .with("pareto", "true");
        assert_eq!(encode(&params), "start_date=2025-01-01&pareto=true");
    }

    #[test]
    fn test_encode_stringifies_scalars() {
        let params = QueryParams::new()
            .with("pareto", true)
            .with("page", 2)
            .with("size", 50.0)
            .with("ratio", 0.5)
            .with("entity", Option::<u64>::None);
        assert_eq!(encode(&params), "pareto=true&page=2&size=50&ratio=0.5");
    }

    #[test]
    fn test_encode_keeps_insertion_order() {
        let params = QueryParams::new()
            .with("tab", "scopes")
            .with("start_date", "2025-01-01");
        assert_eq!(encode(&params), "tab=scopes&start_date=2025-01-01");
        assert_eq!(params.to_string(), "tab=scopes&start_date=2025-01-01");
    }

    #[test]
    fn test_encode_escapes_like_url_search_params() {
        let params = QueryParams::new().with("entity_ids", "1,2").with("tab", "a b");
        assert_eq!(encode(&params), "entity_ids=1%2C2&tab=a+b");
    }

    #[test]
    fn test_round_trip_for_filter_keys() {
        let maps = [
            string_map(&[("start_date", "2025-01-01")]),
            string_map(&[("tab", "details"), ("start_date", "2024-03-01")]),
            string_map(&[
                ("start_date", "2025-01-01"),
                ("end_date", "2025-12-31"),
                ("entity_ids", "4, 5,6"),
                ("tab", "scopes & more"),
                ("pareto", "false"),
            ]),
        ];
        for map in maps {
            assert_eq!(decode(encode(&map).as_str()), map);
        }
    }

    #[test]
    fn test_merge_new_keys_win() {
        let current = string_map(&[("start_date", "2025-01-01"), ("tab", "total")]);
        let update = string_map(&[("tab", "details"), ("pareto", "true")]);
        let merged = merge(&current, &update);
        assert_eq!(
            encode(&merged),
            "start_date=2025-01-01&tab=details&pareto=true"
        );
    }

    #[test]
    fn test_merge_null_removes_on_encode() {
        let current = string_map(&[("start_date", "2025-01-01"), ("entity_ids", "1,2")]);
        let update = QueryParams::new().with("entity_ids", QueryValue::Null);
        assert_eq!(encode(&merge(&current, &update)), "start_date=2025-01-01");
    }

    #[test]
    fn test_params_equality_ignores_order() {
        let a = string_map(&[("tab", "x"), ("pareto", "true")]);
        let b = string_map(&[("pareto", "true"), ("tab", "x")]);
        assert_eq!(a, b);
        assert_ne!(a, string_map(&[("tab", "x")]));
    }

    #[test]
    fn test_params_insert_and_remove() {
        let mut params = QueryParams::new();
        params.insert("tab", "a");
        params.insert("pareto", "true");
        params.insert("tab", "b");
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["tab", "pareto"]);
        assert_eq!(params.remove("tab"), Some(QueryValue::from("b")));
        assert_eq!(params.remove("tab"), None);
        assert_eq!(params.len(), 1);
    }
}
