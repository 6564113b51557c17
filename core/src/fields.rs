//! Field normalization for request bodies and query strings.
//!
//! The remote API treats an omitted field as "keep the server default", which
//! is not the same as sending `null`. `Fields` therefore only ever inserts an
//! optional field when it is `Some`; `false`, `0` and `""` are real values and
//! are kept. Insertion order is preserved (`serde_json` is built with
//! `preserve_order`) so bodies serialize in declaration order.

use serde_json::{Map, Value};

use crate::error::RootError;

/// An ordered set of request fields with unset optionals physically absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Map<String, Value>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a required field.
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Insert `value` only when it is set.
    pub fn optional<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
        self.merge(Fields(normalize([(key, value)])))
    }

    /// Append `other`'s fields; on key clashes `other` wins.
    pub fn merge(mut self, other: Fields) -> Self {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Render as query pairs. Strings go out unquoted; other scalars use
    /// their JSON text (`true`, `42`).
    pub fn into_query(self) -> Vec<(String, String)> {
        self.0
            .into_iter()
            .map(|(key, value)| {
                let rendered = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, rendered)
            })
            .collect()
    }

    pub(crate) fn to_json(&self) -> Result<String, RootError> {
        serde_json::to_string(&self.0).map_err(|e| RootError::Serialization(e.to_string()))
    }
}

impl From<Fields> for Value {
    fn from(fields: Fields) -> Self {
        Value::Object(fields.0)
    }
}

/// Drop every unset entry, keeping the rest in order.
pub fn normalize<I, K, V>(fields: I) -> Map<String, Value>
where
    I: IntoIterator<Item = (K, Option<V>)>,
    K: Into<String>,
    V: Into<Value>,
{
    fields
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.into(), v.into())))
        .collect()
}

/// A single string or a list of strings.
///
/// Used for `included_objects` (sent as a comma-joined query value) and
/// `policy_ids` (sent as a JSON array).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

pub type IncludedObjects = OneOrMany;
pub type PolicyIds = OneOrMany;

impl OneOrMany {
    /// Join with `,` in caller order. A single element has no trailing comma.
    pub fn joined(&self) -> String {
        match self {
            OneOrMany::One(value) => value.clone(),
            OneOrMany::Many(values) => values.join(","),
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

impl From<&str> for OneOrMany {
    fn from(value: &str) -> Self {
        OneOrMany::One(value.to_string())
    }
}

impl From<String> for OneOrMany {
    fn from(value: String) -> Self {
        OneOrMany::One(value)
    }
}

impl From<Vec<String>> for OneOrMany {
    fn from(values: Vec<String>) -> Self {
        OneOrMany::Many(values)
    }
}

impl From<Vec<&str>> for OneOrMany {
    fn from(values: Vec<&str>) -> Self {
        OneOrMany::Many(values.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for OneOrMany {
    fn from(values: [&str; N]) -> Self {
        OneOrMany::Many(values.iter().map(|v| v.to_string()).collect())
    }
}

/// Format `included_objects` for the `include` query key.
pub fn format_included(included: Option<&IncludedObjects>) -> Option<String> {
    included.map(OneOrMany::joined)
}

/// A bare policy id becomes a one-element list; a list passes through.
pub fn normalize_policy_ids(policy_ids: Option<PolicyIds>) -> Option<Vec<String>> {
    policy_ids.map(OneOrMany::into_vec)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unset_fields_are_absent() {
        let fields = Fields::new()
            .field("first_name", "Erlich")
            .optional("email", None::<String>)
            .optional("cellphone", Some("0821234567"));
        assert!(!fields.contains_key("email"));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn falsy_values_are_kept() {
        let fields = Fields::new()
            .optional("smoker", Some(false))
            .optional("age", Some(0))
            .optional("email", Some(""));
        assert_eq!(
            Value::from(fields),
            json!({"smoker": false, "age": 0, "email": ""})
        );
    }

    #[test]
    fn declaration_order_survives_serialization() {
        let fields = Fields::new()
            .field("z", 1)
            .field("a", 2)
            .optional("m", Some(3));
        assert_eq!(fields.to_json().unwrap(), r#"{"z":1,"a":2,"m":3}"#);
    }

    #[test]
    fn normalize_filters_only_none() {
        let map = normalize(vec![
            ("claim_status", Some(json!("open"))),
            ("approval_status", None),
            ("flag", Some(json!(false))),
        ]);
        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, ["claim_status", "flag"]);
    }

    #[test]
    fn optional_matches_normalize() {
        let built = Fields::new()
            .optional("claim_status", Some("open"))
            .optional("approval_status", None::<&str>)
            .optional("flag", Some(false));
        let normalized = normalize([
            ("claim_status", Some(json!("open"))),
            ("approval_status", None),
            ("flag", Some(json!(false))),
        ]);
        assert_eq!(built, Fields(normalized));
    }

    #[test]
    fn merge_lets_later_fields_win() {
        let fields = Fields::new()
            .field("description", "from source")
            .merge(Fields::new().field("description", "caller"));
        assert_eq!(fields.get("description"), Some(&json!("caller")));
    }

    #[test]
    fn query_values_are_unquoted() {
        let query = Fields::new()
            .field("claim_status", "open")
            .field("active", true)
            .field("limit", 10)
            .into_query();
        assert_eq!(
            query,
            vec![
                ("claim_status".to_string(), "open".to_string()),
                ("active".to_string(), "true".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn format_included_shapes() {
        assert_eq!(format_included(None), None);
        assert_eq!(
            format_included(Some(&"policies".into())),
            Some("policies".to_string())
        );
        assert_eq!(
            format_included(Some(&["policies"].into())),
            Some("policies".to_string())
        );
        assert_eq!(
            format_included(Some(&["a", "b", "c"].into())),
            Some("a,b,c".to_string())
        );
        // No dedup, no sorting.
        assert_eq!(
            format_included(Some(&vec!["c", "a", "c"].into())),
            Some("c,a,c".to_string())
        );
    }

    #[test]
    fn policy_ids_normalization() {
        assert_eq!(normalize_policy_ids(None), None);
        assert_eq!(
            normalize_policy_ids(Some("p1".into())),
            Some(vec!["p1".to_string()])
        );
        assert_eq!(
            normalize_policy_ids(Some(["p1", "p2"].into())),
            Some(vec!["p1".to_string(), "p2".to_string()])
        );
    }
}
