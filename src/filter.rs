//! Client-side filtering, projection and ordering of response records.

use std::cmp::Ordering;
use serde_json::Value;
use crate::error::{Error, Result};
use crate::query::SortSpec;
use crate::view::nested_value;

#[derive(Debug, Clone, PartialEq)]
pub enum Expected {
    /// Field is missing or null.
    Null,
    Equals(Value),
    /// Field equals one of the values.
    AnyOf(Vec<Value>),
}

impl Expected {
    fn matches(&self, actual: Option<&Value>) -> bool {
        match self {
            Expected::Null => actual.is_none(),
            Expected::Equals(expected) => actual == Some(expected),
            Expected::AnyOf(options) => actual.is_some_and(|a| options.contains(a)),
        }
    }
}

/// Conditions on dotted record keys; a record matches when all of them hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    conditions: Vec<(String, Expected)>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((key.into(), Expected::Equals(value.into())));
        self
    }

    pub fn any_of<V: Into<Value>>(mut self, key: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.conditions.push((key.into(), Expected::AnyOf(values)));
        self
    }

    pub fn null(mut self, key: impl Into<String>) -> Self {
        self.conditions.push((key.into(), Expected::Null));
        self
    }

    /// `{"key": value}` object form: `null` means missing, an array means any-of.
    pub fn from_json(filter: &Value) -> Result<Self> {
        let map = filter.as_object().ok_or_else(|| {
            Error::validation(format!("record filter must be a JSON object, got {}", filter))
        })?;
        let conditions = map
            .iter()
            .map(|(key, value)| {
                let expected = match value {
                    Value::Null => Expected::Null,
                    Value::Array(items) => Expected::AnyOf(items.clone()),
                    other => Expected::Equals(other.clone()),
                };
                (key.clone(), expected)
            })
            .collect();
        Ok(Self { conditions })
    }

    /// Inverse of [`from_json`](Self::from_json).
    pub fn to_json(&self) -> Value {
        let map = self
            .conditions
            .iter()
            .map(|(key, expected)| {
                let value = match expected {
                    Expected::Null => Value::Null,
                    Expected::Equals(value) => value.clone(),
                    Expected::AnyOf(values) => Value::Array(values.clone()),
                };
                (key.clone(), value)
            })
            .collect();
        Value::Object(map)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, record: &Value) -> bool {
        self.conditions
            .iter()
            .all(|(key, expected)| expected.matches(nested_value(record, key)))
    }
}

/// Keeps matching records, or drops them when `exclude` is set.
pub fn filter_records(records: Vec<Value>, filter: &RecordFilter, exclude: bool) -> Vec<Value> {
    if filter.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| filter.matches(record) != exclude)
        .collect()
}

/// Keeps only the named top-level keys of each object record.
pub fn project_fields(records: &mut [Value], fields: &[String]) {
    if fields.is_empty() {
        return;
    }
    for record in records.iter_mut() {
        if let Value::Object(map) = record {
            map.retain(|key, _| fields.iter().any(|f| f == key));
        }
    }
}

/// Stable multi-key sort, first key primary. Records missing a key sort
/// after those that have it, whatever the direction.
pub fn sort_records(records: &mut [Value], specs: &[SortSpec]) {
    if specs.is_empty() {
        return;
    }
    records.sort_by(|a, b| {
        for spec in specs {
            let ordering = match (nested_value(a, &spec.property), nested_value(b, &spec.property)) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(x), Some(y)) => {
                    let ord = compare_values(x, y);
                    if spec.is_descending() { ord.reverse() } else { ord }
                }
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x
            .iter()
            .zip(y)
            .map(|(p, q)| compare_values(p, q))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}
