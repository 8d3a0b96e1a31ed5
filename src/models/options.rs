use serde_json::{json, Map, Value};
use crate::error::Result;
use crate::filter::{filter_records, project_fields, sort_records, RecordFilter};
use crate::query::SortSpec;
use crate::view::take_view;

/// Post-processing shared by the list-returning endpoints.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub sort: Vec<SortSpec>,
    pub filter: Option<RecordFilter>,
    pub exclude: Option<RecordFilter>,
    /// Top-level keys to keep; on the stats base these are sent as `include` instead.
    pub fields: Vec<String>,
    pub view: Option<String>,
    /// Wrap results with the request path and the options applied.
    pub info: bool,
}

impl ListOptions {
    pub fn view(path: impl Into<String>) -> Self {
        Self {
            view: Some(path.into()),
            ..Self::default()
        }
    }

    /// Filter, then exclude, then sort when `client_sort` is set.
    pub fn select(&self, records: Vec<Value>, client_sort: bool) -> Vec<Value> {
        let mut records = match &self.filter {
            Some(filter) => filter_records(records, filter, false),
            None => records,
        };
        if let Some(exclude) = &self.exclude {
            records = filter_records(records, exclude, true);
        }
        if client_sort {
            sort_records(&mut records, &self.sort);
        }
        records
    }

    /// [`select`](Self::select) followed by field projection.
    pub fn shape(&self, records: Vec<Value>) -> Vec<Value> {
        let mut records = self.select(records, true);
        project_fields(&mut records, &self.fields);
        records
    }

    /// Applies [`shape`](Self::shape) to the array under `key`, returning
    /// the number of records left. Missing or non-array keys count as zero.
    pub fn shape_at(&self, container: &mut Value, key: &str) -> usize {
        match container.get_mut(key) {
            Some(Value::Array(items)) => {
                let shaped = self.shape(std::mem::take(items));
                let count = shaped.len();
                *items = shaped;
                count
            }
            _ => 0,
        }
    }

    pub fn finish(&self, value: Value, strict: bool) -> Result<Value> {
        match &self.view {
            Some(path) => take_view(value, path, strict),
            None => Ok(value),
        }
    }

    /// [`finish`](Self::finish), then, when `info` is set, an envelope of
    /// `path`, the options used and the `response`.
    pub fn finish_at(&self, path: &str, value: Value, strict: bool) -> Result<Value> {
        let response = self.finish(value, strict)?;
        if !self.info {
            return Ok(response);
        }

        let sort = if self.sort.is_empty() {
            Value::Null
        } else {
            Value::Object(
                self.sort
                    .iter()
                    .map(|s| (s.property.clone(), Value::String(s.direction.clone())))
                    .collect::<Map<String, Value>>(),
            )
        };
        let fields = if self.fields.is_empty() {
            Value::Null
        } else {
            json!(self.fields)
        };

        Ok(json!({
            "path": path,
            "view": self.view,
            "fields": fields,
            "filters": self.filter.as_ref().map(RecordFilter::to_json),
            "exclude": self.exclude.as_ref().map(RecordFilter::to_json),
            "sort": sort,
            "response": response,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shape_at_rewrites_nested_array() {
        let options = ListOptions {
            sort: vec![SortSpec::desc("period")],
            exclude: Some(RecordFilter::new().eq("typeDescKey", "stoppage")),
            fields: vec!["period".into(), "typeDescKey".into()],
            ..ListOptions::default()
        };
        let mut game = json!({
            "id": 2023020001,
            "plays": [
                {"period": 1, "typeDescKey": "goal", "eventId": 7},
                {"period": 2, "typeDescKey": "stoppage", "eventId": 8},
                {"period": 3, "typeDescKey": "shot-on-goal", "eventId": 9}
            ]
        });

        assert_eq!(options.shape_at(&mut game, "plays"), 2);
        assert_eq!(
            game["plays"],
            json!([
                {"period": 3, "typeDescKey": "shot-on-goal"},
                {"period": 1, "typeDescKey": "goal"}
            ])
        );
        assert_eq!(options.shape_at(&mut game, "missing"), 0);
    }

    #[test]
    fn select_leaves_order_for_server_sorted_lists() {
        let options = ListOptions {
            sort: vec![SortSpec::asc("id")],
            ..ListOptions::default()
        };
        let records = vec![json!({"id": 2}), json!({"id": 1})];
        assert_eq!(options.select(records.clone(), false), records);
    }

    #[test]
    fn finish_applies_view() {
        let options = ListOptions::view("data.0");
        let value = json!({"data": [{"id": 1}], "total": 1});
        assert_eq!(options.finish(value, true).unwrap(), json!({"id": 1}));
    }

    #[test]
    fn finish_at_wraps_only_with_info() {
        let value = json!({"data": [{"id": 1}], "total": 1});
        let plain = ListOptions::default();
        assert_eq!(plain.finish_at("https://x/y", value.clone(), true).unwrap(), value);

        let options = ListOptions {
            sort: vec![SortSpec::desc("id")],
            filter: Some(RecordFilter::new().eq("id", 1)),
            view: Some("total".into()),
            info: true,
            ..ListOptions::default()
        };
        let wrapped = options
            .finish_at("https://api.nhle.com/stats/rest/en/season", value, true)
            .unwrap();
        assert_eq!(
            wrapped,
            json!({
                "path": "https://api.nhle.com/stats/rest/en/season",
                "view": "total",
                "fields": null,
                "filters": {"id": 1},
                "exclude": null,
                "sort": {"id": "DESC"},
                "response": 1
            })
        );
    }
}
