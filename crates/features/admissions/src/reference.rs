//! Dropdown data: the fixed batch of reference lists loaded when a session starts.

use crate::error::AdmissionsError;
use campus_domain::reference::{DropdownOption, ReferenceList, WireShape};
use fxhash::FxHashMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::future::Future;
use strum::IntoEnumIterator;
use tracing::{debug, warn};

/// Port to the reference-data endpoints.
pub trait ReferenceSource: Send + Sync + 'static {
    /// GETs `path` and returns the decoded JSON body.
    fn fetch(&self, path: &str) -> impl Future<Output = Result<Value, AdmissionsError>> + Send;
}

/// Converts a response body to options.
///
/// The body is either the row array itself or an object wrapping it in `data` or `content`.
/// Rows lacking a value or a label are dropped; numeric values are stringified.
#[must_use]
pub fn to_options(body: &Value, shape: WireShape) -> Vec<DropdownOption> {
    let rows: &[Value] = match body {
        Value::Array(rows) => rows.as_slice(),
        Value::Object(map) => match map.get("data").or_else(|| map.get("content")) {
            Some(Value::Array(rows)) => rows.as_slice(),
            _ => &[],
        },
        _ => &[],
    };

    rows.iter()
        .filter_map(|row| {
            let value = scalar(row.get(shape.value_key)?)?;
            let label = scalar(row.get(shape.label_key)?)?;
            Some(DropdownOption { value, label })
        })
        .collect()
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Loads `path` and maps it, degrading any failure to an empty list.
pub(crate) async fn fetch_options<R: ReferenceSource>(
    source: &R,
    path: &str,
    shape: WireShape,
) -> Vec<DropdownOption> {
    match source.fetch(path).await {
        Ok(body) => {
            let options = to_options(&body, shape);
            debug!(path, count = options.len(), "Reference list loaded");
            options
        },
        Err(err) => {
            warn!(path, error = %err, "Reference list unavailable, using empty list");
            Vec::new()
        },
    }
}

/// In-memory cache of the session's reference lists.
#[derive(Debug)]
pub struct ReferenceCache<R> {
    source: R,
    lists: RwLock<FxHashMap<ReferenceList, Vec<DropdownOption>>>,
}

impl<R: ReferenceSource> ReferenceCache<R> {
    pub fn new(source: R) -> Self {
        Self { source, lists: RwLock::default() }
    }

    /// Fetches every list concurrently. Failed lists end up empty.
    pub async fn load_all(&self) {
        tokio::join!(
            self.load(ReferenceList::Departments),
            self.load(ReferenceList::Impairments),
            self.load(ReferenceList::StudentStatuses),
            self.load(ReferenceList::SchoolBackgrounds),
            self.load(ReferenceList::ProgramModalities),
            self.load(ReferenceList::Regions),
            self.load(ReferenceList::Bcys),
        );
    }

    /// Refetches one list, replacing its previous content. Returns the new length.
    pub async fn load(&self, list: ReferenceList) -> usize {
        let options = fetch_options(&self.source, list.path(), list.shape()).await;
        let count = options.len();
        self.lists.write().insert(list, options);
        count
    }

    #[must_use]
    pub fn options(&self, list: ReferenceList) -> Vec<DropdownOption> {
        self.lists.read().get(&list).cloned().unwrap_or_default()
    }

    /// Label for a stored code, if the code is in the list.
    #[must_use]
    pub fn label(&self, list: ReferenceList, value: &str) -> Option<String> {
        self.lists.read().get(&list)?.iter().find(|o| o.value == value).map(|o| o.label.clone())
    }

    /// Lists that came back empty, in catalog order.
    #[must_use]
    pub fn empty_lists(&self) -> Vec<ReferenceList> {
        let lists = self.lists.read();
        ReferenceList::iter().filter(|l| lists.get(l).is_none_or(Vec::is_empty)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default)]
    struct Fixed(FxHashMap<&'static str, Value>);

    impl ReferenceSource for Fixed {
        async fn fetch(&self, path: &str) -> Result<Value, AdmissionsError> {
            self.0.get(path).cloned().ok_or_else(|| AdmissionsError::Rejected {
                status: 404,
                message: None,
                context: None,
            })
        }
    }

    #[test]
    fn rows_are_mapped_and_incomplete_rows_dropped() {
        let body = json!([
            { "dptID": 3, "deptName": "Computer Science" },
            { "dptID": "4", "deptName": "Nursing" },
            { "dptID": 5 },
            { "deptName": "Orphan" },
            { "dptID": "", "deptName": "Blank" },
        ]);

        let options = to_options(&body, ReferenceList::Departments.shape());
        assert_eq!(
            options,
            vec![
                DropdownOption::new("3", "Computer Science"),
                DropdownOption::new("4", "Nursing"),
            ]
        );
    }

    #[test]
    fn wrapped_bodies_are_unwrapped() {
        let shape = ReferenceList::Regions.shape();
        let data = json!({ "data": [{ "regionCode": "01", "region": "Tigray" }] });
        let content = json!({ "content": [{ "regionCode": "03", "region": "Amhara" }] });

        assert_eq!(to_options(&data, shape), vec![DropdownOption::new("01", "Tigray")]);
        assert_eq!(to_options(&content, shape), vec![DropdownOption::new("03", "Amhara")]);
        assert!(to_options(&json!({ "message": "ok" }), shape).is_empty());
    }

    #[tokio::test]
    async fn failed_lists_degrade_to_empty() {
        let mut bodies = FxHashMap::default();
        bodies.insert("/api/regions", json!([{ "regionCode": "01", "region": "Tigray" }]));
        bodies.insert("/api/bcys", json!([{ "bcysID": 9, "bcysDisplayName": "2024 Year 1 Sem 1" }]));
        let cache = ReferenceCache::new(Fixed(bodies));

        cache.load_all().await;

        assert_eq!(cache.options(ReferenceList::Regions).len(), 1);
        assert_eq!(cache.label(ReferenceList::Bcys, "9").as_deref(), Some("2024 Year 1 Sem 1"));
        assert!(cache.options(ReferenceList::Departments).is_empty());
        assert_eq!(cache.empty_lists().len(), 5);
    }

    #[tokio::test]
    async fn reload_replaces_instead_of_merging() {
        let mut bodies = FxHashMap::default();
        bodies.insert("/api/impairments", json!([{ "impairmentCode": "V", "impairment": "Visual" }]));
        let mut cache = ReferenceCache::new(Fixed(bodies));
        cache.load(ReferenceList::Impairments).await;

        cache.source.0.insert("/api/impairments", json!([]));
        assert_eq!(cache.load(ReferenceList::Impairments).await, 0);
        assert!(cache.options(ReferenceList::Impairments).is_empty());
    }
}
