use crate::error::Result;
use crate::source::{file_permission, ContactStore};
use dialbook_core::{PermissionStatus, RawContactRecord};
use serde_json::Value;
use std::path::PathBuf;
use tracing::warn;

/// A JSON array of raw records, as dumped from a phone's contacts API.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    pub path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContactStore for JsonFileStore {
    fn source_name(&self) -> &'static str {
        "json"
    }

    async fn request_permission(&self) -> Result<PermissionStatus> {
        file_permission(&self.path).await
    }

    async fn fetch_contacts(&self) -> Result<Vec<RawContactRecord>> {
        let data = tokio::fs::read_to_string(&self.path).await?;
        let parsed = parse_json(&data)?;
        for warning in &parsed.warnings {
            warn!(%warning, "contacts json");
        }
        Ok(parsed.records)
    }
}

#[derive(Debug, Default)]
pub struct ParsedJson {
    pub records: Vec<RawContactRecord>,
    pub warnings: Vec<String>,
}

/// Accepts either a bare array or an object with a `data` array.
///
/// Entries are decoded one at a time: a malformed entry is skipped with a
/// warning and the rest still load. Null entries are dropped silently.
pub fn parse_json(data: &str) -> Result<ParsedJson> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Payload {
        Records(Vec<Value>),
        Wrapped {
            #[serde(default)]
            data: Option<Vec<Value>>,
        },
    }

    let entries = match serde_json::from_str::<Payload>(data)? {
        Payload::Records(entries) => entries,
        Payload::Wrapped { data } => data.unwrap_or_default(),
    };

    let mut parsed = ParsedJson::default();
    for (index, entry) in entries.into_iter().enumerate() {
        if entry.is_null() {
            continue;
        }
        match serde_json::from_value::<RawContactRecord>(entry) {
            Ok(record) => parsed.records.push(record),
            Err(err) => parsed
                .warnings
                .push(format!("skipping entry {index}: {err}")),
        }
    }
    Ok(parsed)
}
