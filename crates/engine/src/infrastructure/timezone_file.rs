//! JSON-file persistence for player timezones.
//!
//! The file holds a single `timezone-data` section mapping player UUID
//! strings to timezone labels:
//!
//! ```json
//! { "timezone-data": { "0f6c...": "Europe/Berlin" } }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::infrastructure::ports::{RepoError, TimeZoneRepo};

const SECTION: &str = "timezone-data";

#[derive(Debug, Default, Serialize, Deserialize)]
struct TimeZoneFile {
    #[serde(rename = "timezone-data", default)]
    zones: BTreeMap<String, serde_json::Value>,
}

/// Stores the timezone section as a JSON document on disk.
pub struct JsonFileTimeZoneRepo {
    path: PathBuf,
}

impl JsonFileTimeZoneRepo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TimeZoneRepo for JsonFileTimeZoneRepo {
    async fn load_all(&self) -> Result<BTreeMap<String, String>, RepoError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No timezone file yet");
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(RepoError::io("load_timezones", e)),
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let file: TimeZoneFile =
            serde_json::from_str(&content).map_err(RepoError::serialization)?;

        let mut zones = BTreeMap::new();
        for (id, value) in file.zones {
            match value {
                serde_json::Value::String(zone) => {
                    zones.insert(id, zone);
                }
                other => {
                    tracing::warn!(id = %id, value = %other, section = SECTION, "Ignoring non-string timezone value");
                }
            }
        }
        Ok(zones)
    }

    async fn save_all(&self, zones: &BTreeMap<String, String>) -> Result<(), RepoError> {
        let file = TimeZoneFile {
            zones: zones
                .iter()
                .map(|(id, zone)| (id.clone(), serde_json::Value::String(zone.clone())))
                .collect(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(RepoError::serialization)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| RepoError::io("create_timezone_dir", e))?;
        }

        // Write-then-rename so a crash mid-write never truncates the previous file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .await
            .map_err(|e| RepoError::io("write_timezones", e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| RepoError::io("rename_timezones", e))?;
        Ok(())
    }
}
