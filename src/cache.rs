use crate::models::{Entry, ExerciseType, Person};
use serde_json::Value;
use std::{
    env,
    path::{Path, PathBuf},
};
use tokio::fs;
use tracing::{error, warn};

/// Local mirror of the entry lists, one JSON file per exercise type. The
/// mirror exists for instant reload; the remote table stays the source of
/// truth once a refresh completes.
#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn resolve_dir() -> PathBuf {
        if let Ok(dir) = env::var("REP_CACHE_DIR") {
            return PathBuf::from(dir);
        }
        PathBuf::from("data")
    }

    fn path_for(&self, exercise: ExerciseType) -> PathBuf {
        self.dir.join(format!("{}.json", exercise.cache_key()))
    }

    /// Load the persisted entry list. Anything that is not a readable JSON
    /// array yields an empty list; invalid elements are dropped one by one
    /// rather than discarding the whole payload.
    pub async fn load(&self, exercise: ExerciseType) -> Vec<Entry> {
        let path = self.path_for(exercise);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                error!("failed to read cache file {}: {err}", path.display());
                return Vec::new();
            }
        };

        let payload: Value = match serde_json::from_slice(&bytes) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("discarding malformed cache payload {}: {err}", path.display());
                return Vec::new();
            }
        };

        let Value::Array(elements) = payload else {
            warn!("cache payload {} is not a list, discarding", path.display());
            return Vec::new();
        };

        elements.iter().filter_map(entry_from_value).collect()
    }

    /// Overwrite the stored payload with the full current list. Failures are
    /// logged and swallowed; the next reload falls back to the remote fetch.
    pub async fn save(&self, exercise: ExerciseType, entries: &[Entry]) {
        let path = self.path_for(exercise);
        let payload = match serde_json::to_vec_pretty(entries) {
            Ok(payload) => payload,
            Err(err) => {
                error!("failed to encode cache payload: {err}");
                return;
            }
        };
        if let Err(err) = write_payload(&path, &payload).await {
            error!("failed to write cache file {}: {err}", path.display());
        }
    }
}

async fn write_payload(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, payload).await
}

// Shape check for one cached element: id must be a string, date a string,
// person one of the known values, count numeric. Whole-valued floats such
// as 10.0 pass; anything fractional or out of range does not.
fn entry_from_value(value: &Value) -> Option<Entry> {
    let id = value.get("id")?.as_str()?.to_string();
    let date = value.get("date")?.as_str()?.to_string();
    let person: Person = serde_json::from_value(value.get("person")?.clone()).ok()?;
    let count = value.get("count")?.as_f64()?;
    if !count.is_finite() || count.fract() != 0.0 || count < 0.0 || count > f64::from(u32::MAX) {
        return None;
    }
    Some(Entry {
        id,
        date,
        person,
        count: count as u32,
    })
}
