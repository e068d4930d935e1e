use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// The two people sharing the tracker. Fixed set, not user-extensible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Person {
    Sam,
    Alex,
}

impl Person {
    pub const ALL: [Person; 2] = [Person::Sam, Person::Alex];

    pub fn display_name(self) -> &'static str {
        match self {
            Person::Sam => "Sam",
            Person::Alex => "Alex",
        }
    }
}

/// Tracked exercise category. Each has its own remote table and cache file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseType {
    Pushups,
    Abs,
}

impl ExerciseType {
    pub const ALL: [ExerciseType; 2] = [ExerciseType::Pushups, ExerciseType::Abs];

    /// URL segment and remote table name.
    pub fn slug(self) -> &'static str {
        match self {
            ExerciseType::Pushups => "pushups",
            ExerciseType::Abs => "abs",
        }
    }

    /// Key under which this tab's entries are persisted locally.
    pub fn cache_key(self) -> String {
        format!("rep-tracker-{}", self.slug())
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ex| ex.slug() == slug)
    }

    pub fn index(self) -> usize {
        match self {
            ExerciseType::Pushups => 0,
            ExerciseType::Abs => 1,
        }
    }
}

/// One recorded exercise count for a person on a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub date: String,
    pub person: Person,
    pub count: u32,
}

// The hosted table assigns numeric ids; everything downstream treats them
// as opaque strings.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "id must be a string or number, got {other}"
        ))),
    }
}

/// Form state for the add/edit panel. The count stays raw form text so
/// non-numeric input reaches validation instead of failing to decode.
#[derive(Debug, Clone, Serialize)]
pub struct Draft {
    pub person: Person,
    pub date: String,
    pub count: String,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            person: Person::Sam,
            date: String::new(),
            count: String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EntryForm {
    pub person: Person,
    pub date: String,
    pub count: String,
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    #[serde(default)]
    pub confirmed: bool,
}

/// Per-date sums for the chart, dates descending.
#[derive(Debug, Serialize)]
pub struct DailyRow {
    pub date: String,
    pub counts: BTreeMap<Person, u64>,
    pub total: u64,
}

/// Everything the page needs to render one tab.
#[derive(Debug, Serialize)]
pub struct TabSnapshot {
    pub entries: Vec<Entry>,
    pub draft: Draft,
    pub editing_id: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub totals: BTreeMap<Person, u64>,
    pub daily: Vec<DailyRow>,
}
