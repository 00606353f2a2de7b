use std::{
    collections::HashSet,
    fmt,
    hash::{Hash, Hasher},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Listing identifier as it appears in the dataset. Strings and numbers are kept
/// apart so a persisted id reads back exactly as it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListingId {
    Text(String),
    Number(serde_json::Number),
}

impl Eq for ListingId {}

impl Hash for ListingId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            ListingId::Text(text) => {
                0u8.hash(state);
                text.hash(state);
            }
            ListingId::Number(number) => {
                1u8.hash(state);
                number.to_string().hash(state);
            }
        }
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingId::Text(text) => f.write_str(text),
            ListingId::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for ListingId {
    fn from(value: &str) -> Self {
        ListingId::Text(value.to_string())
    }
}

pub type ProcessedIds = HashSet<ListingId>;

/// One posting from the mirrored dataset. Only `id` is mandatory; everything
/// else is checked where it is used.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingRecord {
    pub id: ListingId,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub locations: Option<Vec<String>>,
    #[serde(default)]
    pub sponsorship: Option<String>,
    #[serde(default)]
    pub is_visible: Option<bool>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub date_posted: Option<f64>,
}

impl ListingRecord {
    pub fn is_visible(&self) -> bool {
        self.is_visible.unwrap_or(false)
    }

    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(false)
    }

    /// Posting time; a zero or missing `date_posted` counts as undated.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let secs = self.date_posted.filter(|v| v.is_finite() && *v != 0.0)?;
        let whole = secs.trunc() as i64;
        let nanos = ((secs - secs.trunc()) * 1e9).round().clamp(0.0, 999_999_999.0) as u32;
        DateTime::from_timestamp(whole, nanos)
    }

    pub fn describe(&self) -> String {
        format!(
            "{} at {}",
            self.title.as_deref().unwrap_or("<untitled>"),
            self.company_name.as_deref().unwrap_or("<unknown company>")
        )
    }
}
