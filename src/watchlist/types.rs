//! Watchlist document types.

use serde::{Deserialize, Deserializer, Serialize};

/// One watchlist item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Entry {
    pub title: String,
    /// Unique within one watchlist.
    pub id: String,
    pub done: bool,
    #[serde(rename = "prio")]
    pub priority: i64,
}

/// The document stored remotely: an ordered list of entries.
///
/// Both `{}` and `{"entries": null}` decode as an empty list; serialization
/// always writes an array.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WatchList {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub entries: Vec<Entry>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Entry>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Entry>>::deserialize(deserializer)?.unwrap_or_default())
}

impl WatchList {
    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Append `entry` unless one with the same id exists.
    ///
    /// Returns `false` (and leaves the list untouched) on a duplicate.
    pub fn push_unique(&mut self, entry: Entry) -> bool {
        if self.contains(&entry.id) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Remove the first entry with `id`, keeping the order of the rest.
    pub fn remove(&mut self, id: &str) -> Option<Entry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
