//! Request parameters.
//!
//! A [`Query`] is the flat, untyped parameter map extracted from one HTTP
//! request. It is turned into a [`WatchlistRequest`] exactly once, so the
//! rest of the crate only ever sees validated, typed input.

use std::collections::HashMap;

use crate::watchlist::error::WatchlistError;
use crate::watchlist::types::Entry;

/// Flat string-keyed parameters of a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    contents: HashMap<String, String>,
}

impl Query {
    pub fn new(contents: HashMap<String, String>) -> Self {
        Self { contents }
    }

    /// Build from `(key, value)` pairs; the first value for a key wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut contents = HashMap::new();
        for (key, value) in pairs {
            contents.entry(key.into()).or_insert_with(|| value.into());
        }
        Self { contents }
    }

    /// Fill keys that are not already present from `other`.
    pub fn merge_missing(&mut self, other: Query) {
        for (key, value) in other.contents {
            self.contents.entry(key).or_insert(value);
        }
    }

    /// Raw value; empty strings count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.contents
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn get_bool(&self, key: &str) -> bool {
        parse_bool(self.get(key))
    }

    pub fn get_int(&self, key: &str) -> i64 {
        self.get(key).map(parse_int).unwrap_or(0)
    }
}

/// True only for the exact literal `"true"`.
pub fn parse_bool(value: Option<&str>) -> bool {
    value == Some("true")
}

/// Best-effort decimal parse: optional leading whitespace and sign, then as
/// many digits as are present. Anything unparseable or out of range is 0.
pub fn parse_int(value: &str) -> i64 {
    let trimmed = value.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => ("-", &trimmed[1..]),
        Some(b'+') => ("", &trimmed[1..]),
        _ => ("", trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return 0;
    }
    format!("{sign}{}", &rest[..digits_len]).parse().unwrap_or(0)
}

/// The action a request asks for, validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchlistRequest {
    /// Create a new, empty remote document.
    New,
    /// Append `entry` to the list referenced by `db`.
    Add { db: String, entry: Entry },
    /// Drop the entry with `id` from the list referenced by `db`.
    Remove { db: String, id: String },
}

impl WatchlistRequest {
    /// Short label for logs and metrics.
    pub fn action(&self) -> &'static str {
        match self {
            WatchlistRequest::New => "new",
            WatchlistRequest::Add { .. } => "add",
            WatchlistRequest::Remove { .. } => "remove",
        }
    }
}

impl TryFrom<&Query> for WatchlistRequest {
    type Error = WatchlistError;

    fn try_from(query: &Query) -> Result<Self, Self::Error> {
        match query.get("action") {
            Some("new") => Ok(WatchlistRequest::New),
            Some("add") => {
                let db = query.get("db").ok_or(WatchlistError::NoDbForAdd)?;
                let id = query.get("id").ok_or(WatchlistError::MissingId)?;
                let title = query.get("title").ok_or(WatchlistError::MissingTitle)?;
                Ok(WatchlistRequest::Add {
                    db: db.to_string(),
                    entry: Entry {
                        title: title.to_string(),
                        id: id.to_string(),
                        done: query.get_bool("done"),
                        priority: query.get_int("prio"),
                    },
                })
            }
            Some("remove") => {
                let db = query.get("db").ok_or(WatchlistError::MissingDb)?;
                let id = query.get("id").ok_or(WatchlistError::MissingId)?;
                Ok(WatchlistRequest::Remove {
                    db: db.to_string(),
                    id: id.to_string(),
                })
            }
            _ => Err(WatchlistError::InvalidAction),
        }
    }
}
