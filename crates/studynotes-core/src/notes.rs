//! The note record and its identifier.
//!
//! Notes live only in memory (see [crate::store]); nothing here touches disk.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Unique note identifier: creation time in unix millis followed by a random base36 suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Generates a fresh id for a note created at `now`.
    pub fn generate(now: DateTime<Utc>) -> Self {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..ID_SUFFIX_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        Self(format!("{}{}", now.timestamp_millis(), suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NoteId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NoteId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A user-authored text record tagged with a course label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub course: String,
    pub created_at: DateTime<Utc>,
    /// Equal to `created_at` until the first update.
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Builds a new note with a fresh id and `created_at == updated_at == now`.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        course: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NoteId::generate(now),
            title: title.into(),
            content: content.into(),
            course: course.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// First line of the content, cut to `max_chars` with a trailing ellipsis.
    pub fn preview(&self, max_chars: usize) -> String {
        let line = self.content.lines().next().unwrap_or("").trim();
        if line.chars().count() > max_chars {
            let cut: String = line.chars().take(max_chars).collect();
            format!("{}...", cut)
        } else {
            line.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_starts_with_millis_and_has_suffix() {
        let now = Utc::now();
        let id = NoteId::generate(now);
        let millis = now.timestamp_millis().to_string();
        assert!(id.as_str().starts_with(&millis));
        let suffix = &id.as_str()[millis.len()..];
        assert_eq!(suffix.len(), ID_SUFFIX_LEN);
        assert!(suffix.bytes().all(|b| BASE36.contains(&b)));
    }

    #[test]
    fn ids_differ_for_same_instant() {
        let now = Utc::now();
        assert_ne!(NoteId::generate(now), NoteId::generate(now));
    }

    #[test]
    fn new_note_timestamps_match() {
        let n = Note::new("Algebra", "Solve for x", "Math", Utc::now());
        assert_eq!(n.created_at, n.updated_at);
        assert_eq!(n.course, "Math");
    }

    #[test]
    fn serializes_camel_case() {
        let n = Note::new("t", "c", "k", Utc::now());
        let v = serde_json::to_value(&n).unwrap();
        assert!(v.get("createdAt").is_some());
        assert!(v.get("updatedAt").is_some());
        assert_eq!(v["id"], serde_json::Value::String(n.id.to_string()));
    }

    #[test]
    fn preview_truncates_first_line() {
        let n = Note::new("t", "abcdefgh\nsecond", "k", Utc::now());
        assert_eq!(n.preview(4), "abcd...");
        assert_eq!(n.preview(60), "abcdefgh");
    }
}
