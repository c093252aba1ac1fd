//! Searching, filtering and sorting notes. Plain linear passes over a slice.

use std::cmp::Reverse;
use std::str::FromStr;

use crate::notes::Note;

/// Course label that stands for "no restriction".
pub const ALL_COURSES: &str = "All";

const MAX_RECENT_SEARCHES: usize = 5;

/// Restrict results to one course, or not at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CourseFilter {
    #[default]
    All,
    Only(String),
}

impl FromStr for CourseFilter {
    type Err = std::convert::Infallible;

    /// `"All"` (exactly) or an empty string means no restriction.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == ALL_COURSES {
            Ok(Self::All)
        } else {
            Ok(Self::Only(s.to_string()))
        }
    }
}

/// Free-text query plus course restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    pub query: Option<String>,
    pub course: CourseFilter,
}

impl NoteFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_course(mut self, course: CourseFilter) -> Self {
        self.course = course;
        self
    }

    /// Case-insensitive substring match on title, content or course, then exact course match.
    pub fn matches(&self, note: &Note) -> bool {
        if let CourseFilter::Only(course) = &self.course {
            if &note.course != course {
                return false;
            }
        }
        match self.query.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(q) => {
                let q = q.to_lowercase();
                note.title.to_lowercase().contains(&q)
                    || note.content.to_lowercase().contains(&q)
                    || note.course.to_lowercase().contains(&q)
            }
        }
    }
}

/// Returns the notes matching `filter`, keeping their order.
pub fn filter_notes<'a>(notes: &'a [Note], filter: &NoteFilter) -> Vec<&'a Note> {
    notes.iter().filter(|n| filter.matches(n)).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Whatever order the store holds (newest created first).
    #[default]
    StoreOrder,
    RecentlyUpdated,
    /// Newest `created_at` first.
    Created,
    Course,
    Title,
}

/// Sorts in place. Stable, so ties keep store order.
pub fn sort_notes(notes: &mut [&Note], order: SortOrder) {
    match order {
        SortOrder::StoreOrder => {}
        SortOrder::RecentlyUpdated => notes.sort_by_key(|n| Reverse(n.updated_at)),
        SortOrder::Created => notes.sort_by_key(|n| Reverse(n.created_at)),
        SortOrder::Course => notes.sort_by_key(|n| n.course.to_lowercase()),
        SortOrder::Title => notes.sort_by_key(|n| n.title.to_lowercase()),
    }
}

/// Distinct course labels in the order they first appear.
pub fn courses(notes: &[Note]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for n in notes {
        if !seen.iter().any(|c| c == &n.course) {
            seen.push(n.course.clone());
        }
    }
    seen
}

/// Last few distinct queries, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentSearches {
    entries: Vec<String>,
}

impl RecentSearches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a query. Blank queries and ones already in the list are ignored.
    /// Returns whether the list changed.
    pub fn push(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() || self.entries.iter().any(|q| q == query) {
            return false;
        }
        self.entries.insert(0, query.to_string());
        self.entries.truncate(MAX_RECENT_SEARCHES);
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
