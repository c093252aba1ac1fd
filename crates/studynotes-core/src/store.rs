//! In-memory notes store. Holds every note for the lifetime of the process.
//! No persistence; the store is discarded when the process exits.
//! All operations are linear scans; a single user's list stays in the hundreds.

use chrono::{DateTime, Duration, Utc};

use crate::notes::{Note, NoteId};
use crate::search::NoteFilter;

/// Ordered collection of notes, most recently created first.
#[derive(Debug, Default)]
pub struct NotesStore {
    notes: Vec<Note>,
}

impl NotesStore {
    pub fn new() -> Self {
        Self { notes: Vec::new() }
    }

    /// Create a note and put it at the front. Never fails; inputs are not validated here.
    pub fn add_note(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        course: impl Into<String>,
    ) -> NoteId {
        let note = Note::new(title, content, course, Utc::now());
        let id = note.id.clone();
        tracing::debug!(note_id = %id, "note added");
        self.notes.insert(0, note);
        id
    }

    /// Replace title, content and course of an existing note and refresh `updated_at`.
    /// The note keeps its position in the list.
    pub fn update_note(
        &mut self,
        id: &NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
        course: impl Into<String>,
    ) -> Result<&Note, StoreError> {
        let note = self
            .notes
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        note.title = title.into();
        note.content = content.into();
        note.course = course.into();
        note.updated_at = next_timestamp(note.updated_at, Utc::now());
        tracing::debug!(note_id = %id, "note updated");
        Ok(&*note)
    }

    /// Remove a note and hand it back.
    pub fn delete_note(&mut self, id: &NoteId) -> Result<Note, StoreError> {
        let pos = self
            .notes
            .iter()
            .position(|n| &n.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        tracing::debug!(note_id = %id, "note deleted");
        Ok(self.notes.remove(pos))
    }

    pub fn get_note_by_id(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| &n.id == id)
    }

    /// All notes in store order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Notes matching `filter`, in store order.
    pub fn search(&self, filter: &NoteFilter) -> Vec<&Note> {
        crate::search::filter_notes(&self.notes, filter)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// `updated_at` must strictly increase even if the clock has not moved.
fn next_timestamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("note not found: {0}")]
    NotFound(NoteId),
}
