use crate::api::{ApiClient, ApiResult};
use crate::models::Note;
use leptos::prelude::*;

pub(crate) const FETCH_FALLBACK: &str = "Failed to fetch notes";
pub(crate) const ADD_FALLBACK: &str = "Failed to add note";
pub(crate) const UPDATE_FALLBACK: &str = "Failed to update note";
pub(crate) const DELETE_FALLBACK: &str = "Failed to delete note";

/// Note collection plus request bookkeeping.
///
/// Every async operation calls `begin` once and exactly one `complete_*`.
/// Overlapping operations are not sequenced: whichever completes last wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct NotesState {
    pub notes: Vec<Note>,
    pub error: Option<String>,
    /// Note loaded in the editor; `None` means the editor creates a new note.
    pub current: Option<Note>,

    in_flight: usize,
    /// Bumped by `reset`; completions started before it are dropped.
    generation: u64,
}

impl NotesState {
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub(crate) fn begin(&mut self) -> u64 {
        self.in_flight += 1;
        self.error = None;
        self.generation
    }

    fn settle<T>(
        &mut self,
        generation: u64,
        outcome: Result<T, String>,
        apply: impl FnOnce(&mut Self, T),
    ) {
        if generation != self.generation {
            return;
        }
        self.in_flight = self.in_flight.saturating_sub(1);
        match outcome {
            Ok(value) => apply(self, value),
            Err(message) => self.error = Some(message),
        }
    }

    pub(crate) fn complete_fetch(&mut self, generation: u64, outcome: Result<Vec<Note>, String>) {
        self.settle(generation, outcome, |s, notes| s.notes = notes);
    }

    pub(crate) fn complete_add(&mut self, generation: u64, outcome: Result<Note, String>) {
        self.settle(generation, outcome, |s, note| {
            // Ids are unique; a repeated id replaces the stale entry.
            match s.notes.iter_mut().find(|n| n.id == note.id) {
                Some(existing) => *existing = note,
                None => s.notes.push(note),
            }
        });
    }

    pub(crate) fn complete_update(&mut self, generation: u64, outcome: Result<Note, String>) {
        self.settle(generation, outcome, |s, note| {
            if let Some(existing) = s.notes.iter_mut().find(|n| n.id == note.id) {
                *existing = note;
            }
        });
    }

    pub(crate) fn complete_delete(&mut self, generation: u64, outcome: Result<String, String>) {
        self.settle(generation, outcome, |s, id| {
            s.notes.retain(|n| n.id != id);
            if s.current.as_ref().is_some_and(|n| n.id == id) {
                s.current = None;
            }
        });
    }

    pub(crate) fn set_current(&mut self, note: Note) {
        self.current = Some(note);
    }

    pub(crate) fn clear_current(&mut self) {
        self.current = None;
    }

    pub(crate) fn reset(&mut self) {
        *self = Self {
            generation: self.generation + 1,
            ..Self::default()
        };
    }
}

/// Notes whose title or content contains `term`, ignoring case, in collection order.
/// A blank term matches everything; any other term is matched as typed, spaces included.
pub(crate) fn filter_notes(notes: &[Note], term: &str) -> Vec<Note> {
    if term.trim().is_empty() {
        return notes.to_vec();
    }
    let term = term.to_lowercase();

    notes
        .iter()
        .filter(|n| n.title.to_lowercase().contains(&term) || n.content.to_lowercase().contains(&term))
        .cloned()
        .collect()
}

#[derive(Clone, Copy)]
pub(crate) struct NotesStore {
    state: RwSignal<NotesState>,
    client: RwSignal<ApiClient>,
}

impl NotesStore {
    pub fn new(client: RwSignal<ApiClient>) -> Self {
        Self {
            state: RwSignal::new(NotesState::default()),
            client,
        }
    }

    pub fn filtered(&self, term: &str) -> Vec<Note> {
        self.state.with(|s| filter_notes(&s.notes, term))
    }

    pub fn is_loading(&self) -> bool {
        self.state.with(NotesState::is_loading)
    }

    pub fn error(&self) -> Option<String> {
        self.state.with(|s| s.error.clone())
    }

    pub fn current(&self) -> Option<Note> {
        self.state.with(|s| s.current.clone())
    }

    pub fn current_untracked(&self) -> Option<Note> {
        self.state.with_untracked(|s| s.current.clone())
    }

    pub fn set_current_note(&self, note: Note) {
        self.state.update(|s| s.set_current(note));
    }

    pub fn clear_current_note(&self) {
        self.state.update(NotesState::clear_current);
    }

    pub fn reset(&self) {
        self.state.update(NotesState::reset);
    }

    fn begin(&self) -> (u64, ApiClient) {
        let mut generation = 0;
        self.state.update(|s| generation = s.begin());
        (generation, self.client.get_untracked())
    }

    fn outcome<T: Clone>(result: &ApiResult<T>, fallback: &str) -> Result<T, String> {
        result.as_ref().map(T::clone).map_err(|e| {
            log::warn!("{fallback}: {e}");
            e.message_or(fallback)
        })
    }

    pub async fn fetch_notes(self) -> ApiResult<Vec<Note>> {
        let (generation, api) = self.begin();
        let result = api.list_notes().await;

        let outcome = Self::outcome(&result, FETCH_FALLBACK);
        self.state.update(|s| s.complete_fetch(generation, outcome));
        result
    }

    pub async fn add_note(self, title: String, content: String) -> ApiResult<Note> {
        let (generation, api) = self.begin();
        let result = api
            .create_note(&title, &content)
            .await
            .map(|id| Note::new(id, title, content));

        let outcome = Self::outcome(&result, ADD_FALLBACK);
        self.state.update(|s| s.complete_add(generation, outcome));
        result
    }

    pub async fn update_note(self, id: String, title: String, content: String) -> ApiResult<Note> {
        let (generation, api) = self.begin();
        let result = api
            .update_note(&id, &title, &content)
            .await
            .map(|_| Note::new(id, title, content));

        let outcome = Self::outcome(&result, UPDATE_FALLBACK);
        self.state.update(|s| s.complete_update(generation, outcome));
        result
    }

    pub async fn delete_note(self, id: String) -> ApiResult<String> {
        let (generation, api) = self.begin();
        let result = api.delete_note(&id).await.map(|_| id);

        let outcome = Self::outcome(&result, DELETE_FALLBACK);
        self.state.update(|s| s.complete_delete(generation, outcome));
        result
    }
}
