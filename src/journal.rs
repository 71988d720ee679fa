use crate::models::{DateEntry, ProgressStats};
use crate::storage::{self, CHECKED_DATES_KEY, KeyValueStore, NOTES_KEY};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

pub type CompletionSet = BTreeSet<String>;
pub type NoteMap = BTreeMap<String, String>;

/// Flips `id` in `completed`.
///
/// Checking a day also checks every earlier day, so there is never a gap
/// behind the newest check. Unchecking removes only that day. Returns the
/// new state of `id`, or `None` when `id` is not one of `dates`.
pub fn toggle_completion(dates: &[DateEntry], completed: &mut CompletionSet, id: &str) -> Option<bool> {
    let index = dates.iter().position(|entry| entry.id == id)?;

    if completed.remove(id) {
        return Some(false);
    }

    completed.extend(dates[..=index].iter().map(|entry| entry.id.clone()));
    Some(true)
}

#[derive(Debug, Clone)]
pub struct Journal {
    dates: Vec<DateEntry>,
    completed: CompletionSet,
    notes: NoteMap,
}

impl Journal {
    pub fn new(dates: Vec<DateEntry>, completed: CompletionSet, notes: NoteMap) -> Self {
        Self {
            dates,
            completed,
            notes,
        }
    }

    pub async fn load(dates: Vec<DateEntry>, store: &dyn KeyValueStore) -> Self {
        let stored: CompletionSet =
            storage::load(store, CHECKED_DATES_KEY, CompletionSet::new()).await;
        let notes: NoteMap = storage::load(store, NOTES_KEY, NoteMap::new()).await;

        let known: BTreeSet<&str> = dates.iter().map(|entry| entry.id.as_str()).collect();
        let (completed, stale): (CompletionSet, CompletionSet) =
            stored.into_iter().partition(|id| known.contains(id.as_str()));
        if !stale.is_empty() {
            warn!(count = stale.len(), "ignoring stored completions outside the journey");
        }

        Self::new(dates, completed, notes)
    }

    pub fn dates(&self) -> &[DateEntry] {
        &self.dates
    }

    pub fn entry(&self, id: &str) -> Option<&DateEntry> {
        self.dates.iter().find(|entry| entry.id == id)
    }

    pub fn completed(&self) -> &CompletionSet {
        &self.completed
    }

    pub fn notes(&self) -> &NoteMap {
        &self.notes
    }

    pub fn is_checked(&self, id: &str) -> bool {
        self.completed.contains(id)
    }

    pub fn note(&self, id: &str) -> Option<&str> {
        self.notes.get(id).map(String::as_str)
    }

    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        toggle_completion(&self.dates, &mut self.completed, id)
    }

    pub fn set_note(&mut self, id: &str, text: String) -> bool {
        if self.entry(id).is_none() {
            return false;
        }
        self.notes.insert(id.to_string(), text);
        true
    }

    pub fn stats(&self) -> ProgressStats {
        ProgressStats::compute(self.dates.len(), self.completed.len())
    }

    pub async fn persist_completed(&self, store: &dyn KeyValueStore) {
        let ids: Vec<&String> = self.completed.iter().collect();
        storage::save(store, CHECKED_DATES_KEY, &ids).await;
    }

    pub async fn persist_notes(&self, store: &dyn KeyValueStore) {
        storage::save(store, NOTES_KEY, &self.notes).await;
    }
}
