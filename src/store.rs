use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use time::OffsetDateTime;
use tracing::info;

use crate::error::AppError;
use crate::models::TodoItem;
use crate::storage::Storage;

pub type SharedStore = Arc<Mutex<TodoStore>>;

/// Canonical list state. Every mutation goes through one of the methods
/// below and writes the whole list back to storage before returning.
///
/// Deletes are two-phase: `begin_remove` marks an item while the surface
/// plays its removal animation, `finalize_remove` drops it for real once
/// the animation-end signal (or the fallback timer) arrives.
pub struct TodoStore {
    storage: Storage,
    items: Vec<TodoItem>,
    removing: HashSet<i64>,
}

impl TodoStore {
    /// Reads the persisted list once; the store is the source of truth
    /// from then on.
    pub fn load(storage: Storage) -> Result<Self, AppError> {
        let items = storage.load()?;
        info!(count = items.len(), "Loaded todo list");
        Ok(Self {
            storage,
            items,
            removing: HashSet::new(),
        })
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    /// Insertion order is display order.
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn is_removing(&self, id: i64) -> bool {
        self.removing.contains(&id)
    }

    /// Appends a new item with a fresh id. Whitespace-only text is
    /// rejected and leaves the list untouched.
    pub fn add(
        &mut self,
        text: &str,
        due: Option<OffsetDateTime>,
    ) -> Result<Option<TodoItem>, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let item = TodoItem {
            id: self.next_id(),
            text: text.to_string(),
            completed: false,
            due,
        };
        self.items.push(item.clone());
        self.storage.save(&self.items)?;
        Ok(Some(item))
    }

    /// Flips the completion flag of the matching item. Unknown ids leave
    /// the list untouched.
    pub fn toggle(&mut self, id: i64) -> Result<Option<TodoItem>, AppError> {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return Ok(None);
        };
        item.completed = !item.completed;
        let updated = item.clone();
        self.storage.save(&self.items)?;
        Ok(Some(updated))
    }

    /// First phase of a delete. The item stays in the list (and in
    /// storage) until finalized. Returns false for unknown ids.
    pub fn begin_remove(&mut self, id: i64) -> bool {
        if !self.items.iter().any(|item| item.id == id) {
            return false;
        }
        self.removing.insert(id);
        true
    }

    /// Second phase: drops the item and persists. Only acts on ids that
    /// are actually pending removal.
    pub fn finalize_remove(&mut self, id: i64) -> Result<bool, AppError> {
        if !self.removing.remove(&id) {
            return Ok(false);
        }
        self.items.retain(|item| item.id != id);
        self.storage.save(&self.items)?;
        Ok(true)
    }

    // Creation-time surrogate key: current Unix time in milliseconds,
    // bumped past the newest existing id when the clock would collide or
    // run backwards.
    fn next_id(&self) -> i64 {
        let now_ms = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
        let max = self.items.iter().map(|item| item.id).max().unwrap_or(0);
        now_ms.max(max + 1)
    }
}
