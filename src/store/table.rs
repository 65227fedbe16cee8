use std::collections::HashSet;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::StoreError;
use super::kv::KvBackend;

/// A record addressed by an opaque string id.
pub trait Record {
    /// Id prefix for freshly generated ids of this entity type.
    const PREFIX: &'static str;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);
}

/// A join record whose defining tuple must be unique within its table.
pub trait JoinRow: Record {
    type Key: Eq + Hash + Clone;

    fn key(&self) -> Self::Key;
}

/// One persisted collection: the rows plus the storage key they live under.
///
/// Any change marks the table dirty; [`Table::save`] clears the flag only
/// after a successful write so a failed write is retried by the next flush.
#[derive(Debug)]
pub struct Table<T> {
    key: &'static str,
    rows: Vec<T>,
    dirty: bool,
}

impl<T> Table<T> {
    pub fn new(key: &'static str, rows: Vec<T>) -> Self {
        Self {
            key,
            rows,
            dirty: false,
        }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn prepend(&mut self, row: T) {
        self.rows.insert(0, row);
        self.dirty = true;
    }

    pub fn push(&mut self, row: T) {
        self.rows.push(row);
        self.dirty = true;
    }

    /// Keeps rows matching `keep` and returns the removed ones in order.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) -> Vec<T> {
        let (kept, removed): (Vec<T>, Vec<T>) =
            std::mem::take(&mut self.rows).into_iter().partition(|r| keep(r));
        self.rows = kept;
        if !removed.is_empty() {
            self.dirty = true;
        }
        removed
    }

    /// Applies `f` to every row matching `pred`; returns how many matched.
    pub fn modify_where(
        &mut self,
        mut pred: impl FnMut(&T) -> bool,
        mut f: impl FnMut(&mut T),
    ) -> usize {
        let mut n = 0;
        for row in self.rows.iter_mut().filter(|r| pred(r)) {
            f(row);
            n += 1;
        }
        if n > 0 {
            self.dirty = true;
        }
        n
    }
}

impl<T: Serialize + DeserializeOwned> Table<T> {
    /// Reads the collection stored under `key`. A missing entry, a read
    /// failure or unparseable JSON all yield `default`; failures are logged.
    pub fn load(backend: &dyn KvBackend, key: &'static str, default: Vec<T>) -> Self {
        let rows = match backend.get(key) {
            Ok(Some(text)) => match serde_json::from_str::<Vec<T>>(&text) {
                Ok(rows) => rows,
                Err(e) => {
                    tracing::warn!(
                        key,
                        error = %e,
                        "stored collection is not valid; using default"
                    );
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read collection; using default");
                default
            }
        };
        Self::new(key, rows)
    }

    /// Writes the whole collection as a JSON array. Returns false on failure.
    pub fn save(&mut self, backend: &mut dyn KvBackend) -> bool {
        let written = serde_json::to_string(&self.rows)
            .map_err(StoreError::from)
            .and_then(|text| backend.set(self.key, &text));
        match written {
            Ok(()) => {
                self.dirty = false;
                true
            }
            Err(e) => {
                tracing::error!(key = self.key, error = %e, "failed to persist collection");
                false
            }
        }
    }
}

impl<T: Record> Table<T> {
    pub fn get(&self, id: &str) -> Option<&T> {
        self.rows.iter().find(|r| r.id() == id)
    }

    /// Replaces the row carrying the same id. No-op when the id is unknown.
    pub fn replace(&mut self, row: T) -> bool {
        match self.rows.iter_mut().find(|r| r.id() == row.id()) {
            Some(slot) => {
                *slot = row;
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        let pos = self.rows.iter().position(|r| r.id() == id)?;
        self.dirty = true;
        Some(self.rows.remove(pos))
    }

    pub fn modify(&mut self, id: &str, f: impl FnOnce(&mut T)) -> bool {
        match self.rows.iter_mut().find(|r| r.id() == id) {
            Some(row) => {
                f(row);
                self.dirty = true;
                true
            }
            None => false,
        }
    }
}

/// A join collection with a hash index over its natural keys, so existence
/// checks don't scan the rows.
#[derive(Debug)]
pub struct JoinTable<T: JoinRow> {
    table: Table<T>,
    index: HashSet<T::Key>,
}

impl<T: JoinRow> JoinTable<T> {
    pub fn new(table: Table<T>) -> Self {
        let index = table.rows().iter().map(JoinRow::key).collect();
        Self { table, index }
    }

    pub fn rows(&self) -> &[T] {
        self.table.rows()
    }

    pub fn table_mut(&mut self) -> &mut Table<T> {
        &mut self.table
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.index.contains(key)
    }

    pub fn find(&self, key: &T::Key) -> Option<&T> {
        if !self.contains(key) {
            return None;
        }
        self.table.rows().iter().find(|r| &r.key() == key)
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.table.get(id)
    }

    /// Guarded insert: appends unless the natural key already exists.
    pub fn insert(&mut self, row: T) -> bool {
        let key = row.key();
        if self.index.contains(&key) {
            return false;
        }
        self.index.insert(key);
        self.table.push(row);
        true
    }

    pub fn remove_key(&mut self, key: &T::Key) -> Vec<T> {
        if !self.contains(key) {
            return Vec::new();
        }
        self.retain(|r| &r.key() != key)
    }

    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) -> Vec<T> {
        let removed = self.table.retain(keep);
        if !removed.is_empty() {
            self.reindex();
        }
        removed
    }

    /// Patches the row holding `key` in place; its id is left untouched.
    pub fn modify_key(&mut self, key: &T::Key, f: impl FnOnce(&mut T)) -> bool {
        if !self.contains(key) {
            return false;
        }
        let Some(row) = self.table.rows.iter_mut().find(|r| &r.key() == key) else {
            return false;
        };
        f(row);
        let changed_key = &row.key() != key;
        self.table.dirty = true;
        if changed_key {
            self.reindex();
        }
        true
    }

    pub fn modify_id(&mut self, id: &str, f: impl FnOnce(&mut T)) -> bool {
        let hit = self.table.modify(id, f);
        if hit {
            self.reindex();
        }
        hit
    }

    pub fn modify_where(
        &mut self,
        pred: impl FnMut(&T) -> bool,
        f: impl FnMut(&mut T),
    ) -> usize {
        let n = self.table.modify_where(pred, f);
        if n > 0 {
            self.reindex();
        }
        n
    }

    fn reindex(&mut self) {
        self.index = self.table.rows().iter().map(JoinRow::key).collect();
    }
}
