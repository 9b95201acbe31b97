//! Sorted drawlist
//!
//! A fixed-capacity array of `(key, operation)` entries. Operations are added
//! and soft-deleted during the update phase; the render phase sorts the array
//! (only when something changed) and walks it in key order, issuing backend
//! calls only for state that differs from the previous draw.
//!
//! Slots at or past [`Drawlist::len`] always hold deleted keys. Removal sets
//! the key's deleted bit in place; the entry keeps occupying its slot until
//! the next sort moves it past the live range.

mod entry;
mod render;
pub mod search;
mod sort;


pub use entry::Entry;

use tracing::trace;

use crate::config::DrawlistConfig;
use crate::key::DrawKey;
use crate::operation::{OpHandle, OperationPool};

/// Default number of slots
pub const DEFAULT_CAPACITY: usize = 8192;

/// Fixed-capacity list of draw entries kept in key order
#[derive(Debug)]
pub struct Drawlist {
    entries: Box<[Entry]>,
    /// Slots in use, live or soft-deleted
    next_id: usize,
    /// Order or live range is stale until the next sort
    dirty: bool,
    /// Entries were appended since the last sort
    unordered: bool,
}

impl Default for Drawlist {
    fn default() -> Self {
        Self::new()
    }
}

impl Drawlist {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "drawlist capacity must be non-zero");
        Self {
            entries: vec![Entry::EMPTY; capacity].into_boxed_slice(),
            next_id: 0,
            dirty: false,
            unordered: false,
        }
    }

    pub fn from_config(config: &DrawlistConfig) -> Self {
        Self::with_capacity(config.capacity)
    }

    /// Append an operation using the key cached on it.
    ///
    /// The key is not regenerated; call
    /// [`gen_render_key`](crate::gen_render_key) first.
    ///
    /// # Panics
    ///
    /// Panics if the drawlist is full or `handle` is not in `ops`.
    pub fn add(&mut self, ops: &OperationPool, handle: OpHandle) {
        self.add_key(ops[handle].key(), handle);
    }

    /// Append an entry with a pre-built key, e.g. a command key.
    ///
    /// # Panics
    ///
    /// Panics if the drawlist is full.
    pub fn add_key(&mut self, key: DrawKey, op: OpHandle) {
        assert!(
            self.next_id < self.entries.len(),
            "drawlist capacity exceeded ({} entries)",
            self.entries.len()
        );
        self.entries[self.next_id] = Entry { key, op };
        self.next_id += 1;
        self.dirty = true;
        self.unordered = true;
    }

    /// Soft-delete the entry for `handle`. Absent operations are ignored.
    ///
    /// The entry is found by binary search on the operation's current key, so
    /// the key must not have been regenerated since the operation was added.
    /// Entries appended since the last sort are sorted into place first.
    pub fn remove(&mut self, ops: &OperationPool, handle: OpHandle) {
        if self.unordered {
            self.sort();
        }

        let key = ops[handle].key().without_deleted();
        let live = &self.entries[..self.next_id];
        let Some(last) = search::last_at_most(live, &key, |e| e.key.without_deleted()) else {
            trace!(?handle, "remove: no entry");
            return;
        };

        // Walk the run of equal keys back to the entry owned by `handle`.
        let found = live[..=last]
            .iter()
            .rev()
            .take_while(|e| e.key.without_deleted() == key)
            .position(|e| e.op == handle && !e.is_deleted())
            .map(|offset| last - offset);

        match found {
            Some(index) => {
                let entry = &mut self.entries[index];
                entry.key = entry.key.with_deleted(true);
                self.dirty = true;
            }
            None => trace!(?handle, "remove: no entry"),
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.fill(Entry::EMPTY);
        self.next_id = 0;
        self.dirty = true;
        self.unordered = false;
    }

    /// Slots in use. Soft-deleted entries count until the next sort.
    #[inline]
    pub fn len(&self) -> usize {
        self.next_id
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.next_id == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Entries in `[0, len)`. Sorted and free of deleted keys only while not
    /// dirty.
    pub fn live_entries(&self) -> &[Entry] {
        &self.entries[..self.next_id]
    }
}
