use tracing::trace;

use super::Drawlist;

impl Drawlist {
    /// Sort entries by key and drop soft-deleted ones from the live range.
    ///
    /// Returns `false` without touching anything if the list is clean.
    ///
    /// # Panics
    ///
    /// Panics if the live/deleted boundary cannot be found, which means a
    /// slot past the live range held a live key.
    pub fn sort(&mut self) -> bool {
        if !self.dirty {
            return false;
        }

        // Everything past next_id is already a deleted key.
        let previous = self.next_id;
        self.entries[..previous].sort_unstable_by_key(|e| e.key);
        self.next_id = self.find_boundary(previous);
        self.dirty = false;
        self.unordered = false;

        trace!(
            live = self.next_id,
            dropped = previous - self.next_id,
            "drawlist sorted"
        );
        true
    }

    /// First deleted slot, scanning outward from `start`.
    fn find_boundary(&self, start: usize) -> usize {
        let capacity = self.entries.len();
        let mut index = start;

        if index == capacity || self.entries[index].is_deleted() {
            while index > 0 && self.entries[index - 1].is_deleted() {
                index -= 1;
            }
        } else {
            while !self.entries[index].is_deleted() {
                index += 1;
                assert!(
                    index < capacity,
                    "drawlist boundary scan ran off the end (start {start})"
                );
            }
        }
        index
    }
}
