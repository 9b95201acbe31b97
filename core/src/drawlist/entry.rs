use crate::key::DrawKey;
use crate::operation::OpHandle;

/// One drawlist slot: a key and the operation it was generated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub key: DrawKey,
    pub op: OpHandle,
}

const _: () = assert!(std::mem::size_of::<Entry>() == 16);

impl Entry {
    /// Unused slot
    pub const EMPTY: Entry = Entry {
        key: DrawKey::DELETED,
        op: OpHandle::INVALID,
    };

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.key.is_deleted()
    }
}
