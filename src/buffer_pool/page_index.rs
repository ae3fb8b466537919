use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::errors::BufferError;
use crate::page_file::{FileId, FilePtr};
use crate::pages::PageId;

use super::FrameId;

/// The `(file, page)` → frame mapping.
///
/// Files are keyed by handle identity, so two opens of the same path never
/// alias each other's entries. Exactly one entry exists per valid frame.
pub(super) struct PageIndex {
    map: HashMap<(FileId, PageId), FrameId>,
}

impl PageIndex {
    pub fn new(pool_size: usize) -> Self {
        // ~1.2x the pool size, rounded down to odd, to spread collisions
        let mut buckets = pool_size + pool_size / 5;
        if buckets % 2 == 0 {
            buckets -= 1;
        }

        Self {
            map: HashMap::with_capacity(buckets),
        }
    }

    pub fn insert(
        &mut self,
        file: &FilePtr,
        page_no: PageId,
        frame_no: FrameId,
    ) -> Result<(), BufferError> {
        match self.map.entry((file.id(), page_no)) {
            Entry::Occupied(_) => Err(BufferError::HashAlreadyPresent {
                file: file.filename().to_string(),
                page_no,
            }),
            Entry::Vacant(slot) => {
                slot.insert(frame_no);
                Ok(())
            }
        }
    }

    pub fn lookup(&self, file: &FilePtr, page_no: PageId) -> Result<FrameId, BufferError> {
        self.map
            .get(&(file.id(), page_no))
            .copied()
            .ok_or_else(|| BufferError::HashNotFound {
                file: file.filename().to_string(),
                page_no,
            })
    }

    pub fn remove(&mut self, file: &FilePtr, page_no: PageId) -> Result<(), BufferError> {
        self.map
            .remove(&(file.id(), page_no))
            .map(|_| ())
            .ok_or_else(|| BufferError::HashNotFound {
                file: file.filename().to_string(),
                page_no,
            })
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.map.len()
    }
}
